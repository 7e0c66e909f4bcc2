use std::path::Path;
use std::process::Stdio;

use teloxide::types::{ChatId, MessageId};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::errors::{BotError, BotResult};
use crate::progress::{ProgressUpdate, parse_progress_line};

use super::base_command;

/// Download the selected format merged with the best audio track into
/// `output`. Progress lines from yt-dlp are posted onto the channel as they
/// arrive; sending never blocks the transfer and a closed receiver is
/// ignored.
pub async fn download_format(
    url: &str,
    format_id: &str,
    output: &Path,
    chat_id: ChatId,
    message_id: MessageId,
    progress: mpsc::UnboundedSender<ProgressUpdate>,
) -> BotResult<()> {
    let mut cmd = base_command();
    cmd.args(["-f", &format!("{}+bestaudio/best", format_id)])
        .args(["--merge-output-format", "mp4"])
        .arg("--newline")
        .arg("-o")
        .arg(output)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    log::info!("Starting download: {} (format {})", url, format_id);

    let mut child = cmd
        .spawn()
        .map_err(|e| BotError::download_failed(e.to_string()))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| BotError::download_failed("yt-dlp stdout unavailable"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| BotError::download_failed("yt-dlp stderr unavailable"))?;

    // Drain stderr concurrently so the child never blocks on a full pipe.
    let stderr_task = tokio::spawn(async move {
        let mut lines = BufReader::new(stderr).lines();
        let mut collected = String::new();
        while let Ok(Some(line)) = lines.next_line().await {
            collected.push_str(&line);
            collected.push('\n');
        }
        collected
    });

    let mut lines = BufReader::new(stdout).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if let Some(snapshot) = parse_progress_line(&line) {
            let _ = progress.send(ProgressUpdate {
                chat_id,
                message_id,
                snapshot,
            });
        }
    }

    let status = child
        .wait()
        .await
        .map_err(|e| BotError::download_failed(e.to_string()))?;

    log::info!("yt-dlp exit code: {:?}", status.code());

    if !status.success() {
        let stderr_text = stderr_task.await.unwrap_or_default();
        return Err(BotError::download_failed(stderr_text.trim()));
    }

    Ok(())
}
