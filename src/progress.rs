use std::time::{Duration, Instant};

use teloxide::{
    prelude::*,
    types::{ChatId, MessageId, ParseMode},
};
use tokio::sync::mpsc;

use crate::session::Sessions;

/// Minimum interval between visible progress edits per chat.
pub const PROGRESS_EDIT_INTERVAL: Duration = Duration::from_secs(5);

/// Percent, speed and ETA exactly as yt-dlp printed them. No independent
/// computation happens on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub percent: String,
    pub speed: String,
    pub eta: String,
}

/// One progress event posted from the download task to the consumer that owns
/// the status-message edits.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub snapshot: ProgressSnapshot,
}

impl ProgressUpdate {
    pub fn render(&self) -> String {
        format!(
            "📥 <b>Downloading Video...</b>\n\n\
             📊 Progress: <code>{}</code>\n\
             ⚡ Speed: <code>{}</code>\n\
             ⏳ ETA: <code>{}</code>",
            self.snapshot.percent, self.snapshot.speed, self.snapshot.eta
        )
    }
}

/// Parse one yt-dlp progress line.
///
/// Example: `[download]  45.2% of 10.00MiB at 500.00KiB/s ETA 00:10`
pub fn parse_progress_line(line: &str) -> Option<ProgressSnapshot> {
    if !line.contains("[download]") || !line.contains('%') {
        // Other downloader output, e.g. "[download] Destination: ..."
        return None;
    }

    let parts: Vec<&str> = line.split_whitespace().collect();
    let mut percent = None;
    let mut speed = None;
    let mut eta = None;

    for (i, part) in parts.iter().enumerate() {
        if part.ends_with('%') && percent.is_none() {
            percent = Some(part.to_string());
        }
        if *part == "at" && i + 1 < parts.len() {
            speed = Some(parts[i + 1].to_string());
        }
        if *part == "ETA" && i + 1 < parts.len() {
            eta = Some(parts[i + 1].to_string());
        }
    }

    Some(ProgressSnapshot {
        percent: percent?,
        speed: speed.unwrap_or_else(|| "0 KB/s".to_string()),
        eta: eta.unwrap_or_else(|| "0s".to_string()),
    })
}

/// Start the consumer task that turns queued progress events into status
/// edits. Returns the sender handed to download tasks. Edits are
/// fire-and-forget; a failed edit is dropped, not reported.
pub fn spawn_consumer(bot: Bot, sessions: Sessions) -> mpsc::UnboundedSender<ProgressUpdate> {
    let (tx, mut rx) = mpsc::unbounded_channel::<ProgressUpdate>();

    tokio::spawn(async move {
        while let Some(update) = rx.recv().await {
            if !sessions
                .should_emit_progress(update.chat_id, Instant::now())
                .await
            {
                continue;
            }

            let _ = bot
                .edit_message_text(update.chat_id, update.message_id, update.render())
                .parse_mode(ParseMode::Html)
                .await;
        }
    });

    tx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_progress_line() {
        let snapshot =
            parse_progress_line("[download]  45.2% of 10.00MiB at 500.00KiB/s ETA 00:10").unwrap();

        assert_eq!(snapshot.percent, "45.2%");
        assert_eq!(snapshot.speed, "500.00KiB/s");
        assert_eq!(snapshot.eta, "00:10");
    }

    #[test]
    fn finished_line_falls_back_to_defaults() {
        let snapshot = parse_progress_line("[download] 100% of 10.00MiB in 00:12").unwrap();

        assert_eq!(snapshot.percent, "100%");
        assert_eq!(snapshot.speed, "0 KB/s");
        assert_eq!(snapshot.eta, "0s");
    }

    #[test]
    fn non_progress_lines_are_skipped() {
        assert!(parse_progress_line("[download] Destination: video_1_ab12cd34.mp4").is_none());
        assert!(
            parse_progress_line("[Merger] Merging formats into \"video_1_ab12cd34.mp4\"").is_none()
        );
        assert!(parse_progress_line("").is_none());
    }

    #[test]
    fn render_embeds_the_extractor_strings() {
        let update = ProgressUpdate {
            chat_id: ChatId(1),
            message_id: MessageId(2),
            snapshot: ProgressSnapshot {
                percent: "45.2%".to_string(),
                speed: "500.00KiB/s".to_string(),
                eta: "00:10".to_string(),
            },
        };

        let text = update.render();
        assert!(text.contains("45.2%"));
        assert!(text.contains("500.00KiB/s"));
        assert!(text.contains("00:10"));
    }
}
