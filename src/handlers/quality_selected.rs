use teloxide::{
    prelude::*,
    types::{InputFile, MaybeInaccessibleMessage, MessageId},
};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    errors::{BotError, BotResult, HandlerResult},
    handlers::report_failure,
    progress::ProgressUpdate,
    session::Sessions,
    temp_file::TempFile,
    utils::{StatusText, temp_video_path},
    ytdlp::download_format,
};

/// Handle a quality button press: decode the payload, download the stream,
/// upload the file, clean up. The temp file is removed whichever way this
/// ends.
pub async fn quality_selected(
    bot: Bot,
    query: CallbackQuery,
    sessions: Sessions,
    progress: UnboundedSender<ProgressUpdate>,
) -> HandlerResult {
    let Some(data) = query.data.clone() else {
        return Ok(());
    };

    let message = query
        .message
        .as_ref()
        .ok_or_else(|| BotError::download_failed("selection message is gone"))?;

    let chat_id = match message {
        MaybeInaccessibleMessage::Inaccessible(m) => m.chat.id,
        MaybeInaccessibleMessage::Regular(m) => m.chat.id,
    };
    let message_id = match message {
        MaybeInaccessibleMessage::Inaccessible(m) => m.message_id,
        MaybeInaccessibleMessage::Regular(m) => m.id,
    };

    bot.answer_callback_query(&query.id).await?;

    if let Err(err) = run_download(&bot, &data, chat_id, message_id, &sessions, &progress).await {
        report_failure(&bot, chat_id, None, &err).await?;
    }

    sessions.clear(chat_id).await;

    Ok(())
}

async fn run_download(
    bot: &Bot,
    payload: &str,
    chat_id: ChatId,
    message_id: MessageId,
    sessions: &Sessions,
    progress: &UnboundedSender<ProgressUpdate>,
) -> BotResult<()> {
    let (format_id, url) = decode_selection(payload)?;

    sessions.reset_progress(chat_id).await;
    bot.edit_message_text(chat_id, message_id, StatusText::StartingDownload.to_string())
        .await?;

    let file = TempFile::new(temp_video_path(chat_id));

    download_format(
        &url,
        &format_id,
        file.path(),
        chat_id,
        message_id,
        progress.clone(),
    )
    .await?;

    bot.edit_message_text(chat_id, message_id, StatusText::Uploading.to_string())
        .await?;

    bot.send_video(chat_id, InputFile::file(file.path()))
        .caption("✅ Video Ready!")
        .supports_streaming(true)
        .await
        .map_err(|e| BotError::upload_failed(e.to_string()))?;

    bot.delete_message(chat_id, message_id).await?;

    Ok(())
}

/// Decode `format_id|url`. Exactly two fields are required, so a payload
/// whose URL carries a literal `|` does not decode.
fn decode_selection(payload: &str) -> BotResult<(String, String)> {
    let parts: Vec<&str> = payload.split('|').collect();
    match parts.as_slice() {
        [format_id, url] => Ok((format_id.to_string(), url.to_string())),
        _ => Err(BotError::download_failed(format!(
            "malformed selection payload: {}",
            payload
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_two_field_payload() {
        let (format_id, url) = decode_selection("22|https://example.com/v").unwrap();

        assert_eq!(format_id, "22");
        assert_eq!(url, "https://example.com/v");
    }

    #[test]
    fn pipe_inside_url_is_rejected() {
        // The payload format cannot carry a `|` inside the URL.
        assert!(decode_selection("22|https://example.com/v?a=1|b=2").is_err());
    }

    #[test]
    fn payload_without_separator_is_rejected() {
        assert!(decode_selection("just-text").is_err());
    }
}
