use teloxide::{
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup},
};

use crate::{
    errors::HandlerResult,
    handlers::report_failure,
    session::Sessions,
    utils::StatusText,
    ytdlp::{FormatOption, probe_formats},
};

/// Probe the link and offer one button per unique resolution.
pub async fn link_received(
    bot: Bot,
    msg: Message,
    text: String,
    sessions: Sessions,
) -> HandlerResult {
    let url = text.trim().to_string();

    sessions.begin(msg.chat.id).await;

    // Immediate feedback; the probe edits this message in place.
    let status_msg = bot
        .send_message(msg.chat.id, StatusText::FetchingFormats.to_string())
        .await?;
    sessions.set_request(msg.chat.id, &url, status_msg.id).await;

    match probe_formats(&url).await {
        Ok(options) if options.is_empty() => {
            bot.edit_message_text(msg.chat.id, status_msg.id, StatusText::NoFormats.to_string())
                .await?;
        }
        Ok(options) => {
            bot.edit_message_text(
                msg.chat.id,
                status_msg.id,
                StatusText::SelectQuality.to_string(),
            )
            .reply_markup(quality_keyboard(&options, &url))
            .await?;
        }
        Err(err) => {
            report_failure(&bot, msg.chat.id, Some(status_msg.id), &err).await?;
        }
    }

    Ok(())
}

fn quality_keyboard(options: &[FormatOption], url: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(options.iter().map(|option| {
        vec![InlineKeyboardButton::callback(
            option.button_label(),
            option.callback_payload(url),
        )]
    }))
}
