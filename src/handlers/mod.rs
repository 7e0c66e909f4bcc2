mod link_received;
mod quality_selected;

pub use link_received::link_received;
pub use quality_selected::quality_selected;

use teloxide::{prelude::*, types::MessageId};

use crate::errors::{BotError, HandlerResult};

/// The one place where a failed operation becomes a user-visible message.
/// Probe failures replace the status message in place; download and upload
/// failures arrive as a fresh message.
pub async fn report_failure(
    bot: &Bot,
    chat_id: ChatId,
    status_message: Option<MessageId>,
    err: &BotError,
) -> HandlerResult {
    log::error!("{}", err);

    match (err, status_message) {
        (BotError::ProbeFailed(_), Some(message_id)) => {
            bot.edit_message_text(chat_id, message_id, err.user_text())
                .await?;
        }
        _ => {
            bot.send_message(chat_id, err.user_text()).await?;
        }
    }

    Ok(())
}
