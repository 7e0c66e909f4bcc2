use teloxide::prelude::*;

use crate::errors::HandlerResult;

pub async fn start(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(
        msg.chat.id,
        "👋 Hello!\n\nSend me a YouTube link and I will download it for you 🎬",
    )
    .await?;
    Ok(())
}
