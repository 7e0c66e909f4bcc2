use teloxide::{dispatching::UpdateHandler, prelude::*, utils::command::BotCommands};

use crate::{
    commands::start,
    errors::BotError,
    handlers::{link_received, quality_selected},
    utils::looks_like_url,
};

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
enum Command {
    /// Show the greeting
    Start,
}

pub fn schema() -> UpdateHandler<BotError> {
    use dptree::case;

    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    teloxide::filter_command::<Command, _>()
                        .branch(case![Command::Start].endpoint(start)),
                )
                // Text that does not look like a link is dropped silently
                .branch(
                    Message::filter_text()
                        .filter(|text: String| looks_like_url(&text))
                        .endpoint(link_received),
                ),
        )
        .branch(Update::filter_callback_query().endpoint(quality_selected))
}
