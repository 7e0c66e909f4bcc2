mod commands;
mod errors;
mod handlers;
#[cfg(feature = "health")]
mod health;
mod progress;
mod schema;
mod session;
mod temp_file;
mod utils;
mod ytdlp;

use std::time::Duration;

use teloxide::prelude::*;

use crate::{progress::spawn_consumer, schema::schema, session::Sessions, utils::require_env};

/// Uploading a full-length video can take a while; keep the API client
/// timeout far above reqwest's default.
const API_TIMEOUT: Duration = Duration::from_secs(1000);

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    pretty_env_logger::init();

    let token = match require_env("BOT_TOKEN") {
        Ok(token) => token,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    #[cfg(feature = "health")]
    {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        tokio::spawn(health::serve(port));
    }

    log::info!("Starting video grabber bot...");

    let client = reqwest::ClientBuilder::new()
        .timeout(API_TIMEOUT)
        .build()
        .expect("failed to build HTTP client");
    let bot = Bot::with_client(token, client);

    let sessions = Sessions::new();
    let progress_tx = spawn_consumer(bot.clone(), sessions.clone());

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![sessions, progress_tx])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
