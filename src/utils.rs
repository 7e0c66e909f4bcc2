use std::path::PathBuf;

use strum::Display;
use teloxide::types::ChatId;

use crate::errors::{BotError, BotResult};

/// The router only checks the prefix; everything else is left to yt-dlp.
pub fn looks_like_url(text: &str) -> bool {
    text.trim().starts_with("http")
}

/// Path for one download attempt. The uuid component keeps two attempts, in
/// the same chat or across chats, on distinct files.
pub fn temp_video_path(chat_id: ChatId) -> PathBuf {
    let short_id = uuid::Uuid::new_v4().to_string()[..8].to_string();
    PathBuf::from(format!("video_{}_{}.mp4", chat_id, short_id))
}

pub fn require_env(name: &str) -> BotResult<String> {
    std::env::var(name).map_err(|_| BotError::config_missing(name))
}

/// Static texts shown on the status message as a request moves along.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusText {
    #[strum(to_string = "🔍 Fetching quality options...")]
    FetchingFormats,
    #[strum(to_string = "✅ Select Quality:")]
    SelectQuality,
    #[strum(to_string = "❌ No downloadable formats found.")]
    NoFormats,
    #[strum(to_string = "🚀 Starting download...")]
    StartingDownload,
    #[strum(to_string = "📤 Uploading to Telegram...")]
    Uploading,
}
