use std::fmt;

/// Closed error taxonomy for the bot. Every failure a user can see is one of
/// these; nothing is retried and nothing is classified further.
#[derive(Debug)]
pub enum BotError {
    /// Listing the available formats for a URL failed
    ProbeFailed(String),
    /// yt-dlp could not fetch the selected format
    DownloadFailed(String),
    /// Sending the downloaded file to the chat failed
    UploadFailed(String),
    /// A required environment variable is absent
    ConfigMissing(String),
    /// Transport error from the Telegram API itself
    Telegram(teloxide::RequestError),
}

impl fmt::Display for BotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotError::ProbeFailed(cause) => write!(f, "Probe failed: {}", cause),
            BotError::DownloadFailed(cause) => write!(f, "Download failed: {}", cause),
            BotError::UploadFailed(cause) => write!(f, "Upload failed: {}", cause),
            BotError::ConfigMissing(name) => {
                write!(f, "Missing required environment variable: {}", name)
            }
            BotError::Telegram(e) => write!(f, "Telegram API error: {}", e),
        }
    }
}

impl std::error::Error for BotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BotError::Telegram(e) => Some(e),
            _ => None,
        }
    }
}

impl From<teloxide::RequestError> for BotError {
    fn from(err: teloxide::RequestError) -> Self {
        BotError::Telegram(err)
    }
}

impl BotError {
    pub fn probe_failed(cause: impl Into<String>) -> Self {
        Self::ProbeFailed(cause.into())
    }

    pub fn download_failed(cause: impl Into<String>) -> Self {
        Self::DownloadFailed(cause.into())
    }

    pub fn upload_failed(cause: impl Into<String>) -> Self {
        Self::UploadFailed(cause.into())
    }

    pub fn config_missing(name: impl Into<String>) -> Self {
        Self::ConfigMissing(name.into())
    }

    /// Text shown to the user when an operation fails. Probe failures render
    /// as an error, anything after a quality was picked as a failure; the
    /// cause string is passed through verbatim.
    pub fn user_text(&self) -> String {
        match self {
            BotError::ProbeFailed(cause) => format!("❌ Error:\n{}", cause),
            BotError::DownloadFailed(cause) | BotError::UploadFailed(cause) => {
                format!("❌ Failed:\n{}", cause)
            }
            BotError::ConfigMissing(name) => {
                format!("Missing required environment variable: {}", name)
            }
            BotError::Telegram(e) => format!("❌ Failed:\n{}", e),
        }
    }
}

/// Result of bot operations
pub type BotResult<T> = Result<T, BotError>;

/// Result for dispatcher endpoints
pub type HandlerResult = BotResult<()>;
