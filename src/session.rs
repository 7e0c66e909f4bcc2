use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use teloxide::types::{ChatId, MessageId};
use tokio::sync::Mutex;

use crate::progress::PROGRESS_EDIT_INTERVAL;

/// Ephemeral state of one probe-then-download interaction. Lives from the
/// first message of a chat until its download handler finishes; nothing is
/// persisted.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub source_url: Option<String>,
    pub status_message: Option<MessageId>,
    last_progress: Option<Instant>,
}

impl Session {
    /// At most one visible progress edit per interval. The first qualifying
    /// event after a reset always passes.
    pub fn should_emit_progress(&mut self, now: Instant, interval: Duration) -> bool {
        match self.last_progress {
            Some(last) if now.duration_since(last) < interval => false,
            _ => {
                self.last_progress = Some(now);
                true
            }
        }
    }

    pub fn reset_progress(&mut self) {
        self.last_progress = None;
    }
}

/// Per-chat session store, injected into handlers through the dispatcher.
/// Chats never observe each other's state.
#[derive(Clone, Default)]
pub struct Sessions {
    inner: Arc<Mutex<HashMap<ChatId, Session>>>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the session on the first interaction with a chat.
    pub async fn begin(&self, chat_id: ChatId) {
        self.inner.lock().await.entry(chat_id).or_default();
    }

    /// Record the in-flight request context once the status message exists.
    pub async fn set_request(&self, chat_id: ChatId, url: &str, status_message: MessageId) {
        let mut sessions = self.inner.lock().await;
        let session = sessions.entry(chat_id).or_default();
        session.source_url = Some(url.to_string());
        session.status_message = Some(status_message);
    }

    /// Reset the throttle at download start so the first progress event is
    /// shown immediately.
    pub async fn reset_progress(&self, chat_id: ChatId) {
        self.inner
            .lock()
            .await
            .entry(chat_id)
            .or_default()
            .reset_progress();
    }

    pub async fn should_emit_progress(&self, chat_id: ChatId, now: Instant) -> bool {
        self.inner
            .lock()
            .await
            .entry(chat_id)
            .or_default()
            .should_emit_progress(now, PROGRESS_EDIT_INTERVAL)
    }

    /// Drop the session once the interaction is over.
    pub async fn clear(&self, chat_id: ChatId) {
        self.inner.lock().await.remove(&chat_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttles_to_one_edit_per_window() {
        let mut session = Session::default();
        let base = Instant::now();

        // Progress events every 0.5s for 30s.
        let mut emitted = 0;
        for tick in 0u64..60 {
            let now = base + Duration::from_millis(500 * tick);
            if session.should_emit_progress(now, Duration::from_secs(5)) {
                emitted += 1;
            }
        }

        assert_eq!(emitted, 6);
    }

    #[test]
    fn first_event_after_reset_is_emitted() {
        let mut session = Session::default();
        let base = Instant::now();
        let window = Duration::from_secs(5);

        assert!(session.should_emit_progress(base, window));
        assert!(!session.should_emit_progress(base + Duration::from_secs(1), window));

        session.reset_progress();
        assert!(session.should_emit_progress(base + Duration::from_secs(2), window));
    }

    #[tokio::test]
    async fn chats_do_not_share_throttle_state() {
        let sessions = Sessions::new();
        let now = Instant::now();

        assert!(sessions.should_emit_progress(ChatId(1), now).await);
        assert!(sessions.should_emit_progress(ChatId(2), now).await);
        assert!(
            !sessions
                .should_emit_progress(ChatId(1), now + Duration::from_secs(1))
                .await
        );
    }

    #[tokio::test]
    async fn cleared_session_starts_fresh() {
        let sessions = Sessions::new();
        sessions
            .set_request(ChatId(7), "https://example.com/v", MessageId(3))
            .await;

        assert!(sessions.should_emit_progress(ChatId(7), Instant::now()).await);
        sessions.clear(ChatId(7)).await;

        assert!(sessions.should_emit_progress(ChatId(7), Instant::now()).await);
    }
}
