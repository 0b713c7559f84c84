use std::time::{Duration, Instant};

use crate::models::chat_message::ChatMessage;

/// How the next text message from this user will be interpreted.
/// Exactly one mode is active at a time; selecting an action while
/// already waiting simply overwrites the flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    AwaitingReport,
    AwaitingSupport,
}

/// Per-user conversational state: mode flag, a bounded chat history and
/// the timestamps backing the sliding-window rate limiter. Sessions are
/// created lazily on first contact and live for the process lifetime.
#[derive(Clone, Default)]
pub struct UserSession {
    pub mode: Mode,
    pub history: Vec<ChatMessage>,
    pub request_timestamps: Vec<Instant>,
}

impl UserSession {
    pub fn new() -> Self {
        UserSession::default()
    }

    /// Sliding-window admission check. Prunes timestamps older than
    /// `window`, then admits if fewer than `limit` remain. Only admitted
    /// messages are recorded; a rejected attempt leaves the window as
    /// pruned.
    pub fn admit(&mut self, now: Instant, limit: usize, window: Duration) -> bool {
        self.request_timestamps
            .retain(|&t| now.duration_since(t) < window);
        if self.request_timestamps.len() >= limit {
            return false;
        }
        self.request_timestamps.push(now);
        true
    }

    /// Reads and clears the mode flag in one step, so an AWAITING_* state
    /// is consumed by exactly one message.
    pub fn take_mode(&mut self) -> Mode {
        std::mem::take(&mut self.mode)
    }

    /// Appends a (user, assistant) pair and evicts the oldest entries
    /// past `history_limit`.
    pub fn record_turn(&mut self, user_text: String, reply: String, history_limit: usize) {
        self.history.push(ChatMessage::user(user_text));
        self.history.push(ChatMessage::assistant(reply));
        if self.history.len() > history_limit {
            let excess = self.history.len() - history_limit;
            self.history.drain(..excess);
        }
    }
}
