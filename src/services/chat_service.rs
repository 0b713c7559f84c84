use std::time::Instant;

use log::{error, info};

use crate::config::{self, Settings};
use crate::models::global_session_manager::GlobalSessionManager;
use crate::models::user_session::Mode;
use crate::services::completion_service::CompletionBackend;

/// The two ticket flows that capture a single follow-up message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketKind {
    Report,
    Payment,
}

impl TicketKind {
    fn admin_prefix(&self) -> &'static str {
        match self {
            TicketKind::Report => "Report from",
            TicketKind::Payment => "Support payment from",
        }
    }

    fn ack(&self) -> &'static str {
        match self {
            TicketKind::Report => config::REPORT_ACK,
            TicketKind::Payment => config::SUPPORT_ACK,
        }
    }
}

/// Decision returned to the dispatcher, which performs the actual
/// platform I/O. The session state is already committed by the time an
/// Outcome is returned.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    RateLimited {
        reply: &'static str,
    },
    Ticket {
        kind: TicketKind,
        admin_text: String,
        reply: &'static str,
    },
    Chat {
        reply: String,
    },
}

/// Inline-keyboard action selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Report,
    Support,
}

impl UserAction {
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "report" => Some(UserAction::Report),
            "support" => Some(UserAction::Support),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum ActionOutcome {
    ReportPrompt { reply: &'static str },
    PaymentInstructions { reply: String },
}

/// Arms a ticket flow for the user. Selecting an action while already
/// waiting just overwrites the flag; nothing stacks.
pub async fn select_action(
    sessions: &GlobalSessionManager,
    settings: &Settings,
    user_id: i64,
    action: UserAction,
) -> ActionOutcome {
    let session = sessions.get_or_create(user_id);
    let mut session = session.lock().await;
    match action {
        UserAction::Report => {
            session.mode = Mode::AwaitingReport;
            ActionOutcome::ReportPrompt {
                reply: config::REPORT_PROMPT,
            }
        }
        UserAction::Support => {
            session.mode = Mode::AwaitingSupport;
            ActionOutcome::PaymentInstructions {
                reply: settings.payment_instructions(),
            }
        }
    }
}

/// Processes one text message: rate limit first, then the armed ticket
/// flow if any, otherwise a normal chat turn against the completion
/// backend. The session lock is never held across a network await.
pub async fn process_text_message(
    sessions: &GlobalSessionManager,
    backend: &dyn CompletionBackend,
    settings: &Settings,
    user_id: i64,
    display_name: &str,
    text: &str,
) -> Outcome {
    let session = sessions.get_or_create(user_id);

    // Admission and mode consumption are atomic per user: concurrent
    // duplicate deliveries cannot double-count the window or consume the
    // same ticket twice.
    let (mode, history) = {
        let mut session = session.lock().await;
        if !session.admit(Instant::now(), settings.rate_limit, settings.rate_window) {
            return Outcome::RateLimited {
                reply: config::SLOW_DOWN_REPLY,
            };
        }
        let mode = session.take_mode();
        (mode, session.history.clone())
    };

    let ticket = match mode {
        Mode::AwaitingReport => Some(TicketKind::Report),
        Mode::AwaitingSupport => Some(TicketKind::Payment),
        Mode::Idle => None,
    };

    if let Some(kind) = ticket {
        info!("{:?} ticket from {}: {}", kind, user_id, text);
        return Outcome::Ticket {
            kind,
            admin_text: format!(
                "{} {} ({}):\n{}",
                kind.admin_prefix(),
                display_name,
                user_id,
                text
            ),
            reply: kind.ack(),
        };
    }

    let (reply, succeeded) = match backend.complete(history, text.to_string()).await {
        Ok(reply) => (reply, true),
        Err(e) => {
            error!("completion failed for user {}: {}", user_id, e);
            (config::FALLBACK_REPLY.to_string(), false)
        }
    };

    if succeeded || settings.record_fallback_turns {
        let mut session = session.lock().await;
        session.record_turn(text.to_string(), reply.clone(), settings.history_limit);
    }

    Outcome::Chat { reply }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_action_parse() {
        assert_eq!(UserAction::parse("report"), Some(UserAction::Report));
        assert_eq!(UserAction::parse("support"), Some(UserAction::Support));
        assert_eq!(UserAction::parse("chat"), None);
        assert_eq!(UserAction::parse(""), None);
    }

    #[test]
    fn test_admin_prefix_matches_kind() {
        assert_eq!(TicketKind::Report.admin_prefix(), "Report from");
        assert_eq!(TicketKind::Payment.admin_prefix(), "Support payment from");
    }
}
