use actix_web::web;
use log::{debug, error, info};

use crate::config;
use crate::routes::app_state::AppState;
use crate::services::chat_service::{self, ActionOutcome, Outcome, UserAction};
use crate::telegram::{
    CallbackQuery, InlineKeyboardButton, InlineKeyboardMarkup, Message, Update,
};

/// Routes one inbound update to the matching flow. Updates this bot does
/// not handle are dropped here, before any session state is touched.
pub async fn handle_update(data: web::Data<AppState>, update: Update) {
    if let Some(message) = update.message {
        handle_message(data.get_ref(), message).await;
    } else if let Some(query) = update.callback_query {
        handle_callback(data.get_ref(), query).await;
    } else {
        debug!("ignoring unsupported update {}", update.update_id);
    }
}

fn start_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: vec![
            vec![InlineKeyboardButton::new("💬 Chat", "chat")],
            vec![InlineKeyboardButton::new("📩 Report", "report")],
            vec![InlineKeyboardButton::new("💖 Support", "support")],
        ],
    }
}

async fn handle_message(data: &AppState, message: Message) {
    let user = match message.from {
        Some(user) => user,
        None => {
            debug!("discarding message {} without a sender", message.message_id);
            return;
        }
    };
    let text = match message.text.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => {
            debug!("discarding non-text message from {}", user.id);
            return;
        }
    };
    let chat_id = message.chat.id;

    if text == "/start" {
        if let Err(e) = data
            .telegram
            .send_message_with_keyboard(chat_id, config::GREETING, &start_menu())
            .await
        {
            error!("failed to send start menu to {}: {}", chat_id, e);
        }
        return;
    }

    info!("Processing message from {}: {}", user.id, text);
    let outcome = chat_service::process_text_message(
        &data.session_manager,
        data.backend.as_ref(),
        &data.settings,
        user.id,
        &user.full_name(),
        &text,
    )
    .await;

    match outcome {
        Outcome::RateLimited { reply } => {
            if let Err(e) = data.telegram.send_message(chat_id, reply).await {
                error!("failed to send rate-limit notice to {}: {}", chat_id, e);
            }
        }
        Outcome::Ticket {
            kind,
            admin_text,
            reply,
        } => {
            // Fire-and-forget toward the admin chat; a delivery failure
            // must not block the user acknowledgement.
            if let Err(e) = data
                .telegram
                .send_message(data.settings.admin_chat_id, &admin_text)
                .await
            {
                error!("failed to forward {:?} ticket from {}: {}", kind, user.id, e);
            }
            if let Err(e) = data.telegram.send_message(chat_id, reply).await {
                error!("failed to acknowledge ticket to {}: {}", chat_id, e);
            }
        }
        Outcome::Chat { reply } => {
            if let Err(e) = data.telegram.send_message(chat_id, &reply).await {
                error!("failed to send reply to {}: {}", chat_id, e);
            }
        }
    }
}

async fn handle_callback(data: &AppState, query: CallbackQuery) {
    if let Err(e) = data.telegram.answer_callback_query(&query.id).await {
        error!("failed to answer callback query {}: {}", query.id, e);
    }

    let action = match query.data.as_deref().and_then(UserAction::parse) {
        Some(action) => action,
        None => {
            // The "chat" button and anything unknown need no mode change.
            debug!("callback {:?} requires no action", query.data);
            return;
        }
    };
    let message = match query.message {
        Some(message) => message,
        None => {
            debug!("callback query {} without source message", query.id);
            return;
        }
    };

    let outcome =
        chat_service::select_action(&data.session_manager, &data.settings, query.from.id, action)
            .await;

    let result = match outcome {
        ActionOutcome::ReportPrompt { reply } => {
            data.telegram
                .edit_message_text(message.chat.id, message.message_id, reply, None)
                .await
        }
        ActionOutcome::PaymentInstructions { reply } => {
            data.telegram
                .edit_message_text(
                    message.chat.id,
                    message.message_id,
                    &reply,
                    Some("Markdown"),
                )
                .await
        }
    };
    if let Err(e) = result {
        error!("failed to show {:?} prompt to {}: {}", action, query.from.id, e);
    }
}
