use std::sync::Arc;

use crate::config::Settings;
use crate::models::global_session_manager::GlobalSessionManager;
use crate::services::completion_service::CompletionBackend;
use crate::telegram::TelegramClient;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub telegram: TelegramClient,
    pub backend: Arc<dyn CompletionBackend>,
    pub session_manager: GlobalSessionManager,
}
