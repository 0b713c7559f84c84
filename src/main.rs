use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use log::{error, info};

use MehrnazChatBot::config::{self, Settings};
use MehrnazChatBot::models::global_session_manager::GlobalSessionManager;
use MehrnazChatBot::routes::{app_state::AppState, webhook_routes};
use MehrnazChatBot::services::completion_service::{CompletionBackend, OpenRouterClient};
use MehrnazChatBot::telegram::TelegramClient;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    config::init_logging();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!("configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let telegram = match TelegramClient::new(&settings.bot_token) {
        Ok(client) => client,
        Err(e) => {
            error!("failed to build Telegram client: {}", e);
            std::process::exit(1);
        }
    };
    let backend: Arc<dyn CompletionBackend> =
        match OpenRouterClient::new(settings.openrouter_key.clone()) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                error!("failed to build completion client: {}", e);
                std::process::exit(1);
            }
        };

    // Telegram pushes updates to {WEBHOOK_URL}/webhook/{token}.
    let webhook = format!(
        "{}/webhook/{}",
        settings.webhook_url.trim_end_matches('/'),
        settings.bot_token
    );
    if let Err(e) = telegram.set_webhook(&webhook).await {
        error!("failed to register webhook: {}", e);
        std::process::exit(1);
    }

    let port = settings.port;
    let state = AppState {
        settings,
        telegram,
        backend,
        session_manager: GlobalSessionManager::new(),
    };

    info!("Starting server on 0.0.0.0:{}", port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(webhook_routes::init_routes)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
