use actix_web::{post, web, HttpResponse, Responder};
use log::{debug, warn};
use serde_json::Value;

use crate::routes::app_state::AppState;
use crate::telegram::Update;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(telegram_webhook);
}

/// Telegram delivers updates here; the path segment doubles as a shared
/// secret. Malformed payloads are dropped with a 200 so Telegram does not
/// keep redelivering them.
#[post("/webhook/{token}")]
async fn telegram_webhook(
    data: web::Data<AppState>,
    path: web::Path<String>,
    req_body: web::Json<Value>,
) -> impl Responder {
    if path.into_inner() != data.settings.bot_token {
        warn!("rejected webhook call with unexpected token");
        return HttpResponse::NotFound().finish();
    }

    match serde_json::from_value::<Update>(req_body.into_inner()) {
        Ok(update) => crate::handlers::webhook_handler::handle_update(data, update).await,
        Err(e) => debug!("discarding malformed update: {}", e),
    }

    HttpResponse::Ok().json(serde_json::json!({ "ok": true }))
}
