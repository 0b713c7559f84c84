pub mod app_state;
pub mod webhook_routes;
