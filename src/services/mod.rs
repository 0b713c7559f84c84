pub mod chat_service;
pub mod completion_service;
