use std::env;
use std::time::Duration;

use anyhow::Context;
use dotenv::dotenv;

pub fn init_logging() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
}

pub const COMPLETION_MODEL: &str = "gpt-4o-mini";

pub const SYSTEM_PROMPT: &str = "You are Mehrnaz, a witty, playful, slightly blunt assistant. \
You respond honestly, use emojis, humor, casual language, and sometimes a little sarcasm. \
Keep replies short (1-2 sentences). \
Reply in the same language as the user (English or Persian). \
Never narrate or give instructions.";

pub const GREETING: &str = "سلام 😎 من مهرنازم!";
pub const SLOW_DOWN_REPLY: &str = "آروم‌تر 😅 لطفا چند ثانیه صبر کن";
pub const FALLBACK_REPLY: &str = "یه مشکلی پیش اومده 😅";
pub const REPORT_PROMPT: &str = "لطفا متن گزارشت رو بنویس";
pub const REPORT_ACK: &str = "گزارش شما ثبت شد ✅";
pub const SUPPORT_ACK: &str = "ثبت شد 🙌 ممنون!";

pub const RATE_LIMIT: usize = 5;
pub const RATE_WINDOW_SECS: u64 = 10;
pub const HISTORY_LIMIT: usize = 10;

const DEFAULT_CARD_NUMBER: &str = "5859831080517518";
const DEFAULT_PORT: u16 = 8080;

/// Runtime configuration, read once at startup. Secrets come from the
/// environment (or a .env file in dev); tuning values default to the
/// constants above.
#[derive(Clone)]
pub struct Settings {
    pub bot_token: String,
    pub openrouter_key: String,
    pub admin_chat_id: i64,
    pub webhook_url: String,
    pub port: u16,
    pub card_number: String,
    pub rate_limit: usize,
    pub rate_window: Duration,
    pub history_limit: usize,
    /// When the completion call fails we reply with FALLBACK_REPLY. This
    /// flag controls whether that fallback is also recorded in the chat
    /// history as the assistant turn (the historical behavior).
    pub record_fallback_turns: bool,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();

        let bot_token = env::var("BOT_TOKEN").context("BOT_TOKEN is not set")?;
        let openrouter_key = env::var("OPENROUTER_KEY").context("OPENROUTER_KEY is not set")?;
        let admin_chat_id: i64 = env::var("ADMIN_CHAT_ID")
            .context("ADMIN_CHAT_ID is not set")?
            .parse()
            .context("ADMIN_CHAT_ID must be a chat id")?;
        let webhook_url = env::var("WEBHOOK_URL").context("WEBHOOK_URL is not set")?;

        let port = match env::var("PORT") {
            Ok(p) => p.parse()?,
            Err(_) => DEFAULT_PORT,
        };
        let card_number =
            env::var("CARD_NUMBER").unwrap_or_else(|_| DEFAULT_CARD_NUMBER.to_string());

        Ok(Settings {
            bot_token,
            openrouter_key,
            admin_chat_id,
            webhook_url,
            port,
            card_number,
            rate_limit: RATE_LIMIT,
            rate_window: Duration::from_secs(RATE_WINDOW_SECS),
            history_limit: HISTORY_LIMIT,
            record_fallback_turns: true,
        })
    }

    /// Payment instructions sent when a user enters the support flow.
    pub fn payment_instructions(&self) -> String {
        format!("شماره کارت:\n`{}`\n\nبعدش مبلغ رو بفرست.", self.card_number)
    }
}
