use std::env;

use tracing::debug;
use wreq::header::HeaderMap;

use crate::cookies::CookieJar;
use crate::curl;
use crate::error::{AcresbotError, Result};
use crate::notify::{ClassifierRules, TelegramNotifier};

pub const API_HOST: &str = "api.1point3acres.com";
const ANSWER_KEY_URL: &str =
    "https://raw.githubusercontent.com/xjasonlyu/1point3acres/main/questions.json";
const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const SERVICE_NAME: &str = "1Point3Acres";

pub const REQUEST_ENV: &str = "CURL_1P3A";
pub const TG_CHAT_ENV: &str = "TG_USER_ID";
pub const TG_TOKEN_ENV: &str = "TG_BOT_TOKEN";

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub chat_id: String,
    pub bot_token: String,
    pub api_base: String,
}

/// Everything the tasks need, resolved once at startup and passed by
/// reference. Remote bases are plain fields so tests can substitute a
/// local mock.
#[derive(Debug, Clone)]
pub struct Config {
    pub service_name: String,
    pub classifier: ClassifierRules,
    api_base: String,
    api_host: String,
    answer_key_url: String,
    captured_request: Option<String>,
    telegram: Option<TelegramConfig>,
}

impl Config {
    /// Production defaults, no environment involved.
    pub fn new() -> Self {
        Self {
            service_name: SERVICE_NAME.to_string(),
            classifier: ClassifierRules::default(),
            api_base: format!("https://{}", API_HOST),
            api_host: API_HOST.to_string(),
            answer_key_url: ANSWER_KEY_URL.to_string(),
            captured_request: None,
            telegram: None,
        }
    }

    /// Overlay the environment onto the defaults.
    ///
    /// The captured request is validated lazily, so a missing value
    /// still yields one Failed notification per task instead of
    /// aborting the process before anything runs.
    pub fn from_env() -> Self {
        let mut config = Self::new();

        config.captured_request = env::var(REQUEST_ENV).ok().filter(|s| !s.trim().is_empty());

        config.telegram = match (env::var(TG_CHAT_ENV), env::var(TG_TOKEN_ENV)) {
            (Ok(chat_id), Ok(bot_token)) if !chat_id.is_empty() && !bot_token.is_empty() => {
                Some(TelegramConfig {
                    chat_id,
                    bot_token,
                    api_base: TELEGRAM_API_BASE.to_string(),
                })
            }
            _ => {
                debug!("Telegram credentials not set, notifications will be skipped");
                None
            }
        };

        config
    }

    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    pub fn with_answer_key_url(mut self, url: &str) -> Self {
        self.answer_key_url = url.to_string();
        self
    }

    pub fn with_captured_request(mut self, raw: &str) -> Self {
        self.captured_request = Some(raw.to_string());
        self
    }

    pub fn with_telegram(mut self, telegram: TelegramConfig) -> Self {
        self.telegram = Some(telegram);
        self
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn answer_key_url(&self) -> &str {
        &self.answer_key_url
    }

    /// Parse the captured request into the header map and cookie jar a
    /// task loads into its client.
    pub fn request_profile(&self) -> Result<(HeaderMap, CookieJar)> {
        let raw = self.captured_request.as_deref().ok_or_else(|| {
            AcresbotError::Config(format!(
                "environment variable {} is not set or empty",
                REQUEST_ENV
            ))
        })?;

        curl::parse_descriptor(raw, &self.api_host)
    }

    /// The notifier selected at startup, if credentials were provided.
    pub fn notifier(&self) -> Option<TelegramNotifier> {
        self.telegram
            .as_ref()
            .map(|t| TelegramNotifier::new(&t.api_base, &t.chat_id, &t.bot_token))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_captured_request_is_config_error() {
        let config = Config::new();
        match config.request_profile() {
            Err(AcresbotError::Config(msg)) => assert!(msg.contains(REQUEST_ENV)),
            other => panic!("expected Config error, got: {:?}", other),
        }
    }

    #[test]
    fn test_captured_request_parses_into_profile() {
        let config =
            Config::new().with_captured_request("curl 'https://x' -H 'Accept: */*' -b 'sid=1'");
        let (headers, cookies) = config.request_profile().unwrap();
        assert_eq!(headers.get("host").unwrap(), API_HOST);
        assert_eq!(cookies.get("sid"), Some("1"));
    }

    #[test]
    fn test_no_telegram_means_no_notifier() {
        assert!(Config::new().notifier().is_none());
    }
}
