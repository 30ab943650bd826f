//! Outcome classification and push notification delivery.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::debug;

use crate::error::{AcresbotError, Result};
use crate::http::HttpClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Outcome {
    Success,
    Failed,
}

/// Keyword heuristic deciding whether a result message reads as
/// success. Failure keywords dominate: a message carrying both kinds
/// is Failed.
#[derive(Debug, Clone)]
pub struct ClassifierRules {
    success: Vec<&'static str>,
    failure: Vec<&'static str>,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            success: vec!["OK", "成功", "已签到", "已答题"],
            failure: vec![
                "登录",
                "失败",
                "错误",
                "error",
                "exception",
                "找不到匹配答案",
                "missing",
            ],
        }
    }
}

impl ClassifierRules {
    /// Success keywords match case-sensitively; failure keywords match
    /// against the lowercased message.
    pub fn classify(&self, message: &str) -> Outcome {
        let lowered = message.to_lowercase();

        let is_success = self.success.iter().any(|kw| message.contains(kw));
        let is_failure = self.failure.iter().any(|kw| lowered.contains(kw));

        if is_success && !is_failure {
            Outcome::Success
        } else {
            Outcome::Failed
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, title: &str, body: &str) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: String,
    disable_notification: bool,
    disable_web_page_preview: bool,
}

#[derive(Debug, Deserialize)]
struct SendMessageReply {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram bot webhook notifier.
pub struct TelegramNotifier {
    api_base: String,
    chat_id: String,
    bot_token: String,
    silent: bool,
}

impl TelegramNotifier {
    pub fn new(api_base: &str, chat_id: &str, bot_token: &str) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            chat_id: chat_id.to_string(),
            bot_token: bot_token.to_string(),
            silent: false,
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, title: &str, body: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);
        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text: format!("{}\n\n{}", title, body),
            disable_notification: self.silent,
            disable_web_page_preview: true,
        };

        let reply: SendMessageReply = HttpClient::new()?.post_json(&url, &request).await?;
        if !reply.ok {
            return Err(AcresbotError::Notify(
                reply
                    .description
                    .unwrap_or_else(|| "sendMessage rejected".to_string()),
            ));
        }

        debug!("notification dispatched");
        Ok(())
    }
}
