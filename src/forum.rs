//! Typed client for the two forum endpoints the bot drives.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use wreq::header::HeaderMap;

use crate::cookies::CookieJar;
use crate::error::Result;
use crate::http::HttpClient;

pub const CHECKIN_PATH: &str = "/api/users/checkin";
pub const DAILY_QUESTIONS_PATH: &str = "/api/daily_questions";

/// Error code the forum returns when the captured credentials no
/// longer authenticate. Recoverable: the server message is relayed to
/// the notification instead of raising an error.
pub const ERRNO_NOT_LOGGED_IN: i64 = -1;

#[derive(Debug, Clone, Deserialize)]
pub struct EmotionChoice {
    pub qdxq: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckinState {
    #[serde(default)]
    pub errno: Option<i64>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub emotion: Vec<EmotionChoice>,
}

/// Mood code plus free-text note submitted on check-in.
#[derive(Debug, Serialize)]
pub struct CheckinPayload {
    pub qdxq: String,
    pub todaysay: String,
}

#[derive(Debug, Deserialize)]
pub struct QuestionState {
    #[serde(default)]
    pub errno: Option<i64>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub question: Option<Question>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Question {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub qc: Option<String>,
    /// Remaining response fields in document order; the labeled answer
    /// options (`a1`..`aN`) live here.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Question {
    /// Question id as sent by the server, with JSON null treated as
    /// missing.
    pub fn qid(&self) -> Option<&Value> {
        self.id.as_ref().filter(|v| !v.is_null())
    }
}

#[derive(Debug, Serialize)]
pub struct AnswerSubmission {
    pub qid: Value,
    pub answer: u32,
}

#[derive(Debug, Deserialize)]
pub struct ForumReply {
    #[serde(default)]
    pub errno: Option<i64>,
    #[serde(default)]
    pub msg: Option<String>,
}

pub struct ForumClient {
    http: HttpClient,
    api_base: String,
}

impl ForumClient {
    /// `api_base` is a parameter (rather than baked in) so integration
    /// tests can aim the client at a local mock.
    pub fn new(api_base: &str, headers: HeaderMap, cookies: &CookieJar) -> Result<Self> {
        Ok(Self {
            http: HttpClient::with_profile(headers, Some(cookies))?,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    pub async fn fetch_checkin(&self) -> Result<CheckinState> {
        self.http
            .get_json(&format!("{}{}", self.api_base, CHECKIN_PATH))
            .await
    }

    pub async fn submit_checkin(&self, payload: &CheckinPayload) -> Result<ForumReply> {
        self.http
            .post_json(&format!("{}{}", self.api_base, CHECKIN_PATH), payload)
            .await
    }

    pub async fn fetch_daily_question(&self) -> Result<QuestionState> {
        self.http
            .get_json(&format!("{}{}", self.api_base, DAILY_QUESTIONS_PATH))
            .await
    }

    pub async fn submit_answer(&self, submission: &AnswerSubmission) -> Result<ForumReply> {
        self.http
            .post_json(&format!("{}{}", self.api_base, DAILY_QUESTIONS_PATH), submission)
            .await
    }
}
