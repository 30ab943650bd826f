use std::collections::HashMap;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::Result;
use crate::forum::{AnswerSubmission, ForumClient, Question, ERRNO_NOT_LOGGED_IN};
use crate::http::HttpClient;
use crate::tasks::DailyTask;

lazy_static! {
    static ref ANSWER_FIELD_RE: Regex = Regex::new(r"^a(\d+)$").expect("answer field regex");
    // Both spoiler forms the forum emits: {hide=123}...{/hide} and
    // [hide=123]...[\hide].
    static ref HIDE_RE: Regex =
        Regex::new(r"(?i)\{hide=?\d*\}(.*?)\{/hide\}|\[hide=?\d*\](.*?)\[\\hide\]")
            .expect("hide markup regex");
}

pub struct DailyQuestionTask;

#[async_trait]
impl DailyTask for DailyQuestionTask {
    fn name(&self) -> &'static str {
        "daily_questions"
    }

    async fn run(&self, config: &Config) -> Result<String> {
        let (headers, cookies) = config.request_profile()?;
        let client = ForumClient::new(config.api_base(), headers, &cookies)?;

        let state = client.fetch_daily_question().await?;
        if state.errno == Some(ERRNO_NOT_LOGGED_IN) {
            return Ok(state
                .msg
                .unwrap_or_else(|| "daily question rejected: login required".to_string()));
        }
        let Some(question) = state.question else {
            return Ok("daily question response missing question data".to_string());
        };

        let answer = resolve_answer(config.answer_key_url(), &question).await;
        if answer == 0 {
            return Ok(format!(
                "未找到匹配答案，请手动答题 (question {})",
                question.qc.as_deref().unwrap_or("?")
            ));
        }
        let Some(qid) = question.qid() else {
            return Ok("daily question response missing question id".to_string());
        };

        let submission = AnswerSubmission {
            qid: qid.clone(),
            answer,
        };
        debug!(?submission, "answer for today");

        let reply = client.submit_answer(&submission).await?;
        Ok(reply
            .msg
            .unwrap_or_else(|| "answer reply missing 'msg'".to_string()))
    }
}

/// Look up the canonical answer and match it against the question's
/// labeled options. Resolution never fails: any problem yields the
/// sentinel 0, which the caller reports as "answer manually".
async fn resolve_answer(answer_key_url: &str, question: &Question) -> u32 {
    let canonical = match fetch_canonical_answer(answer_key_url, question).await {
        Ok(Some(text)) => text,
        Ok(None) => {
            warn!(code = ?question.qc, "no answer key entry for question");
            return 0;
        }
        Err(err) => {
            warn!(%err, "failed to fetch answer key");
            return 0;
        }
    };

    match_answer_index(question, &canonical)
}

/// Fetch the answer key fresh (never cached across runs) and pull the
/// entry for this question's code.
async fn fetch_canonical_answer(url: &str, question: &Question) -> Result<Option<String>> {
    let Some(code) = question.qc.as_deref() else {
        return Ok(None);
    };

    let key: HashMap<String, Value> = HttpClient::new()?.get_json(url).await?;
    Ok(key.get(code).and_then(Value::as_str).map(str::to_string))
}

/// First option whose cleaned text equals the canonical answer wins;
/// its digit suffix is the submitted index. 0 means no match.
fn match_answer_index(question: &Question, canonical: &str) -> u32 {
    let expected = canonical.trim();

    for (field, value) in &question.extra {
        let Some(caps) = ANSWER_FIELD_RE.captures(field) else {
            continue;
        };
        let Some(text) = value.as_str() else {
            continue;
        };

        if strip_hide_markup(text).trim() == expected {
            return caps[1].parse().unwrap_or(0);
        }
    }

    0
}

fn strip_hide_markup(text: &str) -> String {
    HIDE_RE.replace_all(text, "${1}${2}").into_owned()
}
