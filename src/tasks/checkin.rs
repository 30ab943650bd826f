use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::forum::{CheckinPayload, EmotionChoice, ForumClient, ERRNO_NOT_LOGGED_IN};
use crate::tasks::DailyTask;

/// CJK block the mood note draws from.
const NOTE_CHARS: std::ops::RangeInclusive<u32> = 0x4E00..=0x9FBF;
const NOTE_LEN: std::ops::RangeInclusive<usize> = 5..=10;

pub struct CheckinTask;

#[async_trait]
impl DailyTask for CheckinTask {
    fn name(&self) -> &'static str {
        "checkin"
    }

    async fn run(&self, config: &Config) -> Result<String> {
        let (headers, cookies) = config.request_profile()?;
        let client = ForumClient::new(config.api_base(), headers, &cookies)?;

        let state = client.fetch_checkin().await?;
        if state.errno == Some(ERRNO_NOT_LOGGED_IN) {
            return Ok(state
                .msg
                .unwrap_or_else(|| "check-in rejected: login required".to_string()));
        }
        if state.emotion.is_empty() {
            return Ok("check-in response missing emotion data".to_string());
        }

        let payload = compose_emotion(&state.emotion);
        debug!(qdxq = %payload.qdxq, todaysay = %payload.todaysay, "emotion for today");

        let reply = client.submit_checkin(&payload).await?;
        Ok(reply
            .msg
            .unwrap_or_else(|| "check-in reply missing 'msg'".to_string()))
    }
}

/// Pick a mood code uniformly at random and make up a short CJK note.
fn compose_emotion(choices: &[EmotionChoice]) -> CheckinPayload {
    let mut rng = rand::thread_rng();

    let qdxq = choices
        .choose(&mut rng)
        .map(|choice| choice.qdxq.clone())
        .unwrap_or_default();

    let len = rng.gen_range(NOTE_LEN);
    let todaysay = (0..len)
        // Every code point in the block is a valid char.
        .map(|_| char::from_u32(rng.gen_range(NOTE_CHARS)).unwrap_or('\u{4E00}'))
        .collect();

    CheckinPayload { qdxq, todaysay }
}
