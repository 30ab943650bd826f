//! Daily forum chores.
//!
//! Each task runs to completion on its own: it parses the captured
//! request, builds its own client, talks to the forum, and hands back a
//! human-readable result message for classification.

use async_trait::async_trait;
use strum::EnumString;

use crate::config::Config;
use crate::error::Result;

pub mod checkin;
pub mod questions;

pub use checkin::CheckinTask;
pub use questions::DailyQuestionTask;

#[async_trait]
pub trait DailyTask: Send + Sync {
    /// Short task name used in notification titles and logs.
    fn name(&self) -> &'static str;

    /// Execute against the live forum and produce a result message.
    ///
    /// Recoverable outcomes (stale credentials, no matching answer,
    /// missing response data) come back as `Ok` messages; only
    /// configuration, parse, and transport problems are errors.
    async fn run(&self, config: &Config) -> Result<String>;
}

/// Task picked by the CLI argument (`1`/`checkin`, `2`/`question`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum TaskSelection {
    #[strum(serialize = "1", serialize = "checkin")]
    Checkin,
    #[strum(serialize = "2", serialize = "question")]
    Question,
}
