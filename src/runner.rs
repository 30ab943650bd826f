//! Per-task driver: runs a task, converts errors into diagnostic
//! messages, classifies, and dispatches exactly one notification.

use tracing::{error, info, warn};

use crate::config::Config;
use crate::notify::{Notifier, Outcome};
use crate::tasks::DailyTask;

/// What a single task run produced, after error conversion.
#[derive(Debug, Clone)]
pub struct TaskReport {
    pub task: &'static str,
    pub outcome: Outcome,
    pub message: String,
}

/// Run one task to completion. Every failure mode inside the task
/// (configuration, parsing, transport) ends up as a diagnostic message
/// routed through the same classifier/notifier path as a normal
/// result, so each run produces exactly one notification. A failing
/// task never prevents the next one from running.
pub async fn run_task(
    task: &dyn DailyTask,
    config: &Config,
    notifier: Option<&dyn Notifier>,
) -> TaskReport {
    info!(task = task.name(), "running task");

    let message = match task.run(config).await {
        Ok(message) => message,
        Err(err) => err.to_string(),
    };

    let outcome = config.classifier.classify(&message);
    match outcome {
        Outcome::Success => info!(task = task.name(), %message, "task succeeded"),
        Outcome::Failed => error!(task = task.name(), %message, "task failed"),
    }

    let title = format!("{} {} {}", config.service_name, task.name(), outcome);
    match notifier {
        Some(notifier) => {
            if let Err(err) = notifier.send(&title, &message).await {
                warn!(%err, "failed to deliver notification");
            }
        }
        None => info!("no notifier configured, skipping notification"),
    }

    TaskReport {
        task: task.name(),
        outcome,
        message,
    }
}
