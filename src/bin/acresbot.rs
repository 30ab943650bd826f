use std::str::FromStr;

use tracing_subscriber::{fmt, EnvFilter};

use acresbot_lib::config::Config;
use acresbot_lib::notify::Notifier;
use acresbot_lib::runner::run_task;
use acresbot_lib::tasks::{CheckinTask, DailyQuestionTask, DailyTask, TaskSelection};

fn main() {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("acresbot_lib=debug,info")),
        )
        .init();

    // Usage: acresbot [1|checkin|2|question]; no argument runs both.
    let selection = match std::env::args().nth(1) {
        None => None,
        Some(arg) => match TaskSelection::from_str(&arg) {
            Ok(selection) => Some(selection),
            Err(_) => {
                println!("unknown command");
                return;
            }
        },
    };

    let tasks: Vec<Box<dyn DailyTask>> = match selection {
        None => vec![Box::new(CheckinTask), Box::new(DailyQuestionTask)],
        Some(TaskSelection::Checkin) => vec![Box::new(CheckinTask)],
        Some(TaskSelection::Question) => vec![Box::new(DailyQuestionTask)],
    };

    let config = Config::from_env();
    let notifier = config.notifier();

    let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");
    rt.block_on(async {
        for task in &tasks {
            let report = run_task(
                task.as_ref(),
                &config,
                notifier.as_ref().map(|n| n as &dyn Notifier),
            )
            .await;
            println!("{}", report.message);
        }
    });
}
