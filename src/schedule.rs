use std::str::FromStr;
use std::sync::Arc;

use chrono::Local;
use poise::serenity_prelude as serenity;
use tokio::time::{Duration, sleep};
use tracing::{info, warn};

use crate::{announce, constants::DAILY_CHECK_CRON, models::Data};

/// Start the daily birthday check loop
///
/// Fires once per local midnight. A fire missed while the process is down
/// is skipped, not caught up.
pub fn start_schedule_manager(
    http: Arc<serenity::Http>,
    cache: Arc<serenity::Cache>,
    data: Arc<Data>,
) {
    tokio::spawn(async move {
        info!("Schedule manager started");

        let schedule =
            cron::Schedule::from_str(DAILY_CHECK_CRON).expect("valid cron expression");

        loop {
            let next = match schedule.upcoming(Local).next() {
                Some(t) => t,
                None => {
                    warn!(
                        "No upcoming run for cron '{}', stopping schedule manager",
                        DAILY_CHECK_CRON
                    );
                    break;
                }
            };

            let wait = (next - Local::now())
                .to_std()
                .unwrap_or(Duration::from_secs(60));
            info!(
                "Next birthday check at {} (in {} minutes)",
                next.format("%Y-%m-%d %H:%M:%S"),
                wait.as_secs() / 60
            );

            sleep(wait).await;

            info!("Scheduled birthday check running");
            announce::check_today(&http, &cache, &data).await;
        }
    });
}
