use chrono::Utc;
use anyhow::Result;
use tracing::info;

use producthunt_daily::config::Settings;
use producthunt_daily::utils::{init_tracing, previous_day};
use producthunt_daily::DailyPipeline;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing("producthunt_daily=info")?;

    let settings = Settings::new()?;

    let now = Utc::now();
    let today = now.date_naive();
    let listing_date = previous_day(now);

    info!(
        started_at = %now.format("%Y-%m-%d %H:%M:%S"),
        listing_date = %listing_date,
        "Starting Product Hunt daily digest"
    );

    let pipeline = DailyPipeline::from_settings(&settings)?;
    let report = pipeline.run(today, listing_date).await?;

    info!(
        streams = report.streams_opened,
        messages = report.messages.len(),
        errors = report.errors.len(),
        interrupts = report.interrupts,
        completed = report.completed,
        "Uploaded to the publishing workflow"
    );

    Ok(())
}
