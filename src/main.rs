use anyhow::{Result, bail};
use price_scout::{Config, Extractor};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let urls: Vec<String> = std::env::args().skip(1).collect();
    if urls.is_empty() {
        bail!("usage: price-scout <product-url>...");
    }

    let config = Config::from_env()?;
    info!(
        "Starting price scout for {} URL(s) in {:?} selection mode",
        urls.len(),
        config.selection_mode
    );

    let extractor = Extractor::new(&config)?;

    run_batch(&extractor, &urls).await;

    let Some(schedule) = config.schedule.clone() else {
        return Ok(());
    };

    let sched = JobScheduler::new().await?;

    let job_extractor = extractor.clone();
    let job_urls = urls.clone();
    sched
        .add(Job::new_async(schedule.as_str(), move |_uuid, _l| {
            let extractor = job_extractor.clone();
            let urls = job_urls.clone();
            Box::pin(async move {
                run_batch(&extractor, &urls).await;
            })
        })?)
        .await?;

    info!("Scheduler started - re-checking prices on '{}'", schedule);
    sched.start().await?;

    // Keep the program running
    loop {
        tokio::time::sleep(tokio::time::Duration::from_secs(30)).await;
    }
}

/// Extracts every URL and prints one JSON line per product. Failures are
/// logged per URL and never stop the batch.
async fn run_batch(extractor: &Extractor, urls: &[String]) {
    for (url, result) in extractor.extract_many(urls.iter().cloned()).await {
        match result {
            Ok(record) => match serde_json::to_string(&record) {
                Ok(line) => println!("{line}"),
                Err(e) => error!("Could not serialize record for {}: {}", url, e),
            },
            Err(e) if e.is_unsupported_site() => {
                error!("{} is not supported yet: {}", url, e);
            }
            Err(e) => error!("Extraction failed for {}: {}", url, e),
        }
    }
}
