use bandit_bot::config;
use bandit_bot::core::events::Event;
use bandit_bot::core::resolver::Resolver;
use bandit_bot::messaging::client::initialize_messaging;
use bandit_bot::scheduler::{JobProcess, Scheduler};
use bandit_bot::storage::MemoryCache;
use bandit_bot::store::client::GameStore;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = &config::SETTINGS;

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(settings.get_trace_level())
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Setting default subscriber failed");

    // Capacity of 64 should be more than plenty to handle all the messages
    let (tx, rx) = mpsc::channel::<Event>(64);
    let tx = Arc::new(tx);

    let cache = MemoryCache::new(Duration::from_secs(settings.leaderboard_ttl_sec));

    // Refresh on every TTL boundary. A failed tick is simply retried at the
    // next one, the cache keeps serving the last good board meanwhile.
    let refresh_schedule = format!("1/{} * * * * *", settings.leaderboard_ttl_sec);

    let sched = Scheduler::new(cache.clone()).await?;

    let mut jobs = vec![JobProcess::RefreshLeaderboardCache(&refresh_schedule)];
    if !settings.skip_cache_warmup {
        // only ran once, at startup.
        jobs.insert(0, JobProcess::InitializeLeaderboardCache);
    }
    for job in jobs {
        sched.add_job(job).await?;
    }

    info!("Starting scheduler.");
    sched.start().await?;

    let resolver = Resolver::new(GameStore::from_settings(), cache);

    info!("Initializing messaging engine.");
    initialize_messaging(tx, rx, resolver).await?;

    Ok(())
}
