use tokio_cron_scheduler::{Job, JobScheduler};

use std::time::Duration;
use tracing::{error, info};

use crate::core::leaderboard::Leaderboard;
use crate::error::{BotError, BotResult};
use crate::storage::MemoryCache;
use crate::store::client::GameStore;

pub struct Scheduler {
    scheduler: JobScheduler,
    cache: MemoryCache,
}

pub enum JobProcess<'schedule> {
    InitializeLeaderboardCache,
    RefreshLeaderboardCache(&'schedule str),
}

impl Scheduler {
    pub async fn new(cache: MemoryCache) -> BotResult<Self> {
        let scheduler = JobScheduler::new().await?;
        Ok(Scheduler { scheduler, cache })
    }

    pub async fn add_job(&self, job_process: JobProcess<'_>) -> BotResult<uuid::Uuid> {
        let job = match job_process {
            JobProcess::InitializeLeaderboardCache => {
                initialize_leaderboard_cache_job(self.cache.clone()).await?
            }
            JobProcess::RefreshLeaderboardCache(schedule) => {
                refresh_leaderboard_cache_job(schedule, self.cache.clone()).await?
            }
        };
        Ok(self.scheduler.add(job).await?)
    }

    pub async fn start(&self) -> BotResult<()> {
        Ok(self.scheduler.start().await?)
    }

    /// Stops firing jobs. Production never calls this, tests and shutdown
    /// hooks do.
    pub async fn shutdown(&mut self) -> BotResult<()> {
        Ok(self.scheduler.shutdown().await?)
    }
}

/// One refresh attempt: pull the top scores and replace the cached board
/// wholesale. A failed attempt only logs, the stale board stays served and
/// the next tick retries.
pub async fn refresh_leaderboard(store: &GameStore, cache: &MemoryCache) {
    match store.top_scores().await {
        Ok(records) => {
            cache.store(Leaderboard::from_records(&records));
            info!("Leaderboard cache refreshed.");
        }
        Err(e) => {
            let error = BotError::Http(format!("Could not refresh leaderboard cache. {e}"));
            error!("{error}");
        }
    }
}

//////////////////
// Jobs definition
//////////////////

async fn initialize_leaderboard_cache_job(cache: MemoryCache) -> BotResult<Job> {
    let job = Job::new_one_shot_async(Duration::from_secs(0), move |_uuid, _l| {
        let cache = cache.clone();
        Box::pin(async move {
            let store = GameStore::from_settings();
            refresh_leaderboard(&store, &cache).await;
        })
    })?;
    Ok(job)
}

async fn refresh_leaderboard_cache_job(schedule: &str, cache: MemoryCache) -> BotResult<Job> {
    let job = Job::new_async(schedule, move |uuid, mut l| {
        let cache = cache.clone();
        Box::pin(async move {
            let store = GameStore::from_settings();
            refresh_leaderboard(&store, &cache).await;

            // Query the next execution time for this job
            let next_tick = l.next_tick_for_job(uuid).await;
            match next_tick {
                Ok(Some(ts)) => info!("Next leaderboard cache refresh at {:?}", ts),
                _ => error!("Could not get next tick for leaderboard cache refresh job"),
            }
        })
    })?;
    Ok(job)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn refresh_replaces_the_cached_board() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/scores.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "u1": {"name": "A", "maxScore": 50},
            })))
            .mount(&server)
            .await;

        let store = GameStore::new(server.uri(), Duration::from_secs(2));
        let cache = MemoryCache::new(Duration::from_secs(10));
        refresh_leaderboard(&store, &cache).await;

        let board = cache.fresh().unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].id, "u1");
    }

    #[tokio::test]
    async fn scheduler_stops_cleanly() {
        let cache = MemoryCache::new(Duration::from_secs(10));
        let mut sched = Scheduler::new(cache).await.unwrap();
        sched.start().await.unwrap();
        sched.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn failed_refresh_keeps_the_previous_board() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let store = GameStore::new(server.uri(), Duration::from_secs(2));
        let cache = MemoryCache::new(Duration::from_secs(10));
        cache.store(Leaderboard::new());
        let stamp_before = cache.last_refresh().unwrap();

        // Best effort semantics: no error is surfaced, nothing is replaced.
        refresh_leaderboard(&store, &cache).await;

        assert_eq!(cache.last_refresh().unwrap(), stamp_before);
        assert!(cache.fresh().is_some());
    }
}
