use crate::{
    core::leaderboard::{Leaderboard, RankedResult, ScoreEntry},
    error::{BotError, BotResult},
    storage::MemoryCache,
    store::client::GameStore,
};
use tracing::{info, warn};

/// Answers "show me the leaderboard" for one viewer: the cached top board
/// when fresh, an inline fetch otherwise, plus the point lookup / count query
/// fallback for viewers ranked past the board.
///
/// The fallback rank comes from fresh store queries while the board may be
/// up to one TTL old, so the two can briefly disagree. That window is
/// accepted rather than reconciled.
pub struct Resolver {
    store: GameStore,
    cache: MemoryCache,
}

impl Resolver {
    pub fn new(store: GameStore, cache: MemoryCache) -> Self {
        Resolver { store, cache }
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    pub async fn resolve(&self, viewer_id: &str) -> BotResult<RankedResult> {
        let board = match self.cache.fresh() {
            Some(board) => {
                info!("Serving leaderboard from cache");
                board
            }
            None => {
                // No cache to fall back on here, so unlike the background
                // refresher a failed fetch is surfaced to the caller.
                let records = self
                    .store
                    .top_scores()
                    .await
                    .map_err(|e| BotError::RemoteUnavailable(e.to_string()))?;
                let board = Leaderboard::from_records(&records);
                self.cache.store(board.clone());
                board
            }
        };

        if let Some((rank, entry)) = board.rank_of(viewer_id) {
            // Viewer is on the board, its position is the rank. No extra
            // queries.
            let viewer = Some(entry.clone());
            return Ok(RankedResult {
                top_entries: board,
                viewer,
                viewer_rank: Some(rank),
            });
        }

        let (viewer, viewer_rank) = self.off_board_rank(viewer_id).await;
        Ok(RankedResult {
            top_entries: board,
            viewer,
            viewer_rank,
        })
    }

    /// Point lookup plus count query for a viewer missing from the board.
    /// Store failures degrade the field being computed instead of failing
    /// the whole request.
    async fn off_board_rank(&self, viewer_id: &str) -> (Option<ScoreEntry>, Option<usize>) {
        let record = match self.store.player_score(viewer_id).await {
            Ok(Some(record)) => record,
            // Never played, a perfectly valid outcome.
            Ok(None) => return (None, None),
            Err(e) => {
                warn!("Could not look up score of player {viewer_id}. {e}");
                return (None, None);
            }
        };

        let Some(viewer) = ScoreEntry::from_record(viewer_id, &record) else {
            return (None, None);
        };

        // Exclusive lower bound: everyone strictly above the viewer.
        match self.store.count_scores_at_least(viewer.max_score + 1).await {
            Ok(better) => (Some(viewer), Some(better + 1)),
            Err(e) => {
                warn!("Could not compute rank of player {viewer_id}. {e}");
                (Some(viewer), None)
            }
        }
    }
}
