use serde::Serialize;
use serde_json::{Map, Value};
use std::ops::{Deref, DerefMut};

/// How many entries the board shows. The store query is limited to the same
/// number, so anything past this rank is only reachable through the count
/// query fallback.
pub const LEADERBOARD_SIZE: usize = 10;

// Score record parsed from the store. One per player, keyed by player id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreEntry {
    pub id: String,
    pub name: String,
    pub max_score: u64,
}

impl ScoreEntry {
    /// Validated parse of a single store record. Records that are not JSON
    /// objects or carry no `maxScore` are dropped rather than defaulted.
    pub fn from_record(id: &str, record: &Value) -> Option<Self> {
        let fields = record.as_object()?;
        let max_score = fields.get("maxScore")?.as_u64()?;
        let name = fields
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_string();
        Some(ScoreEntry {
            id: id.to_string(),
            name,
            max_score,
        })
    }
}

type Entries = Vec<ScoreEntry>;

/// Point-in-time top scores view, descending by score, at most
/// [`LEADERBOARD_SIZE`] entries. Built wholesale from a store response and
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Leaderboard(Entries);

impl Leaderboard {
    pub fn new() -> Leaderboard {
        Leaderboard(Entries::new())
    }

    pub fn from_records(records: &Map<String, Value>) -> Leaderboard {
        let mut entries = records
            .iter()
            .filter_map(|(id, record)| ScoreEntry::from_record(id, record))
            .collect::<Entries>();
        // Stable sort: entries with equal scores keep the store's key order.
        entries.sort_by(|a, b| b.max_score.cmp(&a.max_score));
        entries.truncate(LEADERBOARD_SIZE);
        Leaderboard(entries)
    }

    /// 1-based position of the player on this board, with their entry.
    pub fn rank_of(&self, id: &str) -> Option<(usize, &ScoreEntry)> {
        self.iter()
            .position(|entry| entry.id == id)
            .map(|index| (index + 1, &self.0[index]))
    }
}

impl Deref for Leaderboard {
    type Target = Entries;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Leaderboard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Per-request resolution outcome: the board itself plus the viewer's own
/// entry and 1-based rank when one could be determined. A viewer who never
/// played resolves with both fields empty, which is not an error.
#[derive(Debug)]
pub struct RankedResult {
    pub top_entries: Leaderboard,
    pub viewer: Option<ScoreEntry>,
    pub viewer_rank: Option<usize>,
}
