use clap::Parser;
use serde::Serialize;

fn is_false(b: &bool) -> bool {
    !b
}

#[derive(Debug, Parser, Serialize)]
pub struct Cli {
    /// Skip the one-shot leaderboard cache warmup at startup
    #[arg(long)]
    #[serde(skip_serializing_if = "is_false")]
    pub skip_cache_warmup: bool,
}
