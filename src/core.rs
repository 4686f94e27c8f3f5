pub mod commands;
pub mod events;
pub mod leaderboard;
pub mod resolver;
pub mod templates;
