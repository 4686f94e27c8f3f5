use crate::{
    config,
    core::{
        commands::Command,
        leaderboard::{RankedResult, ScoreEntry},
        resolver::Resolver,
        templates::MessageTemplate,
    },
    utils::format_timestamp_millis,
};

use minijinja::context;
use serde::Serialize;
use slack_morphism::{SlackChannelId, SlackTs};
use std::fmt;
use tracing::warn;

/// The player behind an incoming command, as reported by the transport.
#[derive(Debug, Clone)]
pub struct Viewer {
    pub id: String,
    pub name: String,
}

#[derive(Debug)]
pub enum Event {
    CommandReceived(SlackChannelId, SlackTs, Viewer, Command),
}

// Footer line for a viewer ranked past the displayed board.
#[derive(Serialize)]
struct OffBoardLine {
    rank: usize,
    name: String,
    max_score: u64,
}

/// Fully resolved reply to one command, carrying everything its template
/// needs so that rendering stays a plain `Display`.
#[derive(Debug)]
pub enum Response {
    Help,
    GameLink {
        name: String,
        url: String,
    },
    Board {
        result: RankedResult,
        viewer_id: String,
    },
    BoardEmpty,
    BoardUnavailable,
    Profile {
        id: String,
        name: String,
        max_score: u64,
        last_played: String,
    },
    ProfileNeverPlayed {
        id: String,
        name: String,
    },
    ProfileUnavailable,
}

impl Response {
    pub async fn build(command: &Command, viewer: &Viewer, resolver: &Resolver) -> Response {
        match command {
            Command::Help => Response::Help,
            Command::Play => Response::GameLink {
                name: viewer.name.clone(),
                url: game_url_for(&config::SETTINGS.game_base_url, viewer),
            },
            Command::Board => match resolver.resolve(&viewer.id).await {
                Ok(result) if result.top_entries.is_empty() => Response::BoardEmpty,
                Ok(result) => Response::Board {
                    result,
                    viewer_id: viewer.id.clone(),
                },
                Err(e) => {
                    warn!("Could not resolve leaderboard for {}. {e}", viewer.id);
                    Response::BoardUnavailable
                }
            },
            Command::Profile => match resolver.store().player_score(&viewer.id).await {
                Ok(Some(record)) => match ScoreEntry::from_record(&viewer.id, &record) {
                    Some(entry) => {
                        let last_played = record
                            .get("lastUpdate")
                            .and_then(|v| v.as_i64())
                            .and_then(format_timestamp_millis)
                            .unwrap_or_else(|| "Never".to_string());
                        Response::Profile {
                            id: entry.id,
                            // The store knows the name the player registered
                            // with, prefer it over the transport one.
                            name: entry.name,
                            max_score: entry.max_score,
                            last_played,
                        }
                    }
                    // A record without a score counts as never played.
                    None => Response::ProfileNeverPlayed {
                        id: viewer.id.clone(),
                        name: viewer.name.clone(),
                    },
                },
                Ok(None) => Response::ProfileNeverPlayed {
                    id: viewer.id.clone(),
                    name: viewer.name.clone(),
                },
                Err(e) => {
                    warn!("Could not fetch profile of {}. {e}", viewer.id);
                    Response::ProfileUnavailable
                }
            },
        }
    }
}

fn game_url_for(base_url: &str, viewer: &Viewer) -> String {
    reqwest::Url::parse_with_params(
        base_url,
        &[("userId", viewer.id.as_str()), ("userName", viewer.name.as_str())],
    )
    .map(|url| url.to_string())
    .unwrap_or_else(|_| base_url.to_string())
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Response::Help => {
                write!(f, "{}", MessageTemplate::Help.get().render({}).unwrap())
            }
            Response::GameLink { name, url } => {
                write!(
                    f,
                    "{}",
                    MessageTemplate::GameLink
                        .get()
                        .render(context! { name => name, url => url })
                        .unwrap()
                )
            }
            Response::Board { result, viewer_id } => {
                let on_board = result.top_entries.iter().any(|entry| &entry.id == viewer_id);
                let off_board = match (&result.viewer, result.viewer_rank, on_board) {
                    (Some(viewer), Some(rank), false) => Some(OffBoardLine {
                        rank,
                        name: viewer.name.clone(),
                        max_score: viewer.max_score,
                    }),
                    _ => None,
                };

                write!(
                    f,
                    "{}",
                    MessageTemplate::Board
                        .get()
                        .render(context! {
                            entries => &result.top_entries,
                            viewer_id => viewer_id,
                            off_board => off_board,
                            never_played => result.viewer.is_none(),
                        })
                        .unwrap()
                )
            }
            Response::BoardEmpty => {
                write!(f, "{}", MessageTemplate::BoardEmpty.get().render({}).unwrap())
            }
            Response::BoardUnavailable => {
                write!(
                    f,
                    "{}",
                    MessageTemplate::BoardUnavailable.get().render({}).unwrap()
                )
            }
            Response::Profile {
                id,
                name,
                max_score,
                last_played,
            } => {
                write!(
                    f,
                    "{}",
                    MessageTemplate::Profile
                        .get()
                        .render(context! {
                            id => id,
                            name => name,
                            max_score => max_score,
                            last_played => last_played,
                        })
                        .unwrap()
                )
            }
            Response::ProfileNeverPlayed { id, name } => {
                write!(
                    f,
                    "{}",
                    MessageTemplate::ProfileNeverPlayed
                        .get()
                        .render(context! { id => id, name => name })
                        .unwrap()
                )
            }
            Response::ProfileUnavailable => {
                write!(
                    f,
                    "{}",
                    MessageTemplate::ProfileUnavailable.get().render({}).unwrap()
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::leaderboard::Leaderboard;
    use serde_json::json;

    fn two_player_board() -> Leaderboard {
        Leaderboard::from_records(
            json!({
                "u1": {"name": "A", "maxScore": 50},
                "u2": {"name": "B", "maxScore": 80},
            })
            .as_object()
            .unwrap(),
        )
    }

    #[test]
    fn board_rows_are_numbered_and_viewer_highlighted() {
        let board = two_player_board();
        let viewer = board.rank_of("u1").map(|(_, e)| e.clone());
        let rendered = Response::Board {
            result: RankedResult {
                top_entries: board,
                viewer,
                viewer_rank: Some(2),
            },
            viewer_id: "u1".to_string(),
        }
        .to_string();

        assert!(rendered.contains("1. B: 80 pts"));
        assert!(rendered.contains("2. 👉 *A*: 50 pts"));
        // Viewer is on the board, no footer.
        assert!(!rendered.contains("Your spot"));
    }

    #[test]
    fn off_board_viewer_gets_a_footer() {
        let rendered = Response::Board {
            result: RankedResult {
                top_entries: two_player_board(),
                viewer: Some(ScoreEntry {
                    id: "u42".to_string(),
                    name: "Me".to_string(),
                    max_score: 7,
                }),
                viewer_rank: Some(12),
            },
            viewer_id: "u42".to_string(),
        }
        .to_string();

        assert!(rendered.contains("Your spot:"));
        assert!(rendered.contains("12. *Me*: 7 pts"));
    }

    #[test]
    fn viewer_without_score_is_invited_to_play() {
        let rendered = Response::Board {
            result: RankedResult {
                top_entries: two_player_board(),
                viewer: None,
                viewer_rank: None,
            },
            viewer_id: "u42".to_string(),
        }
        .to_string();

        assert!(rendered.contains("No spot on the board yet"));
    }

    #[test]
    fn game_url_carries_the_viewer_identity() {
        let viewer = Viewer {
            id: "u42".to_string(),
            name: "John Doe".to_string(),
        };
        let url = game_url_for("https://example.com/bandit0", &viewer);
        assert_eq!(url, "https://example.com/bandit0?userId=u42&userName=John+Doe");
    }

    #[test]
    fn every_template_renders() {
        // Trip the lazy environment over all variants so a malformed
        // template fails loudly here instead of at first use.
        let _ = Response::Help.to_string();
        let _ = Response::BoardEmpty.to_string();
        let _ = Response::BoardUnavailable.to_string();
        let _ = Response::ProfileUnavailable.to_string();
        let rendered = Response::Profile {
            id: "u1".to_string(),
            name: "A".to_string(),
            max_score: 80,
            last_played: "01/01/2026 12:00".to_string(),
        }
        .to_string();
        assert!(rendered.contains("Best score: 80 pts"));
    }
}
