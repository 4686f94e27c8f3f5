use crate::{
    config,
    core::leaderboard::LEADERBOARD_SIZE,
    error::{BotError, BotResult},
};
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};
use std::{fmt, time::Duration};

enum Endpoint {
    TopScores(usize),
    PlayerScore(String),
    ScoresAtLeast(u64),
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Endpoint::TopScores(limit) => {
                write!(f, "/scores.json?orderBy=\"maxScore\"&limitToLast={}", limit)
            }
            Endpoint::PlayerScore(id) => {
                write!(f, "/scores/{}.json", id)
            }
            Endpoint::ScoresAtLeast(min_score) => {
                write!(
                    f,
                    "/scores.json?orderBy=\"maxScore\"&startAt={}&shallow=true",
                    min_score
                )
            }
        }
    }
}

/// Read-only client for the remote score store (Firebase RTDB REST
/// semantics: a keyed JSON tree queried with orderBy/limitToLast/startAt,
/// answering `null` for anything absent).
pub struct GameStore {
    http_client: Client,
    base_url: String,
}

impl GameStore {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        let http_client = Client::builder().timeout(timeout).build().unwrap();
        Self {
            http_client,
            base_url,
        }
    }

    pub fn from_settings() -> Self {
        let settings = &config::SETTINGS;
        GameStore::new(
            settings.store_base_url.clone(),
            Duration::from_secs(settings.store_timeout_sec),
        )
    }

    async fn get(&self, endpoint: &Endpoint) -> BotResult<String> {
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self.http_client.get(&url).send().await?;

        match response.status() {
            StatusCode::OK => response.text().await.map_err(|_| BotError::Parse),
            _ => Err(BotError::Http(format!("{}", response.status()))),
        }
    }

    /// The highest-scoring records as an unordered id => record object.
    /// The response is unsorted, callers order it themselves.
    pub async fn top_scores(&self) -> BotResult<Map<String, Value>> {
        let resp = self.get(&Endpoint::TopScores(LEADERBOARD_SIZE)).await?;
        let records =
            serde_json::from_str::<Option<Map<String, Value>>>(&resp).map_err(|_| BotError::Parse)?;
        Ok(records.unwrap_or_default())
    }

    /// Point lookup of a single player's record. `None` means the player
    /// never submitted a score.
    pub async fn player_score(&self, id: &str) -> BotResult<Option<Value>> {
        let resp = self.get(&Endpoint::PlayerScore(id.to_string())).await?;
        serde_json::from_str::<Option<Value>>(&resp).map_err(|_| BotError::Parse)
    }

    /// Number of records with a score of at least `min_score`. Shallow query,
    /// only keys come over the wire. Uses the same ordering key as
    /// [`GameStore::top_scores`] so derived ranks stay consistent.
    pub async fn count_scores_at_least(&self, min_score: u64) -> BotResult<usize> {
        let resp = self.get(&Endpoint::ScoresAtLeast(min_score)).await?;
        let keys =
            serde_json::from_str::<Option<Map<String, Value>>>(&resp).map_err(|_| BotError::Parse)?;
        Ok(keys.map_or(0, |keys| keys.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_for(server: &MockServer) -> GameStore {
        GameStore::new(server.uri(), Duration::from_secs(2))
    }

    #[tokio::test]
    async fn top_scores_returns_record_map() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/scores.json"))
            .and(query_param("orderBy", "\"maxScore\""))
            .and(query_param("limitToLast", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "u1": {"name": "A", "maxScore": 50},
                "u2": {"name": "B", "maxScore": 80},
            })))
            .mount(&server)
            .await;

        let records = store_for(&server).top_scores().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records["u2"]["maxScore"], 80);
    }

    #[tokio::test]
    async fn empty_store_answers_null() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/scores.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let records = store_for(&server).top_scores().await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn absent_player_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/scores/ghost.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let record = store_for(&server).player_score("ghost").await.unwrap();
        assert!(record.is_none());
    }

    #[tokio::test]
    async fn count_query_counts_keys() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/scores.json"))
            .and(query_param("startAt", "51"))
            .and(query_param("shallow", "true"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"u2": true, "u5": true, "u9": true})),
            )
            .mount(&server)
            .await;

        let count = store_for(&server).count_scores_at_least(51).await.unwrap();
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn non_ok_status_is_an_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = store_for(&server).top_scores().await;
        assert!(matches!(result, Err(BotError::Http(_))));
    }
}
