//! Endpoint methods of [`ApiClient`].
//!
//! Each method checks its own arguments before anything is sent. Protected
//! endpoints (game start, score submit, AI-duel start and guess submit)
//! additionally require an auth token; that check runs first.
//!
//! Responses are returned as opaque JSON values: session and match ids are
//! produced by the server and passed back verbatim by the caller.

use serde_json::{Map, Value};

use crate::api::client::ApiClient;
use crate::api::request_structs::{AiGuess, RequestDescriptor, ScoreSubmission};
use crate::api::requester::Transport;
use crate::error::ApiError;

const IMAGE_PATH: &str = "/getImage";
const PANO_PATH: &str = "/getPano";
const GAME_START_PATH: &str = "/game/start";
const GAME_SUBMIT_PATH: &str = "/game/submit";
const AI_DUEL_START_PATH: &str = "/ai-duel/start";
const AI_DUEL_GUESS_PATH: &str = "/ai-duel/guess";
const LEADERBOARD_PATH: &str = "/leaderboard/top";
const HEALTH_PATH: &str = "/health";
const TEST_AI_PATH: &str = "/test-ai";

impl<T: Transport> ApiClient<T> {
    /// Request `GET /getImage` to get a random location image.
    pub async fn get_image(&self) -> Result<Value, ApiError> {
        self.request(RequestDescriptor::get(IMAGE_PATH), Some("fetch image"))
            .await
    }

    /// Request `GET /getPano` to get a random panorama.
    pub async fn get_pano(&self) -> Result<Value, ApiError> {
        self.request(RequestDescriptor::get(PANO_PATH), Some("fetch panorama"))
            .await
    }

    /// Request `POST /game/start` to open a game session.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] without sending anything if no auth token
    /// is set.
    pub async fn start_game(&self) -> Result<Value, ApiError> {
        let action = "start game";
        let config = self.require_token(action).await?;
        self.execute(&config, RequestDescriptor::post(GAME_START_PATH), Some(action))
            .await
    }

    /// Request `POST /game/submit` to submit the score of a game session.
    ///
    /// The body is `{ "id": id, "score": score, "meta": meta }`.
    ///
    /// # Arguments
    ///
    /// * `id` - Session id returned by [`Self::start_game`].
    /// * `score` - Final score, must be finite.
    /// * `meta` - Extra data stored with the score, `{}` when `None`.
    ///
    /// # Errors
    ///
    /// - No auth token, or empty `id` - [`ApiError::Config`]
    /// - Non finite `score` - [`ApiError::Validation`]
    pub async fn submit_score(
        &self,
        id: &str,
        score: f64,
        meta: Option<Value>,
    ) -> Result<Value, ApiError> {
        let action = "submit score";
        let config = self.require_token(action).await?;

        if id.is_empty() {
            return Err(ApiError::config("game id is required to submit score"));
        }
        if !score.is_finite() {
            return Err(ApiError::validation(format!(
                "score must be a finite number, got {}",
                score
            )));
        }

        let body = ScoreSubmission {
            id,
            score,
            meta: meta.unwrap_or_else(|| Value::Object(Map::new())),
        };
        let descriptor = RequestDescriptor::post(GAME_SUBMIT_PATH).with_json(&body)?;
        self.execute(&config, descriptor, Some(action)).await
    }

    /// Request `POST /ai-duel/start` to open a match against the AI.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] without sending anything if no auth token
    /// is set.
    pub async fn start_ai_duel(&self) -> Result<Value, ApiError> {
        let action = "start AI duel";
        let config = self.require_token(action).await?;
        self.execute(&config, RequestDescriptor::post(AI_DUEL_START_PATH), Some(action))
            .await
    }

    /// Request `POST /ai-duel/guess` to submit the guess of one round.
    ///
    /// The body is `{ "matchId": match_id, "roundIndex": round_index, "guess": guess }`.
    ///
    /// # Errors
    ///
    /// - No auth token, or empty `match_id` - [`ApiError::Config`]
    /// - Negative `round_index` - [`ApiError::Validation`]
    pub async fn submit_ai_guess(
        &self,
        match_id: &str,
        round_index: i64,
        guess: impl Into<Value>,
    ) -> Result<Value, ApiError> {
        let action = "submit AI guess";
        let config = self.require_token(action).await?;

        if match_id.is_empty() {
            return Err(ApiError::config("match id is required to submit AI guess"));
        }
        if round_index < 0 {
            return Err(ApiError::validation(format!(
                "round index must be a non-negative number, got {}",
                round_index
            )));
        }

        let body = AiGuess {
            match_id,
            round_index,
            guess: guess.into(),
        };
        let descriptor = RequestDescriptor::post(AI_DUEL_GUESS_PATH).with_json(&body)?;
        self.execute(&config, descriptor, Some(action)).await
    }

    /// Request `GET /leaderboard/top`. The `limit` query parameter is only
    /// sent when given.
    pub async fn get_leaderboard(&self, limit: Option<u32>) -> Result<Value, ApiError> {
        let mut descriptor = RequestDescriptor::get(LEADERBOARD_PATH);
        if let Some(limit) = limit {
            descriptor = descriptor.with_query("limit", limit);
        }
        self.request(descriptor, Some("fetch leaderboard")).await
    }

    /// Request `GET /health`.
    pub async fn health(&self) -> Result<Value, ApiError> {
        self.request(RequestDescriptor::get(HEALTH_PATH), Some("health check"))
            .await
    }

    /// Request `GET /test-ai?key={key}` to check the AI backend.
    ///
    /// `key` is a dedicated test key, unrelated to the auth token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if `key` is empty.
    pub async fn test_ai(&self, key: &str) -> Result<Value, ApiError> {
        if key.is_empty() {
            return Err(ApiError::config("test key is required to test AI"));
        }
        let descriptor = RequestDescriptor::get(TEST_AI_PATH).with_query("key", key);
        self.request(descriptor, Some("test AI")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::AUTH_HEADER;
    use crate::api::requester::{HttpMethod, HttpResponse, MockTransport, ReqwestTransport};
    use crate::config::ClientConfig;
    use serde_json::json;
    use std::time::Duration;

    fn silent_transport() -> MockTransport {
        let mut transport = MockTransport::new();
        transport.expect_execute().times(0);
        transport
    }

    fn mock_client(token: Option<&str>, transport: MockTransport) -> ApiClient<MockTransport> {
        let config = ClientConfig::new("http://geo.test", token).unwrap();
        ApiClient::with_transport(config, transport)
    }

    fn server_client(url: &str, token: Option<&str>) -> ApiClient<ReqwestTransport> {
        ApiClient::new(url, token).unwrap()
    }

    #[tokio::test]
    async fn test_protected_calls_require_token() {
        let client = mock_client(None, silent_transport());

        let err = client.start_game().await.unwrap_err();
        assert!(err.is_config());
        assert!(err.message().contains("start game"));

        let err = client.submit_score("g1", 10.0, None).await.unwrap_err();
        assert!(err.is_config());
        assert!(err.message().contains("submit score"));

        let err = client.start_ai_duel().await.unwrap_err();
        assert!(err.is_config());
        assert!(err.message().contains("start AI duel"));

        let err = client.submit_ai_guess("m1", 0, "France").await.unwrap_err();
        assert!(err.is_config());
        assert!(err.message().contains("submit AI guess"));
    }

    #[tokio::test]
    async fn test_empty_token_does_not_unlock_protected_calls() {
        let client = mock_client(None, silent_transport());
        client.set_token(Some("")).await;
        assert!(client.start_game().await.unwrap_err().is_config());
    }

    #[tokio::test]
    async fn test_submit_score_rejects_non_numeric_score() {
        let client = mock_client(Some("abc"), silent_transport());
        let err = client.submit_score("g1", f64::NAN, None).await.unwrap_err();
        assert!(err.is_validation());
        let err = client
            .submit_score("g1", f64::INFINITY, None)
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_submit_score_requires_id() {
        let client = mock_client(Some("abc"), silent_transport());
        let err = client.submit_score("", 10.0, None).await.unwrap_err();
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn test_submit_ai_guess_rejects_negative_round() {
        let client = mock_client(Some("abc"), silent_transport());
        let err = client.submit_ai_guess("m1", -1, "France").await.unwrap_err();
        assert!(err.is_validation());
        assert!(err.message().contains("-1"));
    }

    #[tokio::test]
    async fn test_submit_ai_guess_requires_match_id() {
        let client = mock_client(Some("abc"), silent_transport());
        let err = client.submit_ai_guess("", 0, "France").await.unwrap_err();
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn test_test_ai_requires_key() {
        let client = mock_client(None, silent_transport());
        let err = client.test_ai("").await.unwrap_err();
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn test_test_ai_does_not_need_token() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .withf(|req| {
                req.method == HttpMethod::Get
                    && req.url == "http://geo.test/test-ai"
                    && req.query == vec![("key".to_owned(), "k-123".to_owned())]
                    && req.header(AUTH_HEADER).is_none()
            })
            .times(1)
            .returning(|_| {
                Ok(HttpResponse {
                    status: 200,
                    body: r#"{"ok":true}"#.to_owned(),
                })
            });

        let client = mock_client(None, transport);
        assert_eq!(client.test_ai("k-123").await.unwrap(), json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_get_image() {
        let mut server = mockito::Server::new_async().await;
        let body = r#"{"imageUrl": "https://cdn.test/1.jpg", "lat": 48.85, "lng": 2.35}"#;
        server
            .mock("GET", "/getImage")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let client = server_client(&server.url(), None);
        let image = client.get_image().await.unwrap();
        assert_eq!(image["imageUrl"], "https://cdn.test/1.jpg");
        assert_eq!(image["lat"], 48.85);
    }

    #[tokio::test]
    async fn test_get_pano() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/getPano")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"panoId": "p1"}"#)
            .create_async()
            .await;

        let client = server_client(&server.url(), None);
        assert_eq!(client.get_pano().await.unwrap()["panoId"], "p1");
    }

    #[tokio::test]
    async fn test_start_game_sends_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/game/start")
            .match_header("x-firebase-appcheck", "abc")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "game-42"}"#)
            .create_async()
            .await;

        let client = server_client(&server.url(), Some("abc"));
        let game = client.start_game().await.unwrap();
        assert_eq!(game["id"], "game-42");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_submit_score_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/game/submit")
            .match_header("x-firebase-appcheck", "abc")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::Json(json!({
                "id": "game-42",
                "score": 4200.0,
                "meta": {}
            })))
            .with_status(200)
            .with_body(r#"{"rank": 3}"#)
            .create_async()
            .await;

        let client = server_client(&server.url(), Some("abc"));
        let result = client.submit_score("game-42", 4200.0, None).await.unwrap();
        assert_eq!(result["rank"], 3);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_submit_score_keeps_meta() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/game/submit")
            .match_body(mockito::Matcher::Json(json!({
                "id": "game-42",
                "score": 12.5,
                "meta": {"rounds": 5, "mode": "classic"}
            })))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = server_client(&server.url(), Some("abc"));
        client
            .submit_score(
                "game-42",
                12.5,
                Some(json!({"rounds": 5, "mode": "classic"})),
            )
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_start_ai_duel() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/ai-duel/start")
            .match_header("x-firebase-appcheck", "abc")
            .with_status(200)
            .with_body(r#"{"matchId": "m1", "rounds": 5}"#)
            .create_async()
            .await;

        let client = server_client(&server.url(), Some("abc"));
        let duel = client.start_ai_duel().await.unwrap();
        assert_eq!(duel["matchId"], "m1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_submit_ai_guess_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/ai-duel/guess")
            .match_body(mockito::Matcher::Json(json!({
                "matchId": "m1",
                "roundIndex": 0,
                "guess": "France"
            })))
            .with_status(200)
            .with_body(r#"{"correct": true, "aiGuess": "Spain"}"#)
            .create_async()
            .await;

        let client = server_client(&server.url(), Some("abc"));
        let result = client.submit_ai_guess("m1", 0, "France").await.unwrap();
        assert_eq!(result["aiGuess"], "Spain");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_leaderboard_without_limit() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/leaderboard/top")
            .match_query(mockito::Matcher::Exact(String::new()))
            .with_status(200)
            .with_body(r#"[{"name": "ada", "score": 9000}]"#)
            .create_async()
            .await;

        let client = server_client(&server.url(), None);
        let top = client.get_leaderboard(None).await.unwrap();
        assert_eq!(top[0]["name"], "ada");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_leaderboard_with_limit() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/leaderboard/top")
            .match_query(mockito::Matcher::UrlEncoded(
                "limit".to_owned(),
                "10".to_owned(),
            ))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = server_client(&server.url(), None);
        assert_eq!(client.get_leaderboard(Some(10)).await.unwrap(), json!([]));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_health() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(200)
            .with_body(r#"{"status": "ok"}"#)
            .create_async()
            .await;

        let client = server_client(&server.url(), None);
        assert_eq!(client.health().await.unwrap()["status"], "ok");
    }

    #[tokio::test]
    async fn test_server_error_is_wrapped() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/game/start")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"boom"}"#)
            .create_async()
            .await;

        let client = server_client(&server.url(), Some("abc"));
        let err = client.start_game().await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.status(), Some(500));
        assert!(err.message().contains("start game"));
        assert!(err.message().contains("status 500"));
        assert!(err.message().contains("boom"));
    }

    #[tokio::test]
    async fn test_cleared_token_removes_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/health")
            .match_header("x-firebase-appcheck", mockito::Matcher::Missing)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = server_client(&server.url(), None);
        client.set_token(Some("abc")).await;
        client.set_token(None).await;
        client.health().await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_timeout_is_no_response() {
        // Accepts connections and never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut sockets = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                sockets.push(socket);
            }
        });

        let config = ClientConfig::new(&format!("http://{}", addr), None)
            .unwrap()
            .with_timeout(Duration::from_millis(200));
        let client = ApiClient::from_config(config);

        let err = client.health().await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.status(), None);
        assert!(err.message().contains("no response received from server"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_no_response() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = server_client(&format!("http://{}", addr), None);
        let err = client.get_leaderboard(Some(5)).await.unwrap_err();
        assert_eq!(err.status(), None);
        assert_eq!(
            err.message(),
            "fetch leaderboard failed | no response received from server"
        );
    }

    #[tokio::test]
    async fn test_invalid_token_is_send_failure() {
        let client = server_client("http://127.0.0.1:9", Some("bad\ntoken"));
        let err = client.start_game().await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.status(), None);
        assert!(err.message().starts_with("start game failed | builder error"));
    }

    #[tokio::test]
    async fn test_concurrent_calls() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/getImage")
            .with_status(200)
            .with_body(r#"{"imageUrl": "https://cdn.test/1.jpg"}"#)
            .expect(5)
            .create_async()
            .await;

        let client = server_client(&server.url(), None);
        let results = futures::future::join_all((0..5).map(|_| client.get_image())).await;
        assert!(results.iter().all(|r| r.is_ok()));
        mock.assert_async().await;
    }
}
