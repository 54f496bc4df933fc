//! Request structures for the game service endpoints.
//!
//! [`RequestDescriptor`] describes one call relative to the base URL. The
//! body structures serialize to the exact field names the service expects.

use serde::Serialize;
use serde_json::Value;

use crate::api::requester::HttpMethod;
use crate::error::ApiError;

/// Method, path, body and query of a single call.
///
/// Built per call and consumed by [`crate::ApiClient::request`].
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    /// Path relative to the base URL, starting with `/`.
    pub path: String,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
}

impl RequestDescriptor {
    pub fn get(path: &str) -> Self {
        RequestDescriptor {
            method: HttpMethod::Get,
            path: path.to_owned(),
            body: None,
            query: Vec::new(),
        }
    }

    pub fn post(path: &str) -> Self {
        RequestDescriptor {
            method: HttpMethod::Post,
            ..RequestDescriptor::get(path)
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Appends a query parameter; scalars are rendered with `to_string`.
    pub fn with_query(mut self, name: &str, value: impl ToString) -> Self {
        self.query.push((name.to_owned(), value.to_string()));
        self
    }

    /// Serializes `body` to JSON and uses it as the request body.
    pub(crate) fn with_json<B: Serialize>(self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::validation(format!("invalid request body: {}", e)))?;
        Ok(self.with_body(value))
    }
}

/// Body of `POST /game/submit`.
#[derive(Serialize, Debug)]
pub struct ScoreSubmission<'a> {
    /// Game session id returned by `/game/start`.
    pub id: &'a str,
    pub score: f64,
    /// Free-form metadata, `{}` when not provided.
    pub meta: Value,
}

/// Body of `POST /ai-duel/guess`.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AiGuess<'a> {
    /// Match id returned by `/ai-duel/start`.
    pub match_id: &'a str,
    pub round_index: i64,
    pub guess: Value,
}
