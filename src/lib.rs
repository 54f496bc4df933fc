//! Geoguess client - typed async access to the geo-guessing game service.
//!
//! # Overview
//!
//! The service exposes location images, game sessions, duels against an AI,
//! a leaderboard and a health check. [`ApiClient`] wraps each endpoint in a
//! method, normalizes the base URL it is given and attaches the
//! `X-Firebase-AppCheck` header when an auth token is configured.
//!
//! # Errors
//!
//! Every method returns [`ApiError`]:
//!
//! - [`ApiError::Config`] - missing base URL, missing auth token before a
//!   protected call, missing required argument
//! - [`ApiError::Validation`] - argument with the wrong shape
//! - [`ApiError::Transport`] - non-2xx status, no response, or a request that
//!   could not be sent; keeps the HTTP status and the original failure
//!
//! # Examples
//!
//! ```no_run
//! use geoguess_client::ApiClient;
//!
//! # async fn run() -> Result<(), geoguess_client::ApiError> {
//! let client = ApiClient::new("geo.example.com", Some("app-check-token"))?;
//! let game = client.start_game().await?;
//! let id = game["id"].as_str().unwrap_or_default();
//! client.submit_score(id, 4200.0, None).await?;
//! let top = client.get_leaderboard(Some(10)).await?;
//! println!("{}", top);
//! # Ok(())
//! # }
//! ```
//!
//! # Logging
//!
//! Requests are traced through the `log` facade: `info` for each call,
//! `debug` for URLs and raw responses, `warn` for failures. Install any `log`
//! compatible logger to see them.

pub mod api;
pub mod config;
pub mod error;
pub mod utils;

pub use crate::api::ApiClient;
pub use crate::config::ClientConfig;
pub use crate::error::{ApiError, TransportFailure};
pub use crate::utils::normalize_base_url;
