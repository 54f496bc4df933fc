//! Game service API client.
//!
//! # Modules
//!
//! - `client` - [`ApiClient`], its configuration mutators and the single request path
//! - `endpoints` - One method per service endpoint
//! - `request_structs` - Request descriptors and JSON bodies
//! - `requester` - The [`Transport`] seam and its reqwest implementation

mod client;
mod endpoints;
mod request_structs;
mod requester;

pub use crate::api::client::{AUTH_HEADER, ApiClient};
pub use crate::api::request_structs::{AiGuess, RequestDescriptor, ScoreSubmission};
pub use crate::api::requester::{
    HttpMethod, HttpRequest, HttpResponse, MockTransport, ReqwestTransport, Transport,
};
