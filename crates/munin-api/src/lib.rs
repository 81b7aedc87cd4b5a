//! Async client for the munin console REST backend.
//!
//! - **[`ApiClient`]** sends [`RequestSpec`]s (`{ method, path, query }`) to
//!   `{base}/{version}{path}`, authenticating with HTTP Basic credentials
//!   taken from the persisted [`Session`], and returns decoded JSON.
//! - **[`envelope`]** extracts HAL `_embedded` collections from list
//!   responses.
//! - **[`Error`]** classifies transport, authentication and backend failures;
//!   `munin-core` maps them into user-facing errors.

pub mod auth;
pub mod client;
pub mod envelope;
pub mod error;
pub mod request;
pub mod transport;

pub use auth::{Session, Token};
pub use client::ApiClient;
pub use envelope::{embedded, into_embedded};
pub use error::Error;
pub use request::{Method, QueryValue, RequestSpec};
pub use transport::{TlsMode, TransportConfig};
