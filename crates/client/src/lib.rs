//! HTTP client for the Proofwall widget endpoint.
//!
//! [`WidgetApi`] performs the single `GET {origin}/api/widget/{workspaceId}`
//! call an activation makes and reports the result as a
//! [`FetchOutcome`](proofwall_core::FetchOutcome). It never retries.

pub mod api;

pub use api::{WidgetApi, WidgetApiError, DEFAULT_TIMEOUT};
