//! Error type shared by every layer of the widget runtime.
//!
//! Only [`WidgetError::Configuration`] is fatal. Every other variant is
//! rendered as an inline notice (floating shell) or turns into a silent
//! suppression (popup shell); none of them may reach the host page.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WidgetError {
    /// Required script attributes are missing. Aborts the activation.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The request failed in transport or returned a non-2xx status.
    #[error("Network error: {0}")]
    Network(String),

    /// The endpoint answered but the body was not a usable payload.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid trigger transition from {from} on {event}")]
    InvalidTransition {
        from: &'static str,
        event: &'static str,
    },
}
