//! Testimonial records and the widget endpoint payload.
//!
//! The endpoint answers `{"testimonials": [...], "showBadge": bool}` on
//! success and `{"error": "..."}` otherwise. [`decode_widget_response`]
//! turns a response body into a [`FetchOutcome`] so that callers never
//! have to reason about the wire shape.

use serde::{Deserialize, Serialize};

use crate::error::WidgetError;

/// Primary medium of a testimonial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionType {
    Text,
    Video,
    Screenshot,
}

/// One approved testimonial, as served by the widget endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    /// Star rating, nominally 1-5.
    #[serde(default)]
    pub rating: Option<i32>,
    /// Body text. May accompany any submission type.
    #[serde(default)]
    pub testimonial: Option<String>,
    pub submission_type: SubmissionType,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
}

impl Testimonial {
    /// A text testimonial with no optional fields set.
    pub fn text(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: None,
            company: None,
            rating: None,
            testimonial: None,
            submission_type: SubmissionType::Text,
            photo_url: None,
            video_url: None,
        }
    }
}

/// Successful endpoint payload with at least one testimonial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetPayload {
    pub testimonials: Vec<Testimonial>,
    #[serde(default)]
    pub show_badge: bool,
}

/// Result of the single fetch an activation performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded(WidgetPayload),
    /// The request succeeded but the workspace has no testimonials.
    Empty,
    Failed(WidgetError),
}

impl FetchOutcome {
    /// Classify a decoded payload: zero testimonials is `Empty`.
    pub fn from_payload(payload: WidgetPayload) -> Self {
        if payload.testimonials.is_empty() {
            Self::Empty
        } else {
            Self::Loaded(payload)
        }
    }
}

/// Wire shape of the endpoint body; the error form is tried first so a
/// body carrying both keys is treated as a failure.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireResponse {
    Error { error: String },
    Payload(WidgetPayload),
}

/// Decode a response body from the widget endpoint.
pub fn decode_widget_response(body: &str) -> FetchOutcome {
    match serde_json::from_str::<WireResponse>(body) {
        Ok(WireResponse::Payload(payload)) => FetchOutcome::from_payload(payload),
        Ok(WireResponse::Error { error }) => {
            FetchOutcome::Failed(WidgetError::MalformedResponse(format!("endpoint error: {error}")))
        }
        Err(e) => FetchOutcome::Failed(WidgetError::MalformedResponse(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn decode_single_text_testimonial() {
        let body = r#"{"testimonials":[{"id":"t1","name":"Jane Doe","rating":5,"testimonial":"Great!","submissionType":"TEXT"}],"showBadge":true}"#;
        let outcome = decode_widget_response(body);
        let FetchOutcome::Loaded(payload) = outcome else {
            panic!("Expected Loaded, got {outcome:?}");
        };
        assert!(payload.show_badge);
        assert_eq!(payload.testimonials.len(), 1);
        let t = &payload.testimonials[0];
        assert_eq!(t.name, "Jane Doe");
        assert_eq!(t.rating, Some(5));
        assert_eq!(t.submission_type, SubmissionType::Text);
        assert!(t.photo_url.is_none());
    }

    #[test]
    fn decode_video_with_urls() {
        let body = r#"{"testimonials":[{"id":"v","name":"Al","submissionType":"VIDEO","videoUrl":"https://v/1.mp4","photoUrl":null}],"showBadge":false}"#;
        let outcome = decode_widget_response(body);
        assert_matches!(outcome, FetchOutcome::Loaded(ref p)
            if p.testimonials[0].video_url.as_deref() == Some("https://v/1.mp4"));
    }

    #[test]
    fn empty_list_is_empty_not_failure() {
        let outcome = decode_widget_response(r#"{"testimonials":[],"showBadge":true}"#);
        assert_eq!(outcome, FetchOutcome::Empty);
    }

    #[test]
    fn error_body_is_failure() {
        let outcome = decode_widget_response(r#"{"error":"not found"}"#);
        assert_matches!(outcome, FetchOutcome::Failed(WidgetError::MalformedResponse(msg))
            if msg.contains("not found"));
    }

    #[test]
    fn garbage_is_malformed() {
        assert_matches!(
            decode_widget_response("<html>oops</html>"),
            FetchOutcome::Failed(WidgetError::MalformedResponse(_))
        );
        assert_matches!(
            decode_widget_response(r#"{"testimonials":"nope"}"#),
            FetchOutcome::Failed(WidgetError::MalformedResponse(_))
        );
    }

    #[test]
    fn unknown_submission_type_is_malformed() {
        let body = r#"{"testimonials":[{"id":"x","name":"A","submissionType":"AUDIO"}],"showBadge":false}"#;
        assert_matches!(
            decode_widget_response(body),
            FetchOutcome::Failed(WidgetError::MalformedResponse(_))
        );
    }

    #[test]
    fn missing_show_badge_defaults_false() {
        let body = r#"{"testimonials":[{"id":"x","name":"A","submissionType":"TEXT"}]}"#;
        assert_matches!(decode_widget_response(body), FetchOutcome::Loaded(p) if !p.show_badge);
    }
}
