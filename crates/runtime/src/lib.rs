//! Host-side runtime of the Proofwall testimonial widget.
//!
//! An [`activation::Activation`] is created per script tag. It resolves the
//! configuration, injects the stylesheet into a [`document::HostDocument`]
//! and then hands over to one of the two presentation shells:
//!
//! - [`floating::FloatingShell`]: corner launcher with a lazily loaded panel.
//! - [`popup::PopupShell`]: modal shown once a trigger fires.
//!
//! Timers (spotlight rotation, the popup delay) are tokio tasks bound to the
//! activation's unload token.

pub mod activation;
pub mod content;
pub mod document;
pub mod events;
pub mod floating;
pub mod popup;
pub mod preview;
pub mod schedule;
pub mod store;
pub mod styles;

pub use activation::Activation;
pub use document::{HostDocument, SharedDocument};
pub use events::HostEvent;
