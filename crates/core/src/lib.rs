//! Pure building blocks of the Proofwall testimonial widget.
//!
//! Nothing in this crate touches a document, a timer or the network:
//!
//! - [`config`] resolves `<script>` attributes into a [`WidgetConfig`].
//! - [`origin`] picks the API origin from the script URL.
//! - [`testimonial`] holds the endpoint data model and decoder.
//! - [`card`] and [`layout`] build markup fragments ([`markup::Element`]).
//! - [`style`] builds the scoped stylesheet.
//! - [`trigger`] and [`gate`] decide when the popup may show.
//! - [`source`] is the async seam to the data endpoint.

pub mod card;
pub mod config;
pub mod error;
pub mod gate;
pub mod layout;
pub mod markup;
pub mod origin;
pub mod source;
pub mod style;
pub mod testimonial;
pub mod trigger;

pub use config::{resolve_config, ScriptAttributes, WidgetConfig};
pub use error::WidgetError;
pub use testimonial::{FetchOutcome, Testimonial, WidgetPayload};
