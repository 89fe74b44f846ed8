//! Style injection into the host document head.

use proofwall_core::style::{build_stylesheet, STYLE_ELEMENT_ID};
use proofwall_core::WidgetConfig;

use crate::document::HostDocument;

/// Insert the widget stylesheet once. Returns `false` when a sheet from an
/// earlier activation is already present.
pub fn inject_styles(document: &mut HostDocument, config: &WidgetConfig) -> bool {
    if document.has_style(STYLE_ELEMENT_ID) {
        tracing::debug!("Widget styles already present; skipping injection");
        return false;
    }
    document.append_style(STYLE_ELEMENT_ID, build_stylesheet(config))
}
