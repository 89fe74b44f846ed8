//! One widget activation: the state graph owned by a single script tag.
//!
//! [`Activation::start`] runs the steps every variant shares (config
//! resolution, origin selection, style injection). A missing workspace id
//! aborts before the document or the network is touched. Nothing in an
//! activation is shared with any other activation.

use proofwall_core::layout::LayoutOptions;
use proofwall_core::origin::resolve_api_origin;
use proofwall_core::{resolve_config, ScriptAttributes, WidgetConfig, WidgetError};
use tokio_util::sync::CancellationToken;

use crate::document::SharedDocument;
use crate::styles::inject_styles;

#[derive(Debug)]
pub struct Activation {
    config: WidgetConfig,
    origin: String,
    document: SharedDocument,
    /// Cancelled when the host page unloads; parent of every timer token.
    unload: CancellationToken,
}

impl Activation {
    /// Resolve configuration and inject styles.
    ///
    /// On a configuration error the error is logged and returned; the
    /// document is left untouched.
    pub async fn start(
        attrs: &ScriptAttributes,
        script_src: &str,
        document: SharedDocument,
    ) -> Result<Self, WidgetError> {
        let config = match resolve_config(attrs) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Testimonial widget not started");
                return Err(e);
            }
        };

        let origin = resolve_api_origin(script_src);
        {
            let mut doc = document.lock().await;
            inject_styles(&mut doc, &config);
        }

        tracing::info!(
            workspace_id = %config.workspace_id,
            origin = %origin,
            layout = config.layout.as_str(),
            theme = config.theme.as_str(),
            "Testimonial widget activated",
        );

        Ok(Self {
            config,
            origin,
            document,
            unload: CancellationToken::new(),
        })
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// API base origin for this activation.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn document(&self) -> SharedDocument {
        self.document.clone()
    }

    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions::from(&self.config)
    }

    pub fn unload_token(&self) -> &CancellationToken {
        &self.unload
    }

    /// Page unload: stops every timer owned by this activation.
    pub fn unload(&self) {
        tracing::debug!(workspace_id = %self.config.workspace_id, "Page unloading");
        self.unload.cancel();
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use proofwall_core::style::STYLE_ELEMENT_ID;

    use super::*;
    use crate::document::HostDocument;

    #[tokio::test]
    async fn missing_workspace_leaves_document_pristine() {
        let doc = HostDocument::shared();
        let attrs = ScriptAttributes::new().with("data-theme", "dark");

        let result =
            Activation::start(&attrs, "https://www.proofwall.io/widget.js", doc.clone()).await;

        assert_matches!(result, Err(WidgetError::Configuration(_)));
        assert!(doc.lock().await.is_pristine());
    }

    #[tokio::test]
    async fn debug_output_names_workspace() {
        let attrs = ScriptAttributes::new().with("data-workspace", "ws7");
        let activation = Activation::start(
            &attrs,
            "https://www.proofwall.io/widget.js",
            HostDocument::shared(),
        )
        .await
        .unwrap();

        let debug = format!("{activation:?}");
        assert!(debug.contains("ws7"));
        assert!(debug.contains("https://www.proofwall.io"));
    }

    #[tokio::test]
    async fn start_injects_styles_and_resolves_origin() {
        let doc = HostDocument::shared();
        let attrs = ScriptAttributes::new().with("data-workspace", "ws1");

        let activation = Activation::start(&attrs, "https://proofwall.io/widget.js", doc.clone())
            .await
            .unwrap();

        assert_eq!(activation.origin(), "https://www.proofwall.io");
        assert_eq!(activation.config().workspace_id, "ws1");
        assert!(doc.lock().await.has_style(STYLE_ELEMENT_ID));
    }

    #[tokio::test]
    async fn second_activation_does_not_duplicate_styles() {
        let doc = HostDocument::shared();
        let attrs = ScriptAttributes::new().with("data-workspace", "ws1");
        let src = "http://localhost:3000/widget.js";

        let _a = Activation::start(&attrs, src, doc.clone()).await.unwrap();
        let _b = Activation::start(&attrs, src, doc.clone()).await.unwrap();

        assert_eq!(doc.lock().await.style_count(), 1);
    }

    #[tokio::test]
    async fn unload_cancels_token() {
        let attrs = ScriptAttributes::new().with("data-workspace", "ws1");
        let activation = Activation::start(&attrs, "", HostDocument::shared()).await.unwrap();
        assert!(!activation.unload_token().is_cancelled());
        activation.unload();
        assert!(activation.unload_token().is_cancelled());
    }
}
