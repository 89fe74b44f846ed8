//! `proofwall-preview` -- render a widget activation to a static HTML page.
//!
//! Activates the widget against an empty host document, opens the floating
//! panel (or fires the popup trigger) and writes the resulting page to
//! stdout. See [`PreviewConfig::from_env`] for the environment variables.
//!
//! # Environment variables
//!
//! | Variable                       | Required | Default                              |
//! |--------------------------------|----------|--------------------------------------|
//! | `PROOFWALL_ATTRIBUTES`         | yes      | --  e.g. `data-workspace=ws1;data-layout=spotlight` |
//! | `PROOFWALL_SCRIPT_SRC`         | no       | `https://www.proofwall.io/widget.js` |
//! | `PROOFWALL_VARIANT`            | no       | `floating`                           |
//! | `PROOFWALL_FETCH_TIMEOUT_SECS` | no       | `10`                                 |
//! | `PROOFWALL_FIXTURE`            | no       | unset                                |
//! | `PROOFWALL_FLAG_STORE`         | no       | unset                                |

use std::sync::Arc;

use proofwall_client::WidgetApi;
use proofwall_core::gate::{FlagStore, MemoryFlagStore};
use proofwall_core::source::{FixedSource, TestimonialSource};
use proofwall_core::testimonial::decode_widget_response;
use proofwall_runtime::floating::{FloatingShell, LAUNCHER_ID};
use proofwall_runtime::popup::PopupShell;
use proofwall_runtime::preview::{PreviewConfig, Variant};
use proofwall_runtime::store::FileFlagStore;
use proofwall_runtime::{Activation, HostDocument, HostEvent};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "proofwall_runtime=info,proofwall_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = PreviewConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid preview configuration");
        std::process::exit(1);
    });

    let document = HostDocument::shared();
    let activation = Activation::start(&config.attributes, &config.script_src, document.clone())
        .await
        .unwrap_or_else(|_| std::process::exit(1));

    let source = build_source(&config, activation.origin()).await;

    tracing::info!(variant = config.variant.as_str(), "Rendering preview");

    match config.variant {
        Variant::Floating => {
            let mut shell = FloatingShell::mount(&activation, source).await;
            shell.handle(&HostEvent::click(LAUNCHER_ID)).await;
        }
        Variant::Popup => {
            let store: Box<dyn FlagStore + Send> = match &config.flag_store {
                Some(path) => Box::new(FileFlagStore::open(path)),
                None => Box::new(MemoryFlagStore::new()),
            };
            let mut shell = PopupShell::new(&activation, source, store);
            shell.force_trigger().await;
            tracing::info!(state = shell.state().as_str(), "Popup trigger settled");
        }
    }

    print!("{}", document.lock().await.render_html());
    activation.unload();
}

/// Canned fixture if configured, otherwise the live widget endpoint.
async fn build_source(config: &PreviewConfig, origin: &str) -> Arc<dyn TestimonialSource> {
    if let Some(path) = &config.fixture {
        let body = tokio::fs::read_to_string(path).await.unwrap_or_else(|e| {
            tracing::error!(path = %path.display(), error = %e, "Failed to read fixture");
            std::process::exit(1);
        });
        return Arc::new(FixedSource::new(decode_widget_response(&body)));
    }

    let api = WidgetApi::with_timeout(origin, config.fetch_timeout).unwrap_or_else(|e| {
        tracing::error!(origin, error = %e, "Failed to build widget API client");
        std::process::exit(1);
    });
    Arc::new(api)
}
