//! API origin selection from the widget script's own URL.
//!
//! The script is usually loaded from the product domain, but customers
//! copy snippets pointing at the bare apex domain, which answers with a
//! redirect to `www`. Sending API calls straight to the canonical host
//! avoids that extra round-trip. Development and preview origins pass
//! through so a locally served script talks to the local API.

use url::Url;

/// Registrable product domain.
pub const CANONICAL_DOMAIN: &str = "proofwall.io";

/// Host every production API call should use.
pub const CANONICAL_HOST: &str = "www.proofwall.io";

/// Origin used when the script URL cannot be interpreted.
pub const CANONICAL_ORIGIN: &str = "https://www.proofwall.io";

/// Pick the API base origin (no trailing slash) for a script URL.
pub fn resolve_api_origin(script_src: &str) -> String {
    let Ok(url) = Url::parse(script_src.trim()) else {
        return CANONICAL_ORIGIN.to_string();
    };
    let Some(host) = url.host_str() else {
        return CANONICAL_ORIGIN.to_string();
    };

    if is_product_host(host) && host != CANONICAL_HOST {
        return CANONICAL_ORIGIN.to_string();
    }

    match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    }
}

fn is_product_host(host: &str) -> bool {
    host == CANONICAL_DOMAIN
        || host
            .strip_suffix(CANONICAL_DOMAIN)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
