//! Shared HTTP client factories.
//!
//! Every outbound call carries the same browser-impersonation header set;
//! several of the upstreams reject requests without it.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ORIGIN, REFERER, USER_AGENT};
use reqwest::Client;
use std::time::Duration;

/// Default timeout for catalog listing calls (10 seconds).
pub const CATALOG_TIMEOUT: Duration = Duration::from_secs(10);

/// Connect timeout for proxied calls (10 seconds). Proxied calls have no
/// total timeout: completions may legitimately stream for a long time.
pub const PROXY_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Fixed browser-impersonation header set, shared by catalog fetches and
/// proxied upstream calls.
pub fn impersonation_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(ORIGIN, HeaderValue::from_static("https://g4f.dev"));
    headers.insert(REFERER, HeaderValue::from_static("https://g4f.dev/"));
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(
        "sec-ch-ua",
        HeaderValue::from_static("\"Chromium\";v=\"120\", \"Not A(Brand\";v=\"24\""),
    );
    headers.insert("sec-ch-ua-mobile", HeaderValue::from_static("?0"));
    headers.insert("sec-ch-ua-platform", HeaderValue::from_static("\"Windows\""));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("empty"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("cors"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("cross-site"));
    headers
}

/// Client for catalog listing calls, with a bounded per-request timeout.
pub fn catalog_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .default_headers(impersonation_headers())
        .build()
        .expect("Failed to create HTTP client")
}

/// Client for proxied upstream calls: connect timeout only.
pub fn proxy_client() -> Client {
    Client::builder()
        .connect_timeout(PROXY_CONNECT_TIMEOUT)
        .default_headers(impersonation_headers())
        .build()
        .expect("Failed to create HTTP client")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impersonation_headers_cover_browser_hints() {
        let headers = impersonation_headers();
        assert_eq!(headers.get(ORIGIN).unwrap(), "https://g4f.dev");
        assert_eq!(headers.get(REFERER).unwrap(), "https://g4f.dev/");
        assert!(headers
            .get(USER_AGENT)
            .unwrap()
            .to_str()
            .unwrap()
            .contains("Chrome"));
        assert!(headers.contains_key("sec-ch-ua"));
        assert!(headers.contains_key("sec-fetch-mode"));
    }

    #[test]
    fn catalog_client_builds_with_timeout() {
        let _client = catalog_client(Duration::from_secs(5));
    }

    #[test]
    fn proxy_client_builds() {
        let _client = proxy_client();
    }

    #[test]
    fn catalog_timeout_is_bounded() {
        assert_eq!(CATALOG_TIMEOUT, Duration::from_secs(10));
    }
}
