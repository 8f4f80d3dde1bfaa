//! Cache key derivation from normalized capture requests
//!
//! A request is reduced to its engine-relevant option set, merged over the
//! configuration defaults, and encoded into a deterministic fingerprint.
//! Control fields (`force`, the namespace selectors) never enter the key,
//! so they cannot split the cache.

use crate::{CaptureRequest, Config, Format};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::Serialize;
use url::Url;

/// Normalized, engine-relevant option set for one render
///
/// Field declaration order is the canonical serialization order; two
/// requests that normalize to the same values always produce the same
/// fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderOptions {
    pub url: String,
    pub format: Format,
    pub width: u32,
    pub height: u32,
    pub zoom: f64,
    pub delay: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl RenderOptions {
    /// Merge caller options over configuration defaults (caller wins) and
    /// canonicalize the URL.
    pub fn build(request: &CaptureRequest, config: &Config) -> Self {
        let defaults = &config.options;
        Self {
            url: fix_url(&request.url),
            format: request.format.unwrap_or(defaults.format),
            width: request.width.unwrap_or(defaults.width),
            height: request.height.unwrap_or(defaults.height),
            zoom: request.zoom.unwrap_or(defaults.zoom),
            delay: request.delay.unwrap_or(defaults.delay),
            user_agent: request
                .user_agent
                .clone()
                .or_else(|| defaults.user_agent.clone()),
        }
    }

    /// Derive the cache key: URL-safe base64 of the canonical JSON
    /// serialization. Filename-safe, deterministic, and decodable by the
    /// render script on the other side of the process boundary.
    pub fn fingerprint(&self) -> String {
        let canonical =
            serde_json::to_vec(self).expect("render options serialize to JSON");
        URL_SAFE_NO_PAD.encode(canonical)
    }
}

/// Canonicalize a raw URL string
///
/// Defaults a missing scheme to http, lowercases the host, strips default
/// ports, and normalizes an empty path to `/`. Strings the parser rejects
/// are passed through trimmed; the renderer inherits their failure mode.
pub fn fix_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    match Url::parse(&candidate) {
        Ok(parsed) => parsed.to_string(),
        Err(_) => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(url: &str) -> CaptureRequest {
        CaptureRequest {
            url: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_fix_url_adds_scheme() {
        assert_eq!(fix_url("example.com"), "http://example.com/");
        assert_eq!(fix_url("https://example.com"), "https://example.com/");
    }

    #[test]
    fn test_fix_url_canonicalizes() {
        assert_eq!(fix_url("HTTP://Example.COM:80/path"), "http://example.com/path");
        assert_eq!(fix_url("  example.com  "), "http://example.com/");
    }

    #[test]
    fn test_fingerprint_deterministic() {
        let config = Config::default();
        let a = RenderOptions::build(&request("http://example.com"), &config);
        let b = RenderOptions::build(&request("example.com:80"), &config);
        assert_eq!(a, b);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_sensitive_to_url_and_format() {
        let config = Config::default();
        let base = RenderOptions::build(&request("http://example.com"), &config);

        let other_url = RenderOptions::build(&request("http://example.org"), &config);
        assert_ne!(base.fingerprint(), other_url.fingerprint());

        let mut jpeg = request("http://example.com");
        jpeg.format = Some(Format::Jpeg);
        let other_format = RenderOptions::build(&jpeg, &config);
        assert_ne!(base.fingerprint(), other_format.fingerprint());
    }

    #[test]
    fn test_fingerprint_sensitive_to_viewport() {
        let config = Config::default();
        let base = RenderOptions::build(&request("http://example.com"), &config);

        let mut wide = request("http://example.com");
        wide.width = Some(1920);
        let other = RenderOptions::build(&wide, &config);
        assert_ne!(base.fingerprint(), other.fingerprint());
    }

    #[test]
    fn test_control_fields_do_not_affect_key() {
        let config = Config::default();

        let mut forced = request("http://example.com");
        forced.force = true;
        forced.tid = Some("t1".to_string());
        forced.section = Some("home".to_string());
        forced.updated = Some("v1".to_string());

        let plain = RenderOptions::build(&request("http://example.com"), &config);
        let with_control = RenderOptions::build(&forced, &config);
        assert_eq!(plain.fingerprint(), with_control.fingerprint());
    }

    #[test]
    fn test_caller_options_win_over_defaults() {
        let mut config = Config::default();
        config.options.width = 800;
        config.options.user_agent = Some("default-agent".to_string());

        let mut req = request("http://example.com");
        req.width = Some(1280);

        let options = RenderOptions::build(&req, &config);
        assert_eq!(options.width, 1280);
        assert_eq!(options.height, config.options.height);
        assert_eq!(options.user_agent.as_deref(), Some("default-agent"));
    }
}
