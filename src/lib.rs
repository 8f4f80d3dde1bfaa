//! # Screenshot Cache
//!
//! A capture-and-cache service for web screenshots. Rendering is delegated
//! to an external headless-browser command invoked under a timeout; every
//! rendered artifact is stored on the filesystem under a deterministic,
//! content-addressed path so that identical requests are served from cache
//! instead of re-rendering.
//!
//! ## Request flows
//!
//! - **Simple flow**: the normalized request options are encoded into a
//!   fingerprint that addresses the artifact directly under the storage
//!   root. A cache hit returns the existing path without rendering; `force`
//!   or disabled caching renders unconditionally.
//! - **Namespaced flow**: when a request carries a `tid`/`section`/`updated`
//!   triple, artifacts live in a per-tid directory versioned by an empty
//!   marker file. The namespace is classified as Hit, Fresh, or Expired by
//!   filesystem probes; an expired namespace is removed, recreated, and
//!   re-marked before rendering.
//!
//! Render failures are reported alongside the resolved artifact path and
//! never retried; optimizer failures in the optional compression pipeline
//! are logged and swallowed.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use screenshot_cache::{CaptureRequest, CaptureService, Config};
//!
//! #[tokio::main]
//! async fn main() {
//!     let service = CaptureService::new(Config::default());
//!
//!     let request = CaptureRequest {
//!         url: "https://example.com".to_string(),
//!         ..Default::default()
//!     };
//!     let outcome = service.screenshot(&request).await;
//!     match outcome.error {
//!         None => println!("Screenshot at {}", outcome.path.display()),
//!         Some(e) => eprintln!("Capture failed: {e}"),
//!     }
//! }
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # Simple capture (cached by fingerprint)
//! screenshot-cache capture --url https://example.com
//!
//! # Namespaced capture (cached per tid/section/updated)
//! screenshot-cache capture --url https://example.com \
//!     --tid t1 --section home --updated v2
//! ```

/// Configuration and request types
pub mod config;

/// Error types for capture failures
pub mod error;

/// Cache key derivation from normalized requests
pub mod fingerprint;

/// Deterministic artifact path resolution
pub mod storage;

/// Cache state classification and namespace cleanup
pub mod cache;

/// Timeout-bounded external renderer invocation
pub mod invoker;

/// Lossless artifact post-processing
pub mod compress;

/// Request orchestration for the simple and namespaced flows
pub mod service;

/// Command-line interface implementation
pub mod cli;

/// Service-level counters
pub mod metrics;


pub use cache::CacheState;
pub use cli::*;
pub use config::*;
pub use error::*;
pub use fingerprint::{fix_url, RenderOptions};
pub use invoker::*;
pub use metrics::*;
pub use service::*;
pub use storage::NamespacePaths;
