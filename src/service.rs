//! Capture orchestration: the simple and namespaced request flows
//!
//! `CaptureService` composes the fingerprint builder, path resolver, cache
//! evaluator, janitor, invoker and compression gate into the two public
//! flows. Every request resolves to a `CaptureOutcome`; no failure kind
//! panics the orchestrator.

use crate::{
    cache::{self, CacheState},
    compress,
    fingerprint::RenderOptions,
    storage, CaptureError, CaptureInvoker, CaptureRequest, Config, Format, Metrics, Namespace,
    NamespacePaths,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of one capture request
///
/// `path` is always the deterministic resolved location, whether or not
/// the artifact there is intact when an error occurred; interpreting a
/// partial result is deferred to the caller.
#[derive(Debug)]
pub struct CaptureOutcome {
    pub path: PathBuf,
    pub error: Option<CaptureError>,
}

impl CaptureOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Capture-and-cache service
///
/// # Examples
///
/// ```rust,no_run
/// use screenshot_cache::{CaptureRequest, CaptureService, Config};
///
/// #[tokio::main]
/// async fn main() {
///     let service = CaptureService::new(Config::default());
///
///     let request = CaptureRequest {
///         url: "https://example.com".to_string(),
///         ..Default::default()
///     };
///     let outcome = service.screenshot(&request).await;
///     println!("Artifact at {}", outcome.path.display());
/// }
/// ```
pub struct CaptureService {
    config: Config,
    invoker: CaptureInvoker,
    metrics: Metrics,
}

impl CaptureService {
    pub fn new(config: Config) -> Self {
        let invoker = CaptureInvoker::new(config.clone());
        Self {
            config,
            invoker,
            metrics: Metrics::new(),
        }
    }

    /// Capture a screenshot for `request`, serving from the filesystem
    /// cache when possible
    ///
    /// Dispatches to the namespaced flow when the request carries a full
    /// tid/section/updated triple, otherwise to the simple flow.
    pub async fn screenshot(&self, request: &CaptureRequest) -> CaptureOutcome {
        let options = RenderOptions::build(request, &self.config);
        let fingerprint = options.fingerprint();

        info!("Capture site screenshot: {}", request.url);
        debug!("Request {}: fingerprint {}", request.id, fingerprint);

        if let Some(namespace) = request.namespace() {
            return self.namespaced_flow(&namespace, &options, &fingerprint).await;
        }
        self.simple_flow(request, &options, &fingerprint).await
    }

    /// Simple flow: fingerprint-addressed artifact directly under the
    /// storage root. `force` or disabled caching renders unconditionally.
    async fn simple_flow(
        &self,
        request: &CaptureRequest,
        options: &RenderOptions,
        fingerprint: &str,
    ) -> CaptureOutcome {
        let path = storage::artifact_path(&self.config.storage, fingerprint, options.format);

        if !request.force && self.config.cache && cache::path_exists(&path).await {
            debug!("Screenshot from file storage: {}", path.display());
            self.metrics.record_cache_hit();
            return CaptureOutcome { path, error: None };
        }

        let error = self.render(fingerprint, &path, options.format).await;
        CaptureOutcome { path, error }
    }

    /// Namespaced flow: classify the namespace, reset it when expired, and
    /// render into it unless the artifact already exists.
    async fn namespaced_flow(
        &self,
        namespace: &Namespace,
        options: &RenderOptions,
        fingerprint: &str,
    ) -> CaptureOutcome {
        let paths = NamespacePaths::resolve(&self.config.storage, namespace, options.format);

        match cache::evaluate(&paths).await {
            CacheState::Hit => {
                debug!("Screenshot from file storage: {}", paths.artifact.display());
                self.metrics.record_cache_hit();
                CaptureOutcome {
                    path: paths.artifact,
                    error: None,
                }
            }
            CacheState::Fresh => {
                debug!("Screenshot from site [new section]: {}", paths.artifact.display());
                let error = self.render(fingerprint, &paths.artifact, options.format).await;
                CaptureOutcome {
                    path: paths.artifact,
                    error,
                }
            }
            CacheState::Expired => {
                // Cleanup failure is a warning, not fatal; the render is
                // attempted regardless.
                match cache::reset_namespace(&paths).await {
                    Ok(()) => self.metrics.record_namespace_reset(),
                    Err(e) => warn!("Error on clean dir {}: {}", paths.dir.display(), e),
                }
                debug!("Screenshot from site [clean up]: {}", paths.artifact.display());
                let error = self.render(fingerprint, &paths.artifact, options.format).await;
                CaptureOutcome {
                    path: paths.artifact,
                    error,
                }
            }
        }
    }

    /// Run the external renderer, then the compression gate
    ///
    /// Render errors surface to the caller and are never retried here;
    /// optimizer errors never do.
    async fn render(&self, fingerprint: &str, path: &Path, format: Format) -> Option<CaptureError> {
        let result = self.invoker.capture(fingerprint, path).await;
        self.metrics.record_render(result.is_ok());

        match result {
            Ok(()) => {
                if self.config.compress && !compress::optimize(path, format).await {
                    self.metrics.record_compress_failure();
                }
                debug!("Process finished work: {}", path.display());
                None
            }
            Err(e) => Some(e),
        }
    }
}
