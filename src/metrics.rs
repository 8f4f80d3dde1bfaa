use metrics::Counter;

/// Service-level counters
///
/// Backed by no-op handles until the embedding process installs a metrics
/// recorder; the core never depends on one being present.
pub struct Metrics {
    pub cache_hits: Counter,
    pub renders: Counter,
    pub render_failures: Counter,
    pub namespace_resets: Counter,
    pub compress_failures: Counter,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            cache_hits: Counter::noop(),
            renders: Counter::noop(),
            render_failures: Counter::noop(),
            namespace_resets: Counter::noop(),
            compress_failures: Counter::noop(),
        }
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.increment(1);
    }

    pub fn record_render(&self, success: bool) {
        self.renders.increment(1);
        if !success {
            self.render_failures.increment(1);
        }
    }

    pub fn record_namespace_reset(&self) {
        self.namespace_resets.increment(1);
    }

    pub fn record_compress_failure(&self) {
        self.compress_failures.increment(1);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
