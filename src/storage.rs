//! Deterministic artifact path resolution inside the storage root
//!
//! Pure path arithmetic; no I/O happens in this module.

use crate::{Format, Namespace};
use std::path::{Path, PathBuf};

/// Artifact path for the simple (non-namespaced) flow.
pub fn artifact_path(storage: &Path, fingerprint: &str, format: Format) -> PathBuf {
    storage.join(format!("{fingerprint}.{}", format.extension()))
}

/// Directory holding all sections of one tid.
pub fn namespace_dir(storage: &Path, tid: &str) -> PathBuf {
    storage.join(tid)
}

/// Empty marker file certifying which `updated` token the namespace holds.
pub fn marker_path(storage: &Path, tid: &str, updated: &str) -> PathBuf {
    namespace_dir(storage, tid).join(updated)
}

/// Artifact path for one section within a namespace.
pub fn section_path(storage: &Path, namespace: &Namespace, format: Format) -> PathBuf {
    namespace_dir(storage, &namespace.tid).join(format!(
        "{}_{}.{}",
        namespace.section,
        namespace.updated,
        format.extension()
    ))
}

/// Resolved path set for one namespaced request
#[derive(Debug, Clone)]
pub struct NamespacePaths {
    pub dir: PathBuf,
    pub marker: PathBuf,
    pub artifact: PathBuf,
}

impl NamespacePaths {
    pub fn resolve(storage: &Path, namespace: &Namespace, format: Format) -> Self {
        Self {
            dir: namespace_dir(storage, &namespace.tid),
            marker: marker_path(storage, &namespace.tid, &namespace.updated),
            artifact: section_path(storage, namespace, format),
        }
    }
}
