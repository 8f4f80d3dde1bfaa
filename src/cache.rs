//! Cache state classification and namespace cleanup
//!
//! The three-way Hit/Fresh/Expired classification is an explicit enum
//! produced by one evaluation function; the action taken per variant lives
//! in the orchestrator.

use crate::NamespacePaths;
use std::io;
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Outcome of probing a namespace for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// The artifact already exists; serve it without rendering.
    Hit,
    /// No artifact, but the marker for the requested `updated` token
    /// exists: the namespace is current, render the new section into it
    /// without clearing anything.
    Fresh,
    /// No artifact and no matching marker: the namespace belongs to a
    /// different version or was never initialized and must be reset before
    /// rendering.
    Expired,
}

/// Classify a namespaced request by successive existence probes, in
/// priority order: artifact first, then marker.
pub async fn evaluate(paths: &NamespacePaths) -> CacheState {
    if path_exists(&paths.artifact).await {
        CacheState::Hit
    } else if path_exists(&paths.marker).await {
        CacheState::Fresh
    } else {
        CacheState::Expired
    }
}

pub(crate) async fn path_exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

/// Reset an expired namespace: remove the directory tree, recreate it, and
/// touch the empty marker for the current `updated` token
///
/// Absence of the directory is not an error. A failure in any step is
/// propagated. The marker is written last, so a concurrent reader of a
/// half-reset directory observes `Expired` again rather than a falsely
/// current namespace.
pub async fn reset_namespace(paths: &NamespacePaths) -> io::Result<()> {
    match fs::remove_dir_all(&paths.dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    fs::create_dir_all(&paths.dir).await?;
    fs::File::create(&paths.marker).await?;

    debug!("Reset namespace directory: {}", paths.dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Format, Namespace};
    use tempfile::TempDir;
    use tokio_test::assert_ok;

    fn paths_in(storage: &Path) -> NamespacePaths {
        let namespace = Namespace {
            tid: "t1".to_string(),
            section: "home".to_string(),
            updated: "v2".to_string(),
        };
        NamespacePaths::resolve(storage, &namespace, Format::Png)
    }

    #[tokio::test]
    async fn test_evaluate_expired_when_nothing_exists() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(dir.path());
        assert_eq!(evaluate(&paths).await, CacheState::Expired);
    }

    #[tokio::test]
    async fn test_evaluate_fresh_when_marker_matches() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(dir.path());
        std::fs::create_dir_all(&paths.dir).unwrap();
        std::fs::write(&paths.marker, b"").unwrap();
        assert_eq!(evaluate(&paths).await, CacheState::Fresh);
    }

    #[tokio::test]
    async fn test_evaluate_hit_takes_priority() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(dir.path());
        std::fs::create_dir_all(&paths.dir).unwrap();
        std::fs::write(&paths.marker, b"").unwrap();
        std::fs::write(&paths.artifact, b"image").unwrap();
        assert_eq!(evaluate(&paths).await, CacheState::Hit);
    }

    #[tokio::test]
    async fn test_evaluate_expired_for_stale_marker() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(dir.path());
        std::fs::create_dir_all(&paths.dir).unwrap();
        // marker for a different version token
        std::fs::write(paths.dir.join("v1"), b"").unwrap();
        assert_eq!(evaluate(&paths).await, CacheState::Expired);
    }

    #[tokio::test]
    async fn test_reset_namespace_from_scratch() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(dir.path());

        assert_ok!(reset_namespace(&paths).await);

        assert!(paths.dir.is_dir());
        assert!(paths.marker.is_file());
        assert_eq!(std::fs::read(&paths.marker).unwrap().len(), 0);
        assert_eq!(evaluate(&paths).await, CacheState::Fresh);
    }

    #[tokio::test]
    async fn test_reset_namespace_clears_previous_contents() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(dir.path());

        std::fs::create_dir_all(&paths.dir).unwrap();
        std::fs::write(paths.dir.join("v1"), b"").unwrap();
        std::fs::write(paths.dir.join("home_v1.png"), b"old").unwrap();

        assert_ok!(reset_namespace(&paths).await);

        assert!(!paths.dir.join("v1").exists());
        assert!(!paths.dir.join("home_v1.png").exists());
        assert!(paths.marker.is_file());
    }

    #[tokio::test]
    async fn test_reset_namespace_idempotent() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(dir.path());

        assert_ok!(reset_namespace(&paths).await);
        assert_ok!(reset_namespace(&paths).await);

        assert!(paths.marker.is_file());
    }
}
