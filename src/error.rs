use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("Render process spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Render process failed: {0}")]
    RenderFailed(String),

    #[error("Render timed out after {0:?}")]
    Timeout(Duration),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl CaptureError {
    /// Whether this failure came from the render step itself rather than
    /// the surrounding plumbing.
    pub fn is_render_failure(&self) -> bool {
        matches!(
            self,
            CaptureError::SpawnFailed(_)
                | CaptureError::RenderFailed(_)
                | CaptureError::Timeout(_)
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, CaptureError::Timeout(_))
    }
}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for CaptureError {
    fn from(err: serde_json::Error) -> Self {
        CaptureError::ConfigurationError(err.to_string())
    }
}
