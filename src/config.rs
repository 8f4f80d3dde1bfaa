//! Configuration management with serde serialization/deserialization
//!
//! This module provides the configuration structures for the capture-and-cache
//! service, including renderer command selection, storage location, and the
//! default render options merged under every request.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Built-in rendering engine used when none is configured.
pub const DEFAULT_ENGINE: &str = "slimerjs";

/// Renderer command used when neither an explicit command nor a command
/// table entry is available.
pub const DEFAULT_COMMAND: &str = "slimerjs";

/// Render script handed to the engine as its first argument.
pub const DEFAULT_SCRIPT: &str = "scripts/screenshot.js";

/// Main configuration structure for the capture-and-cache service
///
/// Read-only to the core: loaded once per process, then passed as an
/// immutable value into each component.
///
/// # Examples
///
/// ```rust
/// use screenshot_cache::Config;
///
/// // Use default configuration
/// let config = Config::default();
///
/// // Create custom configuration
/// let config = Config {
///     compress: true,
///     timeout: std::time::Duration::from_secs(60),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Storage root for cached artifacts (default: `<temp dir>/screenshots`)
    ///
    /// Every artifact, namespace directory, and marker file lives under this
    /// directory. Mutated by any concurrent request; no locking is applied.
    pub storage: PathBuf,

    /// Rendering engine name used to look up the command table (default: slimerjs)
    pub engine: String,

    /// Explicit renderer command line (default: none)
    ///
    /// When set, overrides the command table entirely. Split on whitespace
    /// before the render script and its arguments are appended.
    pub command: Option<String>,

    /// Per-engine, per-platform renderer command table
    ///
    /// Outer key is the engine name, inner key is the platform as reported
    /// by `std::env::consts::OS` ("linux", "macos", "windows").
    pub commands: HashMap<String, HashMap<String, String>>,

    /// Render script passed to the engine (default: `scripts/screenshot.js`)
    pub script: PathBuf,

    /// Timeout for a single render process (default: 30 seconds)
    ///
    /// The external renderer is killed when it exceeds this duration.
    pub timeout: Duration,

    /// Serve existing artifacts instead of re-rendering (default: true)
    pub cache: bool,

    /// Rewrite artifacts through the lossless optimizer chain (default: false)
    pub compress: bool,

    /// Default render options merged under caller options (caller wins)
    pub options: RenderDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: std::env::temp_dir().join("screenshots"),
            engine: DEFAULT_ENGINE.to_string(),
            command: None,
            commands: default_command_table(),
            script: PathBuf::from(DEFAULT_SCRIPT),
            timeout: Duration::from_secs(30),
            cache: true,
            compress: false,
            options: RenderDefaults::default(),
        }
    }
}

fn default_command_table() -> HashMap<String, HashMap<String, String>> {
    let mut commands = HashMap::new();

    let mut slimerjs = HashMap::new();
    slimerjs.insert("linux".to_string(), "slimerjs".to_string());
    slimerjs.insert("macos".to_string(), "slimerjs".to_string());
    slimerjs.insert("windows".to_string(), "slimerjs.bat".to_string());
    commands.insert("slimerjs".to_string(), slimerjs);

    let mut phantomjs = HashMap::new();
    phantomjs.insert("linux".to_string(), "phantomjs".to_string());
    phantomjs.insert("macos".to_string(), "phantomjs".to_string());
    phantomjs.insert("windows".to_string(), "phantomjs.exe".to_string());
    commands.insert("phantomjs".to_string(), phantomjs);

    commands
}

/// Default render options applied when a request leaves a field unset
///
/// These are the engine-relevant knobs; all of them participate in the
/// cache key, so changing a default invalidates previously cached entries.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RenderDefaults {
    /// Default output format (default: PNG)
    pub format: Format,

    /// Viewport width in pixels (default: 1024)
    pub width: u32,

    /// Viewport height in pixels (default: 768)
    pub height: u32,

    /// Page zoom factor (default: 1.0)
    pub zoom: f64,

    /// Delay in milliseconds before the engine captures (default: 0)
    pub delay: u64,

    /// Custom User-Agent string for the renderer (default: engine default)
    pub user_agent: Option<String>,
}

impl Default for RenderDefaults {
    fn default() -> Self {
        Self {
            format: Format::Png,
            width: 1024,
            height: 768,
            zoom: 1.0,
            delay: 0,
            user_agent: None,
        }
    }
}

/// Supported artifact formats
///
/// The format selects the artifact file extension and which entry of the
/// lossless optimizer chain applies to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// PNG - lossless raster, optimized by optipng
    Png,
    /// JPEG - lossy raster, re-encoded progressively by jpegtran
    Jpeg,
    /// GIF - interlaced by gifsicle
    Gif,
    /// SVG - vector, optimized by svgo
    Svg,
}

impl Format {
    /// File extension for artifacts of this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Png => "png",
            Format::Jpeg => "jpeg",
            Format::Gif => "gif",
            Format::Svg => "svg",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Format::Png),
            "jpeg" | "jpg" => Ok(Format::Jpeg),
            "gif" => Ok(Format::Gif),
            "svg" => Ok(Format::Svg),
            other => Err(format!("unsupported format: {other}")),
        }
    }
}

/// A single capture request as delivered by the request-shaping layer
///
/// `url` is the only required field. The namespace fields `tid`, `section`
/// and `updated` select the namespaced flow when all three are present;
/// a partially filled namespace is treated as absent.
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    pub id: String,
    pub url: String,
    pub format: Option<Format>,
    /// Bypass the cache and re-render unconditionally. Never feeds the
    /// cache key.
    pub force: bool,
    pub tid: Option<String>,
    pub section: Option<String>,
    pub updated: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub zoom: Option<f64>,
    pub delay: Option<u64>,
    pub user_agent: Option<String>,
}

impl Default for CaptureRequest {
    fn default() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            url: String::new(),
            format: None,
            force: false,
            tid: None,
            section: None,
            updated: None,
            width: None,
            height: None,
            zoom: None,
            delay: None,
            user_agent: None,
        }
    }
}

impl CaptureRequest {
    /// The request's namespace, when all three selector fields are present.
    pub fn namespace(&self) -> Option<Namespace> {
        match (&self.tid, &self.section, &self.updated) {
            (Some(tid), Some(section), Some(updated)) => Some(Namespace {
                tid: tid.clone(),
                section: section.clone(),
                updated: updated.clone(),
            }),
            _ => None,
        }
    }
}

/// A tid-scoped cache namespace grouping sections under one version token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    pub tid: String,
    pub section: String,
    pub updated: String,
}
