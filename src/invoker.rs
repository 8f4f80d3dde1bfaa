//! Timeout-bounded invocation of the external rendering process
//!
//! This is the single point where an unbounded external dependency is made
//! bounded: the renderer runs as a child process and is killed when the
//! configured timeout elapses.

use crate::{CaptureError, Config, DEFAULT_COMMAND};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

pub struct CaptureInvoker {
    config: Config,
}

impl CaptureInvoker {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Resolve the renderer command line: explicit override first, then the
    /// per-engine/per-platform command table, then the built-in default.
    /// The command string is split on whitespace.
    pub fn cli_command(&self) -> Vec<String> {
        let command = self
            .config
            .command
            .clone()
            .or_else(|| {
                self.config
                    .commands
                    .get(&self.config.engine)
                    .and_then(|per_platform| per_platform.get(std::env::consts::OS))
                    .cloned()
            })
            .unwrap_or_else(|| DEFAULT_COMMAND.to_string());

        command.split_whitespace().map(str::to_string).collect()
    }

    /// Spawn the renderer for one fingerprint/output pair and wait for it
    ///
    /// Arguments appended to the resolved command are the render script,
    /// the fingerprint (which the script decodes back into render options),
    /// and the output path. A child exceeding the timeout is killed.
    pub async fn capture(&self, fingerprint: &str, output: &Path) -> Result<(), CaptureError> {
        let mut argv = self.cli_command();
        argv.push(self.config.script.to_string_lossy().into_owned());
        argv.push(fingerprint.to_string());
        argv.push(output.to_string_lossy().into_owned());

        debug!("Renderer command: {}", argv.join(" "));

        let (program, args) = argv
            .split_first()
            .ok_or_else(|| CaptureError::ConfigurationError("empty renderer command".to_string()))?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd
            .spawn()
            .map_err(|e| CaptureError::SpawnFailed(format!("{program}: {e}")))?;

        match timeout(self.config.timeout, child.wait_with_output()).await {
            Ok(Ok(out)) if out.status.success() => Ok(()),
            Ok(Ok(out)) => {
                let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
                warn!("Renderer exited with {}: {}", out.status, stderr);
                Err(CaptureError::RenderFailed(if stderr.is_empty() {
                    format!("exit status: {}", out.status)
                } else {
                    stderr
                }))
            }
            Ok(Err(e)) => Err(CaptureError::IoError(e.to_string())),
            Err(_) => {
                // Dropping the wait future kills the child via kill_on_drop.
                warn!("Renderer timed out after {:?}", self.config.timeout);
                Err(CaptureError::Timeout(self.config.timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_cli_command_prefers_explicit_override() {
        let config = Config {
            command: Some("custom-renderer --flag".to_string()),
            ..Default::default()
        };
        let invoker = CaptureInvoker::new(config);
        assert_eq!(invoker.cli_command(), vec!["custom-renderer", "--flag"]);
    }

    #[test]
    fn test_cli_command_resolves_from_table() {
        let mut per_platform = HashMap::new();
        per_platform.insert(std::env::consts::OS.to_string(), "table-renderer".to_string());
        let mut commands = HashMap::new();
        commands.insert("testengine".to_string(), per_platform);

        let config = Config {
            engine: "testengine".to_string(),
            command: None,
            commands,
            ..Default::default()
        };
        let invoker = CaptureInvoker::new(config);
        assert_eq!(invoker.cli_command(), vec!["table-renderer"]);
    }

    #[test]
    fn test_cli_command_falls_back_to_default() {
        let config = Config {
            engine: "unknown-engine".to_string(),
            command: None,
            commands: HashMap::new(),
            ..Default::default()
        };
        let invoker = CaptureInvoker::new(config);
        assert_eq!(invoker.cli_command(), vec![DEFAULT_COMMAND]);
    }

    #[tokio::test]
    async fn test_capture_spawn_failure() {
        let config = Config {
            command: Some("definitely-not-a-renderer-binary".to_string()),
            ..Default::default()
        };
        let invoker = CaptureInvoker::new(config);
        let result = invoker
            .capture("fp", Path::new("/tmp/out.png"))
            .await;
        assert!(matches!(result, Err(CaptureError::SpawnFailed(_))));
    }
}
