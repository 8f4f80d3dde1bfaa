//! Lossless post-processing of rendered artifacts
//!
//! A fixed ordered chain of external optimizers rewrites the artifact in
//! place. The optimizers are opaque tools; any failure here is logged and
//! swallowed, since an unoptimized artifact is still a valid result.

use crate::Format;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Optimizer chain in invocation order. `{}` marks where the artifact path
/// is substituted; entries whose format does not match the artifact are
/// skipped.
const OPTIMIZERS: &[(Format, &[&str])] = &[
    (
        Format::Jpeg,
        &["jpegtran", "-progressive", "-optimize", "-outfile", "{}", "{}"],
    ),
    (Format::Png, &["optipng", "-o3", "{}"]),
    (Format::Gif, &["gifsicle", "--interlace", "--batch", "{}"]),
    (Format::Svg, &["svgo", "{}"]),
];

/// Rewrite the artifact in place through the format-matching optimizers.
/// Returns whether every invoked optimizer succeeded; callers may count
/// failures but must never treat them as request errors.
pub async fn optimize(path: &Path, format: Format) -> bool {
    let mut clean = true;
    for (target, template) in OPTIMIZERS {
        if *target != format {
            continue;
        }
        clean &= run_optimizer(template, path).await;
    }
    clean
}

async fn run_optimizer(template: &[&str], path: &Path) -> bool {
    let argv: Vec<String> = template
        .iter()
        .map(|arg| {
            if *arg == "{}" {
                path.to_string_lossy().into_owned()
            } else {
                (*arg).to_string()
            }
        })
        .collect();

    let Some((program, args)) = argv.split_first() else {
        return true;
    };

    let result = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Ok(out) if out.status.success() => {
            debug!("Optimizer {} rewrote {}", program, path.display());
            true
        }
        Ok(out) => {
            let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
            warn!("Optimizer {} failed with {}: {}", program, out.status, stderr);
            false
        }
        Err(e) => {
            warn!("Optimizer {} unavailable: {}", program, e);
            false
        }
    }
}
