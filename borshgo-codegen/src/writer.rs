//! Writing render maps to disk.

use crate::error::Result;
use crate::options::RenderOptions;
use crate::render_map::RenderMap;
use std::path::Path;
use std::process::Command;

/// Outcome of writing a render map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Files written.
    pub written: usize,
    /// Files left untouched because they already existed.
    pub skipped: usize,
    /// Whether `gofmt` ran successfully.
    pub formatted: bool,
}

/// Writes every present fragment of `map` under `dir`.
///
/// The directory is deleted first when `delete_folder_before_rendering` is
/// set. Fragments that must not overwrite are skipped if their file exists.
/// When `format_code` is set, `gofmt -w` runs on the directory afterwards; a
/// missing binary or formatter diagnostics are logged and do not fail.
///
/// # Errors
/// Returns `CodegenError::Io` if a directory or file cannot be written.
pub fn write_render_map(
    map: &RenderMap,
    dir: &Path,
    options: &RenderOptions,
) -> Result<WriteSummary> {
    if options.delete_folder_before_rendering && dir.exists() {
        tracing::debug!(dir = %dir.display(), "deleting output directory");
        std::fs::remove_dir_all(dir)?;
    }
    std::fs::create_dir_all(dir)?;

    let mut summary = WriteSummary::default();
    for (path, fragment) in map.files() {
        let target = dir.join(path);
        if !fragment.overwrite && target.exists() {
            tracing::debug!(path, "keeping existing file");
            summary.skipped += 1;
            continue;
        }
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, &fragment.content)?;
        summary.written += 1;
    }

    if options.format_code {
        summary.formatted = format_directory(dir);
    }

    tracing::info!(
        dir = %dir.display(),
        written = summary.written,
        skipped = summary.skipped,
        formatted = summary.formatted,
        "rendered files"
    );
    Ok(summary)
}

fn format_directory(dir: &Path) -> bool {
    let output = match Command::new("gofmt").arg("-w").arg(dir).output() {
        Ok(output) => output,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("gofmt not found, skipping formatting");
            return false;
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to run gofmt");
            return false;
        }
    };

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        tracing::warn!(diagnostics = %stderr.trim(), "gofmt reported diagnostics");
    }
    if !output.status.success() {
        tracing::warn!(status = %output.status, "gofmt failed");
        return false;
    }
    true
}
