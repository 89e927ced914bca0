use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::execution::ExecutionResult;

/// Writes the results of one page to `<output_dir>/<file_prefix><page>.json`.
///
/// The file holds a compact JSON array, which may be empty. Existing files are overwritten.
///
/// # Arguments
///
/// * `output_dir` - Directory the file is written to, created if missing
/// * `file_prefix` - Leading part of the file name
/// * `page` - Index of the page, starting at 0
/// * `results` - Records collected for that page
pub fn write_page(
    output_dir: &Path,
    file_prefix: &str,
    page: u32,
    results: &[ExecutionResult],
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "Unable to create output directory '{}'",
            output_dir.display()
        )
    })?;

    let path = output_dir.join(format!("{}{}.json", file_prefix, page));
    let json = serde_json::to_string(results)?;
    fs::write(&path, json).with_context(|| format!("Unable to write '{}'", path.display()))?;

    Ok(path)
}
