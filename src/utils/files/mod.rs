use anyhow::Context;
use std::fs;
use std::path::Path;

use crate::Result;

/// Write an artifact file, creating parent directories as needed.
pub fn write_artifact(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Read a text file, treating any failure as an empty string.
///
/// The generate pipeline uses this for the optional sample code scaffold.
pub fn read_or_empty(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            tracing::debug!("treating {} as empty: {}", path.display(), err);
            String::new()
        }
    }
}
