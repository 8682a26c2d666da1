//! Report Output
//!
//! Writes serialized reports next to a default output file.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::DEFAULT_OUTPUT_FILE;
use crate::{CssWeightError, Result};

/// Writes text and JSON data to disk
#[derive(Debug, Clone)]
pub struct Outputter {
    default_output_file: PathBuf,
}

impl Outputter {
    /// An empty path falls back to [`DEFAULT_OUTPUT_FILE`]
    pub fn new(default_output_file: impl Into<PathBuf>) -> Self {
        let default_output_file = default_output_file.into();
        Self {
            default_output_file: if default_output_file.as_os_str().is_empty() {
                PathBuf::from(DEFAULT_OUTPUT_FILE)
            } else {
                default_output_file
            },
        }
    }

    pub fn default_output_file(&self) -> &Path {
        &self.default_output_file
    }

    /// Destination for output called `name`.
    ///
    /// The default file when `name` is empty or names it, otherwise
    /// `{name}.{default file name}` in the default file's directory.
    pub fn output_path(&self, name: &str) -> PathBuf {
        if name.is_empty() || Path::new(name) == self.default_output_file {
            return self.default_output_file.clone();
        }

        let file_name = self
            .default_output_file
            .file_name()
            .map(|file_name| file_name.to_string_lossy())
            .unwrap_or_default();
        let parent = self.default_output_file.parent().unwrap_or(Path::new(""));
        parent.join(format!("{name}.{file_name}"))
    }

    pub fn write_file(&self, data: &str, path: &Path) -> Result<()> {
        if data.is_empty() || path.as_os_str().is_empty() {
            return Err(CssWeightError::MissingOutput);
        }

        std::fs::write(path, data).map_err(|e| {
            tracing::error!("Failed to write {}: {}", path.display(), e);
            CssWeightError::Io(e)
        })
    }

    /// Serialize `value` as JSON and write it to [`Self::output_path`]
    pub fn write_data<T: Serialize>(&self, value: &T, name: &str, pretty: bool) -> Result<PathBuf> {
        let data = if pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };

        let path = self.output_path(name);
        self.write_file(&data, &path)?;
        tracing::info!("Wrote {} bytes to {}", data.len(), path.display());
        Ok(path)
    }
}

impl Default for Outputter {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_FILE)
    }
}
