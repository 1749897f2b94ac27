//! Artifact output: atomic file writes and the paired JSON/JS outputs.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use trellis_model::{Result, TrellisError};

use crate::js::{JsBinding, write_js};
use crate::json::{JsonOptions, write_json};
use crate::record::CogDocument;

/// Default file name of the JSON artifact.
pub const DEFAULT_JSON_NAME: &str = "cogData.json";

/// Default file name of the JS artifact.
pub const DEFAULT_JS_NAME: &str = "cogData.js";

/// File names and rendering options for [`write_outputs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    pub json_name: String,
    pub js_name: String,
    pub binding: JsBinding,
    pub json: JsonOptions,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            json_name: DEFAULT_JSON_NAME.to_string(),
            js_name: DEFAULT_JS_NAME.to_string(),
            binding: JsBinding::default(),
            json: JsonOptions::default(),
        }
    }
}

impl OutputOptions {
    #[must_use]
    pub fn with_binding(mut self, binding: JsBinding) -> Self {
        self.binding = binding;
        self
    }

    #[must_use]
    pub fn with_names(mut self, json_name: impl Into<String>, js_name: impl Into<String>) -> Self {
        self.json_name = json_name.into();
        self.js_name = js_name.into();
        self
    }

    #[must_use]
    pub fn with_json(mut self, json: JsonOptions) -> Self {
        self.json = json;
        self
    }
}

/// Paths of the artifacts written by [`write_outputs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub json: PathBuf,
    pub js: PathBuf,
}

/// Write both artifacts for `document` into `output_dir`.
///
/// The JS binding is validated before anything is written, so an invalid
/// name never leaves a lone JSON artifact behind.
pub fn write_outputs(
    document: &CogDocument,
    output_dir: &Path,
    options: &OutputOptions,
) -> Result<OutputPaths> {
    options.binding.validate()?;
    let json = write_json(document, &output_dir.join(&options.json_name), options.json)?;
    let js = write_js(document, &output_dir.join(&options.js_name), &options.binding)?;
    Ok(OutputPaths { json, js })
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifact".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

/// Write `bytes` to `path` via a temp file and rename.
///
/// Creates missing parent directories. On failure the temp file is removed
/// and `path` keeps its previous content.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| TrellisError::io("create directory", parent, e))?;
    }

    let temp_path = temp_path_for(path);
    let result = write_temp(&temp_path, bytes).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|e| TrellisError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: path.to_path_buf(),
            source: e,
        })
    });
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    } else {
        debug!(path = %path.display(), bytes = bytes.len(), "artifact written");
    }
    result
}

fn write_temp(temp_path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file =
        File::create(temp_path).map_err(|e| TrellisError::io("create", temp_path, e))?;
    file.write_all(bytes)
        .map_err(|e| TrellisError::io("write", temp_path, e))?;
    file.sync_all()
        .map_err(|e| TrellisError::io("sync", temp_path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_write_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn failed_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A directory at the target path makes the rename fail.
        let path = dir.path().join("taken");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), b"x").unwrap();
        let err = write_atomic(&path, b"data").unwrap_err();
        assert!(matches!(err, TrellisError::AtomicWriteFailed { .. }));
        assert!(!temp_path_for(&path).exists());
    }
}
