//! JSON artifact writer.

use std::path::{Path, PathBuf};

use tracing::info;

use trellis_model::Result;

use crate::output::write_atomic;
use crate::record::CogDocument;

/// Options for the JSON artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonOptions {
    /// Indent the output for readability.
    pub pretty: bool,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl JsonOptions {
    #[must_use]
    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

/// Render the document as JSON text.
pub fn render_json(document: &CogDocument, options: JsonOptions) -> Result<String> {
    let mut text = if options.pretty {
        serde_json::to_string_pretty(document)?
    } else {
        serde_json::to_string(document)?
    };
    text.push('\n');
    Ok(text)
}

/// Write the JSON artifact to `path`, replacing any existing file.
pub fn write_json(document: &CogDocument, path: &Path, options: JsonOptions) -> Result<PathBuf> {
    let text = render_json(document, options)?;
    write_atomic(path, text.as_bytes())?;
    info!(path = %path.display(), rows = document.row_count(), "wrote JSON metadata");
    Ok(path.to_path_buf())
}
