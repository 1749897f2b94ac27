//! Script-embeddable JS artifact writer.
//!
//! The viewer can load cognostics through a `<script>` tag instead of a
//! fetch. The payload is the same JSON text the JSON writer produces,
//! wrapped so that loading it either assigns a global or calls a loader.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::info;

use trellis_model::{Result, TrellisError};

use crate::output::write_atomic;
use crate::record::CogDocument;

/// Default global the viewer reads cognostics from.
pub const DEFAULT_GLOBAL: &str = "__cogData__";

/// How the embedded document is exposed to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsBinding {
    /// `window.<name> = {...};`
    Global(String),
    /// `<name>({...});`
    Callback(String),
}

impl Default for JsBinding {
    fn default() -> Self {
        JsBinding::Global(DEFAULT_GLOBAL.to_string())
    }
}

impl JsBinding {
    pub fn name(&self) -> &str {
        match self {
            JsBinding::Global(name) | JsBinding::Callback(name) => name,
        }
    }

    /// Check that the binding name is a plain JS identifier.
    pub fn validate(&self) -> Result<()> {
        let name = self.name();
        let mut chars = name.chars();
        let valid_start = chars
            .next()
            .is_some_and(|ch| ch.is_ascii_alphabetic() || ch == '_' || ch == '$');
        if valid_start && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '$') {
            Ok(())
        } else {
            Err(TrellisError::InvalidBinding {
                name: name.to_string(),
            })
        }
    }
}

impl fmt::Display for JsBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsBinding::Global(name) => write!(f, "window.{name}"),
            JsBinding::Callback(name) => write!(f, "{name}()"),
        }
    }
}

/// JSON is not a strict subset of JS: U+2028/U+2029 terminate lines in
/// older engines, and `</` can close an inline script. Both only occur
/// inside string literals, where the escaped forms are equivalent.
fn escape_for_script(json: &str) -> String {
    json.replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
        .replace("</", "<\\/")
}

/// Render the document as loadable JS source.
pub fn render_js(document: &CogDocument, binding: &JsBinding) -> Result<String> {
    binding.validate()?;
    let payload = escape_for_script(&serde_json::to_string(document)?);
    let text = match binding {
        JsBinding::Global(name) => format!("window.{name} = {payload};\n"),
        JsBinding::Callback(name) => format!("{name}({payload});\n"),
    };
    Ok(text)
}

/// Write the JS artifact to `path`, replacing any existing file.
pub fn write_js(document: &CogDocument, path: &Path, binding: &JsBinding) -> Result<PathBuf> {
    let text = render_js(document, binding)?;
    write_atomic(path, text.as_bytes())?;
    info!(
        path = %path.display(),
        rows = document.row_count(),
        binding = %binding,
        "wrote JS metadata"
    );
    Ok(path.to_path_buf())
}

/// Extract the embedded document from JS produced by [`render_js`].
pub fn parse_js_payload(text: &str) -> Result<serde_json::Value> {
    let start = text.find('{');
    let end = text.rfind('}');
    let (Some(start), Some(end)) = (start, end) else {
        return Err(TrellisError::InvalidArtifact {
            reason: "no object literal in JS source".to_string(),
        });
    };
    if end < start {
        return Err(TrellisError::InvalidArtifact {
            reason: "unbalanced object literal in JS source".to_string(),
        });
    }
    Ok(serde_json::from_str(&text[start..=end])?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_names_are_validated() {
        assert!(JsBinding::default().validate().is_ok());
        assert!(JsBinding::Callback("$load_1".to_string()).validate().is_ok());
        for bad in ["", "1abc", "a-b", "a.b", "a b"] {
            assert!(
                JsBinding::Global(bad.to_string()).validate().is_err(),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn script_escaping_keeps_json_valid() {
        let raw = "{\"a\":\"x\u{2028}y</script>\"}";
        let escaped = escape_for_script(raw);
        assert!(!escaped.contains('\u{2028}'));
        assert!(!escaped.contains("</"));
        let original: serde_json::Value = serde_json::from_str(raw).unwrap();
        let reparsed: serde_json::Value = serde_json::from_str(&escaped).unwrap();
        assert_eq!(original, reparsed);
    }

    #[test]
    fn payload_requires_object() {
        assert!(matches!(
            parse_js_payload("window.x = 1;"),
            Err(TrellisError::InvalidArtifact { .. })
        ));
    }
}
