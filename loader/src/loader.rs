//! Reading schema documents from text and files.

use std::path::Path;

use elegant_cli_core::{Engine, TypeRegistry};
use tracing::debug;

use crate::document::SchemaDocument;
use crate::error::{LoaderError, Result};

/// Serialization format of a schema document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Json,
    Yaml,
}

impl SchemaFormat {
    /// Picks the format from the file extension (`.json`, `.yaml`, `.yml`).
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Ok(Self::Yaml)
            }
            _ => Err(LoaderError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Parses a schema document from `text`.
///
/// # Examples
///
/// ```
/// use elegant_cli_loader::{SchemaFormat, parse_schema};
///
/// let doc = parse_schema(r#"{"args": {"-o": {"default": "out.md"}}}"#, SchemaFormat::Json).unwrap();
/// assert_eq!(doc.args[0].0, "-o");
/// ```
///
/// # Errors
///
/// Returns [`LoaderError::InvalidDocument`] for blank input, or a JSON/YAML
/// error if the text does not parse into a document.
pub fn parse_schema(text: &str, format: SchemaFormat) -> Result<SchemaDocument> {
    if text.trim().is_empty() {
        return Err(LoaderError::InvalidDocument("document is empty".to_string()));
    }
    let doc = match format {
        SchemaFormat::Json => serde_json::from_str(text)?,
        SchemaFormat::Yaml => serde_yaml::from_str(text)?,
    };
    Ok(doc)
}

/// Reads and parses the schema document at `path`.
///
/// # Errors
///
/// Returns [`LoaderError::Io`] if the file cannot be read, plus anything
/// [`SchemaFormat::from_path`] and [`parse_schema`] return.
pub fn load_schema(path: impl AsRef<Path>) -> Result<SchemaDocument> {
    let path = path.as_ref();
    let format = SchemaFormat::from_path(path)?;
    let text = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), ?format, "Loading schema document");
    parse_schema(&text, format)
}

/// Loads the document at `path` and builds a validated engine from it.
///
/// The root command is named after the file stem unless `program` is given.
///
/// # Errors
///
/// Returns [`LoaderError::Configuration`] when the tree fails validation,
/// plus anything [`load_schema`] returns.
pub fn load_engine(
    path: impl AsRef<Path>,
    program: Option<&str>,
    registry: TypeRegistry,
) -> Result<Engine> {
    let path = path.as_ref();
    let doc = load_schema(path)?;
    let name = match program {
        Some(name) => name.to_string(),
        None => path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("cli")
            .to_string(),
    };
    Ok(Engine::with_registry(doc.into_node(&name), registry)?)
}
