use std::fmt;
use std::io::Cursor;
use std::path::Path;

use serde_json::Map;
use tera::Value;

use crate::context::convert::{plist_to_value, value_kind, yaml_to_value};
use crate::error::{LoadError, ParseFailure};

/// A structured data format a context file can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Plist,
}

impl Format {
    /// Look up the format for a file extension. Matching is case-sensitive.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            "plist" => Some(Format::Plist),
            _ => None,
        }
    }

    /// Parse raw file content into a top-level mapping.
    ///
    /// Zero-length content is an empty mapping for every format.
    pub fn parse(self, content: &[u8]) -> Result<Map<String, Value>, ParseFailure> {
        if content.is_empty() {
            return Ok(Map::new());
        }

        let root = match self {
            Format::Json => serde_json::from_str::<Value>(std::str::from_utf8(content)?)?,
            Format::Yaml => {
                let mut doc: serde_yaml::Value =
                    serde_yaml::from_str(std::str::from_utf8(content)?)?;
                doc.apply_merge()?;
                yaml_to_value(doc)
            }
            Format::Plist => plist_to_value(plist::Value::from_reader(Cursor::new(content))?),
        };

        match root {
            Value::Object(map) => Ok(map),
            other => Err(ParseFailure::RootNotMapping {
                found: value_kind(&other),
            }),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => write!(f, "JSON"),
            Format::Yaml => write!(f, "YAML"),
            Format::Plist => write!(f, "property list"),
        }
    }
}

/// Read a single context file and parse it according to its extension.
pub fn load_file(path: &Path) -> Result<Map<String, Value>, LoadError> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();

    let format =
        Format::from_extension(&extension).ok_or_else(|| LoadError::UnsupportedExtension {
            path: path.to_path_buf(),
            extension: extension.clone(),
        })?;

    let content = std::fs::read(path).map_err(|e| LoadError::Io {
        context: format!("reading {}", path.display()),
        source: e,
    })?;

    format.parse(&content).map_err(|e| LoadError::ParseError {
        path: path.to_path_buf(),
        format,
        source: e,
    })
}
