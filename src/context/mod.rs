pub mod convert;
pub mod format;
pub mod walker;

use serde_json::Map;
use tera::Value;

pub use format::{load_file, Format};
pub use walker::{load, resolve_path, LoadOptions};

/// The merged data a template is rendered against.
///
/// Merging is shallow: a top-level key present in several sources keeps the
/// value from the source merged last, nested mappings are replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    values: Map<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge every entry of `mapping` into the context, overriding existing keys.
    pub fn merge(&mut self, mapping: Map<String, Value>) {
        for (key, value) in mapping {
            self.values.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }

    /// Build a Tera context holding every top-level entry.
    pub fn to_tera(&self) -> tera::Context {
        let mut context = tera::Context::new();
        for (key, value) in &self.values {
            context.insert(key, value);
        }
        context
    }
}

impl From<Map<String, Value>> for Context {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}
