//! Helper implementations exposed to templates as Tera filters and functions.

use std::collections::HashMap;

use serde_json::Map;
use tera::{Result, Value};

use crate::context::convert::value_kind;
use crate::render::markdown::{markdown_to_html, MarkdownOptions};

/// `markdownToHtml`, usable as `{{ body | markdownToHtml }}` or
/// `{{ markdownToHtml(source=body) }}`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkdownToHtml {
    pub options: MarkdownOptions,
}

impl MarkdownToHtml {
    fn convert(&self, value: Option<&Value>) -> Result<Value> {
        match value {
            None | Some(Value::Null) => Ok(Value::Null),
            Some(Value::String(source)) => Ok(markdown_to_html(Some(source), self.options)
                .map_or(Value::Null, Value::String)),
            Some(other) => Err(tera::Error::msg(format!(
                "markdownToHtml expects a string or null, got {}",
                value_kind(other)
            ))),
        }
    }
}

impl tera::Filter for MarkdownToHtml {
    fn filter(&self, value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
        self.convert(Some(value))
    }

    fn is_safe(&self) -> bool {
        true
    }
}

impl tera::Function for MarkdownToHtml {
    fn call(&self, args: &HashMap<String, Value>) -> Result<Value> {
        self.convert(args.get("source"))
    }

    fn is_safe(&self) -> bool {
        true
    }
}

/// `each`: decorate every element of an array (or entry of an object) with
/// its position, so loops can test `item.first`, `item.last`, `item.index`.
pub(crate) fn each(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    match value {
        Value::Null => Ok(Value::Array(Vec::new())),
        Value::Array(items) => Ok(Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(index, item)| positioned(index, items.len(), None, item))
                .collect(),
        )),
        Value::Object(entries) => Ok(Value::Array(
            entries
                .iter()
                .enumerate()
                .map(|(index, (key, item))| {
                    positioned(index, entries.len(), Some(key.as_str()), item)
                })
                .collect(),
        )),
        other => Err(tera::Error::msg(format!(
            "each expects an array or a mapping, got {}",
            value_kind(other)
        ))),
    }
}

fn positioned(index: usize, len: usize, key: Option<&str>, value: &Value) -> Value {
    let mut item = Map::new();
    if let Some(key) = key {
        item.insert("key".into(), Value::String(key.to_string()));
    }
    item.insert("value".into(), value.clone());
    item.insert("index".into(), index.into());
    item.insert("indexPlusOne".into(), (index + 1).into());
    item.insert("indexIsEven".into(), Value::Bool(index % 2 == 0));
    item.insert("first".into(), Value::Bool(index == 0));
    item.insert("last".into(), Value::Bool(index + 1 == len));
    Value::Object(item)
}

/// `zip(lists=[a, b, ...])`
pub(crate) fn zip_function(args: &HashMap<String, Value>) -> Result<Value> {
    match args.get("lists") {
        Some(Value::Array(lists)) => zip_lists(lists),
        Some(other) => Err(tera::Error::msg(format!(
            "zip expects `lists` to be an array of arrays, got {}",
            value_kind(other)
        ))),
        None => Err(tera::Error::msg(
            "zip requires a `lists` argument, e.g. zip(lists=[a, b])",
        )),
    }
}

/// `a | zip(with=b)`
pub(crate) fn zip_filter(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let other = args
        .get("with")
        .ok_or_else(|| tera::Error::msg("zip filter requires a `with` argument"))?;
    zip_lists(&[value.clone(), other.clone()])
}

/// Pair elements positionally, stopping at the shortest list. Null counts as empty.
fn zip_lists(lists: &[Value]) -> Result<Value> {
    let mut columns: Vec<&[Value]> = Vec::with_capacity(lists.len());
    for list in lists {
        match list {
            Value::Null => columns.push(&[][..]),
            Value::Array(items) => columns.push(items.as_slice()),
            other => {
                return Err(tera::Error::msg(format!(
                    "zip expects arrays, got {}",
                    value_kind(other)
                )))
            }
        }
    }

    let len = columns.iter().map(|c| c.len()).min().unwrap_or(0);
    let rows = (0..len)
        .map(|i| Value::Array(columns.iter().map(|c| c[i].clone()).collect()))
        .collect();
    Ok(Value::Array(rows))
}
