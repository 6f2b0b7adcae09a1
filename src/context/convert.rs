//! Conversion of each format's native value model into context values.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{Map, Number};
use tera::Value;

/// Convert a parsed YAML document into a context value.
///
/// Non-string mapping keys are stringified and tags are dropped.
pub fn yaml_to_value(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => yaml_number(&n),
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => {
            Value::Array(seq.into_iter().map(yaml_to_value).collect())
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                map.insert(yaml_key(key), yaml_to_value(value));
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_value(tagged.value),
    }
}

fn yaml_number(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        Value::Number(u.into())
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map_or(Value::Null, Value::Number)
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Tagged(tagged) => yaml_key(tagged.value),
        // Collection keys use their YAML text.
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Convert a parsed property list into a context value.
///
/// Dates become their XML plist representation, data becomes base64 text.
pub fn plist_to_value(value: plist::Value) -> Value {
    match value {
        plist::Value::Dictionary(dict) => {
            let mut map = Map::new();
            for (key, value) in dict {
                map.insert(key, plist_to_value(value));
            }
            Value::Object(map)
        }
        plist::Value::Array(items) => Value::Array(items.into_iter().map(plist_to_value).collect()),
        plist::Value::Boolean(b) => Value::Bool(b),
        plist::Value::Integer(i) => {
            if let Some(signed) = i.as_signed() {
                Value::Number(signed.into())
            } else if let Some(unsigned) = i.as_unsigned() {
                Value::Number(unsigned.into())
            } else {
                Value::Null
            }
        }
        plist::Value::Real(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        plist::Value::String(s) => Value::String(s),
        plist::Value::Date(date) => Value::String(date.to_xml_format()),
        plist::Value::Data(bytes) => Value::String(STANDARD.encode(bytes)),
        plist::Value::Uid(uid) => Value::Number(uid.get().into()),
        _ => Value::Null,
    }
}

/// A short description of a value's type, used in error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn yaml_nested_structures_convert() {
        let doc: serde_yaml::Value =
            serde_yaml::from_str("site:\n  title: Docs\n  pages: [1, 2.5, true, ~]\n").unwrap();
        assert_eq!(
            yaml_to_value(doc),
            json!({"site": {"title": "Docs", "pages": [1, 2.5, true, null]}})
        );
    }

    #[test]
    fn yaml_non_string_keys_are_stringified() {
        let doc: serde_yaml::Value = serde_yaml::from_str("1: one\ntrue: yes\n").unwrap();
        let value = yaml_to_value(doc);
        assert_eq!(value.get("1"), Some(&json!("one")));
        assert_eq!(value.get("true"), Some(&json!("yes")));
    }

    #[test]
    fn yaml_tags_are_dropped() {
        let doc: serde_yaml::Value = serde_yaml::from_str("answer: !custom 42\n").unwrap();
        assert_eq!(yaml_to_value(doc), json!({"answer": 42}));
    }

    #[test]
    fn yaml_non_finite_float_becomes_null() {
        let doc: serde_yaml::Value = serde_yaml::from_str("x: .inf\n").unwrap();
        assert_eq!(yaml_to_value(doc), json!({"x": null}));
    }

    #[test]
    fn plist_scalars_convert() {
        let mut dict = plist::Dictionary::new();
        dict.insert("flag".into(), plist::Value::Boolean(true));
        dict.insert("count".into(), plist::Value::Integer(7i64.into()));
        dict.insert("ratio".into(), plist::Value::Real(0.5));
        dict.insert("blob".into(), plist::Value::Data(b"hi".to_vec()));
        dict.insert(
            "list".into(),
            plist::Value::Array(vec![plist::Value::String("a".into())]),
        );

        assert_eq!(
            plist_to_value(plist::Value::Dictionary(dict)),
            json!({
                "flag": true,
                "count": 7,
                "ratio": 0.5,
                "blob": "aGk=",
                "list": ["a"],
            })
        );
    }

    #[test]
    fn value_kind_names() {
        assert_eq!(value_kind(&json!(null)), "null");
        assert_eq!(value_kind(&json!([])), "an array");
        assert_eq!(value_kind(&json!({})), "a mapping");
    }
}
