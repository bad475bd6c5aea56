//! The resolved document.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::str::FromStr;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use crate::int::Integer;


//------------ Document ------------------------------------------------------

/// A resolved record.
///
/// This is a small hierarchical data model that maps directly onto JSON and
/// similar formats. Objects keep their keys in the order of the encoding.
/// Integers are of arbitrary size.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Document {
    Object(Vec<(String, Document)>),
    Array(Vec<Document>),
    Text(String),
    Integer(Integer),
    Boolean(bool),
    Null,
}

impl Document {
    /// Creates an object with a single entry.
    pub fn single(key: impl Into<String>, value: Document) -> Self {
        Document::Object(vec![(key.into(), value)])
    }

    /// Returns the value for a key if this is an object.
    pub fn get(&self, key: &str) -> Option<&Document> {
        match *self {
            Document::Object(ref entries) => {
                entries.iter().find(|entry| entry.0 == key).map(|entry| &entry.1)
            }
            _ => None
        }
    }

    /// Returns the text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match *self {
            Document::Text(ref text) => Some(text),
            _ => None
        }
    }

    /// Converts the document into a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        match *self {
            Document::Object(ref entries) => {
                serde_json::Value::Object(
                    entries.iter().map(|(key, value)| {
                        (key.clone(), value.to_json())
                    }).collect()
                )
            }
            Document::Array(ref items) => {
                serde_json::Value::Array(
                    items.iter().map(Document::to_json).collect()
                )
            }
            Document::Text(ref text) => serde_json::Value::String(text.clone()),
            Document::Integer(ref int) => {
                match json_number(int) {
                    Some(number) => serde_json::Value::Number(number),
                    None => serde_json::Value::String(int.to_string()),
                }
            }
            Document::Boolean(value) => serde_json::Value::Bool(value),
            Document::Null => serde_json::Value::Null,
        }
    }
}


//--- Serialize

impl Serialize for Document {
    fn serialize<S: Serializer>(
        &self, serializer: S
    ) -> Result<S::Ok, S::Error> {
        match *self {
            Document::Object(ref entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Document::Array(ref items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Document::Text(ref text) => serializer.serialize_str(text),
            Document::Integer(ref int) => {
                match json_number(int) {
                    Some(number) => number.serialize(serializer),
                    None => serializer.collect_str(int),
                }
            }
            Document::Boolean(value) => serializer.serialize_bool(value),
            Document::Null => serializer.serialize_unit(),
        }
    }
}

/// Converts an integer into a JSON number keeping all digits.
fn json_number(int: &Integer) -> Option<serde_json::Number> {
    serde_json::Number::from_str(&int.to_string()).ok()
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use bytes::Bytes;
    use serde_json::json;

    #[test]
    fn serialize() {
        let doc = Document::Object(vec![
            ("b".into(), Document::Text("x".into())),
            ("a".into(), Document::Array(vec![
                Document::Integer(Integer::from(-3)),
                Document::Boolean(true),
                Document::Null,
            ])),
        ]);
        assert_eq!(
            serde_json::to_string(&doc).unwrap(),
            r#"{"b":"x","a":[-3,true,null]}"#
        );
        assert_eq!(doc.to_json(), json!({"b": "x", "a": [-3, true, null]}));
        assert_eq!(doc.get("b").and_then(Document::as_text), Some("x"));
    }

    #[test]
    fn large_integer() {
        let doc = Document::Integer(Integer::from_bytes(
            Bytes::from_static(b"\x01\x00\x00\x00\x00\x00\x00\x00\x00")
        ));
        assert_eq!(
            serde_json::to_string(&doc).unwrap(), "18446744073709551616"
        );
    }
}
