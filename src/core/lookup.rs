//! # Path Lookup
//!
//! Safe nested lookups over tree-shaped config data (`toml` tables, `serde_json` objects).
//! [`dig`] walks a key path and hands back the caller's default whenever the path runs out,
//! passes through a non-table value, or lands on a value of the wrong shape. Rules can then
//! probe deeply nested, optional configuration without checking each level by hand.

use serde_json::Value as JsonValue;
use toml::Value as TomlValue;

/// A string-keyed mapping whose values may themselves be mappings.
pub trait Tree {
    /// The value type stored under each key.
    type Node;

    /// Returns the value stored under `key`, if any.
    fn get_node(&self, key: &str) -> Option<&Self::Node>;

    /// Views a value as a nested mapping, if it is one.
    fn as_tree(node: &Self::Node) -> Option<&Self>;
}

/// A Rust type that a tree value can be read back as.
///
/// `from_node` returns `None` when the value has a different shape, which makes [`dig`]
/// fall back to its default.
pub trait Shape<N>: Sized {
    /// Converts `node` into `Self` if the shapes line up.
    fn from_node(node: &N) -> Option<Self>;
}

/// Descends `tree` one `path` segment at a time and returns the final value as a `T`.
///
/// Returns `default` when a segment is missing, when an intermediate value is not a
/// mapping, when the final value does not have `T`'s shape, or when `path` is empty.
pub fn dig<M, T>(tree: &M, path: &[&str], default: T) -> T
where
    M: Tree,
    T: Shape<M::Node>,
{
    let Some((last, parents)) = path.split_last() else {
        return default;
    };

    let mut current = tree;
    for segment in parents {
        match current.get_node(segment).and_then(M::as_tree) {
            Some(next) => current = next,
            None => return default,
        }
    }

    current
        .get_node(last)
        .and_then(T::from_node)
        .unwrap_or(default)
}

/// JS-style truthiness for a JSON value: `null`, `false`, `0`, `""`, `[]` and `{}` are falsy.
pub fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(a) => !a.is_empty(),
        JsonValue::Object(o) => !o.is_empty(),
    }
}

// --- toml ---

impl Tree for toml::Table {
    type Node = TomlValue;

    fn get_node(&self, key: &str) -> Option<&TomlValue> {
        self.get(key)
    }

    fn as_tree(node: &TomlValue) -> Option<&Self> {
        node.as_table()
    }
}

impl Shape<TomlValue> for toml::Table {
    fn from_node(node: &TomlValue) -> Option<Self> {
        node.as_table().cloned()
    }
}

impl Shape<TomlValue> for Vec<String> {
    fn from_node(node: &TomlValue) -> Option<Self> {
        node.as_array().map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
    }
}

impl Shape<TomlValue> for String {
    fn from_node(node: &TomlValue) -> Option<Self> {
        node.as_str().map(str::to_string)
    }
}

impl Shape<TomlValue> for i64 {
    fn from_node(node: &TomlValue) -> Option<Self> {
        node.as_integer()
    }
}

impl Shape<TomlValue> for bool {
    fn from_node(node: &TomlValue) -> Option<Self> {
        node.as_bool()
    }
}

// --- serde_json ---

impl Tree for serde_json::Map<String, JsonValue> {
    type Node = JsonValue;

    fn get_node(&self, key: &str) -> Option<&JsonValue> {
        self.get(key)
    }

    fn as_tree(node: &JsonValue) -> Option<&Self> {
        node.as_object()
    }
}

impl Shape<JsonValue> for serde_json::Map<String, JsonValue> {
    fn from_node(node: &JsonValue) -> Option<Self> {
        node.as_object().cloned()
    }
}

impl Shape<JsonValue> for Vec<String> {
    fn from_node(node: &JsonValue) -> Option<Self> {
        node.as_array().map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
    }
}

impl Shape<JsonValue> for String {
    fn from_node(node: &JsonValue) -> Option<Self> {
        node.as_str().map(str::to_string)
    }
}

impl Shape<JsonValue> for bool {
    fn from_node(node: &JsonValue) -> Option<Self> {
        node.as_bool()
    }
}

/// Keeps the raw value regardless of its shape (only a missing path yields the default).
impl Shape<JsonValue> for JsonValue {
    fn from_node(node: &JsonValue) -> Option<Self> {
        Some(node.clone())
    }
}
