use crate::schema::NAME_SEPARATOR;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Settings keyed by their full dotted name.
pub type Settings = IndexMap<String, Value>;

/// Flattens nested JSON objects into dotted setting names.
///
/// `{"git": {"name": "x"}}` becomes `git.name = "x"`. Arrays and scalars are
/// leaves; empty objects contribute nothing.
pub fn flatten(map: &Map<String, Value>) -> Settings {
    let mut out = Settings::new();
    flatten_into(None, map, &mut out);
    out
}

fn flatten_into(prefix: Option<&str>, map: &Map<String, Value>, out: &mut Settings) {
    for (key, value) in map {
        let name = match prefix {
            Some(prefix) => format!("{prefix}{NAME_SEPARATOR}{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(inner) => flatten_into(Some(&name), inner, out),
            leaf => {
                out.insert(name, leaf.clone());
            }
        }
    }
}

/// The inverse of [`flatten`]. When a name is both a leaf and a parent, the
/// later entry wins.
pub fn unflatten(settings: &Settings) -> Map<String, Value> {
    let mut root = Map::new();
    for (name, value) in settings {
        insert_nested(&mut root, name, value.clone());
    }
    root
}

fn insert_nested(map: &mut Map<String, Value>, name: &str, value: Value) {
    match name.split_once(NAME_SEPARATOR) {
        None => {
            map.insert(name.to_string(), value);
        }
        Some((head, rest)) => {
            let child = map
                .entry(head)
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(child) = child {
                insert_nested(child, rest, value);
            }
        }
    }
}

/// Names present in both layers, in the order of `first`.
pub fn shared_keys(first: &Settings, second: &Settings) -> Vec<String> {
    first
        .keys()
        .filter(|name| second.contains_key(name.as_str()))
        .cloned()
        .collect()
}

/// Adds `value` to the list stored under `name`, turning a bare value into a
/// one-element list first.
pub(crate) fn append_value(settings: &mut Settings, name: &str, value: Value) {
    let slot = settings.entry(name.to_string()).or_insert(Value::Null);
    let mut items = match slot.take() {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        single => vec![single],
    };
    items.push(value);
    *slot = Value::Array(items);
}
