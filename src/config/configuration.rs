//! Combined configuration
//!
//! An ordered stack of property layers, highest priority first, with a
//! programmatic override layer on top. A key resolves to the value of the
//! first layer holding it; an explicit `null` there masks every lower layer.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::io::{self, Write};
use std::str::FromStr;

use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};

use crate::common::{AppConfigError, Result};
use crate::config::extended::ExtendedProperties;
use crate::config::value::PropertyValue;

/// Name reported by `source_of` for programmatic overrides
pub const OVERRIDE_LAYER: &str = "override";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Layer {
    name: String,
    properties: ExtendedProperties,
}

/// Layered configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    overrides: ExtendedProperties,
    layers: Vec<Layer>,
}

impl Configuration {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer below every existing layer
    pub fn add_layer(&mut self, name: impl Into<String>, properties: ExtendedProperties) {
        let name = name.into();
        debug!("Adding configuration layer {} ({} entries)", name, properties.len());
        self.layers.push(Layer { name, properties });
    }

    /// Layer names, highest priority first
    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(|layer| layer.name.as_str()).collect()
    }

    /// Raw lookup including explicit nulls, with the name of the layer
    fn lookup(&self, key: &str) -> Option<(&PropertyValue, &str)> {
        if let Some(value) = self.overrides.get(key) {
            return Some((value, OVERRIDE_LAYER));
        }
        self.layers
            .iter()
            .find_map(|layer| layer.properties.get(key).map(|value| (value, layer.name.as_str())))
    }

    /// Value of a key; `None` when missing or masked by a null
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.lookup(key).map(|(value, _)| value).filter(|value| !value.is_null())
    }

    /// String value
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(PropertyValue::as_string)
    }

    /// String value or a default
    pub fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_string(key).unwrap_or_else(|| default.to_string())
    }

    /// Boolean value; `None` when missing or not a boolean
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(PropertyValue::to_bool)
    }

    /// Boolean value or a default
    pub fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.get_bool(key).unwrap_or(default)
    }

    /// List value; a scalar is a one-item list
    pub fn get_list(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).and_then(PropertyValue::as_list)
    }

    /// Parse a value with `FromStr`
    pub fn get_parsed<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.get_string(key) {
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|e| AppConfigError::InvalidValue(key.to_string(), format!("{}: {}", raw, e))),
            None => Ok(None),
        }
    }

    /// Parse a value with `FromStr`, or return a default when missing
    pub fn get_parsed_or<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        Ok(self.get_parsed(key)?.unwrap_or(default))
    }

    /// Whether the key resolves to a value
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Whether no key resolves to a value
    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }

    /// Every key that resolves to a value, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        names.extend(self.overrides.names());
        for layer in &self.layers {
            names.extend(layer.properties.names());
        }
        names.into_iter().filter(|key| self.contains_key(key)).collect()
    }

    /// Keys equal to `prefix` or starting with `prefix.`
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let dotted = format!("{}.", prefix);
        self.keys()
            .into_iter()
            .filter(|key| key == prefix || key.starts_with(&dotted))
            .collect()
    }

    /// Configuration of the keys under `prefix.`, with the prefix removed
    pub fn subset(&self, prefix: &str) -> Configuration {
        let dotted = format!("{}.", prefix);
        let mut properties = ExtendedProperties::new();
        for key in self.keys() {
            if let Some(rest) = key.strip_prefix(&dotted) {
                if let Some(value) = self.get(&key) {
                    properties.set(rest, value.clone());
                }
            }
        }

        let mut subset = Configuration::new();
        subset.add_layer(prefix, properties);
        subset
    }

    /// Set a value above every layer
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.overrides.set(key, value);
    }

    /// Add a value; an existing value turns into a list
    pub fn add_property(&mut self, key: &str, value: impl Into<PropertyValue>) {
        let value = value.into();
        let merged = match (self.get(key).and_then(PropertyValue::as_list), value.as_list()) {
            (Some(mut existing), Some(added)) => {
                existing.extend(added);
                PropertyValue::List(existing)
            }
            _ => value,
        };
        self.overrides.set(key, merged);
    }

    /// Remove a key, masking every layer
    pub fn clear_property(&mut self, key: &str) {
        self.overrides.set(key, PropertyValue::Null);
    }

    /// Remove every key and layer
    pub fn clear(&mut self) {
        self.overrides = ExtendedProperties::new();
        self.layers.clear();
    }

    /// Name of the layer a key resolves from
    pub fn source_of(&self, key: &str) -> Option<&str> {
        self.lookup(key)
            .filter(|(value, _)| !value.is_null())
            .map(|(_, layer)| layer)
    }

    /// Resolved values
    pub fn to_map(&self) -> BTreeMap<String, PropertyValue> {
        self.keys()
            .into_iter()
            .filter_map(|key| self.get(&key).cloned().map(|value| (key, value)))
            .collect()
    }

    /// Resolved values as `ExtendedProperties`
    pub fn to_properties(&self) -> ExtendedProperties {
        let mut properties = ExtendedProperties::new();
        for (key, value) in self.to_map() {
            properties.set(key, value);
        }
        properties
    }

    /// Write resolved `key=value` lines
    pub fn dump<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.to_properties().dump(out)
    }

    /// Deserialize the resolved values into a typed struct.
    ///
    /// Dotted keys become nested tables, so `database.port` fills the `port`
    /// field of a `database` struct. Key case is kept as written. Strings are
    /// converted to numbers and booleans on demand. A key that is both a
    /// value and the prefix of other keys is an error.
    pub fn try_deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        let mut root = BTreeMap::new();
        for (key, value) in self.to_map() {
            let value = match value {
                PropertyValue::Str(s) => config::Value::new(None, s),
                PropertyValue::Bool(b) => config::Value::new(None, b),
                PropertyValue::List(items) => config::Value::new(None, items),
                PropertyValue::Null => continue,
            };
            insert_path(&mut root, &key, value)?;
        }
        Ok(T::deserialize(Node::Table(root).into_value())?)
    }
}

/// Tree of dotted keys handed to the `config` deserializer
enum Node {
    Leaf(config::Value),
    Table(BTreeMap<String, Node>),
}

impl Node {
    fn into_value(self) -> config::Value {
        match self {
            Node::Leaf(value) => value,
            Node::Table(children) => {
                let table: config::Map<String, config::Value> = children
                    .into_iter()
                    .map(|(name, node)| (name, node.into_value()))
                    .collect();
                config::Value::new(None, config::ValueKind::Table(table))
            }
        }
    }
}

fn insert_path(root: &mut BTreeMap<String, Node>, key: &str, value: config::Value) -> Result<()> {
    let conflict = || AppConfigError::Config(format!("Key {} is both a value and a table", key));
    let (parents, leaf) = match key.rsplit_once('.') {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, key),
    };

    let mut table = root;
    for segment in parents.into_iter().flat_map(|parents| parents.split('.')) {
        let node = table
            .entry(segment.to_string())
            .or_insert_with(|| Node::Table(BTreeMap::new()));
        table = match node {
            Node::Table(children) => children,
            Node::Leaf(_) => return Err(conflict()),
        };
    }

    match table.entry(leaf.to_string()) {
        Entry::Vacant(entry) => {
            entry.insert(Node::Leaf(value));
            Ok(())
        }
        Entry::Occupied(_) => Err(conflict()),
    }
}

impl Serialize for Configuration {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_map().serialize(serializer)
    }
}
