//! Extended properties
//!
//! A name → `PropertyValue` map with the typed getters used throughout the
//! bootstrap. Keys are kept sorted so dumps and iteration are stable.

use std::collections::btree_map::{self, BTreeMap};
use std::io::{self, Write};
use std::path::Path;

use log::trace;
use serde::Serialize;

use crate::common::Result;
use crate::config::properties;
use crate::config::value::PropertyValue;

/// Property map with type inference on raw values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExtendedProperties {
    entries: BTreeMap<String, PropertyValue>,
}

impl ExtendedProperties {
    /// Create an empty property list
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw string pairs; later duplicates win
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut props = Self::new();
        for (name, raw) in pairs {
            props.set_raw(name, raw.as_ref());
        }
        props
    }

    /// Parse properties text
    pub fn load_str(content: &str, origin: &str) -> Result<Self> {
        Ok(Self::from_pairs(properties::parse(content, origin)?))
    }

    /// Read and parse a properties file
    pub fn load_file(path: &Path) -> Result<Self> {
        Ok(Self::from_pairs(properties::load_file(path)?))
    }

    /// Raw access to a value, including `Null`
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.entries.get(name)
    }

    /// Whether the name is present (even when null)
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// String value; `None` when missing or null
    pub fn get_string(&self, name: &str) -> Option<String> {
        self.get(name).and_then(PropertyValue::as_string)
    }

    /// Like `get_string`, but empty strings count as missing
    pub fn get_non_empty(&self, name: &str) -> Option<String> {
        self.get_string(name).filter(|s| !s.is_empty())
    }

    /// Boolean value; missing or null is `false`
    pub fn get_bool(&self, name: &str) -> bool {
        self.get(name).map_or(false, PropertyValue::as_bool)
    }

    /// List value; missing or null is `None`
    pub fn get_list(&self, name: &str) -> Option<Vec<String>> {
        self.get(name).and_then(PropertyValue::as_list)
    }

    /// Missing or explicitly null
    pub fn is_null(&self, name: &str) -> bool {
        self.get(name).map_or(true, PropertyValue::is_null)
    }

    /// Set a typed value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Set a raw string value, inferring its type
    pub fn set_raw(&mut self, name: impl Into<String>, raw: &str) {
        let name = name.into();
        let value = PropertyValue::infer(raw);
        if value.is_null() {
            trace!("Property without a value: {}", name);
        }
        self.entries.insert(name, value);
    }

    /// Remove a value
    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        self.entries.remove(name)
    }

    /// Property names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Iterate over entries in sorted order
    pub fn iter(&self) -> btree_map::Iter<'_, String, PropertyValue> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write `name=value` lines
    pub fn dump<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (name, value) in &self.entries {
            writeln!(out, "{}={}", name, value)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ExtendedProperties {
    type Item = (&'a String, &'a PropertyValue);
    type IntoIter = btree_map::Iter<'a, String, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
appconfig.permittedRunTimeEnvironments=development,production,test
appconfig.database.defaultConfigurationEnabled=TRUE
appconfig.externalConfigurationDirectory=null
application.name=demo
";

    #[test]
    fn test_load_str_converts_values() {
        let props = ExtendedProperties::load_str(SAMPLE, "sample").unwrap();

        assert_eq!(props.len(), 4);
        assert_eq!(
            props.get_list("appconfig.permittedRunTimeEnvironments"),
            Some(vec!["development".to_string(), "production".to_string(), "test".to_string()])
        );
        assert!(props.get_bool("appconfig.database.defaultConfigurationEnabled"));
        assert!(props.is_null("appconfig.externalConfigurationDirectory"));
        assert!(props.contains("appconfig.externalConfigurationDirectory"));
        assert_eq!(props.get_string("appconfig.externalConfigurationDirectory"), None);
        assert_eq!(props.get_string("application.name").as_deref(), Some("demo"));
    }

    #[test]
    fn test_missing_values() {
        let props = ExtendedProperties::new();
        assert!(!props.get_bool("missing"));
        assert!(props.is_null("missing"));
        assert_eq!(props.get_list("missing"), None);
        assert_eq!(props.get_string("missing"), None);
    }

    #[test]
    fn test_from_pairs_later_wins() {
        let props = ExtendedProperties::from_pairs(vec![("a", "1"), ("a", "2")]);
        assert_eq!(props.get_string("a").as_deref(), Some("2"));
    }

    #[test]
    fn test_get_non_empty() {
        let mut props = ExtendedProperties::new();
        props.set_raw("empty", "");
        props.set_raw("full", "x");
        assert_eq!(props.get_non_empty("empty"), None);
        assert_eq!(props.get_non_empty("full").as_deref(), Some("x"));
    }

    #[test]
    fn test_dump_is_sorted() {
        let mut props = ExtendedProperties::new();
        props.set("b", true);
        props.set_raw("a", "x,y");
        props.set("c", PropertyValue::Null);

        let mut out = Vec::new();
        props.dump(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a=x,y\nb=true\nc=null\n");
    }

    #[test]
    fn test_serialize_as_map() {
        let mut props = ExtendedProperties::new();
        props.set_raw("list", "a,b");
        props.set_raw("flag", "false");
        let json = serde_json::to_string(&props).unwrap();
        assert_eq!(json, r#"{"flag":false,"list":["a","b"]}"#);
    }
}
