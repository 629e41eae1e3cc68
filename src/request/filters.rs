//! Request filters
//!
//! Filter values are either literal strings, compared verbatim by the
//! compiler, or symbolic relative dates that are turned into absolute
//! bounds when the request is compiled.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use super::types::FilterKey;

/// A date expressed relative to "today"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelativeDate {
    Today,
    StartOfMonth,
    StartOfPreviousMonth,
    EndOfPreviousMonth,
    StartOfQuarter,
    StartOfPreviousQuarter,
    EndOfPreviousQuarter,
    StartOfYear,
    StartOfPreviousYear,
    EndOfPreviousYear,
}

/// Value of a single filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Symbolic date resolved at compile time
    Relative(RelativeDate),
    /// Free text, passed through unchanged
    Literal(String),
}

impl FilterValue {
    pub fn literal(value: impl Into<String>) -> Self {
        FilterValue::Literal(value.into())
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            FilterValue::Literal(s) => Some(s),
            FilterValue::Relative(_) => None,
        }
    }
}

impl From<RelativeDate> for FilterValue {
    fn from(date: RelativeDate) -> Self {
        FilterValue::Relative(date)
    }
}

/// Insertion-ordered filter map
///
/// Inserting a key that is already present replaces its value without
/// moving it, so the order reflects when a concern was first filtered on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    entries: Vec<(FilterKey, FilterValue)>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: FilterKey, value: impl Into<FilterValue>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: FilterKey) -> Option<&FilterValue> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: FilterKey) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FilterKey, &FilterValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = FilterKey> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Literal(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Literal(value.to_string())
    }
}

impl Serialize for Filters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Filters {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct FiltersVisitor;

        impl<'de> serde::de::Visitor<'de> for FiltersVisitor {
            type Value = Filters;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of filter keys to values")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Filters, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut filters = Filters::new();
                while let Some((key, value)) = access.next_entry::<FilterKey, FilterValue>()? {
                    filters.insert(key, value);
                }
                Ok(filters)
            }
        }

        deserializer.deserialize_map(FiltersVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut filters = Filters::new();
        filters.insert(FilterKey::DateFrom, RelativeDate::StartOfMonth);
        filters.insert(FilterKey::Industry, "Technology");
        filters.insert(FilterKey::DateFrom, "2024-01-01");

        let keys: Vec<FilterKey> = filters.keys().collect();
        assert_eq!(keys, vec![FilterKey::DateFrom, FilterKey::Industry]);
        assert_eq!(filters.get(FilterKey::DateFrom), Some(&FilterValue::literal("2024-01-01")));
        assert_eq!(filters.len(), 2);
    }

    #[test]
    fn test_serialize_preserves_order() {
        let mut filters = Filters::new();
        filters.insert(FilterKey::Stage, "Proposal");
        filters.insert(FilterKey::DateTo, RelativeDate::Today);
        let json = serde_json::to_string(&filters).unwrap();
        assert_eq!(json, r#"{"stage":"Proposal","date_to":"today"}"#);
    }

    #[test]
    fn test_deserialize_relative_and_literal() {
        let filters: Filters =
            serde_yaml::from_str("date_from: start_of_year\nregion: North America\n").unwrap();
        assert_eq!(
            filters.get(FilterKey::DateFrom),
            Some(&FilterValue::Relative(RelativeDate::StartOfYear))
        );
        assert_eq!(
            filters.get(FilterKey::Region).and_then(FilterValue::as_literal),
            Some("North America")
        );
    }
}
