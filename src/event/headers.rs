//! Header map in the edge platform's `{value, multiValue}` representation.

use std::fmt;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A single entry of a `multiValue` list.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MultiValue {
    pub value: String,
}

/// One header as the platform represents it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HeaderEntry {
    /// First (or only) value of the header.
    pub value: String,

    /// All values, when the header was sent more than once.
    #[serde(
        rename = "multiValue",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub multi_value: Option<Vec<MultiValue>>,
}

impl HeaderEntry {
    /// Single-valued entry, serialized as `{"value": ...}`.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            multi_value: None,
        }
    }
}

/// Header map keeping every name exactly as received, in arrival order.
///
/// Lookups ignore case. Names that differ only in case are distinct
/// entries; lookup returns the first of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, HeaderEntry)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a header by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&HeaderEntry> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, entry)| entry)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set `name` to `entry`, replacing every case variant of `name`.
    ///
    /// The new entry takes the position of the first replaced variant and
    /// is stored under `name` as given. Other headers are not touched.
    /// Returns the first replaced entry.
    pub fn set(&mut self, name: &str, entry: HeaderEntry) -> Option<HeaderEntry> {
        let position = self
            .entries
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name));

        match position {
            Some(index) => {
                let (_, previous) =
                    std::mem::replace(&mut self.entries[index], (name.to_string(), entry));
                let mut i = 0;
                self.entries.retain(|(key, _)| {
                    let keep = i <= index || !key.eq_ignore_ascii_case(name);
                    i += 1;
                    keep
                });
                Some(previous)
            }
            None => {
                self.entries.push((name.to_string(), entry));
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate in arrival order, names as received.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }
}

impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, entry) in &self.entries {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct HeadersVisitor;

        impl<'de> Visitor<'de> for HeadersVisitor {
            type Value = Headers;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of header names to {value, multiValue} records")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Headers, A::Error> {
                let mut entries: Vec<(String, HeaderEntry)> =
                    Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, entry)) = map.next_entry::<String, HeaderEntry>()? {
                    // A repeated identical key overwrites in place, as JSON.parse does
                    match entries.iter_mut().find(|(key, _)| *key == name) {
                        Some(slot) => slot.1 = entry,
                        None => entries.push((name, entry)),
                    }
                }
                Ok(Headers { entries })
            }
        }

        deserializer.deserialize_map(HeadersVisitor)
    }
}
