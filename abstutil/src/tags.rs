use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A map of OSM-style key/value tags. Thin wrapper around a `BTreeMap` so iteration order (and
/// anything derived from it) is deterministic.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    pub fn new(map: BTreeMap<String, String>) -> Tags {
        Tags(map)
    }

    pub fn empty() -> Tags {
        Tags(BTreeMap::new())
    }

    pub fn get(&self, k: &str) -> Option<&String> {
        self.0.get(k)
    }

    /// Like `get`, but borrows the value as a plain `&str`.
    pub fn get_str(&self, k: &str) -> Option<&str> {
        self.0.get(k).map(|v| v.as_str())
    }

    pub fn contains_key(&self, k: &str) -> bool {
        self.0.contains_key(k)
    }

    pub fn is(&self, k: &str, v: &str) -> bool {
        self.0.get(k) == Some(&v.to_string())
    }

    pub fn is_any(&self, k: &str, values: &[&str]) -> bool {
        if let Some(v) = self.0.get(k) {
            values.contains(&v.as_ref())
        } else {
            false
        }
    }

    /// True if the key is present and doesn't have this value.
    pub fn is_not(&self, k: &str, v: &str) -> bool {
        match self.0.get(k) {
            Some(x) => x != v,
            None => false,
        }
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, k: K, v: V) {
        self.0.insert(k.into(), v.into());
    }

    pub fn remove(&mut self, k: &str) -> Option<String> {
        self.0.remove(k)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn inner(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Tags(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl fmt::Debug for Tags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tags(")?;
        for (idx, (k, v)) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", k, v)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching() {
        let tags: Tags = vec![("highway", "primary"), ("oneway", "yes")]
            .into_iter()
            .collect();
        assert!(tags.is("highway", "primary"));
        assert!(tags.is_any("highway", &["secondary", "primary"]));
        assert!(!tags.is_any("lanes", &["2"]));
        assert!(tags.is_not("oneway", "no"));
        assert!(!tags.is_not("lanes", "2"));
        assert_eq!(format!("{:?}", tags), "Tags(highway=primary, oneway=yes)");
    }
}
