//! Ordered string key/value pairs and their flattened text form.
//!
//! Flattened form: `key1=value1;key2=value2` with no trailing delimiter.
//! Neither delimiter is escaped, so keys and values must not contain
//! `=` or `;`.

/// Separator between a key and its value.
pub const DELIMITER_KEY_VALUE: char = '=';

/// Separator between pairs.
pub const DELIMITER_PAIR: char = ';';

/// An insertion-ordered mapping from string keys to string values.
///
/// Inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValuePairs {
    pairs: Vec<(String, String)>,
}

impl KeyValuePairs {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair, replacing the value of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get the value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Check whether a key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.pairs.iter().position(|(k, _)| k == key)?;
        Some(self.pairs.remove(index).1)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    /// Pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Render as `k1=v1;k2=v2`.
    pub fn flatten(&self) -> String {
        let mut out = String::new();
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                out.push(DELIMITER_PAIR);
            }
            out.push_str(key);
            out.push(DELIMITER_KEY_VALUE);
            out.push_str(value);
        }
        out
    }

    /// Parse flattened pairs into this mapping.
    ///
    /// Empty segments are skipped. A segment that does not split into exactly
    /// two non-empty tokens around `=` is dropped. Returns the number of pairs
    /// added.
    pub fn extend_from_flattened(&mut self, s: &str) -> usize {
        let mut added = 0;
        for segment in s.split(DELIMITER_PAIR).filter(|seg| !seg.is_empty()) {
            let mut tokens = segment
                .split(DELIMITER_KEY_VALUE)
                .filter(|tok| !tok.is_empty());
            if let (Some(key), Some(value), None) = (tokens.next(), tokens.next(), tokens.next()) {
                self.insert(key, value);
                added += 1;
            }
        }
        added
    }

    /// Parse a flattened string into a new mapping.
    pub fn parse(s: &str) -> Self {
        let mut kvp = Self::new();
        kvp.extend_from_flattened(s);
        kvp
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KeyValuePairs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut kvp = Self::new();
        for (k, v) in iter {
            kvp.insert(k, v);
        }
        kvp
    }
}
