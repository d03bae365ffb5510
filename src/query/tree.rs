//! Ordered query parameter tree.

use serde_json::Value;

/// A single node of the query parameter tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// A plain string value (`?q=shoes`).
    Scalar(String),
    /// A nested mapping (`?tx_solr[q]=shoes`). Sequences are maps with integer keys.
    Map(QueryMap),
}

impl QueryValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryValue::Scalar(value) => Some(value),
            QueryValue::Map(_) => None,
        }
    }

    pub fn as_map(&self) -> Option<&QueryMap> {
        match self {
            QueryValue::Map(map) => Some(map),
            QueryValue::Scalar(_) => None,
        }
    }

    /// Turns this node into an empty map unless it already is one.
    fn make_map(&mut self) -> &mut QueryMap {
        match self {
            QueryValue::Map(map) => map,
            node => {
                *node = QueryValue::Map(QueryMap::new());
                node.make_map()
            }
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            QueryValue::Scalar(value) => Value::String(value.clone()),
            QueryValue::Map(map) => map.to_json(),
        }
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Scalar(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Scalar(value.to_string())
    }
}

impl From<QueryMap> for QueryValue {
    fn from(map: QueryMap) -> Self {
        QueryValue::Map(map)
    }
}

/// Insertion-ordered mapping with an auto-index counter for appended entries.
#[derive(Debug, Clone, Default)]
pub struct QueryMap {
    entries: Vec<(String, QueryValue)>,
    next_index: usize,
}

/// Returns the integer index a key stands for, if it is a canonical decimal.
/// `usize::MAX` is a named key so the next index always fits.
pub(crate) fn index_key(key: &str) -> Option<usize> {
    let index: usize = key.parse().ok()?;
    (index != usize::MAX && index.to_string() == key).then_some(index)
}

impl QueryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut QueryValue> {
        self.entries
            .iter_mut()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Sets `key`, keeping its position if it already exists.
    /// Returns the replaced value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Option<QueryValue> {
        let key = key.into();
        let value = value.into();

        if let Some(next) = index_key(&key).and_then(|index| index.checked_add(1)) {
            self.next_index = self.next_index.max(next);
        }

        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Appends `value` under the next free integer key and returns that key.
    ///
    /// Once a client-supplied index has exhausted the counter, the lowest
    /// unused index is taken instead so appends never overwrite each other.
    pub fn push(&mut self, value: impl Into<QueryValue>) -> usize {
        let index = if self.next_index == usize::MAX {
            (0..self.entries.len() + 1)
                .find(|candidate| !self.contains_key(&candidate.to_string()))
                .unwrap_or(self.entries.len())
        } else {
            self.next_index
        };
        self.insert(index.to_string(), value);
        index
    }

    /// Returns the nested map stored under `key`, creating it when the key is
    /// absent or holds a scalar.
    pub fn entry_map(&mut self, key: &str) -> &mut QueryMap {
        let position = match self.entries.iter().position(|(existing, _)| existing == key) {
            Some(position) => position,
            None => {
                self.insert(key, QueryMap::new());
                self.entries.len() - 1
            }
        };
        self.entries[position].1.make_map()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// True when the keys are exactly `0..len` in order.
    pub fn is_list(&self) -> bool {
        self.entries
            .iter()
            .enumerate()
            .all(|(position, (key, _))| index_key(key) == Some(position))
    }

    /// Merges `other` into `self`.
    ///
    /// Integer-keyed entries are appended rather than overwritten, nested maps
    /// are merged recursively, and any other value from `other` replaces the
    /// existing one.
    pub fn merge(&mut self, other: QueryMap) {
        for (key, value) in other.entries {
            if index_key(&key).is_some() {
                self.push(value);
                continue;
            }

            match value {
                QueryValue::Map(incoming) => match self.get_mut(&key) {
                    Some(QueryValue::Map(existing)) => existing.merge(incoming),
                    _ => {
                        self.insert(key, incoming);
                    }
                },
                scalar => {
                    self.insert(key, scalar);
                }
            }
        }
    }

    /// Renders the tree as JSON; sequences become arrays.
    pub fn to_json(&self) -> Value {
        if !self.is_empty() && self.is_list() {
            Value::Array(self.entries.iter().map(|(_, value)| value.to_json()).collect())
        } else {
            Value::Object(
                self.entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            )
        }
    }
}

impl PartialEq for QueryMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for QueryMap {}

impl<K, V> FromIterator<(K, V)> for QueryMap
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = QueryMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}
