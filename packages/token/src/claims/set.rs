//! Claim set carried into and out of a token.

use super::ClaimValue;
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Mapping from claim name to value. The last write per name wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimSet {
    claims: BTreeMap<String, ClaimValue>,
}

impl ClaimSet {
    /// Create an empty claim set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a claim, builder style
    #[inline]
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ClaimValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a claim, returning the value it replaced
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ClaimValue>,
    ) -> Option<ClaimValue> {
        self.claims.insert(name.into(), value.into())
    }

    /// Remove a claim
    pub fn remove(&mut self, name: &str) -> Option<ClaimValue> {
        self.claims.remove(name)
    }

    /// Look up a claim
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ClaimValue> {
        self.claims.get(name)
    }

    /// Whether a claim is present
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.claims.contains_key(name)
    }

    /// Number of claims
    #[must_use]
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Whether the set is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Iterate over claims in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClaimValue)> {
        self.claims.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Claim names in name order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.claims.keys().map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for ClaimSet
where
    K: Into<String>,
    V: Into<ClaimValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = ClaimSet::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

impl IntoIterator for ClaimSet {
    type Item = (String, ClaimValue);
    type IntoIter = btree_map::IntoIter<String, ClaimValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.claims.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let mut set = ClaimSet::new().with("role", "reader");
        let previous = set.insert("role", "admin");

        assert_eq!(previous, Some(ClaimValue::from("reader")));
        assert_eq!(set.get("role").and_then(ClaimValue::as_str), Some("admin"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_insertion_order_is_not_semantic() {
        let a = ClaimSet::new().with("b", 1_i32).with("a", true);
        let b: ClaimSet = [("a", ClaimValue::from(true)), ("b", ClaimValue::from(1_i32))]
            .into_iter()
            .collect();
        assert_eq!(a, b);
        assert_eq!(a.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
