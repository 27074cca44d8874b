use serde::{Deserialize, Serialize};

/// Ordered set of reason tags.
///
/// Insertion order is preserved and duplicates are suppressed; the first
/// occurrence of a tag wins its position. One abstraction instead of the
/// parallel list-plus-membership pair, so the two can never drift.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReasonSet {
    items: Vec<String>,
}

impl ReasonSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tag; returns true if it was newly added.
    pub fn insert(&mut self, reason: impl Into<String>) -> bool {
        let reason = reason.into();
        if self.items.iter().any(|r| r == &reason) {
            return false;
        }
        self.items.push(reason);
        true
    }

    pub fn contains(&self, reason: &str) -> bool {
        self.items.iter().any(|r| r == reason)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }

    /// Merge another set in, keeping this set's ordering for existing tags.
    pub fn extend_from(&mut self, other: &ReasonSet) {
        for reason in other.iter() {
            self.insert(reason);
        }
    }
}

impl<S: Into<String>> FromIterator<S> for ReasonSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = ReasonSet::new();
        for reason in iter {
            set.insert(reason);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let mut set = ReasonSet::new();
        set.insert("dd_soft");
        set.insert("kelly_cap:BTC");
        set.insert("position_limits");

        let tags: Vec<&str> = set.iter().collect();
        assert_eq!(tags, vec!["dd_soft", "kelly_cap:BTC", "position_limits"]);
    }

    #[test]
    fn test_duplicates_suppressed_first_wins() {
        let mut set = ReasonSet::new();
        assert!(set.insert("position_limits"));
        assert!(set.insert("dd_hard"));
        assert!(!set.insert("position_limits"));

        let tags: Vec<&str> = set.iter().collect();
        assert_eq!(tags, vec!["position_limits", "dd_hard"]);
    }

    #[test]
    fn test_serde_as_plain_list() {
        let set: ReasonSet = ["a", "b", "a"].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["a","b"]"#);

        let back: ReasonSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
