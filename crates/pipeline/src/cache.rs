use aegis_core::OrderIntent;
use dashmap::DashMap;

/// Intent id -> full intent payload.
///
/// Shared read-write between the intent producer (writes) and the
/// execution worker (reads). Entries are read, never removed: downstream
/// stages resolve state here instead of re-deriving it from event payloads.
/// The producer must insert before publishing the matching intent event;
/// the execution worker treats a miss as fatal.
#[derive(Debug, Default)]
pub struct IntentCache {
    entries: DashMap<String, OrderIntent>,
}

impl IntentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, intent: OrderIntent) {
        self.entries.insert(intent.event_id.clone(), intent);
    }

    /// Non-destructive lookup.
    pub fn get(&self, event_id: &str) -> Option<OrderIntent> {
        self.entries.get(event_id).map(|entry| entry.clone())
    }

    pub fn contains(&self, event_id: &str) -> bool {
        self.entries.contains_key(event_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
