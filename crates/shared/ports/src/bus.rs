use aegis_core::Envelope;
use serde_json::Value;

/// Topic-addressed, globally-ordered, in-order delivery primitive.
///
/// The bus exclusively owns envelope sequencing: `publish` assigns the next
/// global sequence number (starting at 1), unique and strictly increasing
/// across all topics. Given identical publish call order, the assigned
/// sequence numbers are identical regardless of topic interleaving.
///
/// None of these operations can fail: polling or sizing a topic that has
/// never been published to yields empty results, never an error.
pub trait EventBus: Send + Sync {
    /// Stamp, enqueue, and return the stored envelope.
    fn publish(&self, topic: &str, event_type: &str, trace_id: &str, payload: Value) -> Envelope;

    /// Remove and return up to `max_items` oldest-first entries.
    fn poll(&self, topic: &str, max_items: usize) -> Vec<Envelope>;

    /// Number of undelivered envelopes on a topic.
    fn size(&self, topic: &str) -> usize;

    /// Drop all queues and reset the sequence counter to its initial state.
    fn clear(&self);

    /// Drop a single topic's queue; the sequence counter is untouched.
    fn clear_topic(&self, topic: &str);
}
