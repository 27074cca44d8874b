use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Immutable wrapper around a published event.
///
/// The sequence number is assigned by the bus at publish time and is unique
/// and strictly increasing across *all* topics, not per-topic. Envelopes
/// carry no timestamps so that serialized output is reproducible
/// bit-for-bit across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Global monotonic sequence number (starts at 1)
    pub seq: u64,
    pub topic: String,
    pub event_type: String,
    /// Correlation key, propagated unchanged across the pipeline
    pub trace_id: String,
    pub payload: Value,
}

impl Envelope {
    pub fn new(
        seq: u64,
        topic: impl Into<String>,
        event_type: impl Into<String>,
        trace_id: impl Into<String>,
        payload: Value,
    ) -> Self {
        Self {
            seq,
            topic: topic.into(),
            event_type: event_type.into(),
            trace_id: trace_id.into(),
            payload,
        }
    }

    /// Canonical JSON form: `serde_json` maps are ordered, so keys come out
    /// sorted and the text is stable across runs.
    pub fn to_canonical_json(&self) -> String {
        // Serialization of an Envelope cannot fail: every field is a plain
        // string, integer, or already-parsed Value.
        serde_json::to_string(self).unwrap_or_default()
    }
}
