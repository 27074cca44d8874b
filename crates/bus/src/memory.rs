use aegis_core::Envelope;
use aegis_ports::EventBus;
use log::trace;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Everything behind one lock: sequence assignment and enqueue must be a
/// single atomic step, otherwise two publishers could interleave and break
/// the call-order == seq-order guarantee.
#[derive(Debug, Default)]
struct BusState {
    next_seq: u64,
    queues: HashMap<String, VecDeque<Envelope>>,
}

/// In-memory `EventBus`.
///
/// The sequence counter is instance state, never a module-level global, so
/// independent buses (e.g. in parallel tests) cannot interfere with each
/// other.
#[derive(Debug, Default)]
pub struct MemoryBus {
    state: Mutex<BusState>,
}

impl MemoryBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Topics that currently have undelivered envelopes.
    pub fn active_topics(&self) -> Vec<String> {
        let state = self.state.lock().expect("bus lock poisoned");
        let mut topics: Vec<String> = state
            .queues
            .iter()
            .filter(|(_, q)| !q.is_empty())
            .map(|(t, _)| t.clone())
            .collect();
        topics.sort();
        topics
    }

    /// Total undelivered envelopes across all topics.
    pub fn total_pending(&self) -> usize {
        let state = self.state.lock().expect("bus lock poisoned");
        state.queues.values().map(VecDeque::len).sum()
    }
}

impl EventBus for MemoryBus {
    fn publish(&self, topic: &str, event_type: &str, trace_id: &str, payload: Value) -> Envelope {
        let mut state = self.state.lock().expect("bus lock poisoned");
        state.next_seq += 1;
        let envelope = Envelope::new(state.next_seq, topic, event_type, trace_id, payload);
        trace!(
            "publish seq={} topic={} event_type={} trace={}",
            envelope.seq,
            topic,
            event_type,
            trace_id
        );
        state
            .queues
            .entry(topic.to_string())
            .or_default()
            .push_back(envelope.clone());
        envelope
    }

    fn poll(&self, topic: &str, max_items: usize) -> Vec<Envelope> {
        let mut state = self.state.lock().expect("bus lock poisoned");
        let Some(queue) = state.queues.get_mut(topic) else {
            return Vec::new();
        };
        let take = max_items.min(queue.len());
        queue.drain(..take).collect()
    }

    fn size(&self, topic: &str) -> usize {
        let state = self.state.lock().expect("bus lock poisoned");
        state.queues.get(topic).map_or(0, VecDeque::len)
    }

    fn clear(&self) {
        let mut state = self.state.lock().expect("bus lock poisoned");
        state.queues.clear();
        state.next_seq = 0;
    }

    fn clear_topic(&self, topic: &str) {
        let mut state = self.state.lock().expect("bus lock poisoned");
        if let Some(queue) = state.queues.get_mut(topic) {
            queue.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_seq_is_global_across_topics() {
        let bus = MemoryBus::new();
        let topics = ["a", "b", "a", "c", "b", "a"];

        for (i, topic) in topics.iter().enumerate() {
            let env = bus.publish(topic, "E", "t", json!({"i": i}));
            assert_eq!(env.seq, (i + 1) as u64);
        }
    }

    #[test]
    fn test_fifo_within_topic() {
        let bus = MemoryBus::new();
        for marker in 1..=3 {
            bus.publish("orders.intents", "OrderIntent", "t", json!({"marker": marker}));
        }

        let polled = bus.poll("orders.intents", 3);
        let markers: Vec<i64> = polled
            .iter()
            .map(|e| e.payload["marker"].as_i64().unwrap())
            .collect();
        assert_eq!(markers, vec![1, 2, 3]);
    }

    #[test]
    fn test_poll_respects_max_items_and_drains() {
        let bus = MemoryBus::new();
        for i in 0..5 {
            bus.publish("t", "E", "tr", json!({"i": i}));
        }

        assert_eq!(bus.poll("t", 2).len(), 2);
        assert_eq!(bus.size("t"), 3);
        assert_eq!(bus.poll("t", 10).len(), 3);
        assert_eq!(bus.size("t"), 0);
    }

    #[test]
    fn test_empty_and_unknown_topics_never_error() {
        let bus = MemoryBus::new();
        assert!(bus.poll("nothing", 10).is_empty());
        assert_eq!(bus.size("nothing"), 0);

        bus.publish("t", "E", "tr", json!({}));
        bus.poll("t", 1);
        assert!(bus.poll("t", 1).is_empty());
    }

    #[test]
    fn test_clear_resets_sequence() {
        let bus = MemoryBus::new();
        bus.publish("a", "E", "tr", json!({}));
        bus.publish("b", "E", "tr", json!({}));

        bus.clear();
        assert_eq!(bus.size("a"), 0);
        assert_eq!(bus.size("b"), 0);
        assert_eq!(bus.total_pending(), 0);

        let env = bus.publish("a", "E", "tr", json!({}));
        assert_eq!(env.seq, 1);
    }

    #[test]
    fn test_clear_topic_keeps_sequence() {
        let bus = MemoryBus::new();
        bus.publish("a", "E", "tr", json!({}));
        bus.clear_topic("a");
        assert_eq!(bus.size("a"), 0);

        let env = bus.publish("a", "E", "tr", json!({}));
        assert_eq!(env.seq, 2);
    }

    #[test]
    fn test_independent_instances_do_not_interfere() {
        let bus_a = MemoryBus::new();
        let bus_b = MemoryBus::new();

        bus_a.publish("t", "E", "tr", json!({}));
        bus_a.publish("t", "E", "tr", json!({}));
        let env = bus_b.publish("t", "E", "tr", json!({}));
        assert_eq!(env.seq, 1);
    }

    #[test]
    fn test_active_topics_sorted() {
        let bus = MemoryBus::new();
        bus.publish("zed", "E", "tr", json!({}));
        bus.publish("alpha", "E", "tr", json!({}));
        assert_eq!(bus.active_topics(), vec!["alpha", "zed"]);
    }
}
