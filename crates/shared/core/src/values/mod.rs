use uuid::Uuid;

/// Reserved trace id for pipeline-internal records (completion markers).
/// Excluded from the distinct-trace count in metrics.
pub const SYSTEM_TRACE_ID: &str = "SYSTEM";

/// Source of event identifiers.
///
/// Injected into producers and workers so that deterministic replays and
/// parallel tests can substitute a predictable generator.
pub trait IdGenerator: Send {
    fn next_id(&mut self, prefix: &str) -> String;
}

/// Random UUIDv4 identifiers (production default)
#[derive(Debug, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self, prefix: &str) -> String {
        format!("{}-{}", prefix, Uuid::new_v4())
    }
}

/// Deterministic counter-based identifiers for replay and tests
#[derive(Debug, Default)]
pub struct SequentialIds {
    counter: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, prefix: &str) -> String {
        self.counter += 1;
        format!("{}-{:06}", prefix, self.counter)
    }
}
