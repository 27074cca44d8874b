//! Aegis Bus
//!
//! In-memory implementation of the `EventBus` port: topic-addressed FIFO
//! queues stamped with one global, strictly-increasing sequence counter.
//! No business logic lives here.

pub mod memory;
pub mod topics;

pub use memory::MemoryBus;
