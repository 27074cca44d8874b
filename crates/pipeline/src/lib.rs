//! Aegis Pipeline
//!
//! The worker stages between signal and simulated execution:
//!
//! - **Intent Cache**: intent id -> full intent payload, written by the
//!   producer before publish, read (never removed) by the execution worker
//! - **Risk Worker**: consumes order intents, runs the guardrail engine,
//!   publishes risk decisions
//! - **Execution Worker**: consumes risk decisions, resolves intents
//!   (fail-fast on a cache miss), simulates fills, publishes reports
//! - **Journal**: append-only structured log, the input to the metrics
//!   reducer
//!
//! Two error regimes meet here: guardrail evaluation never fails, while
//! pipeline-integrity violations (cache miss, invalid side, missing
//! symbol) abort the unit of work immediately with a typed error.

pub mod cache;
pub mod error;
pub mod execution_worker;
pub mod fill;
pub mod journal;
pub mod positions;
pub mod producer;
pub mod risk_worker;

pub use cache::IntentCache;
pub use error::{Error, Result};
pub use execution_worker::ExecutionWorker;
pub use fill::{FillConfig, FillSimulator};
pub use journal::{Action, FileJournal, Journal, LogRecord, MemoryJournal, NullJournal};
pub use positions::PositionBook;
pub use producer::IntentProducer;
pub use risk_worker::RiskWorker;
