//! Aegis Core Domain
//!
//! Pure domain types for the Aegis risk pipeline.
//! This crate contains no I/O and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    Envelope,
    ExecutionReport,
    FillStatus,
    OrderIntent,
    OrderSize,
    ReasonSet,
    RiskDecision,
    RiskDecisionState,
    RiskDecisionWire,
    Side,
};
pub use values::{IdGenerator, SequentialIds, UuidIds, SYSTEM_TRACE_ID};
