//! Stable topic and event-type names.
//!
//! These strings are part of the external interface and must not change
//! across versions.

/// Order intents published by the signal-to-intent translator
pub const ORDER_INTENTS: &str = "orders.intents";
/// Risk decisions published by the risk worker
pub const RISK_DECISIONS: &str = "risk.decisions";
/// Execution reports published by the execution worker
pub const EXECUTION_REPORTS: &str = "execution.reports";

/// Event type tags
pub mod event_type {
    pub const ORDER_INTENT: &str = "OrderIntent";
    pub const RISK_DECISION: &str = "RiskDecision";
    pub const EXECUTION_REPORT: &str = "ExecutionReport";
    /// Journal-only tag for persisted position updates
    pub const POSITION_UPDATE: &str = "PositionUpdate";
    /// Journal-only completion marker emitted by the driver
    pub const PIPELINE_COMPLETE: &str = "PipelineComplete";
}
