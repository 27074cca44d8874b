use super::ReasonSet;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Internal decision state carried alongside the surface verdict.
///
/// `reasons` is a superset of the surface rejection list: it also carries
/// advisory tags (`dd_soft`, `stop_loss_atr`) that do not block new trades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskDecisionState {
    pub allow_new_trades: bool,
    pub force_close_positions: bool,
    /// Sizing multiplier in [0, 1]
    pub size_multiplier: Decimal,
    /// Symbols whose stop-loss triggered (advisory)
    pub stop_signals: Vec<String>,
    pub reasons: ReasonSet,
}

impl Default for RiskDecisionState {
    fn default() -> Self {
        Self {
            allow_new_trades: true,
            force_close_positions: false,
            size_multiplier: Decimal::ONE,
            stop_signals: Vec::new(),
            reasons: ReasonSet::new(),
        }
    }
}

/// Unified outcome of all guardrails for one order intent.
///
/// Created once per intent and immutable after publish. Invariant:
/// `allowed == state.allow_new_trades` at the moment of publish; the
/// constructor derives the surface flag from the state so the two cannot
/// disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskDecision {
    pub event_id: String,
    pub ref_order_event_id: String,
    pub allowed: bool,
    pub rejection_reasons: ReasonSet,
    pub trace_id: String,
    pub state: RiskDecisionState,
}

impl RiskDecision {
    pub fn new(
        event_id: impl Into<String>,
        ref_order_event_id: impl Into<String>,
        trace_id: impl Into<String>,
        rejection_reasons: ReasonSet,
        state: RiskDecisionState,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            ref_order_event_id: ref_order_event_id.into(),
            allowed: state.allow_new_trades,
            rejection_reasons,
            trace_id: trace_id.into(),
            state,
        }
    }

    /// Payload published to the decision topic. The wire form is the
    /// surface record only; the full state stays pipeline-internal.
    pub fn wire_payload(&self) -> Value {
        json!({
            "ref_order_event_id": self.ref_order_event_id,
            "allowed": self.allowed,
            "rejection_reasons": self.rejection_reasons,
            "trace_id": self.trace_id,
            "event_id": self.event_id,
        })
    }
}

/// Surface record as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskDecisionWire {
    pub ref_order_event_id: String,
    pub allowed: bool,
    pub rejection_reasons: ReasonSet,
    pub trace_id: String,
    pub event_id: String,
}
