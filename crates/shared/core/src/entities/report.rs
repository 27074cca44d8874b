use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a simulated fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FillStatus {
    #[serde(rename = "FILLED")]
    Filled,
    #[serde(rename = "PARTIALLY_FILLED")]
    PartiallyFilled,
    #[serde(rename = "REJECTED")]
    Rejected,
}

impl FillStatus {
    /// FILLED and PARTIALLY_FILLED both count as fills
    pub fn is_fill(&self) -> bool {
        matches!(self, FillStatus::Filled | FillStatus::PartiallyFilled)
    }
}

/// Simulated execution outcome, created exactly once per consumed
/// risk decision that was allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub ref_order_event_id: String,
    pub ref_risk_event_id: String,
    pub status: FillStatus,
    pub filled_qty: Decimal,
    pub avg_price: Decimal,
    /// Signed price deviation applied by the simulator
    pub slippage: Decimal,
    pub latency_ms: u64,
    /// Free-form context; carries rejection reasons when status=REJECTED
    #[serde(default)]
    pub extra: Value,
}

impl ExecutionReport {
    pub fn rejected(
        ref_order_event_id: impl Into<String>,
        ref_risk_event_id: impl Into<String>,
        extra: Value,
    ) -> Self {
        Self {
            ref_order_event_id: ref_order_event_id.into(),
            ref_risk_event_id: ref_risk_event_id.into(),
            status: FillStatus::Rejected,
            filled_qty: Decimal::ZERO,
            avg_price: Decimal::ZERO,
            slippage: Decimal::ZERO,
            latency_ms: 0,
            extra,
        }
    }
}
