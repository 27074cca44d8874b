use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Order sizing: exactly one of quantity or notional.
///
/// The exclusivity rule is enforced by the type rather than by a
/// validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OrderSize {
    #[serde(rename = "qty")]
    Qty(Decimal),
    #[serde(rename = "notional")]
    Notional(Decimal),
}

/// A desired trade, produced by the signal-to-intent translator.
///
/// Published once, stored in the intent cache keyed by `event_id`, read
/// (never removed) by the execution worker, and never mutated after
/// creation. `side` is kept as the raw input string and canonicalized on
/// use; an unresolvable side is a pipeline-integrity error at the point of
/// use, not at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub event_id: String,
    pub symbol: String,
    pub side: String,
    pub size: OrderSize,
    pub limit_price: Option<Decimal>,
    pub trace_id: String,
    /// Free-form context, e.g. the current price at signal time
    #[serde(default)]
    pub meta: Value,
}

impl OrderIntent {
    pub fn new(
        event_id: impl Into<String>,
        symbol: impl Into<String>,
        side: impl Into<String>,
        size: OrderSize,
        trace_id: impl Into<String>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            symbol: symbol.into(),
            side: side.into(),
            size,
            limit_price: None,
            trace_id: trace_id.into(),
            meta: Value::Null,
        }
    }

    pub fn with_limit_price(mut self, price: Decimal) -> Self {
        self.limit_price = Some(price);
        self
    }

    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = meta;
        self
    }

    /// Reference price for sizing and fill simulation: the limit price if
    /// present, otherwise a numeric `meta.price`.
    pub fn reference_price(&self) -> Option<Decimal> {
        if let Some(price) = self.limit_price {
            return Some(price);
        }
        self.meta
            .get("price")
            .and_then(|v| match v {
                Value::Number(n) => n.to_string().parse::<Decimal>().ok(),
                Value::String(s) => s.parse::<Decimal>().ok(),
                _ => None,
            })
    }

    /// Requested notional, when derivable: notional as given, or
    /// quantity times the reference price.
    pub fn requested_notional(&self) -> Option<Decimal> {
        match self.size {
            OrderSize::Notional(n) => Some(n),
            OrderSize::Qty(q) => self.reference_price().map(|p| q * p),
        }
    }
}
