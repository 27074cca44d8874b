use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Per-position inputs for the ATR stop-loss guardrail.
///
/// `side` stays a raw string: an unrecognized side yields no stop rather
/// than a guess, and the engine is not the place to fail an order.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionRisk {
    pub entry_price: Decimal,
    pub atr: Option<Decimal>,
    pub side: String,
}

impl PositionRisk {
    pub fn long(entry_price: Decimal, atr: Option<Decimal>) -> Self {
        Self {
            entry_price,
            atr,
            side: "long".to_string(),
        }
    }

    pub fn short(entry_price: Decimal, atr: Option<Decimal>) -> Self {
        Self {
            entry_price,
            atr,
            side: "short".to_string(),
        }
    }
}

/// Transient evaluation context. Not persisted; assembled fresh for each
/// engine invocation from whatever market state the caller tracks.
#[derive(Debug, Clone, Default)]
pub struct RiskContext {
    /// Ordered equity curve; absent means no drawdown opinion (benign)
    pub equity_curve: Option<Vec<Decimal>>,
    /// Tracked positions keyed by symbol (deterministic iteration)
    pub positions: BTreeMap<String, PositionRisk>,
    /// Last observed price per symbol
    pub last_prices: BTreeMap<String, Decimal>,
    /// Portfolio-level crypto volatility percentile in [0, 1]
    pub vol_percentile: Option<Decimal>,
}

impl RiskContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_equity_curve(mut self, curve: Vec<Decimal>) -> Self {
        self.equity_curve = Some(curve);
        self
    }

    pub fn with_position(mut self, symbol: impl Into<String>, position: PositionRisk) -> Self {
        self.positions.insert(symbol.into(), position);
        self
    }

    pub fn with_last_price(mut self, symbol: impl Into<String>, price: Decimal) -> Self {
        self.last_prices.insert(symbol.into(), price);
        self
    }

    pub fn with_vol_percentile(mut self, percentile: Decimal) -> Self {
        self.vol_percentile = Some(percentile);
        self
    }
}
