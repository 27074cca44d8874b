use aegis_core::OrderIntent;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// The sizing view of a trading signal: target weight deltas per asset,
/// against the portfolio's net asset value.
///
/// Deltas are keyed in a `BTreeMap` so every iteration over the signal is
/// deterministic; reason-list ordering depends on it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TradeSignal {
    /// Requested target weight per asset (fraction of NAV)
    pub deltas: BTreeMap<String, Decimal>,
    /// Net asset value the weights are expressed against
    pub nav: Decimal,
}

impl TradeSignal {
    pub fn new(nav: Decimal) -> Self {
        Self {
            deltas: BTreeMap::new(),
            nav,
        }
    }

    pub fn with_delta(mut self, asset: impl Into<String>, weight: Decimal) -> Self {
        self.deltas.insert(asset.into(), weight);
        self
    }

    /// Derive the single-asset signal behind an order intent.
    ///
    /// The target weight is the intent's notional over NAV. A qty-sized
    /// intent without any reference price contributes a zero delta: the
    /// lenient evaluation regime degrades rather than errors, and the
    /// execution stage is the one that fails such an order.
    pub fn from_intent(intent: &OrderIntent, nav: Decimal) -> Self {
        let weight = match intent.requested_notional() {
            Some(notional) if nav > Decimal::ZERO => notional / nav,
            _ => Decimal::ZERO,
        };
        Self::new(nav).with_delta(intent.symbol.clone(), weight)
    }

    /// Assets referenced by this signal, in deterministic order.
    pub fn assets(&self) -> impl Iterator<Item = &str> {
        self.deltas.keys().map(String::as_str)
    }
}
