use aegis_core::Side;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Signed net position per symbol, updated once per simulated fill.
#[derive(Debug, Default)]
pub struct PositionBook {
    positions: BTreeMap<String, Decimal>,
}

impl PositionBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a fill and return the new net position for the symbol.
    pub fn apply_fill(&mut self, symbol: &str, side: Side, filled_qty: Decimal) -> Decimal {
        let signed = match side {
            Side::Buy => filled_qty,
            Side::Sell => -filled_qty,
        };
        let position = self.positions.entry(symbol.to_string()).or_default();
        *position += signed;
        *position
    }

    pub fn position(&self, symbol: &str) -> Decimal {
        self.positions.get(symbol).copied().unwrap_or_default()
    }

    /// All net positions in symbol order.
    pub fn snapshot(&self) -> Vec<(String, Decimal)> {
        self.positions
            .iter()
            .map(|(symbol, qty)| (symbol.clone(), *qty))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_buy_then_sell_nets_out() {
        let mut book = PositionBook::new();
        assert_eq!(book.apply_fill("BTC", Side::Buy, dec!(2)), dec!(2));
        assert_eq!(book.apply_fill("BTC", Side::Sell, dec!(0.5)), dec!(1.5));
        assert_eq!(book.position("BTC"), dec!(1.5));
        assert_eq!(book.position("ETH"), Decimal::ZERO);
    }
}
