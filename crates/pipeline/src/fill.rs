//! Fill simulation.
//!
//! Deterministic given a seed: the same intent stream produces the same
//! slippage and latency draws on every run. Slippage is symmetric around
//! zero; there is no directional bias in the simulator.

use crate::error::Result;
use aegis_core::{ExecutionReport, FillStatus, OrderIntent, OrderSize, Side};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde_json::json;

#[derive(Debug, Clone)]
pub struct FillConfig {
    /// Maximum absolute slippage, in basis points of the reference price
    pub slippage_bps: Decimal,
    /// Per-order fill ceiling; larger orders fill partially
    pub max_fill_qty: Option<Decimal>,
    /// RNG seed for reproducible runs
    pub seed: u64,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            slippage_bps: Decimal::new(5, 0), // 5 bps
            max_fill_qty: None,
            seed: 42,
        }
    }
}

pub struct FillSimulator {
    config: FillConfig,
    rng: StdRng,
}

impl FillSimulator {
    pub fn new(config: FillConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    /// Simulate one fill for a validated intent.
    ///
    /// A missing reference price cannot be filled and yields a REJECTED
    /// report carrying the reason in `extra`; this is a business outcome,
    /// not a pipeline error.
    pub fn simulate(
        &mut self,
        intent: &OrderIntent,
        side: Side,
        ref_risk_event_id: &str,
    ) -> Result<ExecutionReport> {
        let Some(reference_price) = intent.reference_price() else {
            return Ok(ExecutionReport::rejected(
                intent.event_id.clone(),
                ref_risk_event_id,
                json!({"reasons": ["no_reference_price"]}),
            ));
        };

        let requested_qty = match intent.size {
            OrderSize::Qty(qty) => qty,
            OrderSize::Notional(notional) if reference_price > Decimal::ZERO => {
                notional / reference_price
            }
            OrderSize::Notional(_) => Decimal::ZERO,
        };

        // Symmetric draw in [-1, 1], scaled to the configured band
        let draw: f64 = self.rng.gen_range(-1.0..=1.0);
        let draw =
            Decimal::from_f64_retain(draw).unwrap_or_default().round_dp(6);
        let slippage_fraction = draw * self.config.slippage_bps / Decimal::from(10_000);
        // Slippage worsens the price in the direction of the trade sign
        let avg_price = match side {
            Side::Buy => reference_price * (Decimal::ONE + slippage_fraction),
            Side::Sell => reference_price * (Decimal::ONE - slippage_fraction),
        };
        let latency_ms: u64 = self.rng.gen_range(1..=5);

        let (status, filled_qty) = match self.config.max_fill_qty {
            Some(cap) if requested_qty > cap => (FillStatus::PartiallyFilled, cap),
            _ => (FillStatus::Filled, requested_qty),
        };

        Ok(ExecutionReport {
            ref_order_event_id: intent.event_id.clone(),
            ref_risk_event_id: ref_risk_event_id.to_string(),
            status,
            filled_qty,
            avg_price: avg_price.round_dp(8),
            slippage: (avg_price - reference_price).round_dp(8),
            latency_ms,
            extra: json!({}),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn intent(size: OrderSize) -> OrderIntent {
        OrderIntent::new("ord-1", "BTC", "buy", size, "t-1").with_limit_price(dec!(100))
    }

    #[test]
    fn test_deterministic_given_seed() {
        let mut a = FillSimulator::new(FillConfig::default());
        let mut b = FillSimulator::new(FillConfig::default());
        let order = intent(OrderSize::Qty(dec!(2)));

        let ra = a.simulate(&order, Side::Buy, "rd-1").unwrap();
        let rb = b.simulate(&order, Side::Buy, "rd-1").unwrap();
        assert_eq!(ra, rb);
    }

    #[test]
    fn test_fill_uses_requested_qty() {
        let mut sim = FillSimulator::new(FillConfig::default());
        let report = sim
            .simulate(&intent(OrderSize::Qty(dec!(2))), Side::Buy, "rd-1")
            .unwrap();

        assert_eq!(report.status, FillStatus::Filled);
        assert_eq!(report.filled_qty, dec!(2));
        assert_eq!(report.ref_order_event_id, "ord-1");
        assert_eq!(report.ref_risk_event_id, "rd-1");
    }

    #[test]
    fn test_notional_sizing() {
        let mut sim = FillSimulator::new(FillConfig {
            slippage_bps: Decimal::ZERO,
            ..Default::default()
        });
        let report = sim
            .simulate(&intent(OrderSize::Notional(dec!(500))), Side::Buy, "rd-1")
            .unwrap();
        assert_eq!(report.filled_qty, dec!(5)); // 500 / 100
    }

    #[test]
    fn test_slippage_within_band() {
        let mut sim = FillSimulator::new(FillConfig {
            slippage_bps: dec!(10),
            ..Default::default()
        });
        for _ in 0..50 {
            let report = sim
                .simulate(&intent(OrderSize::Qty(dec!(1))), Side::Buy, "rd-1")
                .unwrap();
            // 10 bps of 100 = 0.1
            assert!(report.slippage.abs() <= dec!(0.1000001));
            assert!((1..=5).contains(&report.latency_ms));
        }
    }

    #[test]
    fn test_partial_fill_above_cap() {
        let mut sim = FillSimulator::new(FillConfig {
            max_fill_qty: Some(dec!(1)),
            ..Default::default()
        });
        let report = sim
            .simulate(&intent(OrderSize::Qty(dec!(3))), Side::Buy, "rd-1")
            .unwrap();

        assert_eq!(report.status, FillStatus::PartiallyFilled);
        assert_eq!(report.filled_qty, dec!(1));
        assert!(report.status.is_fill());
    }

    #[test]
    fn test_missing_price_rejects() {
        let mut sim = FillSimulator::new(FillConfig::default());
        let order = OrderIntent::new("ord-2", "BTC", "buy", OrderSize::Qty(dec!(1)), "t-2");
        let report = sim.simulate(&order, Side::Buy, "rd-2").unwrap();

        assert_eq!(report.status, FillStatus::Rejected);
        assert_eq!(report.extra["reasons"][0], "no_reference_price");
    }
}
