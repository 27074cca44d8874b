//! ATR-based per-position stop-loss guardrail.
//!
//! Stops are advisory: a triggered symbol is flagged for downstream
//! position management but never blocks new trades on its own.

use crate::config::GuardrailConfig;
use crate::context::PositionRisk;
use rust_decimal::Decimal;

pub const REASON: &str = "stop_loss_atr";

/// Stop distance for a position.
///
/// With a valid positive ATR the distance is the wider of the ATR band and
/// the minimum percent stop; without one, the percent stop alone. The
/// lenient fallback keeps evaluation alive when ATR data is missing.
pub fn stop_distance(position: &PositionRisk, config: &GuardrailConfig) -> Decimal {
    let pct_stop = config.min_stop_pct * position.entry_price;
    match position.atr {
        Some(atr) if atr > Decimal::ZERO => (config.atr_multiplier * atr).max(pct_stop),
        _ => pct_stop,
    }
}

/// Stop price for a position, or `None` when the side is unrecognized.
/// The engine must not guess a direction.
pub fn stop_price(position: &PositionRisk, config: &GuardrailConfig) -> Option<Decimal> {
    let distance = stop_distance(position, config);
    match position.side.trim().to_ascii_lowercase().as_str() {
        "long" => Some(position.entry_price - distance),
        "short" => Some(position.entry_price + distance),
        _ => None,
    }
}

/// Whether the stop has triggered at the last observed price.
///
/// Long triggers at or below the stop; short at or above it. No stop price
/// (unknown side) never triggers.
pub fn is_triggered(
    position: &PositionRisk,
    last_price: Decimal,
    config: &GuardrailConfig,
) -> bool {
    let Some(stop) = stop_price(position, config) else {
        return false;
    };
    match position.side.trim().to_ascii_lowercase().as_str() {
        "long" => last_price <= stop,
        "short" => last_price >= stop,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn config() -> GuardrailConfig {
        GuardrailConfig {
            atr_multiplier: dec!(2.5),
            min_stop_pct: dec!(0.02),
            ..Default::default()
        }
    }

    #[test]
    fn test_reference_long_stop() {
        // entry=100, atr=4: distance = max(2.5 * 4, 0.02 * 100) = max(10, 2) = 10
        let position = PositionRisk::long(dec!(100), Some(dec!(4)));
        assert_eq!(stop_distance(&position, &config()), dec!(10));
        assert_eq!(stop_price(&position, &config()), Some(dec!(90)));

        assert!(is_triggered(&position, dec!(85), &config()));
        assert!(is_triggered(&position, dec!(90), &config()));
        assert!(!is_triggered(&position, dec!(95), &config()));
    }

    #[test]
    fn test_short_stop_mirrors() {
        let position = PositionRisk::short(dec!(100), Some(dec!(4)));
        assert_eq!(stop_price(&position, &config()), Some(dec!(110)));

        assert!(is_triggered(&position, dec!(115), &config()));
        assert!(is_triggered(&position, dec!(110), &config()));
        assert!(!is_triggered(&position, dec!(105), &config()));
    }

    #[test]
    fn test_percent_floor_dominates_small_atr() {
        // atr band 2.5 * 0.5 = 1.25 < pct stop 2
        let position = PositionRisk::long(dec!(100), Some(dec!(0.5)));
        assert_eq!(stop_distance(&position, &config()), dec!(2));
    }

    #[test]
    fn test_missing_or_invalid_atr_falls_back_to_percent() {
        let no_atr = PositionRisk::long(dec!(100), None);
        assert_eq!(stop_distance(&no_atr, &config()), dec!(2));
        assert_eq!(stop_price(&no_atr, &config()), Some(dec!(98)));

        let bad_atr = PositionRisk::long(dec!(100), Some(dec!(-3)));
        assert_eq!(stop_distance(&bad_atr, &config()), dec!(2));
    }

    #[test]
    fn test_unrecognized_side_yields_no_stop() {
        let position = PositionRisk {
            entry_price: dec!(100),
            atr: Some(dec!(4)),
            side: "sideways".to_string(),
        };
        assert_eq!(stop_price(&position, &config()), None);
        assert!(!is_triggered(&position, dec!(1), &config()));
    }

    #[test]
    fn test_side_case_insensitive() {
        let position = PositionRisk {
            entry_price: dec!(100),
            atr: Some(dec!(4)),
            side: "LONG".to_string(),
        };
        assert_eq!(stop_price(&position, &config()), Some(dec!(90)));
    }
}
