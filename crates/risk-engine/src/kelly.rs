//! Kelly-based sizing cap.
//!
//! The allowed fraction of NAV per asset comes from the configured cap
//! factor, overridden for major-crypto assets by a volatility percentile
//! bucket. Deltas above the ceiling are clamped in place, never dropped:
//! downstream sizing sees the annotated, capped weight.

use crate::config::GuardrailConfig;
use aegis_core::ReasonSet;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

pub const REASON_PREFIX: &str = "kelly_cap:";

/// Sizing fraction for one asset.
///
/// Major-crypto assets use the percentile-bucketed override table; a
/// missing percentile lands in the low-vol bucket. Everything else takes
/// the flat cap factor. Max allowed notional is `nav * fraction`, so the
/// max allowed weight is the fraction itself.
pub fn kelly_fraction(
    asset: &str,
    vol_percentile: Option<Decimal>,
    config: &GuardrailConfig,
) -> Decimal {
    if !config.is_major_crypto(asset) {
        return config.cap_factor;
    }
    match vol_percentile {
        Some(p) if p >= config.percentile_thresholds.high => config.crypto_overrides.high_vol,
        Some(p) if p >= config.percentile_thresholds.low => config.crypto_overrides.med_vol,
        _ => config.crypto_overrides.low_vol,
    }
}

/// Outcome of applying the cap to a signal's delta map.
#[derive(Debug, Clone, PartialEq)]
pub struct CapOutcome {
    /// Deltas with any over-cap weights clamped to the allowed maximum
    pub sized_deltas: BTreeMap<String, Decimal>,
    /// One `kelly_cap:<asset>` tag per clamped asset, in asset order
    pub reasons: ReasonSet,
}

impl CapOutcome {
    pub fn capped(&self) -> bool {
        !self.reasons.is_empty()
    }
}

/// Clamp every requested target weight to its Kelly ceiling.
pub fn apply_cap(
    deltas: &BTreeMap<String, Decimal>,
    vol_percentile: Option<Decimal>,
    config: &GuardrailConfig,
) -> CapOutcome {
    let mut sized_deltas = BTreeMap::new();
    let mut reasons = ReasonSet::new();

    for (asset, &requested) in deltas {
        let max_weight = kelly_fraction(asset, vol_percentile, config);
        if requested > max_weight {
            reasons.insert(format!("{}{}", REASON_PREFIX, asset));
            sized_deltas.insert(asset.clone(), max_weight);
        } else {
            sized_deltas.insert(asset.clone(), requested);
        }
    }

    CapOutcome {
        sized_deltas,
        reasons,
    }
}
