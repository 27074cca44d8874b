//! Portfolio position limits.
//!
//! Three caps over the current weights: single-asset concentration, the
//! crypto sleeve as a whole, and the non-major (altcoin) slice of it.
//! One reason tag covers all three; which cap tripped is a log detail.

use crate::config::GuardrailConfig;
use log::debug;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

pub const REASON: &str = "position_limits";

/// Check current portfolio weights against the configured caps.
/// Returns true when every cap holds.
pub fn within_limits(weights: &BTreeMap<String, Decimal>, config: &GuardrailConfig) -> bool {
    let mut crypto_total = Decimal::ZERO;
    let mut altcoin_total = Decimal::ZERO;

    for (asset, &weight) in weights {
        if weight > config.max_single_asset_pct {
            debug!(
                "position limit breach: {} weight {} > single-asset cap {}",
                asset, weight, config.max_single_asset_pct
            );
            return false;
        }
        if config.is_crypto(asset) {
            crypto_total += weight;
            if !config.is_major_crypto(asset) {
                altcoin_total += weight;
            }
        }
    }

    if crypto_total > config.max_crypto_pct {
        debug!(
            "position limit breach: crypto sleeve {} > cap {}",
            crypto_total, config.max_crypto_pct
        );
        return false;
    }
    if altcoin_total > config.max_altcoin_pct {
        debug!(
            "position limit breach: altcoin sleeve {} > cap {}",
            altcoin_total, config.max_altcoin_pct
        );
        return false;
    }

    true
}
