//! Guardrail thresholds.
//!
//! Configuration arrives already validated (range checks, `hard >= soft`
//! ordering) from the loading layer; the engine only consumes typed fields
//! and never re-validates at evaluation time.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Kelly fraction overrides for major-crypto assets, bucketed by
/// volatility percentile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoOverrides {
    pub high_vol: Decimal,
    pub med_vol: Decimal,
    pub low_vol: Decimal,
}

impl Default for CryptoOverrides {
    fn default() -> Self {
        Self {
            high_vol: dec!(0.10),
            med_vol: dec!(0.20),
            low_vol: dec!(0.30),
        }
    }
}

/// Percentile cutoffs selecting the override bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PercentileThresholds {
    pub low: Decimal,
    pub high: Decimal,
}

impl Default for PercentileThresholds {
    fn default() -> Self {
        Self {
            low: dec!(0.30),
            high: dec!(0.70),
        }
    }
}

/// Thresholds for every guardrail, plus the asset classification sets the
/// limits are expressed against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailConfig {
    // Position limits
    pub max_single_asset_pct: Decimal,
    pub max_crypto_pct: Decimal,
    pub max_altcoin_pct: Decimal,

    // Kelly sizing
    pub cap_factor: Decimal,
    pub crypto_overrides: CryptoOverrides,
    pub percentile_thresholds: PercentileThresholds,

    // Drawdown ladder (fractions of peak; hard >= soft by config contract)
    pub max_dd_soft: Decimal,
    pub max_dd_hard: Decimal,
    pub size_multiplier_soft: Decimal,

    // ATR stop-loss
    pub atr_multiplier: Decimal,
    pub min_stop_pct: Decimal,

    /// Assets counted against the crypto sleeve
    #[serde(default)]
    pub crypto_assets: BTreeSet<String>,
    /// Crypto assets exempt from the altcoin cap and eligible for
    /// volatility-bucketed Kelly overrides
    #[serde(default)]
    pub major_crypto: BTreeSet<String>,
}

impl Default for GuardrailConfig {
    fn default() -> Self {
        Self {
            max_single_asset_pct: dec!(0.25),
            max_crypto_pct: dec!(0.40),
            max_altcoin_pct: dec!(0.10),
            cap_factor: dec!(0.50),
            crypto_overrides: CryptoOverrides::default(),
            percentile_thresholds: PercentileThresholds::default(),
            max_dd_soft: dec!(0.05),
            max_dd_hard: dec!(0.10),
            size_multiplier_soft: dec!(0.5),
            atr_multiplier: dec!(2.5),
            min_stop_pct: dec!(0.02),
            crypto_assets: ["BTC", "ETH", "SOL", "DOGE"]
                .into_iter()
                .map(String::from)
                .collect(),
            major_crypto: ["BTC", "ETH"].into_iter().map(String::from).collect(),
        }
    }
}

impl GuardrailConfig {
    pub fn is_crypto(&self, asset: &str) -> bool {
        self.crypto_assets.contains(asset)
    }

    pub fn is_major_crypto(&self, asset: &str) -> bool {
        self.major_crypto.contains(asset)
    }
}
