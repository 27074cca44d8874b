//! Drawdown guardrail.
//!
//! Measures the worst peak-to-trough decline of an equity curve and
//! classifies it against the soft/hard threshold ladder. A missing or
//! undefined drawdown is benign: the classification degrades to `Normal`
//! instead of erroring, so evaluation always yields a verdict.

use crate::config::GuardrailConfig;
use rust_decimal::Decimal;

pub const REASON_SOFT: &str = "dd_soft";
pub const REASON_HARD: &str = "dd_hard";

/// Worst drawdown of an equity curve, with the peak that produced it and
/// the trough it bottomed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawdownStats {
    /// Peak-to-trough decline as a fraction of the peak
    pub drawdown: Decimal,
    pub peak_index: usize,
    pub trough_index: usize,
}

/// Risk regime implied by the measured drawdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawdownState {
    Normal,
    RiskOffLight,
    HardStop,
}

/// Classification outcome consumed by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct DrawdownVerdict {
    pub state: DrawdownState,
    pub allow_new_trades: bool,
    pub force_close_positions: bool,
    pub size_multiplier: Decimal,
    pub reason: Option<&'static str>,
}

/// Maximum drawdown over an ordered equity curve.
///
/// Tracks the running peak; at each point where the peak is positive,
/// computes `(peak - value) / peak` and keeps the largest such ratio
/// together with the indices of the peak and trough that produced it.
/// Returns `None` when the curve never defines a drawdown (empty curve,
/// or no positive peak).
pub fn max_drawdown(curve: &[Decimal]) -> Option<DrawdownStats> {
    let mut peak = Decimal::MIN;
    let mut peak_index = 0usize;
    let mut best: Option<DrawdownStats> = None;

    for (i, &value) in curve.iter().enumerate() {
        if value > peak {
            peak = value;
            peak_index = i;
        }
        if peak > Decimal::ZERO {
            let ratio = (peak - value) / peak;
            let better = match best {
                Some(stats) => ratio > stats.drawdown,
                None => true,
            };
            if better {
                best = Some(DrawdownStats {
                    drawdown: ratio,
                    peak_index,
                    trough_index: i,
                });
            }
        }
    }

    best
}

/// Classify a measured drawdown against the configured ladder.
///
/// `None` (no measurable drawdown) is treated as benign. The `hard >= soft`
/// ordering is a configuration-time contract and is deliberately not
/// enforced here.
pub fn classify(drawdown: Option<Decimal>, config: &GuardrailConfig) -> DrawdownVerdict {
    let Some(dd) = drawdown else {
        return DrawdownVerdict {
            state: DrawdownState::Normal,
            allow_new_trades: true,
            force_close_positions: false,
            size_multiplier: Decimal::ONE,
            reason: None,
        };
    };

    if dd >= config.max_dd_hard {
        DrawdownVerdict {
            state: DrawdownState::HardStop,
            allow_new_trades: false,
            force_close_positions: true,
            size_multiplier: Decimal::ZERO,
            reason: Some(REASON_HARD),
        }
    } else if dd >= config.max_dd_soft {
        DrawdownVerdict {
            state: DrawdownState::RiskOffLight,
            allow_new_trades: true,
            force_close_positions: false,
            size_multiplier: config.size_multiplier_soft,
            reason: Some(REASON_SOFT),
        }
    } else {
        DrawdownVerdict {
            state: DrawdownState::Normal,
            allow_new_trades: true,
            force_close_positions: false,
            size_multiplier: Decimal::ONE,
            reason: None,
        }
    }
}
