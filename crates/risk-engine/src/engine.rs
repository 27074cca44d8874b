//! Guardrail aggregation.
//!
//! Folds the independent checks into one decision state. Evaluation order
//! is fixed (limits, liquidity, drawdown, stops, Kelly) and determines the
//! ordering of reason tags; final admissibility is the logical AND of every
//! check, so a stricter earlier verdict is never overridden.

use crate::config::GuardrailConfig;
use crate::context::RiskContext;
use crate::signal::TradeSignal;
use crate::{drawdown, kelly, limits, stops};
use aegis_core::{ReasonSet, RiskDecisionState};
use aegis_ports::{AlwaysPass, LiquidityFilter};
use log::debug;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Engine output: the decision state plus the sized (possibly clamped)
/// delta map. `allowed` always equals `state.allow_new_trades`.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub state: RiskDecisionState,
    /// Only the tags that caused rejection; `state.reasons` is the superset
    pub rejection_reasons: ReasonSet,
    /// Requested deltas with Kelly clamping applied
    pub sized_deltas: BTreeMap<String, Decimal>,
}

impl Assessment {
    pub fn allowed(&self) -> bool {
        self.state.allow_new_trades
    }
}

/// Accumulates verdicts across guardrails. `note` records an advisory tag;
/// `reject` records a rejecting one and flips admissibility. Rejection can
/// only ever tighten.
#[derive(Debug)]
struct DecisionBuilder {
    allow_new_trades: bool,
    force_close_positions: bool,
    size_multiplier: Decimal,
    stop_signals: Vec<String>,
    reasons: ReasonSet,
    rejections: ReasonSet,
}

impl DecisionBuilder {
    fn new() -> Self {
        Self {
            allow_new_trades: true,
            force_close_positions: false,
            size_multiplier: Decimal::ONE,
            stop_signals: Vec::new(),
            reasons: ReasonSet::new(),
            rejections: ReasonSet::new(),
        }
    }

    fn note(&mut self, reason: impl Into<String>) {
        self.reasons.insert(reason);
    }

    fn reject(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        self.reasons.insert(reason.clone());
        self.rejections.insert(reason);
        self.allow_new_trades = false;
    }

    fn finish(self, sized_deltas: BTreeMap<String, Decimal>) -> Assessment {
        Assessment {
            state: RiskDecisionState {
                allow_new_trades: self.allow_new_trades,
                force_close_positions: self.force_close_positions,
                size_multiplier: self.size_multiplier,
                stop_signals: self.stop_signals,
                reasons: self.reasons,
            },
            rejection_reasons: self.rejections,
            sized_deltas,
        }
    }
}

/// Closed set of engine variants, selected once at startup.
///
/// `Legacy` reproduces the pre-overhaul engine: position limits, liquidity,
/// and drawdown only, with no ATR stops and no Kelly clamping. `Standard`
/// runs the full guardrail set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineVariant {
    #[default]
    Standard,
    Legacy,
}

/// The guardrail engine. Pure: no I/O, no shared state, always produces an
/// assessment.
pub struct RiskEngine {
    config: GuardrailConfig,
    variant: EngineVariant,
    liquidity: Box<dyn LiquidityFilter>,
}

impl RiskEngine {
    pub fn new(config: GuardrailConfig) -> Self {
        Self {
            config,
            variant: EngineVariant::Standard,
            liquidity: Box::new(AlwaysPass),
        }
    }

    pub fn with_variant(mut self, variant: EngineVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_liquidity_filter(mut self, filter: Box<dyn LiquidityFilter>) -> Self {
        self.liquidity = filter;
        self
    }

    pub fn config(&self) -> &GuardrailConfig {
        &self.config
    }

    /// Evaluate one signal against the current portfolio and context.
    pub fn evaluate(
        &self,
        signal: &TradeSignal,
        weights: &BTreeMap<String, Decimal>,
        context: &RiskContext,
    ) -> Assessment {
        let mut builder = DecisionBuilder::new();

        // 1. Position limits
        if !limits::within_limits(weights, &self.config) {
            builder.reject(limits::REASON);
        }

        // 2. Liquidity filter (asset order is deterministic)
        for asset in signal.assets() {
            if !self.liquidity.has_min_volume(asset) {
                builder.reject(format!("liquidity:{}", asset));
            }
        }

        // 3. Drawdown guardrail
        let measured = context
            .equity_curve
            .as_deref()
            .and_then(drawdown::max_drawdown);
        let verdict = drawdown::classify(measured.map(|s| s.drawdown), &self.config);
        if let Some(stats) = measured {
            debug!(
                "drawdown {} (peak idx {}, trough idx {}) -> {:?}",
                stats.drawdown, stats.peak_index, stats.trough_index, verdict.state
            );
        }
        builder.size_multiplier = verdict.size_multiplier;
        if verdict.force_close_positions {
            builder.force_close_positions = true;
        }
        match verdict.reason {
            Some(reason) if !verdict.allow_new_trades => builder.reject(reason),
            Some(reason) => builder.note(reason),
            None => {}
        }

        if self.variant == EngineVariant::Legacy {
            return builder.finish(signal.deltas.clone());
        }

        // 4. ATR stop-loss (advisory only)
        for (symbol, position) in &context.positions {
            let Some(&last_price) = context.last_prices.get(symbol) else {
                continue;
            };
            if stops::is_triggered(position, last_price, &self.config) {
                builder.stop_signals.push(symbol.clone());
                builder.note(stops::REASON);
            }
        }

        // 5. Kelly sizing cap
        let cap = kelly::apply_cap(&signal.deltas, context.vol_percentile, &self.config);
        for reason in cap.reasons.iter() {
            builder.reject(reason);
        }

        builder.finish(cap.sized_deltas)
    }
}
