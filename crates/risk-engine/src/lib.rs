//! Aegis Risk Engine
//!
//! Pure guardrail evaluation: one `Assessment` per (signal, portfolio
//! weights, context) triple, folding in up to four independent checks:
//!
//! - **Position limits**: single-asset, crypto-sleeve, and altcoin caps
//! - **Liquidity**: per-asset minimum-volume filter (pluggable)
//! - **Drawdown**: peak-to-trough classification with soft/hard thresholds
//! - **ATR stop-loss**: advisory stop signals per tracked position
//! - **Kelly cap**: volatility-bucketed sizing ceiling with delta clamping
//!
//! The engine is deliberately lenient about missing or malformed optional
//! inputs (absent equity curve, missing ATR, unknown position side): risk
//! evaluation always produces a decision. Pipeline-integrity failures are
//! the workers' concern, not this crate's.
//!
//! No I/O happens here; the engine is a pure function of its inputs.

pub mod config;
pub mod context;
pub mod drawdown;
pub mod engine;
pub mod kelly;
pub mod limits;
pub mod signal;
pub mod stops;

pub use config::{CryptoOverrides, GuardrailConfig, PercentileThresholds};
pub use context::{PositionRisk, RiskContext};
pub use drawdown::{DrawdownState, DrawdownStats, DrawdownVerdict};
pub use engine::{Assessment, EngineVariant, RiskEngine};
pub use signal::TradeSignal;
