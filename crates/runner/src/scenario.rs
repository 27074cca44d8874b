//! Canned end-to-end scenario.
//!
//! Submits a small intent batch covering the three decision outcomes
//! (filled, risk-rejected, fill-rejected), drains the pipeline, and
//! reduces the journal. Two runs with the same config produce the same
//! journal byte-for-byte.

use crate::driver::PipelineDriver;
use crate::error::Result;
use aegis_bus::MemoryBus;
use aegis_core::OrderSize;
use aegis_metrics::MetricsReport;
use aegis_pipeline::{FillConfig, IntentCache, MemoryJournal};
use aegis_ports::EventBus;
use aegis_risk::{GuardrailConfig, RiskContext, RiskEngine};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Portfolio NAV the intent weights are expressed against
    pub nav: Decimal,
    pub fill: FillConfig,
    /// Drain-loop step budget
    pub max_steps: u64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            nav: Decimal::from(1_000_000),
            fill: FillConfig::default(),
            max_steps: 64,
        }
    }
}

#[derive(Debug)]
pub struct ScenarioResults {
    pub metrics: MetricsReport,
    /// Full newline-delimited journal of the run
    pub journal: String,
    pub drain_iterations: u64,
    /// Net positions after the run, symbol -> qty
    pub positions: Vec<(String, Decimal)>,
}

/// Run the demo batch to completion.
pub fn run_scenario(config: ScenarioConfig) -> Result<ScenarioResults> {
    let bus: Arc<dyn EventBus> = Arc::new(MemoryBus::new());
    let mut driver = PipelineDriver::new(
        bus,
        Arc::new(IntentCache::new()),
        RiskEngine::new(GuardrailConfig::default()),
        config.fill.clone(),
    );
    let mut journal = MemoryJournal::new();

    driver
        .risk_mut()
        .set_context(RiskContext::new().with_vol_percentile(dec!(0.90)));

    // Small equity position: fills cleanly
    driver.submit(
        &mut journal,
        "AAPL",
        "buy",
        OrderSize::Notional(dec!(10_000)),
        Some(dec!(190.50)),
        "t-1",
        json!({"source": "demo"}),
    )?;
    // 40% of NAV into BTC at a high vol percentile: Kelly cap rejects
    driver.submit(
        &mut journal,
        "BTC",
        "buy",
        OrderSize::Notional(config.nav * dec!(0.40)),
        Some(dec!(50_000)),
        "t-2",
        json!({"source": "demo"}),
    )?;
    // No reference price anywhere: passes risk, rejected at fill time
    driver.submit(
        &mut journal,
        "ETH",
        "sell",
        OrderSize::Qty(dec!(2)),
        None,
        "t-3",
        json!({"source": "demo"}),
    )?;

    let drain_iterations = driver.run_until_drained(&mut journal, config.max_steps)?;

    let contents = journal.contents();
    Ok(ScenarioResults {
        metrics: MetricsReport::from_str_contents(&contents),
        journal: contents,
        drain_iterations,
        positions: driver.positions().snapshot(),
    })
}
