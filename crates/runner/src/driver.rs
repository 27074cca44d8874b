//! Single-threaded step driver.
//!
//! One `step` runs the risk worker and then the execution worker once, at
//! the same step id. Because decisions published in a step are visible to
//! the execution worker in that same step, a submitted batch normally
//! drains in one productive iteration plus one idle confirmation pass.
//!
//! Determinism: the driver owns the monotonic step counter, both workers
//! use sequential id generators, and nothing here consults a clock.

use crate::error::{Error, Result};
use aegis_bus::topics;
use aegis_core::{Envelope, ExecutionReport, OrderSize, SequentialIds, SYSTEM_TRACE_ID};
use aegis_pipeline::{
    Action, ExecutionWorker, FillConfig, FillSimulator, IntentCache, IntentProducer, Journal,
    LogRecord, PositionBook, RiskWorker,
};
use aegis_ports::EventBus;
use aegis_risk::RiskEngine;
use log::info;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::sync::Arc;

/// What one driver iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// Intents the risk worker decided
    pub intents_decided: usize,
    /// Decisions the execution worker consumed
    pub decisions_consumed: usize,
}

impl StepOutcome {
    pub fn idle(&self) -> bool {
        self.intents_decided == 0 && self.decisions_consumed == 0
    }
}

pub struct PipelineDriver {
    bus: Arc<dyn EventBus>,
    producer: IntentProducer,
    risk: RiskWorker,
    execution: ExecutionWorker,
    reports: Vec<ExecutionReport>,
    step_id: u64,
}

impl PipelineDriver {
    pub fn new(
        bus: Arc<dyn EventBus>,
        cache: Arc<IntentCache>,
        engine: RiskEngine,
        fill: FillConfig,
    ) -> Self {
        let producer =
            IntentProducer::new(bus.clone(), cache.clone(), Box::new(SequentialIds::new()));
        let risk = RiskWorker::new(bus.clone(), engine, Box::new(SequentialIds::new()));
        let execution = ExecutionWorker::new(bus.clone(), cache, FillSimulator::new(fill));
        Self {
            bus,
            producer,
            risk,
            execution,
            reports: Vec::new(),
            step_id: 0,
        }
    }

    /// The risk worker, for refreshing portfolio weights and the
    /// evaluation context between steps.
    pub fn risk_mut(&mut self) -> &mut RiskWorker {
        &mut self.risk
    }

    pub fn positions(&self) -> &PositionBook {
        self.execution.positions()
    }

    /// Execution reports collected so far, in publication order.
    pub fn reports(&self) -> &[ExecutionReport] {
        &self.reports
    }

    pub fn step_id(&self) -> u64 {
        self.step_id
    }

    /// Submit one intent. Journaled at the step that will process it.
    #[allow(clippy::too_many_arguments)]
    pub fn submit(
        &mut self,
        journal: &mut dyn Journal,
        symbol: &str,
        side: &str,
        size: OrderSize,
        limit_price: Option<Decimal>,
        trace_id: &str,
        meta: Value,
    ) -> Result<Envelope> {
        Ok(self.producer.publish_intent(
            journal,
            self.step_id + 1,
            symbol,
            side,
            size,
            limit_price,
            trace_id,
            meta,
        )?)
    }

    /// Run both workers once, risk first, then drain the terminal
    /// reports topic into the collector. Fail-fast errors from either
    /// worker abort the step.
    pub fn step(&mut self, journal: &mut dyn Journal) -> Result<StepOutcome> {
        self.step_id += 1;
        let intents_decided = self.risk.step(journal, self.step_id)?;
        let decisions_consumed = self.execution.step(journal, self.step_id)?;

        for envelope in self.bus.poll(topics::EXECUTION_REPORTS, usize::MAX) {
            let report: ExecutionReport = serde_json::from_value(envelope.payload.clone())
                .map_err(|e| aegis_pipeline::Error::MalformedPayload {
                    event_type: envelope.event_type.clone(),
                    seq: envelope.seq,
                    detail: e.to_string(),
                })?;
            self.reports.push(report);
        }

        Ok(StepOutcome {
            intents_decided,
            decisions_consumed,
        })
    }

    /// Step until an iteration does no work and every topic is empty, then
    /// journal the completion marker and flush.
    ///
    /// Returns the number of iterations taken (the idle confirmation pass
    /// included). Errs with `NotDrained` if the budget runs out first.
    pub fn run_until_drained(
        &mut self,
        journal: &mut dyn Journal,
        max_steps: u64,
    ) -> Result<u64> {
        for iteration in 1..=max_steps {
            let outcome = self.step(journal)?;
            if outcome.idle() && self.drained() {
                info!("pipeline drained after {} iterations", iteration);
                journal.append(&LogRecord::new(
                    Action::Complete,
                    topics::event_type::PIPELINE_COMPLETE,
                    SYSTEM_TRACE_ID,
                    self.step_id,
                    json!({"drain_iterations": iteration}),
                ))?;
                journal.flush()?;
                return Ok(iteration);
            }
        }
        Err(Error::NotDrained { max_steps })
    }

    fn drained(&self) -> bool {
        self.bus.size(topics::ORDER_INTENTS) == 0
            && self.bus.size(topics::RISK_DECISIONS) == 0
            && self.bus.size(topics::EXECUTION_REPORTS) == 0
    }
}
