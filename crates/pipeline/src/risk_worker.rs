//! Risk worker: order intents in, risk decisions out.

use crate::error::{Error, Result};
use crate::journal::{Action, Journal, LogRecord};
use aegis_bus::topics;
use aegis_core::{IdGenerator, OrderIntent, RiskDecision};
use aegis_ports::EventBus;
use aegis_risk::{RiskContext, RiskEngine, TradeSignal};
use log::{debug, info};
use rust_decimal::Decimal;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Bus consumer wrapping the guardrail engine.
///
/// Portfolio weights, NAV, and the evaluation context are owned here and
/// refreshed by the driving loop between steps; the engine itself stays
/// pure.
pub struct RiskWorker {
    bus: Arc<dyn EventBus>,
    engine: RiskEngine,
    ids: Box<dyn IdGenerator>,
    batch: usize,
    nav: Decimal,
    weights: BTreeMap<String, Decimal>,
    context: RiskContext,
}

impl RiskWorker {
    pub fn new(bus: Arc<dyn EventBus>, engine: RiskEngine, ids: Box<dyn IdGenerator>) -> Self {
        Self {
            bus,
            engine,
            ids,
            batch: 16,
            nav: Decimal::from(1_000_000),
            weights: BTreeMap::new(),
            context: RiskContext::new(),
        }
    }

    pub fn with_batch(mut self, batch: usize) -> Self {
        self.batch = batch;
        self
    }

    pub fn with_nav(mut self, nav: Decimal) -> Self {
        self.nav = nav;
        self
    }

    pub fn set_weights(&mut self, weights: BTreeMap<String, Decimal>) {
        self.weights = weights;
    }

    pub fn set_context(&mut self, context: RiskContext) {
        self.context = context;
    }

    /// Pull up to the batch budget of intents, decide each, publish each
    /// decision with the intent's trace id unchanged. Returns the number
    /// of intents processed.
    pub fn step(&mut self, journal: &mut dyn Journal, step_id: u64) -> Result<usize> {
        let envelopes = self.bus.poll(topics::ORDER_INTENTS, self.batch);
        let mut processed = 0;

        for envelope in envelopes {
            let intent: OrderIntent = serde_json::from_value(envelope.payload.clone())
                .map_err(|e| Error::MalformedPayload {
                    event_type: envelope.event_type.clone(),
                    seq: envelope.seq,
                    detail: e.to_string(),
                })?;

            let signal = TradeSignal::from_intent(&intent, self.nav);
            let assessment = self.engine.evaluate(&signal, &self.weights, &self.context);

            let decision = RiskDecision::new(
                self.ids.next_id("rd"),
                intent.event_id.clone(),
                intent.trace_id.clone(),
                assessment.rejection_reasons,
                assessment.state,
            );

            if decision.allowed {
                debug!(
                    "decision {} allows intent {} (trace {})",
                    decision.event_id, intent.event_id, intent.trace_id
                );
            } else {
                info!(
                    "decision {} rejects intent {}: {:?} (trace {})",
                    decision.event_id,
                    intent.event_id,
                    decision.rejection_reasons.as_slice(),
                    intent.trace_id
                );
            }

            journal.append(&LogRecord::new(
                Action::Publish,
                topics::event_type::RISK_DECISION,
                &intent.trace_id,
                step_id,
                json!({
                    "event_id": decision.event_id,
                    "ref_order_event_id": decision.ref_order_event_id,
                    "allowed": decision.allowed,
                }),
            ))?;

            self.bus.publish(
                topics::RISK_DECISIONS,
                topics::event_type::RISK_DECISION,
                &intent.trace_id,
                decision.wire_payload(),
            );
            processed += 1;
        }

        Ok(processed)
    }
}
