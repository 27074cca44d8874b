//! Execution worker: risk decisions in, execution reports out.
//!
//! The intent behind each decision is resolved through the intent cache,
//! never re-derived from the decision payload. A cache miss means the
//! decision was published before (or without) its intent - an ordering bug
//! upstream - and is fatal by design: silently dropping it would corrupt
//! the conservation invariants the metrics reducer checks.

use crate::cache::IntentCache;
use crate::error::{Error, Result};
use crate::fill::FillSimulator;
use crate::journal::{Action, Journal, LogRecord};
use crate::positions::PositionBook;
use aegis_bus::topics;
use aegis_core::{RiskDecisionWire, Side};
use aegis_ports::EventBus;
use log::{debug, info};
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;

pub struct ExecutionWorker {
    bus: Arc<dyn EventBus>,
    cache: Arc<IntentCache>,
    simulator: FillSimulator,
    positions: PositionBook,
    batch: usize,
}

impl ExecutionWorker {
    pub fn new(bus: Arc<dyn EventBus>, cache: Arc<IntentCache>, simulator: FillSimulator) -> Self {
        Self {
            bus,
            cache,
            simulator,
            positions: PositionBook::new(),
            batch: 16,
        }
    }

    pub fn with_batch(mut self, batch: usize) -> Self {
        self.batch = batch;
        self
    }

    pub fn positions(&self) -> &PositionBook {
        &self.positions
    }

    /// Pull up to the batch budget of decisions and execute the allowed
    /// ones. Returns the number of decisions consumed.
    ///
    /// Fails fast - before publishing anything for the offending decision -
    /// on a cache miss, an unresolvable side, or a missing symbol.
    pub fn step(&mut self, journal: &mut dyn Journal, step_id: u64) -> Result<usize> {
        let envelopes = self.bus.poll(topics::RISK_DECISIONS, self.batch);
        let mut consumed = 0;

        for envelope in envelopes {
            let decision: RiskDecisionWire = serde_json::from_value(envelope.payload.clone())
                .map_err(|e| Error::MalformedPayload {
                    event_type: envelope.event_type.clone(),
                    seq: envelope.seq,
                    detail: e.to_string(),
                })?;
            consumed += 1;

            if !decision.allowed {
                debug!(
                    "decision {} rejected upstream, no report (trace {})",
                    decision.event_id, decision.trace_id
                );
                continue;
            }

            let intent = self.cache.get(&decision.ref_order_event_id).ok_or_else(|| {
                Error::IntentNotFound {
                    event_id: decision.ref_order_event_id.clone(),
                    trace_id: decision.trace_id.clone(),
                }
            })?;

            let side = Side::from_str(&intent.side).map_err(|_| Error::InvalidSide {
                side: intent.side.clone(),
                event_id: intent.event_id.clone(),
                trace_id: decision.trace_id.clone(),
            })?;
            if intent.symbol.trim().is_empty() {
                return Err(Error::MissingSymbol {
                    event_id: intent.event_id.clone(),
                    trace_id: decision.trace_id.clone(),
                });
            }

            let report = self
                .simulator
                .simulate(&intent, side, &decision.event_id)?;
            info!(
                "report for intent {}: {:?} qty={} px={} (trace {})",
                intent.event_id, report.status, report.filled_qty, report.avg_price,
                decision.trace_id
            );

            journal.append(&LogRecord::new(
                Action::Publish,
                topics::event_type::EXECUTION_REPORT,
                &decision.trace_id,
                step_id,
                json!({
                    "ref_order_event_id": report.ref_order_event_id,
                    "ref_risk_event_id": report.ref_risk_event_id,
                    "status": report.status,
                }),
            ))?;

            let payload = serde_json::to_value(&report).map_err(std::io::Error::other)?;
            self.bus.publish(
                topics::EXECUTION_REPORTS,
                topics::event_type::EXECUTION_REPORT,
                &decision.trace_id,
                payload,
            );

            if report.status.is_fill() {
                let net = self
                    .positions
                    .apply_fill(&intent.symbol, side, report.filled_qty);
                journal.append(&LogRecord::new(
                    Action::Persist,
                    topics::event_type::POSITION_UPDATE,
                    &decision.trace_id,
                    step_id,
                    json!({"symbol": intent.symbol, "net_position": net.to_string()}),
                ))?;
            }
        }

        Ok(consumed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fill::FillConfig;
    use crate::journal::MemoryJournal;
    use aegis_bus::MemoryBus;
    use aegis_core::{OrderIntent, OrderSize, ReasonSet, RiskDecision, RiskDecisionState};
    use rust_decimal_macros::dec;

    fn setup() -> (Arc<dyn EventBus>, Arc<IntentCache>, ExecutionWorker) {
        let bus: Arc<dyn EventBus> = Arc::new(MemoryBus::new());
        let cache = Arc::new(IntentCache::new());
        let worker = ExecutionWorker::new(
            bus.clone(),
            cache.clone(),
            FillSimulator::new(FillConfig::default()),
        );
        (bus, cache, worker)
    }

    fn publish_decision(bus: &Arc<dyn EventBus>, decision: &RiskDecision) {
        bus.publish(
            topics::RISK_DECISIONS,
            topics::event_type::RISK_DECISION,
            &decision.trace_id,
            decision.wire_payload(),
        );
    }

    fn allowed_decision(ref_order: &str, trace: &str) -> RiskDecision {
        RiskDecision::new(
            format!("rd-{}", ref_order),
            ref_order,
            trace,
            ReasonSet::new(),
            RiskDecisionState::default(),
        )
    }

    #[test]
    fn test_allowed_decision_yields_one_report() {
        let (bus, cache, mut worker) = setup();
        let mut journal = MemoryJournal::new();

        cache.insert(
            OrderIntent::new("ord-1", "BTC", "Buy", OrderSize::Qty(dec!(2)), "t-1")
                .with_limit_price(dec!(100)),
        );
        publish_decision(&bus, &allowed_decision("ord-1", "t-1"));

        assert_eq!(worker.step(&mut journal, 3).unwrap(), 1);
        let reports = bus.poll(topics::EXECUTION_REPORTS, 10);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].trace_id, "t-1");
        assert_eq!(worker.positions().position("BTC"), dec!(2));

        // One publish plus one persist journaled
        assert_eq!(journal.lines().len(), 2);
    }

    #[test]
    fn test_cache_miss_is_fatal_and_publishes_nothing() {
        let (bus, _cache, mut worker) = setup();
        let mut journal = MemoryJournal::new();
        publish_decision(&bus, &allowed_decision("ord-ghost", "t-9"));

        let err = worker.step(&mut journal, 1).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("ord-ghost"));
        assert!(message.contains("t-9"));
        assert!(matches!(err, Error::IntentNotFound { .. }));

        assert_eq!(bus.size(topics::EXECUTION_REPORTS), 0);
        assert!(journal.lines().is_empty());
    }

    #[test]
    fn test_invalid_side_is_fatal() {
        let (bus, cache, mut worker) = setup();
        let mut journal = MemoryJournal::new();

        cache.insert(
            OrderIntent::new("ord-1", "BTC", "hold", OrderSize::Qty(dec!(1)), "t-1")
                .with_limit_price(dec!(100)),
        );
        publish_decision(&bus, &allowed_decision("ord-1", "t-1"));

        let err = worker.step(&mut journal, 1).unwrap_err();
        assert!(matches!(err, Error::InvalidSide { .. }));
        assert!(err.to_string().contains("hold"));
        assert_eq!(bus.size(topics::EXECUTION_REPORTS), 0);
    }

    #[test]
    fn test_missing_symbol_is_fatal() {
        let (bus, cache, mut worker) = setup();
        let mut journal = MemoryJournal::new();

        cache.insert(
            OrderIntent::new("ord-1", "  ", "buy", OrderSize::Qty(dec!(1)), "t-1")
                .with_limit_price(dec!(100)),
        );
        publish_decision(&bus, &allowed_decision("ord-1", "t-1"));

        let err = worker.step(&mut journal, 1).unwrap_err();
        assert!(matches!(err, Error::MissingSymbol { .. }));
        assert_eq!(bus.size(topics::EXECUTION_REPORTS), 0);
    }

    #[test]
    fn test_rejected_decision_consumed_without_report() {
        let (bus, cache, mut worker) = setup();
        let mut journal = MemoryJournal::new();

        cache.insert(
            OrderIntent::new("ord-1", "BTC", "buy", OrderSize::Qty(dec!(1)), "t-1")
                .with_limit_price(dec!(100)),
        );
        let rejected = RiskDecision::new(
            "rd-1",
            "ord-1",
            "t-1",
            ["dd_hard"].into_iter().collect(),
            RiskDecisionState {
                allow_new_trades: false,
                ..Default::default()
            },
        );
        publish_decision(&bus, &rejected);

        assert_eq!(worker.step(&mut journal, 1).unwrap(), 1);
        assert_eq!(bus.size(topics::EXECUTION_REPORTS), 0);
        assert_eq!(bus.size(topics::RISK_DECISIONS), 0);
    }

    #[test]
    fn test_side_canonicalized_case_insensitively() {
        let (bus, cache, mut worker) = setup();
        let mut journal = MemoryJournal::new();

        cache.insert(
            OrderIntent::new("ord-1", "ETH", "sElL", OrderSize::Qty(dec!(3)), "t-1")
                .with_limit_price(dec!(10)),
        );
        publish_decision(&bus, &allowed_decision("ord-1", "t-1"));

        worker.step(&mut journal, 1).unwrap();
        assert_eq!(worker.positions().position("ETH"), dec!(-3));
    }
}
