//! Intent publication.
//!
//! The translator from raw signals to intents is an external collaborator;
//! this type owns only the publication contract: assign the event id,
//! write the cache entry, journal, then publish. The cache write is
//! ordered before the publish so a decision can never reference an intent
//! the execution worker cannot resolve.

use crate::cache::IntentCache;
use crate::error::Result;
use crate::journal::{Action, Journal, LogRecord};
use aegis_bus::topics;
use aegis_core::{Envelope, IdGenerator, OrderIntent, OrderSize};
use aegis_ports::EventBus;
use log::debug;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::sync::Arc;

pub struct IntentProducer {
    bus: Arc<dyn EventBus>,
    cache: Arc<IntentCache>,
    ids: Box<dyn IdGenerator>,
}

impl IntentProducer {
    pub fn new(
        bus: Arc<dyn EventBus>,
        cache: Arc<IntentCache>,
        ids: Box<dyn IdGenerator>,
    ) -> Self {
        Self { bus, cache, ids }
    }

    /// Build, cache, journal, and publish one intent. Returns the stored
    /// envelope.
    #[allow(clippy::too_many_arguments)]
    pub fn publish_intent(
        &mut self,
        journal: &mut dyn Journal,
        step_id: u64,
        symbol: &str,
        side: &str,
        size: OrderSize,
        limit_price: Option<Decimal>,
        trace_id: &str,
        meta: Value,
    ) -> Result<Envelope> {
        let event_id = self.ids.next_id("ord");
        let mut intent = OrderIntent::new(event_id, symbol, side, size, trace_id).with_meta(meta);
        intent.limit_price = limit_price;

        // Cache write happens-before publish
        self.cache.insert(intent.clone());
        debug!(
            "intent {} cached and publishing: {} {} (trace {})",
            intent.event_id, intent.side, intent.symbol, trace_id
        );

        journal.append(&LogRecord::new(
            Action::Publish,
            topics::event_type::ORDER_INTENT,
            trace_id,
            step_id,
            json!({"event_id": intent.event_id, "symbol": intent.symbol}),
        ))?;

        let payload = serde_json::to_value(&intent).map_err(std::io::Error::other)?;
        Ok(self.bus.publish(
            topics::ORDER_INTENTS,
            topics::event_type::ORDER_INTENT,
            trace_id,
            payload,
        ))
    }
}
