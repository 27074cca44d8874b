//! Pipeline-integrity errors.
//!
//! These are programming or ordering bugs, not business outcomes: a
//! decision published before its intent, or an intent that should never
//! have passed the translator. Workers fail fast on them and publish
//! nothing for the offending unit of work.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("order intent {event_id} not found in intent cache (trace {trace_id})")]
    IntentNotFound { event_id: String, trace_id: String },

    #[error("invalid side {side:?} on intent {event_id} (trace {trace_id})")]
    InvalidSide {
        side: String,
        event_id: String,
        trace_id: String,
    },

    #[error("missing symbol on intent {event_id} (trace {trace_id})")]
    MissingSymbol { event_id: String, trace_id: String },

    #[error("malformed {event_type} payload at seq {seq}: {detail}")]
    MalformedPayload {
        event_type: String,
        seq: u64,
        detail: String,
    },

    #[error("journal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
