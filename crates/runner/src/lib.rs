//! Aegis Runner - Step-Driven Pipeline Orchestration
//!
//! Drives the whole order pipeline deterministically on one thread:
//!
//! - **Driver**: one step = risk worker pass, then execution worker pass,
//!   then report collection, all at the same step id
//! - **Drain loop**: steps until an iteration does no work and every topic
//!   is empty, then journals the completion marker
//! - **Scenario**: a canned demo batch exercising every decision outcome
//!
//! ## Architecture
//!
//! ```text
//!   submit()                 step()                    step()
//!      │                        │                         │
//!      ▼                        ▼                         ▼
//! ┌──────────┐  intents  ┌─────────────┐  decisions ┌────────────────┐
//! │ Producer │──────────▶│ Risk Worker │───────────▶│ Exec Worker    │
//! └────┬─────┘           └─────────────┘            └───────┬────────┘
//!      │ cache write                                        │ reports
//!      ▼                                                    ▼
//! ┌──────────────┐                                  ┌────────────────┐
//! │ Intent Cache │─────────────────────────────────▶│ Driver (sink)  │
//! └──────────────┘        resolve by event id       └────────────────┘
//! ```
//!
//! Every stage appends to one journal; `aegis-metrics` reduces it after
//! the run to check the conservation invariants.

pub mod driver;
pub mod error;
pub mod scenario;

pub use driver::{PipelineDriver, StepOutcome};
pub use error::{Error, Result};
pub use scenario::{run_scenario, ScenarioConfig, ScenarioResults};
