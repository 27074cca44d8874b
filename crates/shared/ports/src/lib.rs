//! Aegis Ports
//!
//! Port definitions (traits) for the Aegis risk pipeline.
//! These define the boundaries between domain logic and infrastructure.

mod bus;
mod liquidity;

pub use bus::EventBus;
pub use liquidity::{AlwaysPass, LiquidityFilter};
