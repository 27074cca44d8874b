mod decision;
mod envelope;
mod intent;
mod reasons;
mod report;
mod side;

pub use decision::{RiskDecision, RiskDecisionState, RiskDecisionWire};
pub use envelope::Envelope;
pub use intent::{OrderIntent, OrderSize};
pub use reasons::ReasonSet;
pub use report::{ExecutionReport, FillStatus};
pub use side::Side;
