//! Aegis Metrics
//!
//! Offline reducer over the pipeline's newline-delimited journal. Used to
//! verify the conservation invariants after a run:
//!
//! - every intent gets exactly one risk decision
//! - every decision is either allowed or rejected
//! - every allowed decision yields exactly one execution report
//!
//! Unlike the workers, the reducer is resilient by design: blank or
//! unparsable lines are skipped silently. Log scraping must never crash
//! on a malformed line.

use log::trace;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::io::BufRead;

const ACTION_PUBLISH: &str = "publish";
const ACTION_PERSIST: &str = "persist";
const ACTION_COMPLETE: &str = "complete";

const SYSTEM_TRACE_ID: &str = "SYSTEM";

/// The slice of a journal line the reducer cares about. Extra fields are
/// ignored; missing optional fields default.
#[derive(Debug, Deserialize)]
struct JournalLine {
    action: String,
    #[serde(default)]
    event_type: String,
    #[serde(default)]
    trace_id: String,
    #[serde(default)]
    step_id: Value,
    #[serde(default)]
    extra: Value,
}

/// Counters reduced from one journal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsReport {
    pub num_order_intents: u64,
    pub num_risk_decisions_total: u64,
    pub num_risk_allowed: u64,
    pub num_risk_rejected: u64,
    pub num_execution_reports: u64,
    pub num_fills: u64,
    pub num_positions_updated: u64,
    pub drain_iterations: u64,
    pub max_step_id: u64,
    pub unique_trace_ids: u64,
}

impl MetricsReport {
    /// Reduce a newline-delimited journal. Malformed lines are skipped.
    pub fn from_reader(reader: impl BufRead) -> Self {
        let mut report = MetricsReport::default();
        let mut traces: BTreeSet<String> = BTreeSet::new();

        for line in reader.lines() {
            let Ok(line) = line else { break };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let Ok(record) = serde_json::from_str::<JournalLine>(trimmed) else {
                trace!("skipping unparsable journal line");
                continue;
            };
            report.ingest(&record, &mut traces);
        }

        report.unique_trace_ids = traces.len() as u64;
        report
    }

    /// Reduce an in-memory journal string.
    pub fn from_str_contents(contents: &str) -> Self {
        Self::from_reader(contents.as_bytes())
    }

    fn ingest(&mut self, record: &JournalLine, traces: &mut BTreeSet<String>) {
        match record.action.as_str() {
            ACTION_PUBLISH => match record.event_type.as_str() {
                "OrderIntent" => self.num_order_intents += 1,
                "RiskDecision" => {
                    self.num_risk_decisions_total += 1;
                    if record.extra.get("allowed").and_then(Value::as_bool) == Some(true) {
                        self.num_risk_allowed += 1;
                    } else {
                        self.num_risk_rejected += 1;
                    }
                }
                "ExecutionReport" => {
                    self.num_execution_reports += 1;
                    if let Some(status) = record.extra.get("status").and_then(Value::as_str) {
                        if status == "FILLED" || status == "PARTIALLY_FILLED" {
                            self.num_fills += 1;
                        }
                    }
                }
                _ => {}
            },
            ACTION_PERSIST => self.num_positions_updated += 1,
            ACTION_COMPLETE => {
                if let Some(iterations) =
                    record.extra.get("drain_iterations").and_then(Value::as_u64)
                {
                    self.drain_iterations = iterations;
                }
            }
            _ => return,
        }

        // Non-integer step ids are ignored, not errors
        if let Some(step_id) = record.step_id.as_u64() {
            self.max_step_id = self.max_step_id.max(step_id);
        }
        if !record.trace_id.is_empty() && record.trace_id != SYSTEM_TRACE_ID {
            traces.insert(record.trace_id.clone());
        }
    }

    /// True when every intent was decided, every decision split cleanly,
    /// and every allowed decision produced exactly one report.
    pub fn conserved(&self) -> bool {
        self.num_order_intents == self.num_risk_decisions_total
            && self.num_risk_decisions_total == self.num_risk_allowed + self.num_risk_rejected
            && self.num_risk_allowed == self.num_execution_reports
    }

    /// Summary with sorted keys, stable across runs.
    pub fn summary(&self) -> Value {
        json!({
            "num_order_intents": self.num_order_intents,
            "num_risk_decisions_total": self.num_risk_decisions_total,
            "num_risk_allowed": self.num_risk_allowed,
            "num_risk_rejected": self.num_risk_rejected,
            "num_execution_reports": self.num_execution_reports,
            "num_fills": self.num_fills,
            "num_positions_updated": self.num_positions_updated,
            "drain_iterations": self.drain_iterations,
            "max_step_id": self.max_step_id,
            "unique_trace_ids": self.unique_trace_ids,
        })
    }

    /// Canonical one-line JSON of the summary.
    pub fn summary_json(&self) -> String {
        self.summary().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_journal() -> String {
        [
            r#"{"action":"publish","event_type":"OrderIntent","trace_id":"t-1","step_id":1,"extra":{"event_id":"ord-1"}}"#,
            r#"{"action":"publish","event_type":"OrderIntent","trace_id":"t-2","step_id":1,"extra":{"event_id":"ord-2"}}"#,
            r#"{"action":"publish","event_type":"RiskDecision","trace_id":"t-1","step_id":2,"extra":{"allowed":true}}"#,
            r#"{"action":"publish","event_type":"RiskDecision","trace_id":"t-2","step_id":2,"extra":{"allowed":false}}"#,
            r#"{"action":"publish","event_type":"ExecutionReport","trace_id":"t-1","step_id":3,"extra":{"status":"FILLED"}}"#,
            r#"{"action":"persist","event_type":"PositionUpdate","trace_id":"t-1","step_id":3,"extra":{"symbol":"BTC"}}"#,
            r#"{"action":"complete","event_type":"PipelineComplete","trace_id":"SYSTEM","step_id":4,"extra":{"drain_iterations":3}}"#,
        ]
        .join("\n")
    }

    #[test]
    fn test_counters_from_sample() {
        let report = MetricsReport::from_str_contents(&sample_journal());

        assert_eq!(report.num_order_intents, 2);
        assert_eq!(report.num_risk_decisions_total, 2);
        assert_eq!(report.num_risk_allowed, 1);
        assert_eq!(report.num_risk_rejected, 1);
        assert_eq!(report.num_execution_reports, 1);
        assert_eq!(report.num_fills, 1);
        assert_eq!(report.num_positions_updated, 1);
        assert_eq!(report.drain_iterations, 3);
        assert_eq!(report.max_step_id, 4);
        // SYSTEM excluded
        assert_eq!(report.unique_trace_ids, 2);
        assert!(report.conserved());
    }

    #[test]
    fn test_malformed_and_blank_lines_skipped() {
        let journal = format!(
            "{}\n\n   \nnot json at all\n{{\"action\": 12}}\n{}",
            r#"{"action":"publish","event_type":"OrderIntent","trace_id":"t-1","step_id":1,"extra":{}}"#,
            r#"{"action":"publish","event_type":"OrderIntent","trace_id":"t-2","step_id":"later","extra":{}}"#,
        );
        let report = MetricsReport::from_str_contents(&journal);

        assert_eq!(report.num_order_intents, 2);
        // "later" is not an integer step id
        assert_eq!(report.max_step_id, 1);
    }

    #[test]
    fn test_partial_fills_count_as_fills() {
        let journal = [
            r#"{"action":"publish","event_type":"ExecutionReport","trace_id":"t-1","step_id":1,"extra":{"status":"PARTIALLY_FILLED"}}"#,
            r#"{"action":"publish","event_type":"ExecutionReport","trace_id":"t-2","step_id":1,"extra":{"status":"REJECTED"}}"#,
        ]
        .join("\n");
        let report = MetricsReport::from_str_contents(&journal);

        assert_eq!(report.num_execution_reports, 2);
        assert_eq!(report.num_fills, 1);
    }

    #[test]
    fn test_summary_keys_sorted() {
        let report = MetricsReport::from_str_contents(&sample_journal());
        let text = report.summary_json();

        let keys = [
            "drain_iterations",
            "max_step_id",
            "num_execution_reports",
            "num_fills",
            "num_order_intents",
            "num_positions_updated",
            "num_risk_allowed",
            "num_risk_decisions_total",
            "num_risk_rejected",
            "unique_trace_ids",
        ];
        let positions: Vec<usize> = keys
            .iter()
            .map(|k| text.find(&format!("\"{}\"", k)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_empty_journal() {
        let report = MetricsReport::from_str_contents("");
        assert_eq!(report, MetricsReport::default());
        assert!(report.conserved());
    }
}
