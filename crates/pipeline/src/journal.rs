//! Structured event journal.
//!
//! One JSON object per line, append-only. Records never carry timestamps,
//! so a run's journal is reproducible bit-for-bit. The journal is the
//! pipeline's durable trace and the sole input to the metrics reducer.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Journal record kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Publish,
    Persist,
    Complete,
}

/// One journal line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub action: Action,
    pub event_type: String,
    pub trace_id: String,
    pub step_id: u64,
    #[serde(default)]
    pub extra: Value,
}

impl LogRecord {
    pub fn new(
        action: Action,
        event_type: impl Into<String>,
        trace_id: impl Into<String>,
        step_id: u64,
        extra: Value,
    ) -> Self {
        Self {
            action,
            event_type: event_type.into(),
            trace_id: trace_id.into(),
            step_id,
            extra,
        }
    }

    /// Canonical line form (sorted keys via the ordered JSON map).
    pub fn to_line(&self) -> String {
        // A LogRecord is plain strings, an integer, and a parsed Value;
        // serialization cannot fail.
        serde_json::to_value(self)
            .map(|v| v.to_string())
            .unwrap_or_default()
    }
}

/// Append-only record sink.
pub trait Journal: Send {
    fn append(&mut self, record: &LogRecord) -> Result<()>;

    /// Flush buffered lines to the underlying store.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Buffered file-backed journal (newline-delimited JSON).
#[derive(Debug)]
pub struct FileJournal {
    writer: BufWriter<File>,
}

impl FileJournal {
    /// Open for appending, creating the file if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Journal for FileJournal {
    fn append(&mut self, record: &LogRecord) -> Result<()> {
        self.writer.write_all(record.to_line().as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// In-memory journal for tests and for feeding the metrics reducer
/// without touching disk.
#[derive(Debug, Default)]
pub struct MemoryJournal {
    lines: Vec<String>,
}

impl MemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The full journal as newline-delimited JSON.
    pub fn contents(&self) -> String {
        self.lines.join("\n")
    }
}

impl Journal for MemoryJournal {
    fn append(&mut self, record: &LogRecord) -> Result<()> {
        self.lines.push(record.to_line());
        Ok(())
    }
}

/// Discards every record.
#[derive(Debug, Default)]
pub struct NullJournal;

impl Journal for NullJournal {
    fn append(&mut self, _record: &LogRecord) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_line_is_sorted_and_timestamp_free() {
        let record = LogRecord::new(
            Action::Publish,
            "OrderIntent",
            "t-1",
            3,
            json!({"allowed": true}),
        );
        let line = record.to_line();

        // Keys sorted: action < event_type < extra < step_id < trace_id
        let positions: Vec<usize> = ["\"action\"", "\"event_type\"", "\"extra\"", "\"step_id\"", "\"trace_id\""]
            .iter()
            .map(|k| line.find(k).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(!line.contains("timestamp"));
    }

    #[test]
    fn test_action_wire_names() {
        assert_eq!(serde_json::to_string(&Action::Publish).unwrap(), "\"publish\"");
        assert_eq!(serde_json::to_string(&Action::Persist).unwrap(), "\"persist\"");
        assert_eq!(
            serde_json::to_string(&Action::Complete).unwrap(),
            "\"complete\""
        );
    }

    #[test]
    fn test_memory_journal_accumulates() {
        let mut journal = MemoryJournal::new();
        journal
            .append(&LogRecord::new(Action::Publish, "A", "t", 1, json!({})))
            .unwrap();
        journal
            .append(&LogRecord::new(Action::Complete, "B", "SYSTEM", 2, json!({})))
            .unwrap();

        assert_eq!(journal.lines().len(), 2);
        let parsed: LogRecord = serde_json::from_str(&journal.lines()[0]).unwrap();
        assert_eq!(parsed.action, Action::Publish);
    }

    #[test]
    fn test_file_journal_round_trip() {
        let dir = std::env::temp_dir().join("aegis-journal-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("journal-{}.ndjson", std::process::id()));
        let _ = std::fs::remove_file(&path);

        {
            let mut journal = FileJournal::open(&path).unwrap();
            journal
                .append(&LogRecord::new(Action::Publish, "A", "t", 1, json!({})))
                .unwrap();
            journal.flush().unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
        std::fs::remove_file(&path).unwrap();
    }
}
