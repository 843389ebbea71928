use crate::record::EvaluationRecord;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use wayfarer_core::WayfarerResult;

/// Append-only JSONL store for evaluation records: one record per line,
/// never overwritten in place. Re-running an evaluation appends a new
/// batch; consumers distinguish runs by timestamp.
pub struct JsonlStore {
    path: PathBuf,
}

impl JsonlStore {
    /// A store backed by the given file; created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a single JSON line.
    pub fn append(&self, record: &EvaluationRecord) -> WayfarerResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_string(record)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    /// Append a batch of records.
    pub fn append_all(&self, records: &[EvaluationRecord]) -> WayfarerResult<()> {
        for record in records {
            self.append(record)?;
        }
        info!(path = %self.path.display(), records = records.len(), "records persisted");
        Ok(())
    }

    /// Read every record back, in append order.
    pub fn read_all(&self) -> WayfarerResult<Vec<EvaluationRecord>> {
        let file = std::fs::File::open(&self.path)?;
        let reader = BufReader::new(file);

        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line)?);
        }
        Ok(records)
    }
}
