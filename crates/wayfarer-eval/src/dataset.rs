use serde::Deserialize;
use std::path::Path;
use tracing::info;
use wayfarer_core::{WayfarerError, WayfarerResult};

/// One dataset sample: a raw travel request to plan and score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// Zero-based position within the dataset file.
    pub id: usize,
    /// The raw request text.
    pub query: String,
}

#[derive(Deserialize)]
struct RawSample {
    input_query: String,
}

/// Load samples from a JSON dataset file: a list of objects with an
/// `input_query` field. A `limit` takes the first N samples, so repeated
/// runs over the same file see the same subset.
pub fn load_samples(path: &Path, limit: Option<usize>) -> WayfarerResult<Vec<Sample>> {
    let text = std::fs::read_to_string(path)?;
    let raw: Vec<RawSample> = serde_json::from_str(&text)?;

    let mut samples: Vec<Sample> = raw
        .into_iter()
        .enumerate()
        .map(|(id, r)| Sample {
            id,
            query: r.input_query,
        })
        .collect();

    if let Some(limit) = limit {
        samples.truncate(limit);
    }

    if samples.is_empty() {
        return Err(WayfarerError::Config(format!(
            "dataset {} contains no samples",
            path.display()
        )));
    }

    info!(path = %path.display(), samples = samples.len(), "loaded dataset");
    Ok(samples)
}
