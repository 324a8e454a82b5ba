//! Sample data: loading, partitioning and persistence.
//!
//! A sample file is a JSON array of `{features, target}` records. Loading
//! partitions the records in file order into training, validation and test
//! sets according to the requested fractions.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::pipeline::outcome::StageOutcome;
use crate::status::StatusSender;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub features: Vec<f64>,
    pub target: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    pub training: Vec<Sample>,
    pub validation: Vec<Sample>,
    pub test: Vec<Sample>,
}

impl SampleSet {
    /// Load a sample file and partition it. A missing, unreadable or empty
    /// file declines the stage.
    pub fn load(
        path: &Path,
        validation_fraction: f64,
        test_fraction: f64,
        events: &StatusSender,
    ) -> Result<StageOutcome<Self>> {
        if !path.exists() {
            events.data_provider(format!("Sample set file not found: {}", path.display()));
            return Ok(StageOutcome::declined("sample set file not found"));
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read sample set from {}", path.display()))?;

        let samples: Vec<Sample> = match serde_json::from_str(&raw) {
            Ok(samples) => samples,
            Err(err) => {
                events.data_provider(format!(
                    "Sample set file {} is not readable as JSON: {err}",
                    path.display()
                ));
                return Ok(StageOutcome::declined("sample set file unreadable"));
            }
        };
        if samples.is_empty() {
            events.data_provider(format!("Sample set file {} is empty.", path.display()));
            return Ok(StageOutcome::declined("sample set file is empty"));
        }

        let set = Self::partition(samples, validation_fraction, test_fraction);
        events.data_provider(format!(
            "Sample set loaded: {} training, {} validation, {} test samples.",
            set.training.len(),
            set.validation.len(),
            set.test.len()
        ));
        Ok(StageOutcome::Proceed(set))
    }

    /// Split records in file order: training first, then validation, then
    /// test. Counts are rounded from the fractions.
    fn partition(samples: Vec<Sample>, validation_fraction: f64, test_fraction: f64) -> Self {
        let total = samples.len();
        let test_count = (total as f64 * test_fraction).round() as usize;
        let validation_count = (total as f64 * validation_fraction).round() as usize;
        let training_count = total.saturating_sub(validation_count + test_count);

        let mut remaining = samples;
        let test = remaining.split_off(remaining.len() - test_count.min(remaining.len()));
        let validation =
            remaining.split_off(remaining.len() - validation_count.min(remaining.len()));
        debug_assert_eq!(remaining.len(), training_count);

        Self {
            training: remaining,
            validation,
            test,
        }
    }

    /// Write all partitions back as one record list, in partition order.
    pub fn save(&self, path: &Path, events: &StatusSender) -> Result<()> {
        let all: Vec<&Sample> = self
            .training
            .iter()
            .chain(&self.validation)
            .chain(&self.test)
            .collect();
        let payload =
            serde_json::to_string_pretty(&all).context("Failed to serialize sample set")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, payload)
            .with_context(|| format!("Failed to write sample set to {}", path.display()))?;

        events.data_provider(format!("Sample set saved to {}.", path.display()));
        Ok(())
    }

    /// Feature width, taken from the first available sample.
    pub fn feature_len(&self) -> usize {
        self.first().map(|s| s.features.len()).unwrap_or(0)
    }

    /// Target width, taken from the first available sample.
    pub fn target_len(&self) -> usize {
        self.first().map(|s| s.target.len()).unwrap_or(0)
    }

    fn first(&self) -> Option<&Sample> {
        self.training
            .first()
            .or_else(|| self.validation.first())
            .or_else(|| self.test.first())
    }
}
