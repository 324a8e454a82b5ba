//! Net and trainer parameter files.
//!
//! Both parameter sets are plain JSON documents. Loading is a checkpointed
//! stage: a missing or unreadable file declines instead of failing. Saving
//! honors the requested [`Formatting`].

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::grammar::PresetValue;
use crate::pipeline::outcome::StageOutcome;
use crate::status::StatusSender;

/// Output format of a saved parameter file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formatting {
    Compact,
    Indented,
}

impl Formatting {
    /// Pure mapping from a preset token to an output format. `indented`
    /// selects pretty-printed output, `no` compact output; everything else
    /// is illegal in this position.
    pub fn from_preset(preset: PresetValue) -> Option<Self> {
        match preset {
            PresetValue::Indented => Some(Self::Indented),
            PresetValue::No => Some(Self::Compact),
            PresetValue::Shuffle | PresetValue::Undefined => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetParameters {
    /// Neuron count per layer, input first, output last.
    pub layers: Vec<usize>,
    /// Half-width of the uniform interval the initial weights are drawn from.
    #[serde(default = "default_weight_range")]
    pub weight_range: f64,
}

fn default_weight_range() -> f64 {
    0.5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerParameters {
    pub learning_rate: f64,
    pub epochs: usize,
}

impl NetParameters {
    pub fn load(path: &Path, events: &StatusSender) -> Result<StageOutcome<Self>> {
        load_parameters(path, "Net parameters", events)
    }

    pub fn save(&self, path: &Path, formatting: Formatting, events: &StatusSender) -> Result<()> {
        save_parameters(self, path, formatting, "Net parameters", events)
    }
}

impl TrainerParameters {
    pub fn load(path: &Path, events: &StatusSender) -> Result<StageOutcome<Self>> {
        load_parameters(path, "Trainer parameters", events)
    }

    pub fn save(&self, path: &Path, formatting: Formatting, events: &StatusSender) -> Result<()> {
        save_parameters(self, path, formatting, "Trainer parameters", events)
    }
}

fn load_parameters<T: DeserializeOwned>(
    path: &Path,
    what: &str,
    events: &StatusSender,
) -> Result<StageOutcome<T>> {
    if !path.exists() {
        events.initializer(format!("{what} file not found: {}", path.display()));
        return Ok(StageOutcome::declined(format!("{what} file not found")));
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} from {}", what.to_lowercase(), path.display()))?;

    match serde_json::from_str(&raw) {
        Ok(parameters) => {
            events.initializer(format!("{what} loaded from {}.", path.display()));
            Ok(StageOutcome::Proceed(parameters))
        }
        Err(err) => {
            events.initializer(format!(
                "{what} file {} is not readable as JSON: {err}",
                path.display()
            ));
            Ok(StageOutcome::declined(format!("{what} file unreadable")))
        }
    }
}

fn save_parameters<T: Serialize>(
    parameters: &T,
    path: &Path,
    formatting: Formatting,
    what: &str,
    events: &StatusSender,
) -> Result<()> {
    let payload = match formatting {
        Formatting::Indented => serde_json::to_string_pretty(parameters),
        Formatting::Compact => serde_json::to_string(parameters),
    }
    .with_context(|| format!("Failed to serialize {}", what.to_lowercase()))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, payload)
        .with_context(|| format!("Failed to write {} to {}", what.to_lowercase(), path.display()))?;

    events.initializer(format!("{what} saved to {}.", path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status;
    use tempfile::tempdir;

    fn events() -> StatusSender {
        let (sender, _rx) = status::channel();
        sender
    }

    fn net_parameters() -> NetParameters {
        NetParameters {
            layers: vec![4, 8, 3],
            weight_range: 0.25,
        }
    }

    #[test]
    fn formatting_maps_indented_and_no() {
        assert_eq!(
            Formatting::from_preset(PresetValue::Indented),
            Some(Formatting::Indented)
        );
        assert_eq!(Formatting::from_preset(PresetValue::No), Some(Formatting::Compact));
        assert_eq!(Formatting::from_preset(PresetValue::Shuffle), None);
        assert_eq!(Formatting::from_preset(PresetValue::Undefined), None);
    }

    #[test]
    fn indented_round_trip_reconstructs_the_parameters() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("netpar.json");
        let original = net_parameters();

        original.save(&path, Formatting::Indented, &events()).unwrap();
        let loaded = NetParameters::load(&path, &events()).unwrap().proceed().unwrap();

        assert_eq!(loaded, original);
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains('\n'), "indented output should be pretty-printed");
    }

    #[test]
    fn compact_round_trip_reconstructs_the_parameters() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trainerpar.json");
        let original = TrainerParameters {
            learning_rate: 0.3,
            epochs: 12,
        };

        original.save(&path, Formatting::Compact, &events()).unwrap();
        let loaded = TrainerParameters::load(&path, &events())
            .unwrap()
            .proceed()
            .unwrap();

        assert_eq!(loaded, original);
        let raw = fs::read_to_string(&path).unwrap();
        assert!(!raw.contains('\n'), "compact output should be a single line");
    }

    #[test]
    fn loading_a_missing_file_declines() {
        let dir = tempdir().unwrap();
        let outcome = NetParameters::load(&dir.path().join("netpar.json"), &events()).unwrap();
        assert!(outcome.is_declined());
    }

    #[test]
    fn loading_invalid_json_declines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("netpar.json");
        fs::write(&path, "not json").unwrap();
        let outcome = NetParameters::load(&path, &events()).unwrap();
        assert!(outcome.is_declined());
    }

    #[test]
    fn weight_range_defaults_when_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("netpar.json");
        fs::write(&path, r#"{"layers": [2, 2]}"#).unwrap();
        let loaded = NetParameters::load(&path, &events()).unwrap().proceed().unwrap();
        assert_eq!(loaded.weight_range, 0.5);
    }
}
