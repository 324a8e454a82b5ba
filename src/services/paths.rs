//! Derives the file paths of every persisted artifact from one general
//! directory plus a configurable file prefix and suffix.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct PathBuilder {
    default_general: PathBuf,
    general: PathBuf,
    file_prefix: String,
    file_suffix: String,
}

const DEFAULT_SUFFIX: &str = ".json";

impl PathBuilder {
    pub fn new(general: PathBuf) -> Self {
        Self {
            default_general: general.clone(),
            general,
            file_prefix: String::new(),
            file_suffix: DEFAULT_SUFFIX.to_string(),
        }
    }

    /// Restore the configured defaults.
    pub fn reset(&mut self) {
        self.general = self.default_general.clone();
        self.file_prefix = String::new();
        self.file_suffix = DEFAULT_SUFFIX.to_string();
    }

    pub fn set_general(&mut self, dir: PathBuf) {
        self.general = dir;
    }

    pub fn general(&self) -> &Path {
        &self.general
    }

    pub fn sample_set(&self) -> PathBuf {
        self.file("samples")
    }

    pub fn initialized_net(&self) -> PathBuf {
        self.file("net0")
    }

    pub fn trained_net(&self) -> PathBuf {
        self.file("net1")
    }

    pub fn net_parameters(&self) -> PathBuf {
        self.file("netpar")
    }

    pub fn trainer_parameters(&self) -> PathBuf {
        self.file("trainerpar")
    }

    fn file(&self, name: &str) -> PathBuf {
        self.general
            .join(format!("{}{}{}", self.file_prefix, name, self.file_suffix))
    }
}
