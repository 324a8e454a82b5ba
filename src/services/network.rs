//! Feed-forward network over `ndarray` matrices.
//!
//! Weights are stored as one matrix per layer transition, shaped
//! `(next_layer, previous_layer)`, with sigmoid activations throughout.
//! Persistence is plain JSON of the weight matrices.

use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use serde::{Deserialize, Serialize};

use super::params::NetParameters;
use super::samples::Sample;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    weights: Vec<Array2<f64>>,
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn argmax(values: ArrayView1<f64>) -> usize {
    values
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(Ordering::Equal))
        .map(|(index, _)| index)
        .unwrap_or(0)
}

impl Network {
    /// Initialize a network with uniform random weights drawn from
    /// `(-weight_range, weight_range)`.
    pub fn create(parameters: &NetParameters) -> Self {
        let range = parameters.weight_range.abs().max(f64::EPSILON);
        let weights = parameters
            .layers
            .windows(2)
            .map(|pair| Array2::random((pair[1], pair[0]), Uniform::new(-range, range)))
            .collect();
        Self { weights }
    }

    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = self.weights.iter().map(|w| w.ncols()).collect();
        if let Some(last) = self.weights.last() {
            sizes.push(last.nrows());
        }
        sizes
    }

    pub fn input_len(&self) -> usize {
        self.weights.first().map(|w| w.ncols()).unwrap_or(0)
    }

    pub fn output_len(&self) -> usize {
        self.weights.last().map(|w| w.nrows()).unwrap_or(0)
    }

    pub fn weight_count(&self) -> usize {
        self.weights.iter().map(|w| w.len()).sum()
    }

    pub fn forward(&self, input: ArrayView1<f64>) -> Array1<f64> {
        self.weights
            .iter()
            .fold(input.to_owned(), |activation, weights| {
                weights.dot(&activation).mapv(sigmoid)
            })
    }

    /// One step of stochastic gradient descent on a single sample.
    pub fn train_sample(
        &mut self,
        features: ArrayView1<f64>,
        target: ArrayView1<f64>,
        learning_rate: f64,
    ) {
        let mut activations = vec![features.to_owned()];
        for weights in &self.weights {
            let next = weights
                .dot(activations.last().expect("activations start non-empty"))
                .mapv(sigmoid);
            activations.push(next);
        }

        let output = activations.last().expect("forward pass produced an output");
        let mut delta = (output - &target) * output.mapv(|a| a * (1.0 - a));

        for layer in (0..self.weights.len()).rev() {
            let gradient = outer(&delta, &activations[layer]);
            let propagated = if layer > 0 {
                let activation = &activations[layer];
                Some(self.weights[layer].t().dot(&delta) * activation.mapv(|a| a * (1.0 - a)))
            } else {
                None
            };

            self.weights[layer] -= &(gradient * learning_rate);
            if let Some(next_delta) = propagated {
                delta = next_delta;
            }
        }
    }

    /// Fraction of samples whose strongest output matches the strongest
    /// target component.
    pub fn accuracy(&self, samples: &[Sample]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let correct = samples
            .iter()
            .filter(|sample| {
                let features = Array1::from(sample.features.clone());
                let target = Array1::from(sample.target.clone());
                let output = self.forward(features.view());
                argmax(output.view()) == argmax(target.view())
            })
            .count();
        correct as f64 / samples.len() as f64
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        let payload = serde_json::to_string_pretty(self).context("Failed to serialize net")?;
        fs::write(path, payload)
            .with_context(|| format!("Failed to write net to {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read net from {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to deserialize net from {}", path.display()))
    }

    pub fn summary(&self) -> String {
        format!(
            "layers {:?}, {} weights",
            self.layer_sizes(),
            self.weight_count()
        )
    }
}

fn outer(column: &Array1<f64>, row: &Array1<f64>) -> Array2<f64> {
    let column = column.view().insert_axis(Axis(1));
    let row = row.view().insert_axis(Axis(0));
    column.dot(&row)
}
