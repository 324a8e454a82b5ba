//! The trainer: epoch loop over the training partition with optional
//! per-epoch shuffling, reporting progress through the trainer status
//! channel.

use anyhow::{Result, bail};
use ndarray::Array1;
use rand::seq::SliceRandom;

use super::network::Network;
use super::params::TrainerParameters;
use super::samples::SampleSet;
use crate::pipeline::outcome::StageOutcome;
use crate::status::StatusSender;

#[derive(Debug, Clone)]
pub struct Trainer {
    parameters: TrainerParameters,
}

impl Trainer {
    /// Checkpointed construction: declines when the parameters are unusable
    /// or the sample shapes do not fit the net.
    pub fn create(
        parameters: &TrainerParameters,
        net: &Network,
        samples: &SampleSet,
        events: &StatusSender,
    ) -> StageOutcome<Self> {
        if parameters.epochs == 0 {
            events.initializer("Trainer parameters define zero epochs.");
            return StageOutcome::declined("zero epochs");
        }
        if samples.feature_len() != net.input_len() {
            events.initializer(format!(
                "Sample features ({}) do not match the net input layer ({}).",
                samples.feature_len(),
                net.input_len()
            ));
            return StageOutcome::declined("feature width mismatch");
        }
        if samples.target_len() != net.output_len() {
            events.initializer(format!(
                "Sample targets ({}) do not match the net output layer ({}).",
                samples.target_len(),
                net.output_len()
            ));
            return StageOutcome::declined("target width mismatch");
        }

        events.initializer("Trainer created.");
        StageOutcome::Proceed(Self {
            parameters: parameters.clone(),
        })
    }

    /// Train a copy of `net` over the training partition and return it.
    /// Accuracy after each epoch is measured on the validation partition
    /// when one exists, otherwise on the training partition itself.
    pub async fn train(
        &self,
        net: &Network,
        samples: &SampleSet,
        shuffle: bool,
        events: &StatusSender,
    ) -> Result<Network> {
        if samples.training.is_empty() {
            bail!("Sample set has no training samples.");
        }

        let mut trained = net.clone();
        let mut order: Vec<usize> = (0..samples.training.len()).collect();
        let evaluation = if samples.validation.is_empty() {
            &samples.training
        } else {
            &samples.validation
        };

        events.trainer(format!(
            "Training started: {} epochs over {} samples{}.",
            self.parameters.epochs,
            samples.training.len(),
            if shuffle { ", shuffled" } else { "" }
        ));

        for epoch in 1..=self.parameters.epochs {
            if shuffle {
                order.shuffle(&mut rand::thread_rng());
            }
            for &index in &order {
                let sample = &samples.training[index];
                let features = Array1::from(sample.features.clone());
                let target = Array1::from(sample.target.clone());
                trained.train_sample(features.view(), target.view(), self.parameters.learning_rate);
            }

            let accuracy = trained.accuracy(evaluation);
            events.trainer(format!(
                "Epoch {}/{} finished. Accuracy: {:.2} %",
                epoch,
                self.parameters.epochs,
                accuracy * 100.0
            ));
            tokio::task::yield_now().await;
        }

        events.trainer("Training finished.");
        Ok(trained)
    }
}
