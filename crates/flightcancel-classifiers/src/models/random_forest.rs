use anyhow::{bail, Context, Result};
use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_ensemble::{EnsembleLearner, EnsembleLearnerParams};
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{ModelConfig, ModelType};
use crate::error::ClassifierError;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::decision_tree::split_quality;

/// Bagged ensemble of decision trees. Each tree is fitted on a bootstrap
/// sample drawn from an RNG seeded with the run seed; predictions are the
/// majority vote.
pub struct RandomForestClassifier {
    model: Option<EnsembleLearner<DecisionTree<f64, bool>>>,
    params: ModelConfig,
    seed: u64,
}

impl RandomForestClassifier {
    pub fn new(params: ModelConfig, seed: u64) -> Self {
        RandomForestClassifier {
            model: None,
            params,
            seed,
        }
    }
}

impl ClassifierModel for RandomForestClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<bool>) -> Result<()> {
        let ModelType::RandomForest {
            n_estimators,
            bootstrap_proportion,
            max_depth,
            split_criterion,
        } = &self.params.model_type
        else {
            bail!(
                "Expected ModelType::RandomForest params, got {:?}",
                self.params.model_type
            );
        };

        let dataset = Dataset::new(x.to_owned(), y.to_owned());
        let tree_params = DecisionTree::params()
            .split_quality(split_quality(*split_criterion))
            .max_depth(*max_depth);

        let model = EnsembleLearnerParams::new_fixed_rng(tree_params, StdRng::seed_from_u64(self.seed))
            .ensemble_size(*n_estimators)
            .bootstrap_proportion(*bootstrap_proportion)
            .fit(&dataset)
            .with_context(|| format!("Failed to fit {}", self.name()))?;

        log::debug!(
            "{}: fitted {} trees (bootstrap proportion {}, seed {})",
            self.name(),
            n_estimators,
            bootstrap_proportion,
            self.seed
        );

        self.model = Some(model);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<bool>> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| ClassifierError::ModelNotFitted(self.name().to_string()))?;
        let predictions: Array1<bool> = model.predict(x);
        Ok(predictions)
    }

    fn name(&self) -> &str {
        self.params.display_name()
    }
}
