use anyhow::{bail, Context, Result};
use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_trees::{DecisionTree, SplitQuality};
use ndarray::{Array1, Array2};

use crate::config::{ModelConfig, ModelType, SplitCriterion};
use crate::error::ClassifierError;
use crate::models::classifier_trait::ClassifierModel;

pub(crate) fn split_quality(criterion: SplitCriterion) -> SplitQuality {
    match criterion {
        SplitCriterion::Gini => SplitQuality::Gini,
        SplitCriterion::Entropy => SplitQuality::Entropy,
    }
}

/// Single CART decision tree classifier
pub struct DecisionTreeClassifier {
    model: Option<DecisionTree<f64, bool>>,
    params: ModelConfig,
}

impl DecisionTreeClassifier {
    pub fn new(params: ModelConfig) -> Self {
        DecisionTreeClassifier {
            model: None,
            params,
        }
    }
}

impl ClassifierModel for DecisionTreeClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<bool>) -> Result<()> {
        let ModelType::DecisionTree {
            max_depth,
            min_weight_split,
            min_weight_leaf,
            split_criterion,
        } = &self.params.model_type
        else {
            bail!(
                "Expected ModelType::DecisionTree params, got {:?}",
                self.params.model_type
            );
        };

        let dataset = Dataset::new(x.to_owned(), y.to_owned());

        let model = DecisionTree::params()
            .split_quality(split_quality(*split_criterion))
            .max_depth(*max_depth)
            .min_weight_split(*min_weight_split)
            .min_weight_leaf(*min_weight_leaf)
            .fit(&dataset)
            .with_context(|| format!("Failed to fit {}", self.name()))?;

        log::debug!(
            "{}: fitted tree with depth {} and {} leaves",
            self.name(),
            model.max_depth(),
            model.num_leaves()
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
