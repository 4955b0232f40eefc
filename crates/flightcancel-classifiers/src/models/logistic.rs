use anyhow::{bail, Context, Result};
use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_logistic::{FittedLogisticRegression, LogisticRegression};
use ndarray::{Array1, Array2};

use crate::config::{ModelConfig, ModelType};
use crate::error::ClassifierError;
use crate::models::classifier_trait::ClassifierModel;

/// L2-regularised logistic regression classifier
pub struct LogisticRegressionClassifier {
    model: Option<FittedLogisticRegression<f64, bool>>,
    params: ModelConfig,
}

impl LogisticRegressionClassifier {
    pub fn new(params: ModelConfig) -> Self {
        LogisticRegressionClassifier {
            model: None,
            params,
        }
    }

    fn fitted(&self) -> Result<&FittedLogisticRegression<f64, bool>> {
        self.model
            .as_ref()
            .ok_or_else(|| ClassifierError::ModelNotFitted(self.name().to_string()).into())
    }
}

impl ClassifierModel for LogisticRegressionClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<bool>) -> Result<()> {
        let ModelType::LogisticRegression {
            alpha,
            max_iterations,
            gradient_tolerance,
            fit_intercept,
        } = &self.params.model_type
        else {
            bail!(
                "Expected ModelType::LogisticRegression params, got {:?}",
                self.params.model_type
            );
        };

        let dataset = Dataset::new(x.to_owned(), y.to_owned());

        let model = LogisticRegression::default()
            .alpha(*alpha)
            .max_iterations(*max_iterations)
            .gradient_tolerance(*gradient_tolerance)
            .with_intercept(*fit_intercept)
            .fit(&dataset)
            .with_context(|| format!("Failed to fit {}", self.name()))?;

        self.model = Some(model);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<bool>> {
        let predictions: Array1<bool> = self.fitted()?.predict(x);
        Ok(predictions)
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Option<Array1<f64>>> {
        let model = self.fitted()?;
        let probabilities = model.predict_probabilities(x);

        // probabilities refer to the class linfa picked as positive
        if model.labels().pos.class {
            Ok(Some(probabilities))
        } else {
            Ok(Some(probabilities.mapv(|p| 1.0 - p)))
        }
    }

    fn name(&self) -> &str {
        self.params.display_name()
    }
}
