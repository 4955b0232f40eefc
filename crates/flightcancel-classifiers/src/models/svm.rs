use anyhow::{bail, Context, Result};
use linfa::dataset::Pr;
use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_svm::{Svm, SvmParams};
use ndarray::{Array1, Array2};

use crate::config::{ModelConfig, ModelType};
use crate::error::ClassifierError;
use crate::models::classifier_trait::ClassifierModel;

/// Support vector classifier with Platt-scaled probability estimates.
/// A row is predicted as cancelled when its probability reaches 0.5.
pub struct SVMClassifier {
    model: Option<Svm<f64, Pr>>,
    params: ModelConfig,
}

impl SVMClassifier {
    pub fn new(params: ModelConfig) -> Self {
        SVMClassifier {
            model: None,
            params,
        }
    }

    fn probabilities(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| ClassifierError::ModelNotFitted(self.name().to_string()))?;
        let predictions: Array1<Pr> = model.predict(x);
        Ok(predictions.mapv(|p| *p as f64))
    }
}

/// Gaussian kernel width matching a `gamma = 1 / (n_features * var(X))`
/// RBF kernel, since linfa's kernel is `exp(-||a - b||^2 / eps)`.
pub fn scaled_gaussian_eps(x: &Array2<f64>) -> f64 {
    let n = x.len();
    if n == 0 {
        return 1.0;
    }
    let mean = x.sum() / n as f64;
    let var = x.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n as f64;
    if var > 0.0 {
        x.ncols() as f64 * var
    } else {
        1.0
    }
}

impl ClassifierModel for SVMClassifier {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<bool>) -> Result<()> {
        let ModelType::SVM {
            eps,
            c,
            kernel,
            gaussian_kernel_eps,
            polynomial_kernel_constant,
            polynomial_kernel_degree,
        } = &self.params.model_type
        else {
            bail!("Expected ModelType::SVM params, got {:?}", self.params.model_type);
        };

        let dataset = Dataset::new(x.to_owned(), y.to_owned());

        let (c1, c2) = *c;
        let mut model: SvmParams<f64, Pr> = Svm::<f64, Pr>::params().eps(*eps).pos_neg_weights(c1, c2);

        // Chain the kernel configuration based on the kernel type
        model = match kernel.as_str() {
            "linear" => model.linear_kernel(),
            "gauss" | "rbf" => {
                let width = gaussian_kernel_eps.unwrap_or_else(|| scaled_gaussian_eps(x));
                log::debug!("{}: gaussian kernel eps = {}", self.name(), width);
                model.gaussian_kernel(width)
            }
            "poly" => model.polynomial_kernel(*polynomial_kernel_constant, *polynomial_kernel_degree),
            other => bail!(
                "Unsupported kernel type: {}. Valid options are: linear, gauss, poly",
                other
            ),
        };

        let fitted = model
            .fit(&dataset)
            .with_context(|| format!("Failed to fit {}", self.name()))?;
        log::debug!("{}: {}", self.name(), fitted);

        self.model = Some(fitted);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<bool>> {
        Ok(self.probabilities(x)?.mapv(|p| p >= 0.5))
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Option<Array1<f64>>> {
        Ok(Some(self.probabilities(x)?))
    }

    fn predict_with_proba(&self, x: &Array2<f64>) -> Result<(Array1<bool>, Option<Array1<f64>>)> {
        let probabilities = self.probabilities(x)?;
        Ok((probabilities.mapv(|p| p >= 0.5), Some(probabilities)))
    }

    fn name(&self) -> &str {
        self.params.display_name()
    }
}
