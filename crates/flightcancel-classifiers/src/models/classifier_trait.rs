use anyhow::Result;
use ndarray::{Array1, Array2};

/// A small trait abstraction over the classifiers compared by a run.
///
/// Labels use the crate convention: `true` for a cancelled flight (the
/// positive class), `false` otherwise.
pub trait ClassifierModel {
    /// Fit the model on a feature matrix (rows are samples) and its labels.
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<bool>) -> Result<()>;

    /// Predict a class label for every row of `x`.
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<bool>>;

    /// Positive-class probabilities (0..1) when the model provides them.
    fn predict_proba(&self, _x: &Array2<f64>) -> Result<Option<Array1<f64>>> {
        Ok(None)
    }

    /// Labels and probabilities for the same rows. Models whose labels are
    /// derived from their probabilities override this to score `x` once.
    fn predict_with_proba(&self, x: &Array2<f64>) -> Result<(Array1<bool>, Option<Array1<f64>>)> {
        Ok((self.predict(x)?, self.predict_proba(x)?))
    }

    /// Human readable name, used for report sections and export columns.
    fn name(&self) -> &str {
        "classifier"
    }
}
