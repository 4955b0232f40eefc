use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

use crate::error::ClassifierError;

/// Central configuration for one model of the comparison.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Display name used in reports and export columns. Falls back to the
    /// model type's canonical name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub model_type: ModelType,
}

/// Impurity measure used by the tree-based models.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SplitCriterion {
    #[default]
    Gini,
    Entropy,
}

/// Supported model types and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum ModelType {
    LogisticRegression {
        /// L2 penalty strength
        alpha: f64,
        max_iterations: u64,
        gradient_tolerance: f64,
        fit_intercept: bool,
    },
    DecisionTree {
        max_depth: Option<usize>,
        min_weight_split: f32,
        min_weight_leaf: f32,
        split_criterion: SplitCriterion,
    },
    RandomForest {
        n_estimators: usize,
        bootstrap_proportion: f64,
        max_depth: Option<usize>,
        split_criterion: SplitCriterion,
    },
    SVM {
        eps: f64,
        c: (f64, f64),
        kernel: String,
        /// `None` derives the width from the training data as
        /// `n_features * var(X)`.
        gaussian_kernel_eps: Option<f64>,
        polynomial_kernel_constant: f64,
        polynomial_kernel_degree: f64,
    },
}

impl ModelType {
    pub fn logistic_regression() -> Self {
        ModelType::LogisticRegression {
            alpha: 1.0,
            max_iterations: 100,
            gradient_tolerance: 1e-4,
            fit_intercept: true,
        }
    }

    pub fn decision_tree() -> Self {
        ModelType::DecisionTree {
            max_depth: None,
            min_weight_split: 2.0,
            min_weight_leaf: 1.0,
            split_criterion: SplitCriterion::Gini,
        }
    }

    pub fn random_forest() -> Self {
        ModelType::RandomForest {
            n_estimators: 100,
            bootstrap_proportion: 1.0,
            max_depth: None,
            split_criterion: SplitCriterion::Gini,
        }
    }

    pub fn svm() -> Self {
        ModelType::SVM {
            eps: 1e-3,
            c: (1.0, 1.0),
            kernel: "gauss".to_string(),
            gaussian_kernel_eps: None,
            polynomial_kernel_constant: 1.0,
            polynomial_kernel_degree: 3.0,
        }
    }

    /// Canonical display name of the model type.
    pub fn display_name(&self) -> &'static str {
        match self {
            ModelType::LogisticRegression { .. } => "Logistic Regression",
            ModelType::DecisionTree { .. } => "Decision Tree",
            ModelType::RandomForest { .. } => "Random Forest",
            ModelType::SVM { .. } => "SVM",
        }
    }
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::logistic_regression()
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(|c: char| c == '-' || c == '_' || c == ' ', "").as_str() {
            "logistic" | "logisticregression" | "logreg" => Ok(ModelType::logistic_regression()),
            "tree" | "decisiontree" => Ok(ModelType::decision_tree()),
            "forest" | "randomforest" => Ok(ModelType::random_forest()),
            "svm" | "svc" => Ok(ModelType::svm()),
            _ => Err(format!(
                "Unknown model type: {}. Valid options are: logistic, tree, forest, svm",
                s
            )),
        }
    }
}

impl ModelConfig {
    pub fn new(model_type: ModelType) -> Self {
        Self {
            name: None,
            model_type,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .unwrap_or_else(|| self.model_type.display_name())
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::new(ModelType::default())
    }
}

/// The four models compared by a default run, in report order.
pub fn default_models() -> Vec<ModelConfig> {
    vec![
        ModelConfig::new(ModelType::logistic_regression()),
        ModelConfig::new(ModelType::decision_tree()),
        ModelConfig::new(ModelType::random_forest()),
        ModelConfig::new(ModelType::svm()),
    ]
}

/// Display names key the export columns and the figure files, so every
/// model of a run needs its own. Names are compared case-insensitively.
pub fn ensure_unique_names(models: &[ModelConfig]) -> Result<(), ClassifierError> {
    let mut seen = HashSet::new();
    for model in models {
        if !seen.insert(model.display_name().to_lowercase()) {
            return Err(ClassifierError::DuplicateModelName(
                model.display_name().to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_type_from_str_accepts_aliases() {
        assert_eq!(
            ModelType::from_str("Random-Forest").unwrap(),
            ModelType::random_forest()
        );
        assert_eq!(ModelType::from_str("svc").unwrap(), ModelType::svm());
        assert!(ModelType::from_str("knn").is_err());
    }

    #[test]
    fn model_config_json_uses_variant_tag() {
        let config = ModelConfig::new(ModelType::decision_tree()).with_name("Tree");
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"DecisionTree\""));
        assert!(json.contains("\"name\":\"Tree\""));
        let back: ModelConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn default_models_have_distinct_names() {
        let names: Vec<String> = default_models()
            .iter()
            .map(|m| m.display_name().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["Logistic Regression", "Decision Tree", "Random Forest", "SVM"]
        );
    }

    #[test]
    fn repeated_display_names_are_rejected() {
        let models = vec![
            ModelConfig::new(ModelType::decision_tree()),
            ModelConfig::new(ModelType::svm()),
            ModelConfig::new(ModelType::decision_tree()),
        ];
        let err = ensure_unique_names(&models).unwrap_err();
        assert!(matches!(err, ClassifierError::DuplicateModelName(ref name) if name == "Decision Tree"));

        // a distinct name makes the second tree valid
        let mut renamed = models;
        renamed[2] = ModelConfig::new(ModelType::decision_tree()).with_name("Shallow Tree");
        assert!(ensure_unique_names(&renamed).is_ok());

        let clash = vec![
            ModelConfig::new(ModelType::svm()),
            ModelConfig::new(ModelType::logistic_regression()).with_name("svm"),
        ];
        assert!(ensure_unique_names(&clash).is_err());
    }
}
