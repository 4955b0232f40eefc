use crate::config::{ModelConfig, ModelType};
use crate::models::classifier_trait::ClassifierModel;
use crate::models::decision_tree::DecisionTreeClassifier;
use crate::models::logistic::LogisticRegressionClassifier;
use crate::models::random_forest::RandomForestClassifier;
use crate::models::svm::SVMClassifier;

/// Build a boxed classifier model from a `ModelConfig`.
///
/// `seed` is handed to the models that draw random numbers while fitting.
pub fn build_model(params: ModelConfig, seed: u64) -> Box<dyn ClassifierModel> {
    match params.model_type {
        ModelType::LogisticRegression { .. } => Box::new(LogisticRegressionClassifier::new(params)),
        ModelType::DecisionTree { .. } => Box::new(DecisionTreeClassifier::new(params)),
        ModelType::RandomForest { .. } => Box::new(RandomForestClassifier::new(params, seed)),
        ModelType::SVM { .. } => Box::new(SVMClassifier::new(params)),
    }
}
