use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Domain errors raised by the classification pipeline.
///
/// Most pipeline functions return `anyhow::Result`; these variants are the
/// conditions a caller may want to tell apart via `downcast_ref`.
#[derive(Debug)]
pub enum ClassifierError {
    DataFileNotFound(PathBuf),
    MissingColumn(String),
    InvalidTestSize(f64),
    /// Class label and its number of members
    InsufficientClassMembers(bool, usize),
    SingleClass(bool),
    ModelNotFitted(String),
    /// Two models of one run share a display name
    DuplicateModelName(String),
    LengthMismatch { expected: usize, found: usize },
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClassifierError::DataFileNotFound(path) => {
                write!(f, "Data file not found: {}", path.display())
            }
            ClassifierError::MissingColumn(name) => write!(f, "Missing column '{}'", name),
            ClassifierError::InvalidTestSize(size) => {
                write!(f, "Test size must be in (0, 1), got {}", size)
            }
            ClassifierError::InsufficientClassMembers(label, count) => write!(
                f,
                "The least populated class ({}) has only {} member(s); stratified splitting needs at least 2",
                *label as u8, count
            ),
            ClassifierError::SingleClass(label) => write!(
                f,
                "Target contains a single class ({}); binary classification needs both",
                *label as u8
            ),
            ClassifierError::ModelNotFitted(name) => {
                write!(f, "Model '{}' must be fitted before predicting", name)
            }
            ClassifierError::DuplicateModelName(name) => write!(
                f,
                "Model name '{}' is used more than once; give each model a distinct \"name\"",
                name
            ),
            ClassifierError::LengthMismatch { expected, found } => write!(
                f,
                "Length mismatch: expected {} values, found {}",
                expected, found
            ),
        }
    }
}

impl Error for ClassifierError {}
