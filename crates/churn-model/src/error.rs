use std::fmt;

/// Errors from artifact loading, record encoding, and inference.
#[derive(Debug)]
pub enum PipelineError {
    /// Artifact file could not be read.
    Io(std::io::Error),
    /// Artifact JSON could not be parsed.
    ParseJson(serde_json::Error),
    /// Artifact does not describe the expected number of columns.
    ColumnCountMismatch { expected: usize, got: usize },
    /// Record column name does not match the fitted column at that position.
    ColumnNameMismatch {
        index: usize,
        expected: String,
        got: String,
    },
    /// Classifier weight vector length disagrees with the encoded width.
    DimensionMismatch { expected: usize, got: usize },
    /// A classifier weight is NaN or infinite.
    NonFiniteWeight { index: usize, value: f64 },
    /// The intercept is NaN or infinite.
    NonFiniteBias(f64),
    /// A standardizing encoder was fitted with a zero scale.
    ZeroScale { column: String },
    /// A one-hot encoder carries no categories.
    EmptyCategories { column: String },
    /// Artifact class labels do not include the positive (churn) class.
    MissingChurnClass { classes: Vec<String> },
    /// Value not among the categories the encoder was fitted on.
    UnknownCategory { column: String, value: String },
    /// Record value type does not match what the column encoder expects.
    TypeMismatch {
        column: String,
        expected: &'static str,
    },
    /// Numeric record value is NaN or infinite.
    NonFiniteInput { column: String, value: f64 },
    /// Classifier returned no row for a non-empty batch.
    EmptyBatchResult,
    /// Request value outside its declared domain.
    InvalidInput(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "artifact io error: {}", err),
            Self::ParseJson(err) => write!(f, "artifact JSON parse error: {}", err),
            Self::ColumnCountMismatch { expected, got } => {
                write!(f, "artifact column count mismatch: expected {expected}, got {got}")
            }
            Self::ColumnNameMismatch {
                index,
                expected,
                got,
            } => write!(
                f,
                "column {index} mismatch: pipeline expects '{expected}', record has '{got}'"
            ),
            Self::DimensionMismatch { expected, got } => {
                write!(f, "weight dimension mismatch: expected {expected}, got {got}")
            }
            Self::NonFiniteWeight { index, value } => {
                write!(f, "non-finite weight at index {index}: {value}")
            }
            Self::NonFiniteBias(b) => write!(f, "non-finite bias: {b}"),
            Self::ZeroScale { column } => write!(f, "zero scale for column '{column}'"),
            Self::EmptyCategories { column } => {
                write!(f, "no fitted categories for column '{column}'")
            }
            Self::MissingChurnClass { classes } => {
                write!(f, "class labels {:?} carry no churn class", classes)
            }
            Self::UnknownCategory { column, value } => {
                write!(f, "value '{value}' not in fitted categories of column '{column}'")
            }
            Self::TypeMismatch { column, expected } => {
                write!(f, "column '{column}' expects a {expected} value")
            }
            Self::NonFiniteInput { column, value } => {
                write!(f, "non-finite value {value} for column '{column}'")
            }
            Self::EmptyBatchResult => write!(f, "classifier returned no rows"),
            Self::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::ParseJson(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(value: serde_json::Error) -> Self {
        Self::ParseJson(value)
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
