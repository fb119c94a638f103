use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::schema::COLUMN_COUNT;

/// Class label of the positive (churn) class in the artifact.
pub const CHURN_CLASS_LABEL: &str = "Yes";

/// Fitted transformation for one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnEncoder {
    /// One-hot over the fitted category list, in fit order.
    OneHot { categories: Vec<String> },
    /// `(x - mean) / scale` for numeric columns.
    Standardize { mean: f64, scale: f64 },
}

impl ColumnEncoder {
    /// Number of encoded dimensions this column occupies.
    pub fn encoded_width(&self) -> usize {
        match self {
            Self::OneHot { categories } => categories.len(),
            Self::Standardize { .. } => 1,
        }
    }
}

/// One fitted column: its training-data name plus its encoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub encoder: ColumnEncoder,
}

/// Serialized fitted pipeline — the deserialized form of the JSON artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineArtifact {
    /// Human-readable pipeline identifier.
    pub pipeline_id: String,
    /// Version stamp of the training run that produced the artifact.
    pub pipeline_version: String,
    /// When the pipeline was fitted (informational).
    #[serde(default)]
    pub trained_at_utc: Option<String>,
    /// Class labels; the churn class must sit at index 1.
    pub classes: Vec<String>,
    /// Fitted columns, in the order records must present them.
    pub columns: Vec<ColumnSpec>,
    /// Logistic weights, one per encoded dimension, column-major in
    /// `columns` order.
    pub weights: Vec<f64>,
    /// Intercept term.
    pub bias: f64,
}

impl PipelineArtifact {
    /// Structural validation. Runs at load time so a malformed artifact is
    /// fatal before any input is accepted.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.columns.len() != COLUMN_COUNT {
            return Err(PipelineError::ColumnCountMismatch {
                expected: COLUMN_COUNT,
                got: self.columns.len(),
            });
        }

        if self.classes.len() != 2 || self.classes[1] != CHURN_CLASS_LABEL {
            return Err(PipelineError::MissingChurnClass {
                classes: self.classes.clone(),
            });
        }

        let mut width = 0usize;
        for column in &self.columns {
            match &column.encoder {
                ColumnEncoder::OneHot { categories } => {
                    if categories.is_empty() {
                        return Err(PipelineError::EmptyCategories {
                            column: column.name.clone(),
                        });
                    }
                }
                ColumnEncoder::Standardize { mean, scale } => {
                    if *scale == 0.0 || !scale.is_finite() {
                        return Err(PipelineError::ZeroScale {
                            column: column.name.clone(),
                        });
                    }
                    if !mean.is_finite() {
                        return Err(PipelineError::NonFiniteInput {
                            column: column.name.clone(),
                            value: *mean,
                        });
                    }
                }
            }
            width += column.encoder.encoded_width();
        }

        if self.weights.len() != width {
            return Err(PipelineError::DimensionMismatch {
                expected: width,
                got: self.weights.len(),
            });
        }
        for (i, &w) in self.weights.iter().enumerate() {
            if !w.is_finite() {
                return Err(PipelineError::NonFiniteWeight { index: i, value: w });
            }
        }
        if !self.bias.is_finite() {
            return Err(PipelineError::NonFiniteBias(self.bias));
        }
        Ok(())
    }
}
