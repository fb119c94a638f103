//! The serialized churn pipeline — a pre-fitted preprocessing + classifier
//! bundle loaded from a JSON artifact at process start.
//!
//! The artifact carries everything the fit produced:
//!
//! - the 19 column names in training order,
//! - per-column fitted encoders (one-hot category lists for categoricals,
//!   mean/scale standardization for numerics),
//! - logistic-regression weights over the encoded dimensions plus intercept.
//!
//! The runtime performs only inference — no training, no refitting. Scoring
//! a batch is: validate column names → encode each record → σ(w·x + b) →
//! per-class probabilities.
//!
//! Loading validates the artifact structurally (dimension agreement, finite
//! weights, usable scales) so a malformed artifact fails at startup, before
//! any form exists. Column-name and category checks run per record at
//! inference time, so a schema mismatch surfaces as a named error rather
//! than a silently wrong probability.

mod artifact;
mod encode;
mod math;

use std::path::Path;

use crate::error::PipelineResult;
use crate::record::FeatureRecord;

pub use artifact::{ColumnEncoder, ColumnSpec, PipelineArtifact, CHURN_CLASS_LABEL};

/// Index of the churn ("Yes") class in every probability row.
pub const CHURN_CLASS_INDEX: usize = 1;

/// A loaded, validated pipeline. Immutable after construction; share it
/// read-only (`Arc`) across sessions.
#[derive(Debug, Clone)]
pub struct ChurnPipeline {
    artifact: PipelineArtifact,
}

impl ChurnPipeline {
    /// Wrap an already-deserialized artifact, validating it first.
    pub fn from_artifact(artifact: PipelineArtifact) -> PipelineResult<Self> {
        artifact.validate()?;
        Ok(Self { artifact })
    }

    /// Load a pipeline from artifact JSON.
    pub fn from_json(json: &str) -> PipelineResult<Self> {
        Self::from_artifact(serde_json::from_str(json)?)
    }

    /// Load a pipeline from an artifact file path.
    pub fn from_file(path: &Path) -> PipelineResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn pipeline_id(&self) -> &str {
        &self.artifact.pipeline_id
    }

    pub fn pipeline_version(&self) -> &str {
        &self.artifact.pipeline_version
    }

    /// Per-row class probabilities `[P(stay), P(churn)]` for a batch.
    ///
    /// Fails on the first record whose columns or values disagree with the
    /// fitted schema; no partial output is produced.
    pub fn predict_proba(&self, batch: &[FeatureRecord]) -> PipelineResult<Vec<[f64; 2]>> {
        let mut rows = Vec::with_capacity(batch.len());
        for record in batch {
            let encoded = encode::encode_record(&self.artifact.columns, record)?;
            let z = math::dot(&self.artifact.weights, &encoded) + self.artifact.bias;
            let churn = math::sigmoid(z);
            rows.push([1.0 - churn, churn]);
        }
        Ok(rows)
    }

    /// Top encoded features pushing this record toward churn, as
    /// `("Contract=Month-to-month", contribution)` pairs.
    pub fn explain(&self, record: &FeatureRecord) -> PipelineResult<Vec<(String, f64)>> {
        let encoded = encode::encode_record(&self.artifact.columns, record)?;
        let labels = encode::dimension_labels(&self.artifact.columns);

        let mut contributions: Vec<(String, f64)> = labels
            .into_iter()
            .zip(encoded.iter())
            .enumerate()
            .map(|(i, (label, &x))| (label, self.artifact.weights[i] * x))
            .filter(|(_, c)| c.abs() > 0.01)
            .collect();
        contributions.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        contributions.truncate(5);
        Ok(contributions)
    }
}
