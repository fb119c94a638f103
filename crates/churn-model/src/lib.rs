//! # churn-model
//!
//! Feature-record assembly and inference adapter for the telco customer
//! churn pipeline.
//!
//! The predictive model arrives fully trained as a JSON artifact; this crate
//! performs no training and no feature engineering beyond a currency
//! conversion and one multiply. What it does own, exactly:
//!
//! - **Schema**: the 19 named columns, in order, with byte-exact categorical
//!   domains ([`schema`]).
//! - **Record assembly**: form inputs → one well-formed row ([`record`]).
//! - **Currency normalization**: local amount → model unit at a fixed,
//!   named rate ([`currency`]).
//! - **Pipeline**: artifact loading, validation, and the probability
//!   function ([`pipeline`]).
//! - **Categorization**: probability → High/Low verdict at a fixed
//!   threshold ([`risk`]).
//!
//! The adapter ties these together behind a classifier trait seam so tests
//! run against stub models ([`adapter`]).

pub mod adapter;
pub mod currency;
mod error;
pub mod pipeline;
pub mod record;
pub mod risk;
pub mod schema;

pub use adapter::{ChurnAdapter, ChurnClassifier, Prediction, PredictionRequest};
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{ChurnPipeline, PipelineArtifact, CHURN_CLASS_INDEX};
pub use record::{CustomerProfile, FeatureRecord, FieldValue};
pub use risk::{RiskCategory, RiskVerdict, HIGH_RISK_THRESHOLD_PERCENT};

#[cfg(test)]
mod tests;
