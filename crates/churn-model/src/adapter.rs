//! The Inference Adapter — the one contract worth preserving exactly.
//!
//! Pure function from form inputs to (probability, verdict) plus one
//! fallible call into the loaded classifier:
//!
//! ```text
//! form values ─→ currency normalization ─→ Feature Record ─→ predict_proba ─→ verdict
//! ```
//!
//! The classifier is an explicitly constructed, immutable value passed in at
//! construction time, behind a trait seam, so tests substitute a stub model.
//! Nothing is persisted; each prediction builds a fresh record and discards
//! it after the call.

use serde::Deserialize;
use tracing::debug;

use crate::currency;
use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::{ChurnPipeline, CHURN_CLASS_INDEX};
use crate::record::{
    CustomerProfile, FeatureRecord, DEFAULT_MULTIPLE_LINES, DEFAULT_PAPERLESS_BILLING,
    DEFAULT_PHONE_SERVICE, DEFAULT_SENIOR_CITIZEN,
};
use crate::risk::{self, RiskVerdict};
use crate::schema::{
    Contract, Gender, InternetAddon, InternetService, PaymentMethod, YesNo, TENURE_MAX,
};

/// Anything that can score a batch of feature records.
///
/// Rows come back as `[P(stay), P(churn)]`; the churn class sits at
/// [`CHURN_CLASS_INDEX`].
pub trait ChurnClassifier {
    fn predict_proba(&self, batch: &[FeatureRecord]) -> PipelineResult<Vec<[f64; 2]>>;

    /// Top features pushing a record toward churn, for the verdict detail.
    /// Optional; stub classifiers can leave this empty.
    fn explain(&self, _record: &FeatureRecord) -> PipelineResult<Vec<(String, f64)>> {
        Ok(Vec::new())
    }
}

impl ChurnClassifier for ChurnPipeline {
    fn predict_proba(&self, batch: &[FeatureRecord]) -> PipelineResult<Vec<[f64; 2]>> {
        ChurnPipeline::predict_proba(self, batch)
    }

    fn explain(&self, record: &FeatureRecord) -> PipelineResult<Vec<(String, f64)>> {
        ChurnPipeline::explain(self, record)
    }
}

/// Raw form values for one prediction. The monetary amount is in local
/// currency; everything else is a schema domain value.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionRequest {
    pub tenure_months: u32,
    pub monthly_charges_local: f64,
    pub contract: Contract,
    pub internet_service: InternetService,
    pub payment_method: PaymentMethod,
    pub gender: Gender,
    pub partner: YesNo,
    pub dependents: YesNo,
    pub tech_support: InternetAddon,
    pub online_security: InternetAddon,
    pub online_backup: InternetAddon,
    pub device_protection: InternetAddon,
    pub streaming_tv: InternetAddon,
    pub streaming_movies: InternetAddon,
}

/// Outcome of one adapter invocation.
#[derive(Debug, Clone)]
pub struct Prediction {
    /// Probability of the churn class, in [0, 1].
    pub churn_probability: f64,
    pub verdict: RiskVerdict,
    /// Top contributing features, best first. Empty for stub classifiers.
    pub top_features: Vec<(String, f64)>,
}

/// The adapter. Holds the classifier it was constructed with; stateless
/// between invocations.
#[derive(Debug, Clone)]
pub struct ChurnAdapter<C> {
    classifier: C,
}

impl<C: ChurnClassifier> ChurnAdapter<C> {
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    #[cfg(test)]
    pub(crate) fn classifier_for_tests(&self) -> &C {
        &self.classifier
    }

    /// Run one prediction: normalize currency, assemble the record, invoke
    /// the classifier on a single-row batch, categorize.
    pub fn predict(&self, request: &PredictionRequest) -> PipelineResult<Prediction> {
        if request.tenure_months > TENURE_MAX {
            return Err(PipelineError::InvalidInput(format!(
                "tenure {} exceeds {} months",
                request.tenure_months, TENURE_MAX
            )));
        }
        if !request.monthly_charges_local.is_finite() || request.monthly_charges_local < 0.0 {
            return Err(PipelineError::InvalidInput(format!(
                "monthly charge {} is not a valid amount",
                request.monthly_charges_local
            )));
        }

        let monthly_charges = currency::to_model_unit(request.monthly_charges_local);
        let total_charges =
            currency::estimate_total_charges(monthly_charges, request.tenure_months);

        let profile = CustomerProfile {
            gender: request.gender,
            senior_citizen: DEFAULT_SENIOR_CITIZEN,
            partner: request.partner,
            dependents: request.dependents,
            tenure: request.tenure_months,
            phone_service: DEFAULT_PHONE_SERVICE,
            multiple_lines: DEFAULT_MULTIPLE_LINES,
            internet_service: request.internet_service,
            online_security: request.online_security,
            online_backup: request.online_backup,
            device_protection: request.device_protection,
            tech_support: request.tech_support,
            streaming_tv: request.streaming_tv,
            streaming_movies: request.streaming_movies,
            contract: request.contract,
            paperless_billing: DEFAULT_PAPERLESS_BILLING,
            payment_method: request.payment_method,
            monthly_charges,
            total_charges,
        };

        let record = FeatureRecord::from_profile(&profile);
        let rows = self.classifier.predict_proba(std::slice::from_ref(&record))?;
        let probabilities = rows.first().ok_or(PipelineError::EmptyBatchResult)?;
        let churn_probability = probabilities[CHURN_CLASS_INDEX];

        let verdict = risk::categorize(churn_probability);
        let top_features = self.classifier.explain(&record)?;

        debug!(
            tenure = request.tenure_months,
            monthly_model_unit = monthly_charges,
            total_charges,
            churn_probability,
            category = verdict.category.as_str(),
            "prediction complete"
        );

        Ok(Prediction {
            churn_probability,
            verdict,
            top_features,
        })
    }
}
