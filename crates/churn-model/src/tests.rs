use std::cell::RefCell;

use crate::adapter::{ChurnAdapter, ChurnClassifier, PredictionRequest};
use crate::currency::EXCHANGE_RATE;
use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::{ChurnPipeline, ColumnEncoder, ColumnSpec, PipelineArtifact};
use crate::record::{FeatureRecord, FieldValue};
use crate::risk::RiskCategory;
use crate::schema::{
    Contract, Gender, InternetAddon, InternetService, PaymentMethod, YesNo, COLUMN_COUNT,
    COLUMN_NAMES,
};

// ─── Fixtures ───────────────────────────────────────────────────

fn one_hot(name: &str, categories: &[&str]) -> ColumnSpec {
    ColumnSpec {
        name: name.to_string(),
        encoder: ColumnEncoder::OneHot {
            categories: categories.iter().map(|c| c.to_string()).collect(),
        },
    }
}

fn standardize(name: &str) -> ColumnSpec {
    ColumnSpec {
        name: name.to_string(),
        encoder: ColumnEncoder::Standardize {
            mean: 0.0,
            scale: 1.0,
        },
    }
}

/// Artifact covering the full 19-column schema with identity scaling.
/// Encoded width: 44 dimensions.
fn fitted_artifact(weights: Vec<f64>, bias: f64) -> PipelineArtifact {
    let yes_no: &[&str] = &["Yes", "No"];
    let addon: &[&str] = &["Yes", "No", "No internet service"];
    PipelineArtifact {
        pipeline_id: "telco-churn-test".to_string(),
        pipeline_version: "test.1".to_string(),
        trained_at_utc: None,
        classes: vec!["No".to_string(), "Yes".to_string()],
        columns: vec![
            one_hot("gender", &["Male", "Female"]),
            standardize("SeniorCitizen"),
            one_hot("Partner", yes_no),
            one_hot("Dependents", yes_no),
            standardize("tenure"),
            one_hot("PhoneService", yes_no),
            one_hot("MultipleLines", yes_no),
            one_hot("InternetService", &["DSL", "Fiber optic", "No"]),
            one_hot("OnlineSecurity", addon),
            one_hot("OnlineBackup", addon),
            one_hot("DeviceProtection", addon),
            one_hot("TechSupport", addon),
            one_hot("StreamingTV", addon),
            one_hot("StreamingMovies", addon),
            one_hot("Contract", &["Month-to-month", "One year", "Two year"]),
            one_hot("PaperlessBilling", yes_no),
            one_hot(
                "PaymentMethod",
                &[
                    "Electronic check",
                    "Mailed check",
                    "Bank transfer (automatic)",
                    "Credit card (automatic)",
                ],
            ),
            standardize("MonthlyCharges"),
            standardize("TotalCharges"),
        ],
        weights,
        bias,
    }
}

const ENCODED_WIDTH: usize = 44;
// Encoded offset of the Contract one-hot block (Month-to-month first).
const CONTRACT_OFFSET: usize = 33;

fn sample_request() -> PredictionRequest {
    PredictionRequest {
        tenure_months: 12,
        monthly_charges_local: 1_000_000.0,
        contract: Contract::MonthToMonth,
        internet_service: InternetService::FiberOptic,
        payment_method: PaymentMethod::ElectronicCheck,
        gender: Gender::Female,
        partner: YesNo::Yes,
        dependents: YesNo::No,
        tech_support: InternetAddon::No,
        online_security: InternetAddon::No,
        online_backup: InternetAddon::No,
        device_protection: InternetAddon::No,
        streaming_tv: InternetAddon::Yes,
        streaming_movies: InternetAddon::Yes,
    }
}

/// Stub classifier that records what it was invoked with and replies with a
/// fixed churn probability.
struct CaptureClassifier {
    reply: f64,
    seen: RefCell<Vec<FeatureRecord>>,
}

impl CaptureClassifier {
    fn new(reply: f64) -> Self {
        Self {
            reply,
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl ChurnClassifier for CaptureClassifier {
    fn predict_proba(&self, batch: &[FeatureRecord]) -> PipelineResult<Vec<[f64; 2]>> {
        self.seen.borrow_mut().extend(batch.iter().cloned());
        Ok(batch.iter().map(|_| [1.0 - self.reply, self.reply]).collect())
    }
}

// ─── Artifact validation ────────────────────────────────────────

#[test]
fn valid_artifact_loads() {
    let pipeline = ChurnPipeline::from_artifact(fitted_artifact(vec![0.0; ENCODED_WIDTH], 0.0));
    assert!(pipeline.is_ok());
}

#[test]
fn weight_dimension_mismatch_is_rejected_at_load() {
    let mut weights = vec![0.0; ENCODED_WIDTH];
    weights.pop();
    match ChurnPipeline::from_artifact(fitted_artifact(weights, 0.0)) {
        Err(PipelineError::DimensionMismatch { expected, got }) => {
            assert_eq!(expected, ENCODED_WIDTH);
            assert_eq!(got, ENCODED_WIDTH - 1);
        }
        other => panic!("expected DimensionMismatch, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn nan_weight_is_rejected_at_load() {
    let mut weights = vec![0.0; ENCODED_WIDTH];
    weights[3] = f64::NAN;
    assert!(matches!(
        ChurnPipeline::from_artifact(fitted_artifact(weights, 0.0)),
        Err(PipelineError::NonFiniteWeight { index: 3, .. })
    ));
}

#[test]
fn zero_scale_is_rejected_at_load() {
    let mut artifact = fitted_artifact(vec![0.0; ENCODED_WIDTH], 0.0);
    artifact.columns[1].encoder = ColumnEncoder::Standardize {
        mean: 0.0,
        scale: 0.0,
    };
    assert!(matches!(
        ChurnPipeline::from_artifact(artifact),
        Err(PipelineError::ZeroScale { .. })
    ));
}

#[test]
fn wrong_column_count_is_rejected_at_load() {
    let mut artifact = fitted_artifact(vec![0.0; ENCODED_WIDTH], 0.0);
    artifact.columns.pop();
    assert!(matches!(
        ChurnPipeline::from_artifact(artifact),
        Err(PipelineError::ColumnCountMismatch { .. })
    ));
}

#[test]
fn missing_churn_class_is_rejected_at_load() {
    let mut artifact = fitted_artifact(vec![0.0; ENCODED_WIDTH], 0.0);
    artifact.classes = vec!["Stay".to_string(), "Leave".to_string()];
    assert!(matches!(
        ChurnPipeline::from_artifact(artifact),
        Err(PipelineError::MissingChurnClass { .. })
    ));
}

// ─── Inference-time schema enforcement ──────────────────────────

#[test]
fn renamed_column_fails_at_inference_not_silently() {
    let mut artifact = fitted_artifact(vec![0.0; ENCODED_WIDTH], 0.0);
    artifact.columns[0].name = "Gender".to_string(); // wrong case
    let pipeline = ChurnPipeline::from_artifact(artifact).unwrap();
    let adapter = ChurnAdapter::new(pipeline);
    match adapter.predict(&sample_request()) {
        Err(PipelineError::ColumnNameMismatch {
            index, expected, ..
        }) => {
            assert_eq!(index, 0);
            assert_eq!(expected, "Gender");
        }
        other => panic!("expected ColumnNameMismatch, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn category_outside_fitted_domain_is_surfaced() {
    let mut artifact = fitted_artifact(vec![0.0; ENCODED_WIDTH], 0.0);
    // Pipeline fitted without ever seeing "Fiber optic".
    artifact.columns[7].encoder = ColumnEncoder::OneHot {
        categories: vec!["DSL".to_string(), "No".to_string()],
    };
    // Weight vector shrinks by the dropped category.
    artifact.weights = vec![0.0; ENCODED_WIDTH - 1];
    let pipeline = ChurnPipeline::from_artifact(artifact).unwrap();
    let adapter = ChurnAdapter::new(pipeline);
    match adapter.predict(&sample_request()) {
        Err(PipelineError::UnknownCategory { column, value }) => {
            assert_eq!(column, "InternetService");
            assert_eq!(value, "Fiber optic");
        }
        other => panic!("expected UnknownCategory, got {:?}", other.map(|_| ())),
    }
}

// ─── Probability function ───────────────────────────────────────

#[test]
fn zero_weights_give_even_odds_and_low_risk() {
    let pipeline =
        ChurnPipeline::from_artifact(fitted_artifact(vec![0.0; ENCODED_WIDTH], 0.0)).unwrap();
    let adapter = ChurnAdapter::new(pipeline);
    let prediction = adapter.predict(&sample_request()).unwrap();
    assert!((prediction.churn_probability - 0.5).abs() < 1e-12);
    // Exactly 50.00% is Low risk: non-strict on the low side.
    assert_eq!(prediction.verdict.risk_percent, 50.0);
    assert_eq!(prediction.verdict.category, RiskCategory::Low);
}

#[test]
fn known_weights_give_hand_computed_probability() {
    // Only the Contract=Month-to-month dimension carries weight.
    let mut weights = vec![0.0; ENCODED_WIDTH];
    weights[CONTRACT_OFFSET] = 2.0;
    let pipeline = ChurnPipeline::from_artifact(fitted_artifact(weights, -1.0)).unwrap();
    let adapter = ChurnAdapter::new(pipeline);

    // Month-to-month: z = 2.0 - 1.0 = 1.0, p = 1/(1+e^-1)
    let prediction = adapter.predict(&sample_request()).unwrap();
    let expected = 1.0 / (1.0 + (-1.0f64).exp());
    assert!((prediction.churn_probability - expected).abs() < 1e-12);
    assert_eq!(prediction.verdict.category, RiskCategory::High);

    // Two year: z = -1.0, p = 1/(1+e)
    let mut request = sample_request();
    request.contract = Contract::TwoYear;
    let prediction = adapter.predict(&request).unwrap();
    let expected = 1.0 / (1.0 + 1.0f64.exp());
    assert!((prediction.churn_probability - expected).abs() < 1e-12);
    assert_eq!(prediction.verdict.category, RiskCategory::Low);
}

#[test]
fn explanation_names_the_loaded_dimension() {
    let mut weights = vec![0.0; ENCODED_WIDTH];
    weights[CONTRACT_OFFSET] = 2.0;
    let pipeline = ChurnPipeline::from_artifact(fitted_artifact(weights, 0.0)).unwrap();
    let adapter = ChurnAdapter::new(pipeline);
    let prediction = adapter.predict(&sample_request()).unwrap();
    assert!(
        prediction
            .top_features
            .iter()
            .any(|(name, _)| name == "Contract=Month-to-month"),
        "top features: {:?}",
        prediction.top_features
    );
}

// ─── Adapter contract ───────────────────────────────────────────

#[test]
fn adapter_feeds_exact_derived_values_to_the_classifier() {
    // tenure=12, monthly_local=1_000_000, rate=15_000
    //   ⇒ monthly_model_unit = 66.667, TotalCharges = 800.0
    let classifier = CaptureClassifier::new(0.2);
    let adapter = ChurnAdapter::new(classifier);
    let prediction = adapter.predict(&sample_request()).unwrap();

    assert!((prediction.churn_probability - 0.2).abs() < 1e-12);
    assert_eq!(prediction.verdict.category, RiskCategory::Low);

    let seen = adapter_records(&adapter);
    assert_eq!(seen.len(), 1, "one single-row batch per prediction");
    let record = &seen[0];
    assert_eq!(record.fields().len(), COLUMN_COUNT);

    let Some(FieldValue::Numeric(monthly)) = record.get("MonthlyCharges") else {
        panic!("MonthlyCharges missing");
    };
    let Some(FieldValue::Numeric(total)) = record.get("TotalCharges") else {
        panic!("TotalCharges missing");
    };
    assert!((monthly - 1_000_000.0 / EXCHANGE_RATE).abs() < 1e-9);
    assert!((total - 800.0).abs() < 1e-9);
    assert_eq!(record.get("tenure"), Some(FieldValue::Integer(12)));
}

fn adapter_records(adapter: &ChurnAdapter<CaptureClassifier>) -> Vec<FeatureRecord> {
    // Test-only peek through the public constructor seam.
    adapter_classifier(adapter).seen.borrow().clone()
}

fn adapter_classifier<'a>(
    adapter: &'a ChurnAdapter<CaptureClassifier>,
) -> &'a CaptureClassifier {
    adapter.classifier_for_tests()
}

#[test]
fn record_shape_is_independent_of_inputs() {
    let classifier = CaptureClassifier::new(0.9);
    let adapter = ChurnAdapter::new(classifier);

    let mut other = sample_request();
    other.tenure_months = 0;
    other.monthly_charges_local = 0.0;
    other.internet_service = InternetService::No;
    other.online_security = InternetAddon::NoInternetService;

    adapter.predict(&sample_request()).unwrap();
    adapter.predict(&other).unwrap();

    for record in adapter_records(&adapter) {
        assert_eq!(record.fields().len(), COLUMN_COUNT);
        for (i, (name, _)) in record.fields().iter().enumerate() {
            assert_eq!(*name, COLUMN_NAMES[i]);
        }
    }
}

#[test]
fn tenure_out_of_range_is_rejected() {
    let adapter = ChurnAdapter::new(CaptureClassifier::new(0.5));
    let mut request = sample_request();
    request.tenure_months = 73;
    assert!(matches!(
        adapter.predict(&request),
        Err(PipelineError::InvalidInput(_))
    ));
}

#[test]
fn negative_monthly_charge_is_rejected() {
    let adapter = ChurnAdapter::new(CaptureClassifier::new(0.5));
    let mut request = sample_request();
    request.monthly_charges_local = -1.0;
    assert!(matches!(
        adapter.predict(&request),
        Err(PipelineError::InvalidInput(_))
    ));
}

// ─── Artifact file handling ─────────────────────────────────────

#[test]
fn missing_artifact_file_is_an_error() {
    let err = ChurnPipeline::from_file(std::path::Path::new("/nonexistent/churn.json"))
        .expect_err("missing file must not load");
    assert!(matches!(err, PipelineError::Io(_)));
}

#[test]
fn artifact_json_round_trip() {
    let artifact = fitted_artifact(vec![0.0; ENCODED_WIDTH], -0.25);
    let json = serde_json::to_string_pretty(&artifact).unwrap();
    let pipeline = ChurnPipeline::from_json(&json).unwrap();
    assert_eq!(pipeline.pipeline_id(), "telco-churn-test");
    assert_eq!(pipeline.pipeline_version(), "test.1");
}

#[test]
fn malformed_artifact_json_is_an_error() {
    assert!(matches!(
        ChurnPipeline::from_json("{\"pipeline_id\": 3}"),
        Err(PipelineError::ParseJson(_))
    ));
}
