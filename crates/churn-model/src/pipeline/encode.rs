use crate::error::{PipelineError, PipelineResult};
use crate::record::{FeatureRecord, FieldValue};

use super::artifact::{ColumnEncoder, ColumnSpec};

/// Encode one record against the fitted columns.
///
/// Checks column names positionally before touching values: the record must
/// present exactly the fitted schema, in the fitted order.
pub(super) fn encode_record(
    columns: &[ColumnSpec],
    record: &FeatureRecord,
) -> PipelineResult<Vec<f64>> {
    let fields = record.fields();
    if fields.len() != columns.len() {
        return Err(PipelineError::ColumnCountMismatch {
            expected: columns.len(),
            got: fields.len(),
        });
    }

    let width: usize = columns.iter().map(|c| c.encoder.encoded_width()).sum();
    let mut encoded = Vec::with_capacity(width);

    for (index, (column, (name, value))) in columns.iter().zip(fields.iter()).enumerate() {
        if column.name != *name {
            return Err(PipelineError::ColumnNameMismatch {
                index,
                expected: column.name.clone(),
                got: (*name).to_string(),
            });
        }

        match &column.encoder {
            ColumnEncoder::OneHot { categories } => {
                let FieldValue::Categorical(text) = value else {
                    return Err(PipelineError::TypeMismatch {
                        column: column.name.clone(),
                        expected: "categorical",
                    });
                };
                let hit = categories.iter().position(|c| c == text).ok_or_else(|| {
                    PipelineError::UnknownCategory {
                        column: column.name.clone(),
                        value: (*text).to_string(),
                    }
                })?;
                for i in 0..categories.len() {
                    encoded.push(if i == hit { 1.0 } else { 0.0 });
                }
            }
            ColumnEncoder::Standardize { mean, scale } => {
                let x = match value {
                    FieldValue::Integer(v) => *v as f64,
                    FieldValue::Numeric(v) => *v,
                    FieldValue::Categorical(_) => {
                        return Err(PipelineError::TypeMismatch {
                            column: column.name.clone(),
                            expected: "numeric",
                        })
                    }
                };
                if !x.is_finite() {
                    return Err(PipelineError::NonFiniteInput {
                        column: column.name.clone(),
                        value: x,
                    });
                }
                encoded.push((x - mean) / scale);
            }
        }
    }

    Ok(encoded)
}

/// Human-readable label per encoded dimension, for explanations:
/// one-hot dims as `Column=Category`, numeric dims as the column name.
pub(super) fn dimension_labels(columns: &[ColumnSpec]) -> Vec<String> {
    let mut labels = Vec::new();
    for column in columns {
        match &column.encoder {
            ColumnEncoder::OneHot { categories } => {
                for category in categories {
                    labels.push(format!("{}={}", column.name, category));
                }
            }
            ColumnEncoder::Standardize { .. } => labels.push(column.name.clone()),
        }
    }
    labels
}
