//! Customer Feature Record assembly.
//!
//! The record is the single row handed to the pipeline: exactly the 19
//! schema columns, in schema order, built fresh per prediction and discarded
//! after the call.

use std::fmt;

use crate::schema::{
    Contract, Gender, InternetAddon, InternetService, PaymentMethod, YesNo, COLUMN_COUNT,
    COLUMN_NAMES,
};

/// Fields the form does not collect, fixed at assembly time.
///
/// These are modeling simplifications inherited from the original tool; they
/// bias predictions toward the assumed values, and there is no evidence they
/// match the training-data distribution (recorded as an open question in
/// DESIGN.md).
pub const DEFAULT_PHONE_SERVICE: YesNo = YesNo::Yes;
pub const DEFAULT_MULTIPLE_LINES: YesNo = YesNo::No;
pub const DEFAULT_PAPERLESS_BILLING: YesNo = YesNo::Yes;
pub const DEFAULT_SENIOR_CITIZEN: i64 = 0;

/// One cell of the record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Categorical(&'static str),
    Integer(i64),
    Numeric(f64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Categorical(s) => write!(f, "{}", s),
            Self::Integer(v) => write!(f, "{}", v),
            Self::Numeric(v) => write!(f, "{}", v),
        }
    }
}

/// Fully resolved customer attributes, one per schema column.
///
/// `monthly_charges` and `total_charges` are already in the model's native
/// currency unit (see [`crate::currency`]).
#[derive(Debug, Clone)]
pub struct CustomerProfile {
    pub gender: Gender,
    pub senior_citizen: i64,
    pub partner: YesNo,
    pub dependents: YesNo,
    pub tenure: u32,
    pub phone_service: YesNo,
    pub multiple_lines: YesNo,
    pub internet_service: InternetService,
    pub online_security: InternetAddon,
    pub online_backup: InternetAddon,
    pub device_protection: InternetAddon,
    pub tech_support: InternetAddon,
    pub streaming_tv: InternetAddon,
    pub streaming_movies: InternetAddon,
    pub contract: Contract,
    pub paperless_billing: YesNo,
    pub payment_method: PaymentMethod,
    pub monthly_charges: f64,
    pub total_charges: f64,
}

/// A single named row in schema order.
#[derive(Debug, Clone)]
pub struct FeatureRecord {
    values: [(&'static str, FieldValue); COLUMN_COUNT],
}

impl FeatureRecord {
    /// Assemble the record from a resolved profile.
    ///
    /// The output shape is invariant: always [`COLUMN_COUNT`] named values
    /// ordered exactly as [`COLUMN_NAMES`], independent of input values.
    pub fn from_profile(profile: &CustomerProfile) -> Self {
        let values = [
            FieldValue::Categorical(profile.gender.as_str()),
            FieldValue::Integer(profile.senior_citizen),
            FieldValue::Categorical(profile.partner.as_str()),
            FieldValue::Categorical(profile.dependents.as_str()),
            FieldValue::Integer(i64::from(profile.tenure)),
            FieldValue::Categorical(profile.phone_service.as_str()),
            FieldValue::Categorical(profile.multiple_lines.as_str()),
            FieldValue::Categorical(profile.internet_service.as_str()),
            FieldValue::Categorical(profile.online_security.as_str()),
            FieldValue::Categorical(profile.online_backup.as_str()),
            FieldValue::Categorical(profile.device_protection.as_str()),
            FieldValue::Categorical(profile.tech_support.as_str()),
            FieldValue::Categorical(profile.streaming_tv.as_str()),
            FieldValue::Categorical(profile.streaming_movies.as_str()),
            FieldValue::Categorical(profile.contract.as_str()),
            FieldValue::Categorical(profile.paperless_billing.as_str()),
            FieldValue::Categorical(profile.payment_method.as_str()),
            FieldValue::Numeric(profile.monthly_charges),
            FieldValue::Numeric(profile.total_charges),
        ];

        let mut named = [("", FieldValue::Integer(0)); COLUMN_COUNT];
        for (i, value) in values.into_iter().enumerate() {
            named[i] = (COLUMN_NAMES[i], value);
        }
        Self { values: named }
    }

    /// Named values in schema order.
    pub fn fields(&self) -> &[(&'static str, FieldValue)] {
        &self.values
    }

    /// Look up a value by column name.
    pub fn get(&self, column: &str) -> Option<FieldValue> {
        self.values
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| *value)
    }
}
