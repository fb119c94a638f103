//! The fixed feature schema the fitted pipeline was trained on.
//!
//! Column names and categorical domain strings must match the training data
//! byte-for-byte. A mismatch fails at inference time with a named error,
//! never with a silently wrong prediction.

use serde::{Deserialize, Serialize};

/// Number of columns in the customer feature record.
pub const COLUMN_COUNT: usize = 19;

/// Column names in the exact order the pipeline consumes them.
pub const COLUMN_NAMES: [&str; COLUMN_COUNT] = [
    "gender",
    "SeniorCitizen",
    "Partner",
    "Dependents",
    "tenure",
    "PhoneService",
    "MultipleLines",
    "InternetService",
    "OnlineSecurity",
    "OnlineBackup",
    "DeviceProtection",
    "TechSupport",
    "StreamingTV",
    "StreamingMovies",
    "Contract",
    "PaperlessBilling",
    "PaymentMethod",
    "MonthlyCharges",
    "TotalCharges",
];

/// Upper bound of the tenure slider, in months.
pub const TENURE_MAX: u32 = 72;

/// Customer gender as recorded in the training data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Self; 2] = [Self::Male, Self::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

/// Binary Yes/No categorical (Partner, Dependents, PhoneService, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub const ALL: [Self; 2] = [Self::Yes, Self::No];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

/// Internet service tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InternetService {
    #[serde(rename = "DSL")]
    Dsl,
    #[serde(rename = "Fiber optic")]
    FiberOptic,
    No,
}

impl InternetService {
    pub const ALL: [Self; 3] = [Self::Dsl, Self::FiberOptic, Self::No];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dsl => "DSL",
            Self::FiberOptic => "Fiber optic",
            Self::No => "No",
        }
    }
}

/// Internet add-on services (OnlineSecurity, TechSupport, StreamingTV, ...)
/// carry a third state for customers without internet service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InternetAddon {
    Yes,
    No,
    #[serde(rename = "No internet service")]
    NoInternetService,
}

impl InternetAddon {
    pub const ALL: [Self; 3] = [Self::Yes, Self::No, Self::NoInternetService];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::NoInternetService => "No internet service",
        }
    }
}

/// Contract length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Contract {
    #[serde(rename = "Month-to-month")]
    MonthToMonth,
    #[serde(rename = "One year")]
    OneYear,
    #[serde(rename = "Two year")]
    TwoYear,
}

impl Contract {
    pub const ALL: [Self; 3] = [Self::MonthToMonth, Self::OneYear, Self::TwoYear];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MonthToMonth => "Month-to-month",
            Self::OneYear => "One year",
            Self::TwoYear => "Two year",
        }
    }
}

/// Payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Electronic check")]
    ElectronicCheck,
    #[serde(rename = "Mailed check")]
    MailedCheck,
    #[serde(rename = "Bank transfer (automatic)")]
    BankTransferAutomatic,
    #[serde(rename = "Credit card (automatic)")]
    CreditCardAutomatic,
}

impl PaymentMethod {
    pub const ALL: [Self; 4] = [
        Self::ElectronicCheck,
        Self::MailedCheck,
        Self::BankTransferAutomatic,
        Self::CreditCardAutomatic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ElectronicCheck => "Electronic check",
            Self::MailedCheck => "Mailed check",
            Self::BankTransferAutomatic => "Bank transfer (automatic)",
            Self::CreditCardAutomatic => "Credit card (automatic)",
        }
    }
}
