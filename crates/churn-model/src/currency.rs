//! Conversion from the local billing currency to the model's native unit.
//!
//! The pipeline was trained on charges in its native currency unit; the form
//! collects amounts in local currency. The conversion is a fixed linear rate,
//! and the derived `TotalCharges` is an estimate (it ignores billing history,
//! discounts, and mid-contract changes), not a measured total.

/// Local currency units per model currency unit. Fixed by design; not
/// user-configurable.
pub const EXCHANGE_RATE: f64 = 15_000.0;

/// Convert a local-currency amount to the model's native unit.
pub fn to_model_unit(amount_local: f64) -> f64 {
    amount_local / EXCHANGE_RATE
}

/// Estimate of lifetime charges: monthly amount (model unit) times tenure.
pub fn estimate_total_charges(monthly_model_unit: f64, tenure_months: u32) -> f64 {
    monthly_model_unit * f64::from(tenure_months)
}
