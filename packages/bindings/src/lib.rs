use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;

use lending_core::types::Currency;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Quotes
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_amortisation(input_json: String) -> NapiResult<String> {
    let input: lending_core::amortisation::AmortisationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        lending_core::amortisation::calculate_amortisation(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_flat_estimate(input_json: String) -> NapiResult<String> {
    let input: lending_core::amortisation::AmortisationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        lending_core::amortisation::calculate_flat_estimate(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn build_payment_schedule(input_json: String) -> NapiResult<String> {
    let input: lending_core::schedule::ScheduleInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        lending_core::schedule::build_payment_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Portfolio
// ---------------------------------------------------------------------------

// The summary entry points take the raw API listing and run the wire-format
// normalisation, since their caller is the web layer itself.

#[napi]
pub fn portfolio_summary(loans_json: String) -> NapiResult<String> {
    let loans = lending_core::record::from_json(&loans_json).map_err(to_napi_error)?;
    let output = lending_core::portfolio::summarise_portfolio(&loans).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn borrower_position(loans_json: String) -> NapiResult<String> {
    let loans = lending_core::record::from_json(&loans_json).map_err(to_napi_error)?;
    let output = lending_core::portfolio::summarise_borrower(&loans).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

#[napi]
pub fn paginate_listing(items_json: String, page: u32, page_size: u32) -> NapiResult<String> {
    let items: Vec<serde_json::Value> =
        serde_json::from_str(&items_json).map_err(to_napi_error)?;
    let window =
        lending_core::pagination::paginate(&items, page, page_size).map_err(to_napi_error)?;
    serde_json::to_string(&window).map_err(to_napi_error)
}

#[napi]
pub fn format_money(amount: String, currency_code: String) -> NapiResult<String> {
    let amount: Decimal = amount.parse().map_err(to_napi_error)?;
    Ok(lending_core::currency::format_currency(
        amount,
        &Currency::from_code(&currency_code),
    ))
}
