use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Serialize;

use sroi_core::scenarios::sensitivity::{self, SroiSensitivityInput};
use sroi_core::sroi::engine::{self, SroiInput};
use sroi_core::sroi::projection;
use sroi_core::sroi::validation;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_input(input_json: &str) -> NapiResult<SroiInput> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

fn to_json(value: &impl Serialize) -> NapiResult<String> {
    serde_json::to_string(value).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// SROI
// ---------------------------------------------------------------------------

/// Validation never throws: the outcome, valid or not, is returned as JSON
/// so a form can flag every field at once.
#[napi]
pub fn validate_sroi(input_json: String) -> NapiResult<String> {
    let input = parse_input(&input_json)?;
    to_json(&validation::validate(&input))
}

#[napi]
pub fn calculate_sroi(input_json: String) -> NapiResult<String> {
    let input = parse_input(&input_json)?;
    let output = engine::calculate_sroi(&input).map_err(to_napi_error)?;
    to_json(&output)
}

#[napi]
pub fn project_sroi(input_json: String) -> NapiResult<String> {
    let input = parse_input(&input_json)?;
    to_json(&projection::project_annual(&input))
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[napi]
pub fn sroi_sensitivity(input_json: String) -> NapiResult<String> {
    let input: SroiSensitivityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = sensitivity::run_sroi_sensitivity(&input).map_err(to_napi_error)?;
    to_json(&output)
}
