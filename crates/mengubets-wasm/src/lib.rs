//! mengubets-wasm: browser bindings for the MenguBets scoring engine
//!
//! The exported functions keep the names and object shapes the web client
//! already uses (`validateBet`, `calculateBetResult`, ...). Objects cross the
//! boundary as plain JSON-compatible JS objects in camelCase.

use std::fmt::Display;

use mengubets_core::{
    bet_types, calculate_bet_result, format_bet_for_display, get_bet_type_by_id, BetSubmission,
    CoreError, DisplayContext, ResultPayload, ScoredOutcome, ValidationResult,
};
use serde::{de::DeserializeOwned, Serialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("mengubets-wasm initialized");
}

/// All bet types, for the bet type selector
#[wasm_bindgen(js_name = "getBetTypes")]
pub fn get_bet_types_wasm() -> Result<JsValue, JsValue> {
    to_js(bet_types())
}

/// The bet type registered under `id`, or `null`
#[wasm_bindgen(js_name = "getBetTypeById")]
pub fn get_bet_type_by_id_wasm(id: &str) -> Result<JsValue, JsValue> {
    match get_bet_type_by_id(id) {
        Some(descriptor) => to_js(descriptor),
        None => Ok(JsValue::NULL),
    }
}

/// @param submission - `{type, value, note?}`
/// @returns `{valid, message?}`
#[wasm_bindgen(js_name = "validateBet")]
pub fn validate_bet_wasm(submission: JsValue) -> Result<JsValue, JsValue> {
    let submission: BetSubmission = from_js(submission)?;
    to_js(&validate_submission(&submission))
}

/// @param submission - `{type, value, serverMultiplier?}`
/// @param result - "H-A" score, first scorer id, list of scorer ids or list of goal minutes
/// @returns `{success, partialSuccess?, points, explanation}`
#[wasm_bindgen(js_name = "calculateBetResult")]
pub fn calculate_bet_result_wasm(submission: JsValue, result: JsValue) -> Result<JsValue, JsValue> {
    let submission: BetSubmission = from_js(submission)?;
    let payload: ResultPayload = from_js(result)?;
    let outcome = score_submission(&submission, payload).map_err(js_error)?;
    to_js(&outcome)
}

/// @param submission - `{type, value}`
/// @param extra - optional `{playerName?, players?}`
#[wasm_bindgen(js_name = "formatBetForDisplay")]
pub fn format_bet_for_display_wasm(submission: JsValue, extra: JsValue) -> Result<String, JsValue> {
    let submission: BetSubmission = from_js(submission)?;
    let extra: DisplayContext = if extra.is_undefined() || extra.is_null() {
        DisplayContext::default()
    } else {
        from_js(extra)?
    };
    Ok(format_bet_for_display(&submission, &extra))
}

/// Unknown types are an invalid bet to the form, not an exception
pub fn validate_submission(submission: &BetSubmission) -> ValidationResult {
    match get_bet_type_by_id(&submission.bet_type) {
        Some(descriptor) => descriptor.validate(&submission.value),
        None => ValidationResult::invalid("Tipo de apuesta no válido"),
    }
}

/// Score a bet the way the web client expects: an unknown type scores zero
/// with an explanation, everything else that goes wrong is an error.
pub fn score_submission(
    submission: &BetSubmission,
    payload: ResultPayload,
) -> Result<ScoredOutcome, CoreError> {
    let Some(descriptor) = get_bet_type_by_id(&submission.bet_type) else {
        log::warn!("Scoring bet with unknown type {}", submission.bet_type);
        return Ok(ScoredOutcome::invalid_type());
    };
    let result = payload.into_result(descriptor.bet_type)?;
    calculate_bet_result(submission, &result)
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(js_error)
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(js_error)
}

fn js_error(error: impl Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}
