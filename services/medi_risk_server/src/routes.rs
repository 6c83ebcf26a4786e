//! JSON prediction and liveness endpoints.

use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use medi_risk::{PredictionOutcome, RawRecord};
use serde_json::value::RawValue;
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeMap;

pub const NO_DATA: &str = "No data provided";
pub const MALFORMED: &str = "Request body is not valid JSON";

/// Sends a [`PredictionOutcome`] with its own status and content type.
pub struct OutcomeResponse(pub PredictionOutcome);

impl IntoResponse for OutcomeResponse {
    fn into_response(self) -> Response {
        let outcome = self.0;
        let status = StatusCode::from_u16(outcome.status.code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            [(header::CONTENT_TYPE, outcome.content.mime())],
            outcome.render_body(),
        )
            .into_response()
    }
}

/// What a `POST /predict` body turned out to hold.
#[derive(Debug)]
pub(crate) enum Payload {
    /// Nothing at all, or a falsy JSON value.
    Empty,
    /// Non-empty bytes that are not JSON.
    Malformed,
    Record(RawRecord),
}

fn plain_bad_request(message: &'static str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "text/plain")],
        message,
    )
        .into_response()
}

/// `null`, `false`, zero, and empty strings, arrays or objects carry no data.
fn is_empty_value(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::Bool(b) => !b,
        JsonValue::Number(n) => n.as_f64() == Some(0.0),
        JsonValue::String(s) => s.is_empty(),
        JsonValue::Array(a) => a.is_empty(),
        JsonValue::Object(o) => o.is_empty(),
    }
}

/// Rebuild an object whose only fault is a number literal outside the
/// `f64` range.
///
/// Such literals saturate through [`RawRecord::insert_number`] so the field
/// reaches the range check; other values that still fail to parse are
/// kept as text and report as non-numeric.
fn overflowing_object(body: &[u8]) -> Option<RawRecord> {
    let fields: BTreeMap<String, Box<RawValue>> = serde_json::from_slice(body).ok()?;
    let mut record = RawRecord::new();
    for (name, raw) in fields {
        let text = raw.get();
        match serde_json::from_str::<JsonValue>(text) {
            Ok(value) => record.insert(name, value),
            Err(_) => match text.parse::<f64>() {
                Ok(x) => record.insert_number(name, x),
                Err(_) => record.insert(name, text),
            },
        }
    }
    Some(record)
}

pub(crate) fn parse_body(body: &[u8]) -> Payload {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Payload::Empty;
    }
    match serde_json::from_slice::<JsonValue>(body) {
        Ok(value) if is_empty_value(&value) => Payload::Empty,
        Ok(value) => Payload::Record(RawRecord::from_json(value)),
        Err(e) => match overflowing_object(body) {
            Some(record) => Payload::Record(record),
            None => {
                log::debug!("unreadable prediction body: {e}");
                Payload::Malformed
            }
        },
    }
}

pub async fn predict(State(state): State<AppState>, body: Bytes) -> Response {
    let record = match parse_body(&body) {
        Payload::Record(record) => record,
        Payload::Empty => return plain_bad_request(NO_DATA),
        Payload::Malformed => return plain_bad_request(MALFORMED),
    };
    let outcome = state.predictor.predict(&record);
    log::info!(
        "POST /predict -> {} ({} field(s) received)",
        outcome.status.code(),
        record.len()
    );
    OutcomeResponse(outcome).into_response()
}

pub async fn health() -> Json<JsonValue> {
    Json(json!({ "status": "healthy" }))
}
