//! Browser form front-end.
//!
//! `GET /` serves the form with bounded numeric inputs pre-filled from
//! [`FIELDS`]; `POST /assess` runs the same predictor as `/predict` and
//! renders the errors or the risk message under the re-filled form.
//! The page is the `templates/index.html` minijinja template.

use crate::AppState;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use medi_risk::{FeatureSchema, PredictionOutcome, RawRecord, RiskLevel};
use minijinja::{context, Environment, Value};
use std::collections::HashMap;

/// Display label, default value and step for one form input.
#[derive(Debug, Clone, Copy)]
pub struct FieldWidget {
    pub name: &'static str,
    pub label: &'static str,
    pub default: &'static str,
    pub step: &'static str,
}

pub static FIELDS: [FieldWidget; 8] = [
    FieldWidget { name: "Pregnancies", label: "Pregnancies", default: "0", step: "1" },
    FieldWidget { name: "Glucose", label: "Glucose Level", default: "110", step: "1" },
    FieldWidget { name: "BloodPressure", label: "Blood Pressure", default: "80", step: "1" },
    FieldWidget { name: "SkinThickness", label: "Skin Thickness", default: "5", step: "1" },
    FieldWidget { name: "Insulin", label: "Insulin Level", default: "100", step: "1" },
    FieldWidget { name: "BMI", label: "BMI", default: "25.0", step: "0.1" },
    FieldWidget {
        name: "DiabetesPedigreeFunction",
        label: "Diabetes Pedigree Function",
        default: "0.000",
        step: "0.001",
    },
    FieldWidget { name: "Age", label: "Age", default: "40", step: "1" },
];

fn widget(name: &str) -> Option<&'static FieldWidget> {
    FIELDS.iter().find(|w| w.name == name)
}

/// Turn submitted form text into a raw record.
///
/// Blank inputs are left out so they report as missing; text that is not
/// a number (or is NaN) reports as non-numeric, and infinities are range
/// checked like any other value.
pub fn record_from_form(schema: &FeatureSchema, form: &HashMap<String, String>) -> RawRecord {
    let mut record = RawRecord::new();
    for feature in schema.features() {
        let Some(text) = form.get(feature.name).map(|s| s.trim()) else {
            continue;
        };
        if text.is_empty() {
            continue;
        }
        match text.parse::<f64>() {
            Ok(x) => record.insert_number(feature.name, x),
            Err(_) => record.insert(feature.name, text),
        }
    }
    record
}

/// Name of the page template in the environment built by [`templates`].
pub const INDEX_TEMPLATE: &str = "index.html";

/// Template environment for the form page; `.html` templates auto-escape.
pub fn templates() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template(INDEX_TEMPLATE, include_str!("../templates/index.html"))?;
    Ok(env)
}

/// Full page: the form filled from `values`, then the outcome if any.
pub fn render_page(
    env: &Environment<'_>,
    schema: &FeatureSchema,
    values: &HashMap<String, String>,
    outcome: Option<&PredictionOutcome>,
) -> Result<String, minijinja::Error> {
    let fields: Vec<Value> = schema
        .features()
        .iter()
        .map(|feature| {
            let widget = widget(feature.name);
            let value = values
                .get(feature.name)
                .map(String::as_str)
                .or_else(|| widget.map(|w| w.default))
                .unwrap_or("");
            context! {
                name => feature.name,
                label => widget.map_or(feature.name, |w| w.label),
                min => feature.min.to_string(),
                max => feature.max.to_string(),
                step => widget.map_or("any", |w| w.step),
                value => value,
            }
        })
        .collect();
    let level = outcome.and_then(PredictionOutcome::risk_level);
    let risk = level.map(|level| match level {
        RiskLevel::High => "high",
        RiskLevel::Low => "low",
    });
    env.get_template(INDEX_TEMPLATE)?.render(context! {
        fields => fields,
        errors => outcome.and_then(PredictionOutcome::errors),
        risk => risk,
        message => level.map(RiskLevel::message),
    })
}

fn page(status: StatusCode, rendered: Result<String, minijinja::Error>) -> Response {
    match rendered {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            log::error!("cannot render form page: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn index(State(state): State<AppState>) -> Response {
    let rendered = render_page(
        &state.templates,
        state.predictor.schema(),
        &HashMap::new(),
        None,
    );
    page(StatusCode::OK, rendered)
}

pub async fn assess(
    State(state): State<AppState>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let schema = state.predictor.schema();
    let record = record_from_form(schema, &form);
    let outcome = state.predictor.predict(&record);
    log::info!("POST /assess -> {}", outcome.status.code());
    let status = StatusCode::from_u16(outcome.status.code()).unwrap_or(StatusCode::OK);
    page(
        status,
        render_page(&state.templates, schema, &form, Some(&outcome)),
    )
}
