//! Validation plus inference, shaped into boundary-neutral outcomes.

use crate::model::{Classifier, ModelArtifact, ModelError};
use crate::record::RawRecord;
use crate::schema::FeatureSchema;
use crate::validate::{ValidationReport, Validator};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    BadRequest,
}

impl Status {
    pub fn code(self) -> u16 {
        match self {
            Status::Success => 200,
            Status::BadRequest => 400,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    PlainText,
    Json,
}

impl ContentKind {
    pub fn mime(self) -> &'static str {
        match self {
            ContentKind::PlainText => "text/plain",
            ContentKind::Json => "application/json",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeBody {
    /// Predicted class label in its decimal form.
    Label(String),
    Errors(ErrorBody),
}

/// What a boundary should send back: body, status and content type.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionOutcome {
    pub body: OutcomeBody,
    pub status: Status,
    pub content: ContentKind,
}

impl PredictionOutcome {
    pub fn label(label: usize) -> Self {
        Self {
            body: OutcomeBody::Label(label.to_string()),
            status: Status::Success,
            content: ContentKind::PlainText,
        }
    }

    pub fn rejected(report: &ValidationReport) -> Self {
        Self {
            body: OutcomeBody::Errors(ErrorBody {
                errors: report.messages(),
            }),
            status: Status::BadRequest,
            content: ContentKind::Json,
        }
    }

    /// Serialized body as it goes on the wire.
    pub fn render_body(&self) -> String {
        match &self.body {
            OutcomeBody::Label(label) => label.clone(),
            OutcomeBody::Errors(body) => serde_json::to_string(body).unwrap_or_else(|e| {
                log::error!("cannot serialize error body: {e}");
                String::from(r#"{"errors":[]}"#)
            }),
        }
    }

    pub fn errors(&self) -> Option<&[String]> {
        match &self.body {
            OutcomeBody::Errors(body) => Some(&body.errors),
            OutcomeBody::Label(_) => None,
        }
    }

    pub fn risk_level(&self) -> Option<RiskLevel> {
        match &self.body {
            OutcomeBody::Label(label) => Some(RiskLevel::from_label(label)),
            OutcomeBody::Errors(_) => None,
        }
    }
}

/// User-facing reading of the binary label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    High,
}

impl RiskLevel {
    pub fn from_label(label: &str) -> Self {
        if label.trim() == "1" {
            RiskLevel::High
        } else {
            RiskLevel::Low
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            RiskLevel::High => {
                "HIGH RISK: The model indicates a higher likelihood of diabetes."
            }
            RiskLevel::Low => "LOW RISK: The model indicates a lower likelihood of diabetes.",
        }
    }
}

/// Shared, read-only handle on a loaded classifier.
///
/// Cloning is cheap; every clone sees the same model.
#[derive(Clone)]
pub struct Predictor {
    model: Arc<dyn Classifier>,
    validator: Validator,
}

impl fmt::Debug for Predictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predictor")
            .field("model", &self.model.name())
            .field("features", &self.validator.schema().len())
            .finish()
    }
}

impl Predictor {
    /// Wrap a classifier for the diabetes schema.
    pub fn new(model: Arc<dyn Classifier>) -> Result<Self, ModelError> {
        Self::with_schema(model, FeatureSchema::diabetes())
    }

    pub fn with_schema(
        model: Arc<dyn Classifier>,
        schema: &'static FeatureSchema,
    ) -> Result<Self, ModelError> {
        if model.n_features() != schema.len() {
            return Err(ModelError::FeatureCount {
                expected: schema.len(),
                found: model.n_features(),
            });
        }
        Ok(Self {
            model,
            validator: Validator::new(schema),
        })
    }

    /// Load the artifact at `path` and wrap it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let schema = FeatureSchema::diabetes();
        let artifact = ModelArtifact::load(path, schema.len())?;
        Self::with_schema(Arc::new(artifact), schema)
    }

    pub fn schema(&self) -> &'static FeatureSchema {
        self.validator.schema()
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Classify one record: the label with success, or the field errors.
    pub fn predict(&self, record: &RawRecord) -> PredictionOutcome {
        match self.validator.promote(record) {
            Ok(validated) => {
                let label = self.model.predict(validated.row());
                log::debug!("{} predicted class {label}", self.model.name());
                PredictionOutcome::label(label)
            }
            Err(report) => PredictionOutcome::rejected(&report),
        }
    }

    /// Raw per-class probabilities.
    ///
    /// Success is returned unwrapped, unlike [`Predictor::predict`]; a
    /// rejected record still yields the wrapped 400 outcome.
    pub fn predict_probability(&self, record: &RawRecord) -> Result<Vec<f64>, PredictionOutcome> {
        let validated = self
            .validator
            .promote(record)
            .map_err(|report| PredictionOutcome::rejected(&report))?;
        Ok(self.model.predict_proba(validated.row()))
    }
}
