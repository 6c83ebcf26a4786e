//! Field-by-field validation of raw records against a [`FeatureSchema`].
//!
//! Each field yields at most one error, checked in this order:
//! missing, then non-numeric, then out of range. Every field is checked;
//! errors come back in schema order.

use crate::record::{RawRecord, ValidatedRecord};
use crate::schema::{Bound, Feature, FeatureSchema, FEATURE_COUNT};
use serde_json::Value as JsonValue;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("Missing required field: {field}")]
    Missing { field: &'static str },
    #[error("{field} must be a number")]
    NotANumber { field: &'static str },
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: Bound,
        max: Bound,
    },
}

impl FieldError {
    pub fn field(&self) -> &'static str {
        match self {
            FieldError::Missing { field }
            | FieldError::NotANumber { field }
            | FieldError::OutOfRange { field, .. } => field,
        }
    }
}

/// Accumulated validation errors. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Human-readable messages, one per offending field.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("; "))
    }
}

impl std::error::Error for ValidationReport {}

/// JSON integers and reals only. Booleans are not numbers here.
fn numeric(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64(),
        _ => None,
    }
}

fn check_field(feature: &Feature, value: Option<&JsonValue>) -> Result<f64, FieldError> {
    let value = value.ok_or(FieldError::Missing {
        field: feature.name,
    })?;
    let x = numeric(value).ok_or(FieldError::NotANumber {
        field: feature.name,
    })?;
    if !feature.contains(x) {
        return Err(FieldError::OutOfRange {
            field: feature.name,
            min: feature.min,
            max: feature.max,
        });
    }
    Ok(x)
}

/// Checks records against one schema.
#[derive(Debug, Clone, Copy)]
pub struct Validator {
    schema: &'static FeatureSchema,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(FeatureSchema::diabetes())
    }
}

impl Validator {
    pub fn new(schema: &'static FeatureSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'static FeatureSchema {
        self.schema
    }

    /// Report every problem with `record` without promoting it.
    pub fn validate(&self, record: &RawRecord) -> ValidationReport {
        match self.promote(record) {
            Ok(_) => ValidationReport::default(),
            Err(report) => report,
        }
    }

    /// Promote a raw record to a validated one, or return all field errors.
    pub fn promote(&self, record: &RawRecord) -> Result<ValidatedRecord, ValidationReport> {
        let mut values = [0.0; FEATURE_COUNT];
        let mut errors = Vec::new();
        for (slot, feature) in values.iter_mut().zip(self.schema.features()) {
            match check_field(feature, record.get(feature.name)) {
                Ok(x) => *slot = x,
                Err(e) => errors.push(e),
            }
        }
        if errors.is_empty() {
            Ok(ValidatedRecord::from_ordered(values))
        } else {
            log::debug!("record rejected with {} field error(s)", errors.len());
            Err(ValidationReport { errors })
        }
    }
}

impl RawRecord {
    /// Validate against the diabetes schema.
    pub fn validate(&self) -> Result<ValidatedRecord, ValidationReport> {
        Validator::default().promote(self)
    }
}
