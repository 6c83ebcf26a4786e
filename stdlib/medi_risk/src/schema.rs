//! Fixed feature schema for the diabetes risk classifier.
//!
//! The order of [`FEATURES`] is the column order the model was trained on.
//! Bounds are inclusive.

use serde::Serialize;
use std::fmt;

/// A range endpoint, kept in the form it was written so messages render
/// `0.0` and `3` rather than a normalised float.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Bound {
    Int(i64),
    Real(f64),
}

impl Bound {
    pub fn as_f64(self) -> f64 {
        match self {
            Bound::Int(v) => v as f64,
            Bound::Real(v) => v,
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Int(v) => write!(f, "{v}"),
            // Debug keeps the trailing `.0` on whole reals
            Bound::Real(v) => write!(f, "{v:?}"),
        }
    }
}

/// One named model input with its accepted range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Feature {
    pub name: &'static str,
    pub min: Bound,
    pub max: Bound,
}

impl Feature {
    const fn int(name: &'static str, min: i64, max: i64) -> Self {
        Self {
            name,
            min: Bound::Int(min),
            max: Bound::Int(max),
        }
    }

    /// Inclusive range check.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min.as_f64() && value <= self.max.as_f64()
    }
}

pub const FEATURE_COUNT: usize = 8;

pub const FEATURES: [Feature; FEATURE_COUNT] = [
    Feature::int("Pregnancies", 0, 17),
    Feature::int("Glucose", 40, 600),
    Feature::int("BloodPressure", 20, 200),
    Feature::int("SkinThickness", 3, 150),
    Feature::int("Insulin", 10, 1000),
    Feature::int("BMI", 15, 100),
    Feature {
        name: "DiabetesPedigreeFunction",
        min: Bound::Real(0.0),
        max: Bound::Int(3),
    },
    Feature::int("Age", 20, 100),
];

/// Ordered view over the feature table.
#[derive(Debug, PartialEq)]
pub struct FeatureSchema {
    features: &'static [Feature; FEATURE_COUNT],
}

static DIABETES: FeatureSchema = FeatureSchema {
    features: &FEATURES,
};

impl FeatureSchema {
    /// The process-wide diabetes schema.
    pub fn diabetes() -> &'static FeatureSchema {
        &DIABETES
    }

    pub fn features(&self) -> &'static [Feature] {
        self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.features.iter().map(|f| f.name).collect()
    }

    pub fn get(&self, name: &str) -> Option<&'static Feature> {
        self.features.iter().find(|f| f.name == name)
    }
}
