//! Diabetes risk classification: feature schema, input validation and
//! inference over a pre-trained classifier.
//!
//! ```no_run
//! use medi_risk::{Predictor, RawRecord};
//!
//! let predictor = Predictor::load("models/random_forest_model.json")?;
//! let record = RawRecord::new().with("Glucose", 120).with("Age", 35);
//! let outcome = predictor.predict(&record);
//! println!("{} {}", outcome.status.code(), outcome.render_body());
//! # Ok::<(), medi_risk::ModelError>(())
//! ```

pub mod model;
pub mod predictor;
pub mod record;
pub mod schema;
pub mod validate;

pub use model::{Classifier, ModelArtifact, ModelError, DEFAULT_MODEL_PATH};
pub use predictor::{
    ContentKind, ErrorBody, OutcomeBody, PredictionOutcome, Predictor, RiskLevel, Status,
};
pub use record::{RawRecord, ValidatedRecord};
pub use schema::{Bound, Feature, FeatureSchema, FEATURES, FEATURE_COUNT};
pub use validate::{FieldError, ValidationReport, Validator};
