use medi_risk::{Classifier, ContentKind, Predictor, RawRecord, Status};
use pretty_assertions::assert_eq;
use serde_json::{json, Value as JsonValue};
use std::sync::{Arc, Mutex};

/// Returns a fixed class and remembers every row it was given.
struct Recording {
    label: usize,
    rows: Mutex<Vec<Vec<f64>>>,
}

impl Recording {
    fn new(label: usize) -> Arc<Self> {
        Arc::new(Self {
            label,
            rows: Mutex::new(Vec::new()),
        })
    }

    fn rows(&self) -> Vec<Vec<f64>> {
        self.rows.lock().unwrap().clone()
    }
}

impl Classifier for Recording {
    fn name(&self) -> &str {
        "recording"
    }

    fn n_features(&self) -> usize {
        8
    }

    fn predict(&self, row: &[f64]) -> usize {
        self.rows.lock().unwrap().push(row.to_vec());
        self.label
    }

    fn predict_proba(&self, row: &[f64]) -> Vec<f64> {
        self.rows.lock().unwrap().push(row.to_vec());
        vec![0.7, 0.3]
    }
}

#[test]
fn valid_record_returns_label_as_plain_text() {
    let stub = Recording::new(0);
    let predictor = Predictor::new(stub.clone()).unwrap();
    let record = RawRecord::from_json(json!({
        "Pregnancies": 2, "Glucose": 120, "BloodPressure": 80, "SkinThickness": 25,
        "Insulin": 100, "BMI": 25.5, "DiabetesPedigreeFunction": 0.5, "Age": 35
    }));

    let outcome = predictor.predict(&record);
    assert_eq!(
        (outcome.render_body().as_str(), outcome.status, outcome.content),
        ("0", Status::Success, ContentKind::PlainText)
    );
    assert_eq!(stub.rows().len(), 1);
}

#[test]
fn missing_age_returns_json_errors() {
    let predictor = Predictor::new(Recording::new(0)).unwrap();
    let record = RawRecord::from_json(json!({
        "Pregnancies": 2, "Glucose": 120, "BloodPressure": 80, "SkinThickness": 25,
        "Insulin": 100, "BMI": 25.5, "DiabetesPedigreeFunction": 0.5
    }));

    let outcome = predictor.predict(&record);
    assert_eq!(outcome.status.code(), 400);
    assert_eq!(outcome.content.mime(), "application/json");
    let body: JsonValue = serde_json::from_str(&outcome.render_body()).unwrap();
    assert_eq!(body, json!({"errors": ["Missing required field: Age"]}));
}

#[test]
fn rejected_record_never_reaches_model() {
    let stub = Recording::new(1);
    let predictor = Predictor::new(stub.clone()).unwrap();
    predictor.predict(&RawRecord::new());
    let _ = predictor.predict_probability(&RawRecord::new().with("Age", "old"));
    assert!(stub.rows().is_empty());
}

#[test]
fn row_follows_schema_order_not_insertion_order() {
    let stub = Recording::new(0);
    let predictor = Predictor::new(stub.clone()).unwrap();

    let mut record = RawRecord::new();
    for (name, value) in [
        ("Age", 35.0),
        ("DiabetesPedigreeFunction", 0.5),
        ("BMI", 25.5),
        ("Insulin", 100.0),
        ("SkinThickness", 25.0),
        ("BloodPressure", 80.0),
        ("Glucose", 120.0),
        ("Pregnancies", 2.0),
    ] {
        record.insert(name, value);
    }
    record.insert("PatientId", "abc-123");

    predictor.predict(&record);
    predictor.predict_probability(&record).unwrap();

    let expected = vec![2.0, 120.0, 80.0, 25.0, 100.0, 25.5, 0.5, 35.0];
    assert_eq!(stub.rows(), vec![expected.clone(), expected]);
}

#[test]
fn probabilities_are_returned_raw() {
    let predictor = Predictor::new(Recording::new(0)).unwrap();
    let record = RawRecord::from_json(json!({
        "Pregnancies": 0, "Glucose": 40, "BloodPressure": 20, "SkinThickness": 3,
        "Insulin": 10, "BMI": 15, "DiabetesPedigreeFunction": 0.0, "Age": 20
    }));
    assert_eq!(predictor.predict_probability(&record), Ok(vec![0.7, 0.3]));
}
