use medi_risk::{FeatureSchema, RawRecord, Validator, FEATURES};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value as JsonValue};

fn valid_record() -> RawRecord {
    RawRecord::from_json(json!({
        "Pregnancies": 2,
        "Glucose": 120,
        "BloodPressure": 80,
        "SkinThickness": 25,
        "Insulin": 100,
        "BMI": 25.5,
        "DiabetesPedigreeFunction": 0.5,
        "Age": 35
    }))
}

fn messages(record: &RawRecord) -> Vec<String> {
    Validator::default().validate(record).messages()
}

#[test]
fn omitting_any_field_reports_only_missing() {
    for feature in FEATURES.iter() {
        let mut record = valid_record();
        record.remove(feature.name);
        let errors = messages(&record);
        assert_eq!(
            errors,
            vec![format!("Missing required field: {}", feature.name)]
        );
    }
}

#[test]
fn non_numeric_value_for_any_field() {
    for feature in FEATURES.iter() {
        let record = valid_record().with(feature.name, "not_a_number");
        let errors = messages(&record);
        assert_eq!(errors, vec![format!("{} must be a number", feature.name)]);
    }
}

#[test]
fn exact_bounds_are_accepted() {
    let mut lows = RawRecord::new();
    let mut highs = RawRecord::new();
    for feature in FEATURES.iter() {
        lows.insert(feature.name, feature.min.as_f64());
        highs.insert(feature.name, feature.max.as_f64());
    }
    assert!(Validator::default().validate(&lows).is_valid());
    assert!(Validator::default().validate(&highs).is_valid());
}

#[test]
fn integer_bounds_accept_integer_json() {
    let record = RawRecord::from_json(json!({
        "Pregnancies": 17, "Glucose": 600, "BloodPressure": 200, "SkinThickness": 150,
        "Insulin": 1000, "BMI": 100, "DiabetesPedigreeFunction": 3, "Age": 100
    }));
    assert!(record.validate().is_ok());
}

#[test]
fn partial_record_mixes_error_kinds_in_schema_order() {
    let record = RawRecord::from_json(json!({
        "Age": 35,
        "Glucose": 700,
        "Pregnancies": -1,
        "BMI": null
    }));
    assert_eq!(
        messages(&record),
        vec![
            "Pregnancies must be between 0 and 17",
            "Glucose must be between 40 and 600",
            "Missing required field: BloodPressure",
            "Missing required field: SkinThickness",
            "Missing required field: Insulin",
            "BMI must be a number",
            "Missing required field: DiabetesPedigreeFunction",
        ]
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn out_of_range_reports_bounds(idx in 0..FEATURES.len(), offset in 0.001f64..1000.0, above in any::<bool>()) {
        let feature = FEATURES[idx];
        let value = if above {
            feature.max.as_f64() + offset
        } else {
            feature.min.as_f64() - offset
        };
        let errors = messages(&valid_record().with(feature.name, value));
        prop_assert_eq!(
            errors,
            vec![format!("{} must be between {} and {}", feature.name, feature.min, feature.max)]
        );
    }

    #[test]
    fn in_range_values_are_accepted(idx in 0..FEATURES.len(), t in 0.0f64..=1.0) {
        let feature = FEATURES[idx];
        let (lo, hi) = (feature.min.as_f64(), feature.max.as_f64());
        let value = (lo + t * (hi - lo)).clamp(lo, hi);
        prop_assert!(messages(&valid_record().with(feature.name, value)).is_empty());
    }

    #[test]
    fn every_invalid_field_yields_one_error(kinds in prop::collection::vec(0u8..3, FEATURES.len())) {
        let mut record = RawRecord::new();
        for (feature, kind) in FEATURES.iter().zip(&kinds) {
            match *kind {
                0 => {}
                1 => record.insert(feature.name, JsonValue::Bool(true)),
                _ => record.insert(feature.name, feature.max.as_f64() + 1.0),
            }
        }
        let report = Validator::default().validate(&record);
        let fields: Vec<_> = report.errors().iter().map(|e| e.field()).collect();
        prop_assert_eq!(fields, FeatureSchema::diabetes().field_names());
    }
}
