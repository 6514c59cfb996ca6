use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BinaryLabel {
    True,
    Fake,
    #[serde(rename = "Unknown / Borderline")]
    Borderline,
}

impl BinaryLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryLabel::True => "True",
            BinaryLabel::Fake => "Fake",
            BinaryLabel::Borderline => "Unknown / Borderline",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    pub text: String,
}

/// Response payload for `POST /predict`.
///
/// Granular fields are populated iff the binary decision is not a confident
/// "True"; absent fields serialize as the literal string `"N/A"` to match the
/// published interface.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    pub binary_prediction: BinaryLabel,
    pub binary_confidence: f64,
    #[serde(rename = "C_True_confidence")]
    pub c_true_confidence: f64,
    #[serde(serialize_with = "na_if_none")]
    pub granular_prediction: Option<String>,
    #[serde(serialize_with = "na_if_none")]
    pub granular_confidence_top: Option<f64>,
    #[serde(serialize_with = "na_if_none")]
    pub granular_confidence_all: Option<HashMap<String, f64>>,
    #[serde(serialize_with = "na_if_none")]
    pub top_features_input: Option<Vec<(String, f64)>>,
    #[serde(serialize_with = "na_if_none")]
    pub top_features_overall: Option<Vec<(String, f64)>>,
}

impl PredictionResult {
    pub fn has_granular(&self) -> bool {
        self.granular_prediction.is_some()
    }
}

fn na_if_none<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    match value {
        Some(v) => v.serialize(serializer),
        None => serializer.serialize_str("N/A"),
    }
}

/// Round to four decimal places for reporting.
pub fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_label_serializes_published_strings() {
        assert_eq!(
            serde_json::to_string(&BinaryLabel::Borderline).unwrap(),
            "\"Unknown / Borderline\""
        );
        assert_eq!(serde_json::to_string(&BinaryLabel::True).unwrap(), "\"True\"");
    }

    #[test]
    fn absent_granular_fields_serialize_as_na() {
        let result = PredictionResult {
            binary_prediction: BinaryLabel::True,
            binary_confidence: 0.75,
            c_true_confidence: 0.75,
            granular_prediction: None,
            granular_confidence_top: None,
            granular_confidence_all: None,
            top_features_input: None,
            top_features_overall: None,
        };
        let json: serde_json::Value = serde_json::to_value(&result).unwrap();
        assert_eq!(json["granular_prediction"], "N/A");
        assert_eq!(json["granular_confidence_all"], "N/A");
        assert_eq!(json["top_features_input"], "N/A");
        assert_eq!(json["C_True_confidence"], 0.75);
    }

    #[test]
    fn feature_pairs_serialize_as_arrays() {
        let result = PredictionResult {
            binary_prediction: BinaryLabel::Fake,
            binary_confidence: 0.93,
            c_true_confidence: 0.07,
            granular_prediction: Some("conspiracy".to_string()),
            granular_confidence_top: Some(0.8),
            granular_confidence_all: None,
            top_features_input: Some(vec![("hoax".to_string(), 1.25)]),
            top_features_overall: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["top_features_input"][0][0], "hoax");
        assert_eq!(json["top_features_input"][0][1], 1.25);
    }

    #[test]
    fn round4_truncates_noise() {
        assert_eq!(round4(0.123456), 0.1235);
        assert_eq!(round4(1.0), 1.0);
    }
}
