use crate::error::AppError;
use crate::vectorizer::FeatureVector;
use serde::Deserialize;
use std::fs;

/// Two-class linear model. The decision score is mapped through a sigmoid to
/// a pseudo-probability for the positive ("True") class, mirroring the
/// calibration fallback the artifacts were exported with.
#[derive(Debug, Clone, Deserialize)]
pub struct BinaryModel {
    pub weights: Vec<f64>,
    pub intercept: f64,
}

impl BinaryModel {
    pub fn load(path: &str) -> Result<Self, AppError> {
        let data = fs::read_to_string(path)
            .map_err(|e| AppError::ModelLoad(format!("failed to read {}: {}", path, e)))?;
        let model: BinaryModel = serde_json::from_str(&data)?;
        Ok(model)
    }

    /// Confidence for the "True" class, in [0, 1].
    pub fn predict_c_true(&self, vector: &FeatureVector) -> f64 {
        let mut z = self.intercept;
        for &(index, value) in vector.entries() {
            z += self.weights.get(index).copied().unwrap_or(0.0) * value;
        }
        sigmoid(z)
    }
}

/// Multi-class linear model over the granular misinformation labels. One
/// weight row and intercept per class; decision scores are mapped through a
/// max-shifted softmax so confidences are non-negative and sum to 1.
#[derive(Debug, Clone, Deserialize)]
pub struct GranularModel {
    /// Class names in fixed priority order (sorted at export time). Argmax
    /// ties resolve toward the lowest index.
    pub classes: Vec<String>,
    pub weights: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl GranularModel {
    pub fn load(path: &str) -> Result<Self, AppError> {
        let data = fs::read_to_string(path)
            .map_err(|e| AppError::ModelLoad(format!("failed to read {}: {}", path, e)))?;
        let model: GranularModel = serde_json::from_str(&data)?;
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.classes.is_empty() {
            return Err(AppError::ModelLoad("granular model has no classes".to_string()));
        }
        if self.weights.len() != self.classes.len() || self.intercepts.len() != self.classes.len() {
            return Err(AppError::ModelLoad(format!(
                "granular model shape mismatch: {} classes, {} weight rows, {} intercepts",
                self.classes.len(),
                self.weights.len(),
                self.intercepts.len()
            )));
        }
        let dim = self.weights[0].len();
        if self.weights.iter().any(|row| row.len() != dim) {
            return Err(AppError::ModelLoad(
                "granular model weight rows have differing lengths".to_string(),
            ));
        }
        Ok(())
    }

    pub fn dimension(&self) -> usize {
        self.weights.first().map(|row| row.len()).unwrap_or(0)
    }

    /// Coefficient row for a class, used by the feature explainer.
    pub fn coefficients(&self, class_index: usize) -> &[f64] {
        &self.weights[class_index]
    }

    fn decision_scores(&self, vector: &FeatureVector) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.intercepts)
            .map(|(row, &intercept)| {
                let mut z = intercept;
                for &(index, value) in vector.entries() {
                    z += row.get(index).copied().unwrap_or(0.0) * value;
                }
                z
            })
            .collect()
    }

    /// Predicted class index and per-class confidences (softmax over the
    /// decision scores).
    pub fn predict(&self, vector: &FeatureVector) -> (usize, Vec<f64>) {
        let scores = self.decision_scores(vector);
        let confidences = softmax(&scores);

        let mut best = 0;
        for (index, &score) in scores.iter().enumerate() {
            if score > scores[best] {
                best = index;
            }
        }
        (best, confidences)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|&s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::Vectorizer;
    use std::collections::HashMap;

    fn vector_for(text: &str) -> FeatureVector {
        let vocabulary = HashMap::from([
            ("hoax".to_string(), 0),
            ("secret".to_string(), 1),
            ("study".to_string(), 2),
        ]);
        let vectorizer = Vectorizer::from_artifact(vocabulary, vec![1.0, 1.0, 1.0]).unwrap();
        vectorizer.transform(text)
    }

    #[test]
    fn sigmoid_is_bounded_and_centered() {
        assert!(sigmoid(100.0) <= 1.0);
        assert!(sigmoid(-100.0) >= 0.0);
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn binary_confidence_tracks_weight_sign() {
        let model = BinaryModel {
            weights: vec![-5.0, 0.0, 5.0],
            intercept: 0.0,
        };
        assert!(model.predict_c_true(&vector_for("hoax")) < 0.5);
        assert!(model.predict_c_true(&vector_for("study")) > 0.5);
    }

    #[test]
    fn binary_confidence_in_unit_interval() {
        let model = BinaryModel {
            weights: vec![100.0, -100.0, 0.0],
            intercept: 3.0,
        };
        for text in ["hoax", "secret", "hoax secret study", ""] {
            let c_true = model.predict_c_true(&vector_for(text));
            assert!((0.0..=1.0).contains(&c_true), "C_True {} out of range", c_true);
        }
    }

    fn granular() -> GranularModel {
        GranularModel {
            classes: vec!["bs".to_string(), "conspiracy".to_string(), "propaganda".to_string()],
            weights: vec![
                vec![3.0, 0.0, 0.0],
                vec![0.0, 3.0, 0.0],
                vec![0.0, 0.0, 3.0],
            ],
            intercepts: vec![0.0, 0.0, 0.0],
        }
    }

    #[test]
    fn softmax_confidences_sum_to_one() {
        let model = granular();
        let (_, confidences) = model.predict(&vector_for("hoax secret"));
        let total: f64 = confidences.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(confidences.iter().all(|&c| (0.0..=1.0).contains(&c)));
    }

    #[test]
    fn argmax_picks_supported_class() {
        let model = granular();
        let (index, confidences) = model.predict(&vector_for("secret"));
        assert_eq!(model.classes[index], "conspiracy");
        assert!(confidences[index] > confidences[0]);
    }

    #[test]
    fn argmax_ties_break_to_lowest_index() {
        let model = granular();
        // Equal support for every class: all scores are identical.
        let (index, _) = model.predict(&vector_for(""));
        assert_eq!(index, 0);
        assert_eq!(model.classes[index], "bs");
    }

    #[test]
    fn validate_rejects_shape_mismatch() {
        let mut model = granular();
        model.intercepts.pop();
        assert!(model.validate().is_err());

        let mut model = granular();
        model.weights[1].pop();
        assert!(model.validate().is_err());
    }
}
