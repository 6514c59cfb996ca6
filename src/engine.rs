use crate::{
    config::Config,
    error::AppError,
    explain::FeatureExplainer,
    model::{BinaryModel, GranularModel},
    types::{round4, BinaryLabel, PredictionResult},
    vectorizer::{clean_text, Vectorizer},
};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

/// The inference pipeline: vectorize, binary classify, threshold gate,
/// optionally granular classify, explain. Immutable after construction and
/// shared read-only across requests.
pub struct PredictionEngine {
    vectorizer: Vectorizer,
    binary: BinaryModel,
    granular: GranularModel,
    explainer: FeatureExplainer,
    true_threshold: f64,
    fake_threshold: f64,
}

impl PredictionEngine {
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        info!("Loading model artifacts...");

        let vectorizer = Vectorizer::load(&config.vectorizer_path)?;
        let binary = BinaryModel::load(&config.binary_model_path)?;
        let granular = GranularModel::load(&config.granular_model_path)?;

        info!(
            "Loaded vectorizer ({} terms), binary model, granular model ({} classes)",
            vectorizer.dimension(),
            granular.classes.len()
        );

        Self::new(vectorizer, binary, granular, config)
    }

    pub fn new(
        vectorizer: Vectorizer,
        binary: BinaryModel,
        granular: GranularModel,
        config: &Config,
    ) -> Result<Self, AppError> {
        if binary.weights.len() != vectorizer.dimension() {
            return Err(AppError::ModelLoad(format!(
                "binary model has {} weights but vectorizer has {} terms",
                binary.weights.len(),
                vectorizer.dimension()
            )));
        }
        if granular.dimension() != vectorizer.dimension() {
            return Err(AppError::ModelLoad(format!(
                "granular model has {} weights per class but vectorizer has {} terms",
                granular.dimension(),
                vectorizer.dimension()
            )));
        }

        Ok(Self {
            vectorizer,
            binary,
            granular,
            explainer: FeatureExplainer::new(config.feature_search_depth, config.top_features),
            true_threshold: config.true_threshold,
            fake_threshold: config.fake_threshold,
        })
    }

    pub fn predict(&self, text: &str) -> Result<PredictionResult, AppError> {
        let start = Instant::now();
        let prediction_id = Uuid::new_v4();

        if text.trim().is_empty() {
            return Err(AppError::InvalidInput("text must not be empty".to_string()));
        }

        let cleaned = clean_text(text);
        if cleaned.is_empty() {
            return Err(AppError::InvalidInput(
                "text is empty after cleaning; no alphabetic content".to_string(),
            ));
        }

        let vector = self.vectorizer.transform(&cleaned);
        let c_true = self.binary.predict_c_true(&vector);
        debug!(%prediction_id, c_true, "binary classification complete");

        let result = if c_true >= self.true_threshold {
            PredictionResult {
                binary_prediction: BinaryLabel::True,
                binary_confidence: round4(c_true),
                c_true_confidence: round4(c_true),
                granular_prediction: None,
                granular_confidence_top: None,
                granular_confidence_all: None,
                top_features_input: None,
                top_features_overall: None,
            }
        } else {
            let (binary_prediction, binary_confidence) = if c_true >= self.fake_threshold {
                (BinaryLabel::Borderline, c_true)
            } else {
                (BinaryLabel::Fake, 1.0 - c_true)
            };

            let (class_index, confidences) = self.granular.predict(&vector);
            let granular_label = self.granular.classes[class_index].clone();

            let confidence_all: HashMap<String, f64> = self
                .granular
                .classes
                .iter()
                .zip(&confidences)
                .map(|(class, &confidence)| (class.clone(), round4(confidence)))
                .collect();

            let top_input =
                self.explainer
                    .top_in_input(&self.granular, class_index, &self.vectorizer, &vector);
            let top_overall =
                self.explainer
                    .top_overall(&self.granular, class_index, &self.vectorizer);

            PredictionResult {
                binary_prediction,
                binary_confidence: round4(binary_confidence),
                c_true_confidence: round4(c_true),
                granular_prediction: Some(granular_label),
                granular_confidence_top: Some(round4(confidences[class_index])),
                granular_confidence_all: Some(confidence_all),
                top_features_input: Some(top_input),
                top_features_overall: Some(top_overall),
            }
        };

        info!(
            %prediction_id,
            label = result.binary_prediction.as_str(),
            c_true = result.c_true_confidence,
            granular = result.has_granular(),
            latency_ms = start.elapsed().as_secs_f64() * 1000.0,
            "prediction complete"
        );

        Ok(result)
    }
}
