use crate::error::AppError;
use std::env;

/// Runtime configuration, sourced from the environment with sensible
/// defaults. Decision thresholds live here rather than in the decision code
/// so the rule stays auditable independently of the model weights.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub vectorizer_path: String,
    pub binary_model_path: String,
    pub granular_model_path: String,
    /// C_True at or above this value is a final "True" decision.
    pub true_threshold: f64,
    /// C_True below this value is "Fake"; between the two it is borderline.
    pub fake_threshold: f64,
    /// How many coefficients to consider when ranking features.
    pub feature_search_depth: usize,
    /// How many (term, weight) pairs each ranking returns.
    pub top_features: usize,
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);

        let vectorizer_path =
            env::var("VECTORIZER_PATH").unwrap_or_else(|_| "models/vectorizer.json".to_string());
        let binary_model_path = env::var("BINARY_MODEL_PATH")
            .unwrap_or_else(|_| "models/binary_model.json".to_string());
        let granular_model_path = env::var("GRANULAR_MODEL_PATH")
            .unwrap_or_else(|_| "models/granular_model.json".to_string());

        let true_threshold = env::var("TRUE_THRESHOLD")
            .unwrap_or_else(|_| "0.60".to_string())
            .parse()
            .unwrap_or(0.60);
        let fake_threshold = env::var("FAKE_THRESHOLD")
            .unwrap_or_else(|_| "0.50".to_string())
            .parse()
            .unwrap_or(0.50);

        let feature_search_depth = env::var("FEATURE_SEARCH_DEPTH")
            .unwrap_or_else(|_| "200".to_string())
            .parse()
            .unwrap_or(200);
        let top_features = env::var("TOP_FEATURES")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);

        let config = Config {
            port,
            vectorizer_path,
            binary_model_path,
            granular_model_path,
            true_threshold,
            fake_threshold,
            feature_search_depth,
            top_features,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !(0.0 < self.true_threshold && self.true_threshold < 1.0) {
            return Err(AppError::Config(format!(
                "true_threshold must be in (0, 1), got {}",
                self.true_threshold
            )));
        }
        if !(0.0 < self.fake_threshold && self.fake_threshold < 1.0) {
            return Err(AppError::Config(format!(
                "fake_threshold must be in (0, 1), got {}",
                self.fake_threshold
            )));
        }
        if self.fake_threshold >= self.true_threshold {
            return Err(AppError::Config(format!(
                "fake_threshold ({}) must be below true_threshold ({})",
                self.fake_threshold, self.true_threshold
            )));
        }
        if self.top_features > self.feature_search_depth {
            return Err(AppError::Config(format!(
                "top_features ({}) exceeds feature_search_depth ({})",
                self.top_features, self.feature_search_depth
            )));
        }
        Ok(())
    }
}
