use crate::model::GranularModel;
use crate::types::round4;
use crate::vectorizer::{FeatureVector, Vectorizer};
use std::cmp::Ordering;

/// Ranks vocabulary terms by their coefficient weight for a granular class.
///
/// Two rankings are produced from the same bounded candidate pool: one
/// restricted to terms present in the submitted text, one global. Ordering is
/// by descending weight magnitude with a stable tie-break on term name, so
/// results are deterministic across runs.
pub struct FeatureExplainer {
    search_depth: usize,
    top_k: usize,
}

impl FeatureExplainer {
    pub fn new(search_depth: usize, top_k: usize) -> Self {
        Self { search_depth, top_k }
    }

    /// Top-weighted terms for the predicted class, regardless of input.
    pub fn top_overall(
        &self,
        model: &GranularModel,
        class_index: usize,
        vectorizer: &Vectorizer,
    ) -> Vec<(String, f64)> {
        self.ranked_pool(model.coefficients(class_index), vectorizer)
            .into_iter()
            .take(self.top_k)
            .map(|(term, weight)| (term, round4(weight)))
            .collect()
    }

    /// Top-weighted terms among those actually present in the input vector.
    /// An empty result means no significant features, not an error.
    pub fn top_in_input(
        &self,
        model: &GranularModel,
        class_index: usize,
        vectorizer: &Vectorizer,
        vector: &FeatureVector,
    ) -> Vec<(String, f64)> {
        let present: Vec<usize> = vector.entries().iter().map(|&(index, _)| index).collect();
        self.ranked_pool_indexed(model.coefficients(class_index), vectorizer)
            .into_iter()
            .filter(|&(index, _, _)| present.binary_search(&index).is_ok())
            .take(self.top_k)
            .map(|(_, term, weight)| (term, round4(weight)))
            .collect()
    }

    fn ranked_pool(&self, coefficients: &[f64], vectorizer: &Vectorizer) -> Vec<(String, f64)> {
        self.ranked_pool_indexed(coefficients, vectorizer)
            .into_iter()
            .map(|(_, term, weight)| (term, weight))
            .collect()
    }

    fn ranked_pool_indexed(
        &self,
        coefficients: &[f64],
        vectorizer: &Vectorizer,
    ) -> Vec<(usize, String, f64)> {
        let mut candidates: Vec<(usize, String, f64)> = coefficients
            .iter()
            .enumerate()
            .filter(|&(_, &weight)| weight != 0.0)
            .filter_map(|(index, &weight)| {
                vectorizer.term(index).map(|term| (index, term.to_string(), weight))
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.2.abs()
                .partial_cmp(&a.2.abs())
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.cmp(&b.1))
        });
        candidates.truncate(self.search_depth);
        candidates
    }
}
