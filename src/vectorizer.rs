use crate::error::AppError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;

/// TF-IDF vectorizer over a fixed vocabulary learned at training time.
///
/// The vocabulary and IDF table ship as a JSON artifact; nothing here is
/// mutated after load. Transform semantics follow the training pipeline:
/// raw term counts scaled by IDF, then L2-normalized.
pub struct Vectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    terms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct VectorizerArtifact {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

/// Sparse feature vector, entries sorted by vocabulary index.
#[derive(Debug, Clone, Default)]
pub struct FeatureVector {
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.entries.binary_search_by_key(&index, |&(i, _)| i).is_ok()
    }
}

impl Vectorizer {
    pub fn load(path: &str) -> Result<Self, AppError> {
        let data = fs::read_to_string(path)
            .map_err(|e| AppError::ModelLoad(format!("failed to read {}: {}", path, e)))?;
        let artifact: VectorizerArtifact = serde_json::from_str(&data)?;
        Self::from_artifact(artifact.vocabulary, artifact.idf)
    }

    pub fn from_artifact(
        vocabulary: HashMap<String, usize>,
        idf: Vec<f64>,
    ) -> Result<Self, AppError> {
        if vocabulary.len() != idf.len() {
            return Err(AppError::ModelLoad(format!(
                "vocabulary has {} terms but idf table has {} entries",
                vocabulary.len(),
                idf.len()
            )));
        }
        let mut terms = vec![String::new(); vocabulary.len()];
        for (term, &index) in &vocabulary {
            if index >= terms.len() {
                return Err(AppError::ModelLoad(format!(
                    "vocabulary index {} for term '{}' out of range",
                    index, term
                )));
            }
            terms[index] = term.clone();
        }
        Ok(Self {
            vocabulary,
            idf,
            terms,
        })
    }

    pub fn dimension(&self) -> usize {
        self.idf.len()
    }

    /// Term name for a vocabulary index.
    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(|s| s.as_str())
    }

    /// Transform cleaned text into a sparse, L2-normalized TF-IDF vector.
    /// Terms outside the vocabulary are ignored.
    pub fn transform(&self, cleaned: &str) -> FeatureVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in cleaned.split_whitespace() {
            if let Some(&index) = self.vocabulary.get(token) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(index, tf)| (index, tf * self.idf[index]))
            .collect();
        entries.sort_by_key(|&(index, _)| index);

        let norm = entries.iter().map(|&(_, v)| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for entry in &mut entries {
                entry.1 /= norm;
            }
        }

        FeatureVector { entries }
    }
}

/// Harmonized text cleaning applied before vectorization: lowercase, drop
/// URL-like tokens and feed boilerplate, strip everything but letters.
/// Matches the cleaning the vocabulary was built with.
pub fn clean_text(text: &str) -> String {
    const BOILERPLATE: [&str; 3] = ["comments", "pinging", "rss"];

    let mut words: Vec<String> = Vec::new();
    for raw in text.to_lowercase().split_whitespace() {
        if raw.contains("http") || raw.contains("www") || raw.contains(".com") {
            continue;
        }
        let word: String = raw.chars().filter(|c| c.is_ascii_alphabetic()).collect();
        if word.is_empty() || BOILERPLATE.contains(&word.as_str()) {
            continue;
        }
        words.push(word);
    }
    words.join(" ")
}
