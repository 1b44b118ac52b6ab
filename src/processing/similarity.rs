//! TF-IDF cosine similarity between two texts

use crate::error::{CareerMirrorError, Result};
use crate::processing::text_processor::TextProcessor;
use log::debug;
use mini_moka::sync::{Cache, ConcurrentCacheExt};
use std::collections::HashMap;

pub const MAX_FEATURES: usize = 2000;
const NGRAM_RANGE: (usize, usize) = (1, 3);

/// Term vocabulary fit jointly over a small corpus.
struct Vocabulary {
    index: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl Vocabulary {
    fn fit(docs: &[Vec<String>]) -> Self {
        let mut totals: HashMap<&str, usize> = HashMap::new();
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();

        for doc in docs {
            let mut seen = std::collections::HashSet::new();
            for term in doc {
                *totals.entry(term.as_str()).or_insert(0) += 1;
                if seen.insert(term.as_str()) {
                    *doc_freq.entry(term.as_str()).or_insert(0) += 1;
                }
            }
        }

        let mut entries: Vec<(&str, usize)> = totals.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(MAX_FEATURES);

        let n = docs.len() as f64;
        let mut index = HashMap::with_capacity(entries.len());
        let mut idf = Vec::with_capacity(entries.len());

        for (i, (term, _)) in entries.into_iter().enumerate() {
            let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
            index.insert(term.to_string(), i);
            // Smoothed: ln((1 + n) / (1 + df)) + 1
            idf.push(((1.0 + n) / (1.0 + df)).ln() + 1.0);
        }

        Self { index, idf }
    }

    fn vectorize(&self, doc: &[String]) -> Vec<f64> {
        let mut vector = vec![0.0; self.idf.len()];
        for term in doc {
            if let Some(&i) = self.index.get(term) {
                vector[i] += 1.0;
            }
        }
        for (value, idf) in vector.iter_mut().zip(&self.idf) {
            *value *= idf;
        }
        l2_normalize(&mut vector);
        vector
    }
}

fn l2_normalize(vector: &mut [f64]) {
    let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}

/// Cosine similarity of two vectors of equal length; 0.0 on zero magnitude.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0;
    let mut mag_a = 0.0;
    let mut mag_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }

    let denom = mag_a.sqrt() * mag_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

pub struct SimilarityScorer {
    processor: TextProcessor,
    cache: Option<Cache<(String, String), f64>>,
}

impl SimilarityScorer {
    /// `cache_size` of zero disables memoization.
    pub fn new(cache_size: u64) -> Self {
        let cache = (cache_size > 0).then(|| Cache::builder().max_capacity(cache_size).build());
        Self {
            processor: TextProcessor::new(),
            cache,
        }
    }

    pub fn uncached() -> Self {
        Self::new(0)
    }

    /// Similarity in `[0, 1]`, or an error when the joint vocabulary is empty.
    pub fn try_similarity(&self, text_a: &str, text_b: &str) -> Result<f64> {
        if text_a.trim().is_empty() || text_b.trim().is_empty() {
            return Ok(0.0);
        }

        let key = (text_a.to_string(), text_b.to_string());
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&key) {
                return Ok(hit);
            }
        }

        let (min_n, max_n) = NGRAM_RANGE;
        let docs = [
            self.processor.ngrams(text_a, min_n, max_n),
            self.processor.ngrams(text_b, min_n, max_n),
        ];

        let vocabulary = Vocabulary::fit(&docs);
        if vocabulary.idf.is_empty() {
            return Err(CareerMirrorError::Similarity(
                "empty vocabulary; texts contain only stop words".to_string(),
            ));
        }

        let a = vocabulary.vectorize(&docs[0]);
        let b = vocabulary.vectorize(&docs[1]);
        let score = cosine_similarity(&a, &b).clamp(0.0, 1.0);
        debug!(
            "Similarity {:.3} over {} features",
            score,
            vocabulary.idf.len()
        );

        if let Some(cache) = &self.cache {
            cache.insert(key, score);
        }

        Ok(score)
    }

    /// Like `try_similarity`, degrading any failure to 0.0.
    pub fn similarity(&self, text_a: &str, text_b: &str) -> f64 {
        self.try_similarity(text_a, text_b).unwrap_or(0.0)
    }

    pub fn cached_entries(&self) -> u64 {
        match &self.cache {
            Some(cache) => {
                cache.sync();
                cache.entry_count()
            }
            None => 0,
        }
    }
}
