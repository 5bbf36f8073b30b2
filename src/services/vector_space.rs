//! TF-IDF vector space over catalog profiles
//!
//! Terms are lowercased runs of two or more word characters. IDF is smoothed,
//! `ln((1 + n) / (1 + df)) + 1`, and every projected vector is scaled to unit
//! length, so rows of the fitted matrix are directly comparable by cosine.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::{AppError, AppResult};

/// Sparse vector of `(dimension, weight)` pairs, ordered by dimension
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of non-zero dimensions
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, dim: usize) -> f64 {
        self.entries
            .binary_search_by_key(&dim, |&(d, _)| d)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Dot product against a dense vector of the same space
    pub fn dot_dense(&self, dense: &[f64]) -> f64 {
        self.entries
            .iter()
            .filter_map(|&(d, w)| dense.get(d).map(|x| x * w))
            .sum()
    }
}

/// One unit-length row per catalog entry, aligned by catalog index
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    dim: usize,
    rows: Vec<SparseVector>,
}

impl FeatureMatrix {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Width of every row
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn row(&self, index: usize) -> Option<&SparseVector> {
        self.rows.get(index)
    }

    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }
}

/// Fitted vocabulary and inverse document frequencies
#[derive(Debug, Clone)]
pub struct VectorSpaceModel {
    /// term -> dimension, assigned in lexical term order
    vocabulary: HashMap<String, usize>,
    /// IDF weight per dimension
    idf: Vec<f64>,
}

impl VectorSpaceModel {
    /// Fits the model on all profiles and projects each of them
    ///
    /// Fails when there are no profiles, or when no profile yields a single term.
    pub fn fit<S: AsRef<str>>(profiles: &[S]) -> AppResult<(Self, FeatureMatrix)> {
        if profiles.is_empty() {
            return Err(AppError::EmptyCatalog);
        }

        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        for profile in profiles {
            let unique: BTreeSet<String> = tokenize(profile.as_ref()).into_iter().collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            return Err(AppError::EmptyVocabulary);
        }

        let n = profiles.len() as f64;
        let mut vocabulary = HashMap::with_capacity(doc_freq.len());
        let mut idf = Vec::with_capacity(doc_freq.len());
        for (dim, (term, df)) in doc_freq.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term, dim);
        }

        let model = Self { vocabulary, idf };
        let rows = profiles
            .iter()
            .map(|profile| model.transform(profile.as_ref()))
            .collect();
        let matrix = FeatureMatrix {
            dim: model.dim(),
            rows,
        };

        tracing::info!(
            documents = profiles.len(),
            vocabulary_size = model.dim(),
            "Vector space model fitted"
        );

        Ok((model, matrix))
    }

    /// Projects arbitrary profile text into the fitted space
    ///
    /// Terms missing from the vocabulary contribute nothing. Text with no known
    /// terms maps to the zero vector.
    pub fn transform(&self, profile: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in tokenize(profile) {
            if let Some(&dim) = self.vocabulary.get(&term) {
                *counts.entry(dim).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(dim, tf)| (dim, tf * self.idf[dim]))
            .collect();

        let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut entries {
                *w /= norm;
            }
        }

        SparseVector { entries }
    }

    pub fn dim(&self) -> usize {
        self.idf.len()
    }

    pub fn dimension_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(&term.to_lowercase()).copied()
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.dimension_of(term).map(|dim| self.idf[dim])
    }
}

/// Lowercases and splits on anything that is not a word character,
/// keeping tokens of at least two characters
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() > 1)
        .map(str::to_string)
        .collect()
}
