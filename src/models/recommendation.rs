use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

use super::CatalogEntry;

/// Accepted range for the similarity weight
pub const SIM_WEIGHT_RANGE: RangeInclusive<f64> = 0.0..=1.0;

/// Accepted range for the number of recommendations
pub const TOP_K_RANGE: RangeInclusive<usize> = 5..=20;

/// Message returned instead of a ranking when nothing was selected
pub const EMPTY_SELECTION_WARNING: &str = "Please select at least one movie.";

/// Fallback values for parameters a request leaves out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationDefaults {
    pub sim_weight: f64,
    pub top_k: usize,
}

impl Default for RecommendationDefaults {
    fn default() -> Self {
        Self {
            sim_weight: 0.7,
            top_k: 10,
        }
    }
}

impl RecommendationDefaults {
    pub fn validate(&self) -> AppResult<()> {
        validate_sim_weight(self.sim_weight)?;
        validate_top_k(self.top_k)
    }
}

fn validate_sim_weight(sim_weight: f64) -> AppResult<()> {
    if !sim_weight.is_finite() || !SIM_WEIGHT_RANGE.contains(&sim_weight) {
        return Err(AppError::InvalidInput(format!(
            "sim_weight must be within [{}, {}], got {}",
            SIM_WEIGHT_RANGE.start(),
            SIM_WEIGHT_RANGE.end(),
            sim_weight
        )));
    }
    Ok(())
}

fn validate_top_k(top_k: usize) -> AppResult<()> {
    if !TOP_K_RANGE.contains(&top_k) {
        return Err(AppError::InvalidInput(format!(
            "top_k must be within [{}, {}], got {}",
            TOP_K_RANGE.start(),
            TOP_K_RANGE.end(),
            top_k
        )));
    }
    Ok(())
}

/// Request body for the recommendations endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationRequest {
    /// Liked titles, matched exactly against the catalog
    #[serde(default)]
    pub liked_titles: Vec<String>,
    /// Liked catalog ids, used to pick between entries sharing a title
    #[serde(default)]
    pub liked_ids: Vec<usize>,
    pub sim_weight: Option<f64>,
    pub top_k: Option<usize>,
}

impl RecommendationRequest {
    /// Applies defaults and range-checks the weighting parameters
    pub fn into_params(self, defaults: RecommendationDefaults) -> AppResult<RecommendationParams> {
        let sim_weight = self.sim_weight.unwrap_or(defaults.sim_weight);
        let top_k = self.top_k.unwrap_or(defaults.top_k);
        validate_sim_weight(sim_weight)?;
        validate_top_k(top_k)?;

        Ok(RecommendationParams {
            liked_titles: self.liked_titles,
            liked_ids: self.liked_ids,
            sim_weight,
            top_k,
        })
    }
}

/// Validated, fully-populated parameters for one scoring request
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationParams {
    pub liked_titles: Vec<String>,
    pub liked_ids: Vec<usize>,
    pub sim_weight: f64,
    pub top_k: usize,
}

impl RecommendationParams {
    pub fn is_empty_selection(&self) -> bool {
        self.liked_titles.is_empty() && self.liked_ids.is_empty()
    }
}

/// A catalog entry with its scores for one request
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredEntry<'a> {
    /// Catalog id of the entry
    pub index: usize,
    pub entry: &'a CatalogEntry,
    /// Cosine similarity to the taste vector, or -1 for liked entries
    pub similarity: f64,
    /// Rating rescaled to [0, 1]
    pub rating_norm: f64,
    pub final_score: f64,
}

/// Outcome of a recommendation request
#[derive(Debug, Clone, PartialEq)]
pub enum Recommendation<'a> {
    /// Nothing was selected; no scoring was performed
    EmptySelection,
    Ranked(Vec<ScoredEntry<'a>>),
}

/// One row of the recommendation table
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecommendationRow {
    pub id: usize,
    pub title: String,
    pub genres: String,
    pub year: i32,
    pub rating: f64,
    pub similarity: f64,
    pub final_score: f64,
}

impl From<&ScoredEntry<'_>> for RecommendationRow {
    fn from(scored: &ScoredEntry<'_>) -> Self {
        Self {
            id: scored.index,
            title: scored.entry.title.clone(),
            genres: scored.entry.genres.clone(),
            year: scored.entry.year,
            rating: scored.entry.rating,
            similarity: scored.similarity,
            final_score: scored.final_score,
        }
    }
}

/// Response body for the recommendations endpoint
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecommendationResponse {
    pub recommendations: Vec<RecommendationRow>,
    /// Set when no ranking was attempted
    pub warning: Option<String>,
}

impl From<Recommendation<'_>> for RecommendationResponse {
    fn from(recommendation: Recommendation<'_>) -> Self {
        match recommendation {
            Recommendation::EmptySelection => Self {
                recommendations: Vec::new(),
                warning: Some(EMPTY_SELECTION_WARNING.to_string()),
            },
            Recommendation::Ranked(entries) => Self {
                recommendations: entries.iter().map(RecommendationRow::from).collect(),
                warning: None,
            },
        }
    }
}

/// Description of the catalog snapshot currently being served
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogSummary {
    pub entries: usize,
    pub vocabulary_size: usize,
    pub source: String,
    pub loaded_at: DateTime<Utc>,
}
