use std::collections::{BTreeSet, HashMap};
use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{
        CatalogEntry, CatalogSummary, Recommendation, RecommendationParams, ScoredEntry,
        TitleOption,
    },
};

use super::{
    catalog::CatalogSource,
    profile::build_profile,
    ranker,
    taste::{self, TasteVector},
    vector_space::{FeatureMatrix, VectorSpaceModel},
};

/// Immutable catalog snapshot with its fitted vector space
///
/// Built once per catalog load and shared read-only between requests.
/// Reloading produces a new context rather than mutating this one.
#[derive(Debug)]
pub struct RecommenderContext {
    catalog: Vec<CatalogEntry>,
    model: VectorSpaceModel,
    matrix: FeatureMatrix,
    /// title -> catalog indices, in catalog order
    titles: HashMap<String, Vec<usize>>,
    source: String,
    loaded_at: DateTime<Utc>,
}

impl RecommenderContext {
    /// Profiles the catalog and fits the vector space model
    pub fn build(catalog: Vec<CatalogEntry>, source: impl Into<String>) -> AppResult<Self> {
        if catalog.is_empty() {
            return Err(AppError::EmptyCatalog);
        }

        let start = Instant::now();
        let profiles: Vec<String> = catalog.iter().map(build_profile).collect();
        let (model, matrix) = VectorSpaceModel::fit(&profiles)?;

        let mut titles: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, entry) in catalog.iter().enumerate() {
            titles.entry(entry.title.clone()).or_default().push(index);
        }

        let duplicated = titles.values().filter(|ids| ids.len() > 1).count();
        if duplicated > 0 {
            tracing::warn!(
                duplicated,
                "Catalog contains duplicate titles; select them by id"
            );
        }

        let source = source.into();
        tracing::info!(
            source = %source,
            entries = catalog.len(),
            dimensions = matrix.dim(),
            build_time_ms = start.elapsed().as_millis(),
            "Recommender context built"
        );

        Ok(Self {
            catalog,
            model,
            matrix,
            titles,
            source,
            loaded_at: Utc::now(),
        })
    }

    /// Loads the catalog from `source` and builds a context over it
    pub fn from_source(source: &dyn CatalogSource) -> AppResult<Self> {
        let catalog = source.load()?;
        Self::build(catalog, source.describe())
    }

    pub fn catalog(&self) -> &[CatalogEntry] {
        &self.catalog
    }

    pub fn model(&self) -> &VectorSpaceModel {
        &self.model
    }

    pub fn matrix(&self) -> &FeatureMatrix {
        &self.matrix
    }

    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            entries: self.catalog.len(),
            vocabulary_size: self.model.dim(),
            source: self.source.clone(),
            loaded_at: self.loaded_at,
        }
    }

    pub fn title_options(&self) -> Vec<TitleOption> {
        self.catalog
            .iter()
            .enumerate()
            .map(|(id, entry)| TitleOption::new(id, entry))
            .collect()
    }

    /// Maps liked titles and ids to catalog indices
    ///
    /// Titles match exactly. A title shared by several entries is rejected as
    /// ambiguous; the caller should pass one of the listed ids instead.
    pub fn resolve_liked(&self, titles: &[String], ids: &[usize]) -> AppResult<BTreeSet<usize>> {
        let mut liked = BTreeSet::new();

        for title in titles {
            match self.titles.get(title).map(Vec::as_slice) {
                None | Some([]) => {
                    return Err(AppError::NotFound(format!("Title not in catalog: {}", title)))
                }
                Some([index]) => {
                    liked.insert(*index);
                }
                Some(candidates) => {
                    return Err(AppError::AmbiguousTitle {
                        title: title.clone(),
                        ids: candidates.to_vec(),
                    })
                }
            }
        }

        for &id in ids {
            if id >= self.catalog.len() {
                return Err(AppError::NotFound(format!(
                    "Catalog id {} out of range (catalog has {} entries)",
                    id,
                    self.catalog.len()
                )));
            }
            liked.insert(id);
        }

        Ok(liked)
    }

    /// Mean of the rows at `liked`
    pub fn taste_vector(&self, liked: &BTreeSet<usize>) -> AppResult<TasteVector> {
        taste::aggregate(&self.matrix, liked)
    }

    /// Runs one recommendation request against this snapshot
    ///
    /// An empty selection short-circuits to a warning without scoring anything.
    pub fn recommend(&self, params: &RecommendationParams) -> AppResult<Recommendation<'_>> {
        if params.is_empty_selection() {
            tracing::info!("Empty selection, skipping ranking");
            return Ok(Recommendation::EmptySelection);
        }

        let start = Instant::now();
        let liked = self.resolve_liked(&params.liked_titles, &params.liked_ids)?;
        let ranked = self.rank(&liked, params.sim_weight, params.top_k)?;

        tracing::info!(
            liked = liked.len(),
            sim_weight = params.sim_weight,
            top_k = params.top_k,
            returned = ranked.len(),
            processing_time_us = start.elapsed().as_micros(),
            "Recommendations computed"
        );

        Ok(Recommendation::Ranked(ranked))
    }

    /// Ranks the catalog for an already-resolved liked set
    pub fn rank(
        &self,
        liked: &BTreeSet<usize>,
        sim_weight: f64,
        top_k: usize,
    ) -> AppResult<Vec<ScoredEntry<'_>>> {
        let taste = self.taste_vector(liked)?;
        Ok(ranker::rank(
            &self.catalog,
            &self.matrix,
            &taste,
            liked,
            sim_weight,
            top_k,
        ))
    }
}
