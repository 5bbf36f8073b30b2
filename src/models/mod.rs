mod movie;
mod recommendation;

pub use movie::{CatalogEntry, CatalogFilter, TitleOption};
pub use recommendation::{
    CatalogSummary, Recommendation, RecommendationDefaults, RecommendationParams,
    RecommendationRequest, RecommendationResponse, RecommendationRow, ScoredEntry,
    EMPTY_SELECTION_WARNING, SIM_WEIGHT_RANGE, TOP_K_RANGE,
};
