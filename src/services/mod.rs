pub mod catalog;
pub mod profile;
pub mod ranker;
pub mod recommender;
pub mod taste;
pub mod vector_space;

pub use catalog::{CatalogSource, CsvCatalogSource};
pub use recommender::RecommenderContext;
