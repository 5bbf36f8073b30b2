//! Content-based movie recommendations.
//!
//! Each catalog entry is profiled from its genres and release decade, profiles
//! are projected into a TF-IDF space, and a user's liked titles are averaged
//! into a taste vector. The catalog is then ranked by a blend of cosine
//! similarity to that taste vector and normalized audience rating.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
