use crate::models::CatalogEntry;

/// Decade token for a release year, e.g. 1995 -> "1990s"
pub fn decade_bucket(year: i32) -> String {
    format!("{}s", year.div_euclid(10) * 10)
}

/// Builds the text profile fed to the vector space model
///
/// Genres appear twice so their term frequency outweighs the single decade
/// token. Entries are assumed to have passed the load-time filters already.
pub fn build_profile(entry: &CatalogEntry) -> String {
    format!(
        "{} {} {}",
        entry.genres,
        entry.genres,
        decade_bucket(entry.year)
    )
}
