use serde::{Deserialize, Serialize};

/// A movie in the loaded catalog
///
/// Entries are immutable once loaded. The position of an entry in the catalog
/// is its id and joins it to its row in the feature matrix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    /// Display title, not guaranteed unique
    pub title: String,
    /// Free-form delimited genre tags (e.g., "Action, Crime, Drama")
    pub genres: String,
    /// Release year
    pub year: i32,
    /// Audience vote count
    pub votes: u64,
    /// Audience rating on a 0-10 scale
    pub rating: f64,
}

impl CatalogEntry {
    pub fn new(title: &str, genres: &str, year: i32, votes: u64, rating: f64) -> Self {
        Self {
            title: title.to_string(),
            genres: genres.to_string(),
            year,
            votes,
            rating,
        }
    }
}

/// Load-time admission thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogFilter {
    pub min_year: i32,
    pub min_votes: u64,
}

impl Default for CatalogFilter {
    fn default() -> Self {
        Self {
            min_year: 1950,
            min_votes: 1000,
        }
    }
}

impl CatalogFilter {
    pub fn admits(&self, entry: &CatalogEntry) -> bool {
        entry.year >= self.min_year && entry.votes >= self.min_votes
    }
}

/// A selectable title for the client-side picker
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TitleOption {
    pub id: usize,
    pub title: String,
    pub year: i32,
    pub genres: String,
}

impl TitleOption {
    pub fn new(id: usize, entry: &CatalogEntry) -> Self {
        Self {
            id,
            title: entry.title.clone(),
            year: entry.year,
            genres: entry.genres.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_thresholds_inclusive() {
        let filter = CatalogFilter::default();
        assert!(filter.admits(&CatalogEntry::new("Rear Window", "Mystery, Thriller", 1954, 1000, 8.5)));
        assert!(filter.admits(&CatalogEntry::new("Sunset Blvd.", "Drama", 1950, 250_000, 8.4)));
        assert!(!filter.admits(&CatalogEntry::new("Casablanca", "Drama, Romance", 1942, 600_000, 8.5)));
        assert!(!filter.admits(&CatalogEntry::new("Obscure", "Drama", 1999, 999, 6.0)));
    }

    #[test]
    fn test_entry_serialization() {
        let entry = CatalogEntry::new("Heat", "Action, Crime", 1995, 700_000, 8.3);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["title"], "Heat");
        assert_eq!(json["year"], 1995);
        assert_eq!(json["rating"], 8.3);
    }
}
