use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{CatalogEntry, CatalogFilter},
};

/// Columns that must be present in the catalog header
pub const REQUIRED_COLUMNS: [&str; 5] = ["title", "genres", "year", "votes", "rating"];

/// Supplier of validated catalog entries
///
/// Implementations return entries that already passed the load-time filters,
/// densely indexed in source order.
#[cfg_attr(test, mockall::automock)]
pub trait CatalogSource: Send + Sync {
    fn load(&self) -> AppResult<Vec<CatalogEntry>>;

    /// Human-readable origin, for logs and the catalog summary
    fn describe(&self) -> String;
}

/// Catalog backed by a CSV file on disk
#[derive(Debug, Clone)]
pub struct CsvCatalogSource {
    path: PathBuf,
    filter: CatalogFilter,
}

impl CsvCatalogSource {
    pub fn new(path: impl Into<PathBuf>, filter: CatalogFilter) -> Self {
        Self {
            path: path.into(),
            filter,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for CsvCatalogSource {
    fn load(&self) -> AppResult<Vec<CatalogEntry>> {
        let file = std::fs::File::open(&self.path).map_err(|e| {
            AppError::Catalog(format!("Cannot open {}: {}", self.path.display(), e))
        })?;
        read_catalog(file, self.filter)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Row as it appears in the file; numeric columns are coerced afterwards
#[derive(Debug, Deserialize)]
struct RawRecord {
    title: String,
    #[serde(default)]
    genres: String,
    year: String,
    votes: String,
    rating: String,
}

impl RawRecord {
    fn into_entry(self) -> Option<CatalogEntry> {
        let year = parse_number(&self.year)?.trunc();
        let votes = parse_number(&self.votes)?.trunc();
        let rating = parse_number(&self.rating)?;
        if votes < 0.0 || year < i32::MIN as f64 || year > i32::MAX as f64 {
            return None;
        }

        Some(CatalogEntry {
            title: self.title,
            genres: self.genres,
            year: year as i32,
            votes: votes as u64,
            rating,
        })
    }
}

/// Accepts integers and decimal strings such as "1995" or "1995.0"
fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Reads a headered CSV catalog and applies the load-time filters
///
/// Rows with an unparsable year, vote count or rating are dropped, as are
/// malformed rows. A missing required column or an I/O failure aborts the load.
pub fn read_catalog<R: io::Read>(reader: R, filter: CatalogFilter) -> AppResult<Vec<CatalogEntry>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Catalog(format!(
            "Missing required columns: {}",
            missing.join(", ")
        )));
    }

    let mut total = 0usize;
    let mut unparsable = 0usize;
    let mut filtered_out = 0usize;
    let mut entries = Vec::new();

    for result in csv_reader.deserialize::<RawRecord>() {
        total += 1;
        let record = match result {
            Ok(record) => record,
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(e.into()),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping malformed catalog row");
                unparsable += 1;
                continue;
            }
        };

        match record.into_entry() {
            Some(entry) if filter.admits(&entry) => entries.push(entry),
            Some(_) => filtered_out += 1,
            None => unparsable += 1,
        }
    }

    tracing::info!(
        total,
        unparsable,
        filtered_out,
        kept = entries.len(),
        min_year = filter.min_year,
        min_votes = filter.min_votes,
        "Catalog loaded"
    );

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(csv: &str) -> AppResult<Vec<CatalogEntry>> {
        read_catalog(csv.as_bytes(), CatalogFilter::default())
    }

    #[test]
    fn test_filters_and_reindexes() {
        let csv = "\
title,genres,year,votes,rating
Casablanca,\"Drama, Romance\",1942,600000,8.5
Heat,\"Action, Crime\",1995,700000,8.3
Unknown Short,Drama,2001,12,5.0
Alien,\"Horror, Sci-Fi\",1979,900000,8.5
";
        let entries = load(csv).unwrap();

        let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Heat", "Alien"]);
        assert_eq!(entries[0].genres, "Action, Crime");
        assert_eq!(entries[1].year, 1979);
    }

    #[test]
    fn test_year_coercion() {
        let csv = "\
title,genres,year,votes,rating
Decimal Year,Drama,1995.0,5000,7.0
Bad Year,Drama,199x,5000,7.0
Blank Year,Drama,,5000,7.0
Padded Year,Drama, 2004 ,5000,7.0
";
        let entries = load(csv).unwrap();

        let years: Vec<i32> = entries.iter().map(|e| e.year).collect();
        assert_eq!(years, vec![1995, 2004]);
    }

    #[test]
    fn test_extra_columns_ignored() {
        let csv = "\
id,title,genres,year,votes,rating,director
tt1,Heat,Crime,1995,700000,8.3,Michael Mann
";
        let entries = load(csv).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].votes, 700_000);
    }

    #[test]
    fn test_missing_column_is_configuration_error() {
        let csv = "title,genres,year,rating\nHeat,Crime,1995,8.3\n";
        let err = load(csv).unwrap_err();
        assert!(matches!(err, AppError::Catalog(ref msg) if msg.contains("votes")));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_malformed_row_skipped() {
        let csv = "\
title,genres,year,votes,rating
Heat,Crime,1995,700000
Alien,Horror,1979,900000,8.5
";
        let entries = load(csv).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Alien");
    }

    #[test]
    fn test_missing_file() {
        let source = CsvCatalogSource::new("/nonexistent/movies.csv", CatalogFilter::default());
        assert!(matches!(source.load(), Err(AppError::Catalog(_))));
        assert_eq!(source.describe(), "/nonexistent/movies.csv");
    }
}
