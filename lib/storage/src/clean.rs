//! Raw export cleaning
//!
//! Turns the raw restaurant export into clean [`Restaurant`] rows:
//! exact duplicates are dropped, "Area, City" locations are split,
//! rating counts like `1k+` or `Too Few Ratings` are parsed, and any row
//! with a field that cannot be parsed is dropped.

use crate::error::{Result, StorageError};
use ahash::AHashSet;
use dinex_core::Restaurant;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// One row of the raw export, every field as optional text
///
/// Extra columns in the export (ids, links, addresses) are ignored.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RawRestaurant {
    #[serde(default)]
    pub name: Option<String>,
    /// Location in "Area, City" form
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub rating_count: Option<String>,
    #[serde(default)]
    pub cost: Option<String>,
    #[serde(default)]
    pub cuisine: Option<String>,
}

/// Outcome of a cleaning pass
#[derive(Debug, Clone, Default)]
pub struct CleaningReport {
    pub records: Vec<Restaurant>,
    pub raw_rows: usize,
    pub duplicates_dropped: usize,
    pub incomplete_dropped: usize,
}

/// Split a location into `(city, area)`
///
/// `"Anna Nagar, Chennai"` gives `("Chennai", "Anna Nagar")`. With more
/// than two parts the last is the city and the rest form the area. Without
/// a comma the value is both city and area.
pub fn split_city_area(location: &str) -> Option<(String, String)> {
    let location = location.trim();
    if location.is_empty() {
        return None;
    }

    if !location.contains(',') {
        return Some((location.to_string(), location.to_string()));
    }

    let parts: Vec<&str> = location.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [area, city] => Some((city.to_string(), area.to_string())),
        [rest @ .., city] => Some((city.to_string(), rest.join(", "))),
        [] => None,
    }
}

/// Parse a rating count such as `"50+ ratings"`, `"1.2K+ ratings"` or `"120"`
///
/// `"50+"` means at least 51. `"Too Few Ratings"` and anything unparsable
/// give `None`.
pub fn parse_rating_count(value: &str) -> Option<u64> {
    let lower = value.trim().to_lowercase();
    if lower.contains("too few ratings") {
        return None;
    }

    let cleaned = lower.replace("ratings", "").replace("rating", "");
    let cleaned = cleaned.trim();

    if cleaned.contains("k+") {
        let thousands: f64 = cleaned.replace("k+", "").trim().parse().ok()?;
        if !thousands.is_finite() || thousands < 0.0 {
            return None;
        }
        Some((thousands * 1000.0) as u64)
    } else if cleaned.contains('+') {
        let base: u64 = cleaned.replace('+', "").trim().parse().ok()?;
        base.checked_add(1)
    } else {
        cleaned.parse().ok()
    }
}

/// Parse a cost such as `"₹ 1,200"`
pub fn parse_cost(value: &str) -> Option<f64> {
    let cleaned = value.replace(['₹', ','], "");
    parse_finite(&cleaned)
}

/// Parse a rating, `"--"` and other placeholders give `None`
pub fn parse_rating(value: &str) -> Option<f64> {
    parse_finite(value)
}

fn parse_finite(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Clean one raw row, `None` when a required field is missing or malformed
pub fn clean_row(raw: &RawRestaurant) -> Option<Restaurant> {
    let (city, area) = split_city_area(raw.city.as_deref()?)?;
    let cuisine = raw.cuisine.as_deref().map(str::trim).filter(|c| !c.is_empty())?;

    Some(Restaurant {
        name: raw.name.as_deref().map(str::trim).unwrap_or_default().to_string(),
        city,
        area,
        cuisine: cuisine.to_string(),
        rating: parse_rating(raw.rating.as_deref()?)?,
        rating_count: parse_rating_count(raw.rating_count.as_deref()?)?,
        cost: parse_cost(raw.cost.as_deref()?)?,
    })
}

/// Clean a raw CSV export from any reader
pub fn clean_reader<R: Read>(reader: R) -> Result<CleaningReport> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers()?.clone();

    let mut seen: AHashSet<Vec<String>> = AHashSet::new();
    let mut report = CleaningReport::default();

    for (line, record) in reader.records().enumerate() {
        let record = record?;
        report.raw_rows += 1;

        // Duplicates are judged on the full raw row, extra columns included
        let key: Vec<String> = record.iter().map(str::to_string).collect();
        if !seen.insert(key) {
            report.duplicates_dropped += 1;
            continue;
        }

        let raw: RawRestaurant = record.deserialize(Some(&headers))?;
        match clean_row(&raw) {
            Some(restaurant) => report.records.push(restaurant),
            None => {
                debug!(line = line + 2, "Dropping incomplete row");
                report.incomplete_dropped += 1;
            }
        }
    }

    Ok(report)
}

/// Clean a raw CSV export on disk
pub fn clean_csv<P: AsRef<Path>>(path: P) -> Result<CleaningReport> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(StorageError::MissingFile {
            name: "raw input",
            path: path.to_path_buf(),
        });
    }

    let report = clean_reader(std::fs::File::open(path)?)?;
    info!(
        raw_rows = report.raw_rows,
        kept = report.records.len(),
        duplicates = report.duplicates_dropped,
        incomplete = report.incomplete_dropped,
        "Cleaned {:?}",
        path
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_two_parts() {
        assert_eq!(
            split_city_area("Anna Nagar, Chennai"),
            Some(("Chennai".to_string(), "Anna Nagar".to_string()))
        );
    }

    #[test]
    fn test_split_many_parts() {
        assert_eq!(
            split_city_area("Sector 5, Salt Lake, Kolkata"),
            Some(("Kolkata".to_string(), "Sector 5, Salt Lake".to_string()))
        );
    }

    #[test]
    fn test_split_no_comma() {
        assert_eq!(
            split_city_area(" Pune "),
            Some(("Pune".to_string(), "Pune".to_string()))
        );
        assert_eq!(split_city_area("  "), None);
    }

    #[test]
    fn test_parse_rating_count() {
        assert_eq!(parse_rating_count("Too Few Ratings"), None);
        assert_eq!(parse_rating_count("50+ ratings"), Some(51));
        assert_eq!(parse_rating_count("1K+ ratings"), Some(1000));
        assert_eq!(parse_rating_count("1.5k+ ratings"), Some(1500));
        assert_eq!(parse_rating_count("20 ratings"), Some(20));
        assert_eq!(parse_rating_count("1 rating"), Some(1));
        assert_eq!(parse_rating_count("120"), Some(120));
        assert_eq!(parse_rating_count("lots"), None);
        assert_eq!(parse_rating_count("18446744073709551615+ ratings"), None);
    }

    #[test]
    fn test_parse_cost_and_rating() {
        assert_eq!(parse_cost("₹ 1,200"), Some(1200.0));
        assert_eq!(parse_cost("₹200"), Some(200.0));
        assert_eq!(parse_cost("free"), None);
        assert_eq!(parse_rating("4.3"), Some(4.3));
        assert_eq!(parse_rating("--"), None);
    }

    #[test]
    fn test_clean_reader() {
        let csv = "\
id,name,city,rating,rating_count,cost,cuisine,link
1,Dosa Hut,\"Anna Nagar,Chennai\",4.3,50+ ratings,₹ 300,South Indian,x
1,Dosa Hut,\"Anna Nagar,Chennai\",4.3,50+ ratings,₹ 300,South Indian,x
2,Ghost Kitchen,\"Adyar,Chennai\",--,Too Few Ratings,₹ 250,Chinese,y
3,Cafe Pune,Pune,3.9,1K+ ratings,\"₹ 1,000\",Cafe,z
";
        let report = clean_reader(csv.as_bytes()).unwrap();

        assert_eq!(report.raw_rows, 4);
        assert_eq!(report.duplicates_dropped, 1);
        assert_eq!(report.incomplete_dropped, 1);
        assert_eq!(report.records.len(), 2);

        let dosa = &report.records[0];
        assert_eq!(dosa.city, "Chennai");
        assert_eq!(dosa.area, "Anna Nagar");
        assert_eq!(dosa.rating_count, 51);
        assert_eq!(dosa.cost, 300.0);

        let cafe = &report.records[1];
        assert_eq!(cafe.city, "Pune");
        assert_eq!(cafe.area, "Pune");
        assert_eq!(cafe.rating_count, 1000);
        assert_eq!(cafe.cost, 1000.0);
    }

    #[test]
    fn test_missing_input() {
        let result = clean_csv("/nonexistent/raw.csv");
        assert!(matches!(result, Err(StorageError::MissingFile { name: "raw input", .. })));
    }
}
