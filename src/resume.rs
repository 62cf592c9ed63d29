//! Existing-results loading for resumable runs.
//!
//! A prior output file, when present, is read once into a map keyed by the
//! dedup field so rows that already resolved successfully are never fetched
//! again. The map is read-only for the rest of the run.

use crate::error::Result;
use crate::record::{self, BIBTEX_FIELD};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// A previously written output row.
#[derive(Debug, Clone)]
pub struct CachedRow {
    fields: HashMap<String, String>,
}

impl CachedRow {
    /// Value of a named column, if the prior output had it.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// The row's `bibtex_data` value ("" if the column was missing).
    pub fn bibtex(&self) -> &str {
        self.get(BIBTEX_FIELD).unwrap_or("")
    }
}

/// Map from trimmed key value to the full previously written row.
pub type ExistingResults = HashMap<String, CachedRow>;

/// Load previously produced records keyed by `key_field`.
///
/// A missing file is not an error and yields an empty map. Rows whose key
/// is absent or blank after trimming are skipped; on duplicate keys the
/// later row wins.
pub fn load_existing(path: &Path, key_field: &str) -> Result<ExistingResults> {
    let mut existing = ExistingResults::new();

    if !path.exists() {
        debug!(path = %path.display(), "No existing output, starting fresh");
        return Ok(existing);
    }

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    for row in reader.records() {
        let row = row?;
        let key = record::field_value(&headers, &row, key_field)
            .unwrap_or("")
            .trim();
        if key.is_empty() {
            continue;
        }

        let fields = headers
            .iter()
            .zip(row.iter())
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect();
        existing.insert(key.to_string(), CachedRow { fields });
    }

    info!(path = %path.display(), entries = existing.len(), "Loaded existing results");
    Ok(existing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_output(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(contents.as_bytes()).expect("Failed to write temp file");
        file
    }

    #[test]
    fn test_missing_file_is_empty() {
        let existing =
            load_existing(Path::new("/nonexistent/output.csv"), "title").expect("Load failed");
        assert!(existing.is_empty());
    }

    #[test]
    fn test_load_keyed_rows() {
        let file = write_output(
            "title,bibtex_url,bibtex_data\n\
             Paper A,http://x/a,@inproceedings{a}\n\
             Paper B,,No URL\n",
        );

        let existing = load_existing(file.path(), "title").expect("Load failed");
        assert_eq!(existing.len(), 2);
        assert_eq!(existing["Paper A"].bibtex(), "@inproceedings{a}");
        assert_eq!(existing["Paper A"].get("bibtex_url"), Some("http://x/a"));
        assert_eq!(existing["Paper B"].bibtex(), "No URL");
    }

    #[test]
    fn test_blank_keys_skipped() {
        let file = write_output(
            "title,bibtex_data\n\
             ,@article{orphan}\n\
             Paper A,@article{a}\n",
        );

        let existing = load_existing(file.path(), "title").expect("Load failed");
        assert_eq!(existing.len(), 1);
        assert!(existing.contains_key("Paper A"));
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let file = write_output(
            "title,bibtex_data\n\
             Paper A,@article{old}\n\
             Paper A,@article{new}\n",
        );

        let existing = load_existing(file.path(), "title").expect("Load failed");
        assert_eq!(existing.len(), 1);
        assert_eq!(existing["Paper A"].bibtex(), "@article{new}");
    }

    #[test]
    fn test_keys_are_trimmed() {
        let file = write_output("title,bibtex_data\n  Paper A  ,@article{a}\n");

        let existing = load_existing(file.path(), "title").expect("Load failed");
        assert_eq!(existing["Paper A"].bibtex(), "@article{a}");
    }

    #[test]
    fn test_missing_bibtex_column() {
        let file = write_output("title,bibtex_url\nPaper A,http://x/a\n");

        let existing = load_existing(file.path(), "title").expect("Load failed");
        assert_eq!(existing["Paper A"].bibtex(), "");
    }
}
