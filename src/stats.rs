//! Read-only statistics over the input and output datasets.

use crate::error::Result;
use crate::record::{self, BIBTEX_FIELD};
use std::path::Path;
use tracing::warn;

/// Counts reported at the start of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatasetStats {
    /// Rows in the input dataset
    pub total_entries: usize,
    /// Output rows whose `bibtex_data` holds real citation text
    pub success_entries: usize,
}

/// Count input rows and already-successful output rows.
///
/// A missing input file yields a zero total with a warning; a missing
/// output file simply means nothing has been fetched yet.
pub fn collect(input_path: &Path, output_path: &Path) -> Result<DatasetStats> {
    let mut stats = DatasetStats::default();

    if input_path.exists() {
        let mut reader = csv::Reader::from_path(input_path)?;
        for row in reader.records() {
            row?;
            stats.total_entries += 1;
        }
    } else {
        warn!(path = %input_path.display(), "Input file does not exist");
    }

    if output_path.exists() {
        let mut reader = csv::Reader::from_path(output_path)?;
        let headers = reader.headers()?.clone();
        for row in reader.records() {
            let row = row?;
            let bibtex = record::field_value(&headers, &row, BIBTEX_FIELD).unwrap_or("");
            if record::is_real_bibtex(bibtex) {
                stats.success_entries += 1;
            }
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(contents.as_bytes()).expect("Failed to write temp file");
        file
    }

    #[test]
    fn test_counts_totals_and_successes() {
        let input = write_csv(
            "title,bibtex_url\nA,u\nB,u\nC,u\nD,u\nE,u\n",
        );
        let output = write_csv(
            "title,bibtex_url,bibtex_data\n\
             A,u,@article{a}\n\
             B,u,@article{b}\n\
             C,u,@article{c}\n\
             D,u,Not Available\n\
             E,u,Not Available\n",
        );

        let stats = collect(input.path(), output.path()).expect("Collect failed");
        assert_eq!(stats.total_entries, 5);
        assert_eq!(stats.success_entries, 3);
    }

    #[test]
    fn test_missing_input_reports_zero_total() {
        let output = write_csv("title,bibtex_data\nA,@article{a}\n");

        let stats =
            collect(Path::new("/nonexistent/input.csv"), output.path()).expect("Collect failed");
        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.success_entries, 1);
    }

    #[test]
    fn test_missing_output_reports_zero_successes() {
        let input = write_csv("title,bibtex_url\nA,u\n");

        let stats =
            collect(input.path(), Path::new("/nonexistent/output.csv")).expect("Collect failed");
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.success_entries, 0);
    }

    #[test]
    fn test_sentinels_do_not_count() {
        let input = write_csv("title,bibtex_url\nA,u\nB,\n");
        let output = write_csv(
            "title,bibtex_url,bibtex_data\nA,u,Not Available\nB,,No URL\n",
        );

        let stats = collect(input.path(), output.path()).expect("Collect failed");
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.success_entries, 0);
    }
}
