//! Row processor: the incremental fetch/merge/resume loop.
//!
//! Rows are processed strictly in input order; each completed row is
//! written and flushed before the next one starts, so an interrupted run
//! loses at most the in-flight row and the partial output stays a valid,
//! resumable dataset.

use crate::config::JobConfig;
use crate::error::Result;
use crate::fetch::FetchBibtex;
use crate::record::{self, BIBTEX_FIELD, NO_URL, NOT_AVAILABLE, URL_FIELD};
use crate::resume;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

/// Per-disposition counts for a completed run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Rows written to the output
    pub total: usize,
    /// Rows resolved from the existing-results map without fetching
    pub reused: usize,
    /// Rows resolved by a successful fetch
    pub fetched: usize,
    /// Rows degraded to "Not Available" after a failed fetch
    pub unavailable: usize,
    /// Rows with no URL to fetch
    pub no_url: usize,
}

/// Run the fetch/merge pipeline described by `config`.
///
/// The existing-results map is loaded before the output file is truncated,
/// then every input row is resolved and persisted in input order. A fetch
/// failure never aborts the batch; the affected row degrades to
/// "Not Available" and processing continues.
///
/// # Errors
///
/// Returns an error only when the input cannot be read, the output cannot
/// be written, or an existing output file is malformed.
pub async fn run<F: FetchBibtex>(config: &JobConfig, fetcher: &F) -> Result<RunSummary> {
    let existing = resume::load_existing(&config.output_path, &config.key_field)?;

    let mut reader = csv::Reader::from_path(&config.input_path)?;
    let headers = reader.headers()?.clone();
    let rows = reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    // Output header mirrors the input, with bibtex_data appended only when
    // the input does not already carry the column.
    let bibtex_idx = headers.iter().position(|h| h == BIBTEX_FIELD);
    let mut out_headers: Vec<String> = headers.iter().map(str::to_string).collect();
    if bibtex_idx.is_none() {
        out_headers.push(BIBTEX_FIELD.to_string());
    }

    let mut writer = csv::Writer::from_path(&config.output_path)?;
    writer.write_record(&out_headers)?;
    writer.flush()?;

    info!(
        input = %config.input_path.display(),
        output = %config.output_path.display(),
        rows = rows.len(),
        cached = existing.len(),
        "Processing papers"
    );

    let progress = ProgressBar::new(rows.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut summary = RunSummary::default();

    for row in &rows {
        let title = record::field_value(&headers, row, &config.key_field)
            .unwrap_or("")
            .trim();
        let url = record::field_value(&headers, row, URL_FIELD)
            .unwrap_or("")
            .trim();

        let cached = existing
            .get(title)
            .map(|prior| prior.bibtex().trim())
            .filter(|value| record::is_real_bibtex(value));

        let bibtex = match cached {
            Some(value) => {
                debug!(title = title, "Reusing existing BibTeX data");
                summary.reused += 1;
                value.to_string()
            }
            None if !url.is_empty() => match fetcher.fetch(url).await {
                Some(text) if record::is_real_bibtex(&text) => {
                    summary.fetched += 1;
                    text.trim().to_string()
                }
                _ => {
                    summary.unavailable += 1;
                    NOT_AVAILABLE.to_string()
                }
            },
            None => {
                summary.no_url += 1;
                NO_URL.to_string()
            }
        };

        let mut values: Vec<String> = row.iter().map(str::to_string).collect();
        match bibtex_idx {
            Some(idx) => values[idx] = bibtex,
            None => values.push(bibtex),
        }

        // Durable write before the next row starts.
        writer.write_record(&values)?;
        writer.flush()?;

        summary.total += 1;
        progress.inc(1);
    }

    progress.finish_and_clear();

    info!(
        total = summary.total,
        reused = summary.reused,
        fetched = summary.fetched,
        unavailable = summary.unavailable,
        no_url = summary.no_url,
        "Run complete"
    );

    Ok(summary)
}
