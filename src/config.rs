//! Run configuration.
//!
//! The original deployments were two near-identical jobs differing only in
//! their default filenames; here a single pipeline is parameterized by
//! [`Profile`], and every component receives an explicit [`JobConfig`]
//! instead of reading process-wide state.

use crate::record;
use std::path::PathBuf;

/// Publication category a run operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Conference,
    Journal,
}

impl Profile {
    /// Default input dataset for this profile
    pub fn default_input(self) -> &'static str {
        match self {
            Profile::Conference => "conference.csv",
            Profile::Journal => "journal.csv",
        }
    }

    /// Default output dataset for this profile
    pub fn default_output(self) -> &'static str {
        match self {
            Profile::Conference => "conference_with_bibtex.csv",
            Profile::Journal => "journal_with_bibtex.csv",
        }
    }
}

/// Explicit configuration handed to the loader, processor and reporter.
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Input CSV with `title` and `bibtex_url` columns
    pub input_path: PathBuf,
    /// Output CSV, also read back as the resume source on the next run
    pub output_path: PathBuf,
    /// Column used to match rows across runs
    pub key_field: String,
}

impl JobConfig {
    /// Build a config from a profile, with optional path overrides.
    pub fn for_profile(profile: Profile, input: Option<PathBuf>, output: Option<PathBuf>) -> Self {
        Self {
            input_path: input.unwrap_or_else(|| PathBuf::from(profile.default_input())),
            output_path: output.unwrap_or_else(|| PathBuf::from(profile.default_output())),
            key_field: record::TITLE_FIELD.to_string(),
        }
    }
}
