//! # rustbibfetch
//!
//! Academic BibTeX Fetch & Merge Pipeline - Rust Microservice
//!
//! ## Modules
//!
//! - [`fetch`] - Citation page retrieval and BibTeX extraction
//! - [`resume`] - Existing-results loading for resumable runs
//! - [`pipeline`] - Incremental row processor
//! - [`stats`] - Dataset statistics reporting
//! - [`config`] - Deployment profiles and job configuration
//! - [`record`] - Tabular record model and sentinels
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rustbibfetch::config::{JobConfig, Profile};
//! use rustbibfetch::fetch::HttpFetcher;
//! use rustbibfetch::pipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = JobConfig::for_profile(Profile::Conference, None, None);
//!     let fetcher = HttpFetcher::new()?;
//!     let summary = pipeline::run(&config, &fetcher).await?;
//!     println!("Wrote {} rows", summary.total);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod record;
pub mod resume;
pub mod stats;

pub use error::{BibfetchError, Result};
