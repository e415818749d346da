//! A library for importing arXiv papers into a markdown note graph.
//!
//! Given an arXiv link, arxivmate fetches the paper's metadata and PDF, renders the
//! metadata through a user template and writes the result as a page of blocks.
//!
//! # Example
//! ```rust,no_run
//! use arxivmate::{Config, Importer, MarkdownGraph, SourceBlock};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!   let importer = Importer::from_config(&Config::default())?;
//!   let mut graph = MarkdownGraph::open("notes").await?;
//!
//!   let source = SourceBlock::detached("https://arxiv.org/abs/2301.07041");
//!   let imported = importer.import(&mut graph, &source).await?;
//!   println!("Title: {}", imported.metadata.title);
//!
//!   Ok(())
//! }
//! ```

#![warn(missing_docs, clippy::missing_docs_in_private_items)]
use std::{
  path::{Path, PathBuf},
  str::FromStr,
};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
#[cfg(test)] use tempfile::tempdir;
use tracing::{debug, error, info, trace, warn};
#[cfg(test)] use tracing_test::traced_test;

pub mod clients;
pub mod config;
pub mod errors;
pub mod format;
pub mod graph;
pub mod host;
pub mod metadata;
pub mod pipeline;
pub mod reference;
pub mod template;

pub use clients::arxiv::ArxivClient;
pub use config::Config;
pub use errors::MateError;
pub use graph::MarkdownGraph;
pub use host::{Host, SourceBlock};
pub use metadata::PaperMetadata;
pub use pipeline::{ImportedPage, Importer};
pub use reference::{is_valid_arxiv_url, PaperReference};
pub use template::Template;
