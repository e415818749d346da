//! Error types for the arxivmate command line application.
//!
//! The errors are transparent, so the underlying message from the library or the
//! terminal is what the user sees.

use thiserror::Error;

/// Errors that can occur during CLI operations.
#[derive(Error, Debug)]
pub enum MateCliError {
  /// Errors from user interaction dialogs
  #[error(transparent)]
  Dialoguer(#[from] dialoguer::Error),

  /// Errors from the underlying arxivmate library
  #[error(transparent)]
  Mate(#[from] arxivmate::MateError),

  /// File system and IO operation errors
  #[error(transparent)]
  IO(#[from] std::io::Error),

  /// JSON output could not be produced
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// No graph was given on the command line or in the configuration
  #[error("No graph directory given; pass --graph or set graph_dir in {0}")]
  MissingGraph(String),
}
