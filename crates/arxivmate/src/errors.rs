//! Error types for the arxivmate library.
//!
//! Every stage of an import (link validation, fetching, rendering and writing into the
//! graph) reports its failures through [`MateError`]. Fetch failures keep their cause
//! distinct, so a paper that does not exist can be told apart from a request that never
//! completed:
//!
//! ```no_run
//! use arxivmate::{clients::ArxivClient, errors::MateError};
//!
//! # async fn example() -> Result<(), MateError> {
//! let client = ArxivClient::new();
//! match client.fetch_entry("2301.99999").await {
//!   Ok(entry) => println!("Found: {}", entry.title()),
//!   Err(MateError::NotFound(id)) => println!("No paper with id {id}"),
//!   Err(e) => println!("Request failed: {e}"),
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

/// Errors that can occur while importing a paper.
#[derive(Error, Debug)]
pub enum MateError {
  /// The text handed to the importer is not one of the two accepted arXiv link shapes
  /// (`https://arxiv.org/abs/<id>` or `https://arxiv.org/pdf/<id>.pdf`).
  #[error("Link not supported: {0}")]
  UnsupportedLink(String),

  /// A URL could not be parsed.
  #[error(transparent)]
  InvalidUrl(#[from] url::ParseError),

  /// A network request failed before a response was received, or its body could not be
  /// read.
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// The server answered with a non-success status code.
  #[error("{url} responded with status {status}")]
  Status {
    /// The requested URL
    url:    String,
    /// The HTTP status code returned
    status: u16,
  },

  /// The arXiv query succeeded but returned no entry for the identifier.
  #[error("No arXiv entry found for {0}")]
  NotFound(String),

  /// arXiv answered with its error entry instead of a paper.
  ///
  /// The string carries the message arXiv put in the entry summary.
  #[error("arXiv API error: {0}")]
  ApiError(String),

  /// The response body was not a readable Atom feed.
  #[error("Failed to parse arXiv response: {0}")]
  Xml(#[from] quick_xml::DeError),

  /// The configured template does not compile.
  #[error(transparent)]
  Template(#[from] handlebars::TemplateError),

  /// Rendering the template against a paper failed.
  #[error(transparent)]
  Render(#[from] handlebars::RenderError),

  /// A file system operation failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// The configuration file is not valid TOML or does not match the expected shape.
  #[error(transparent)]
  ConfigParse(#[from] toml::de::Error),

  /// The configuration could not be serialized.
  #[error(transparent)]
  ConfigWrite(#[from] toml::ser::Error),

  /// A page with this name already exists in the graph.
  #[error("Page already exists: {0}")]
  PageExists(String),

  /// The page title leaves nothing to name a file after once unsafe characters are
  /// removed.
  #[error("Page title cannot be used as a file name: {0:?}")]
  InvalidPageName(String),

  /// The page that should hold a block does not exist.
  #[error("Page not found: {0}")]
  PageNotFound(String),

  /// The source block to update could not be located in its page.
  #[error("Block not found in page {page}: {content}")]
  BlockNotFound {
    /// Name of the page searched
    page:    String,
    /// The block content that was looked for
    content: String,
  },
}

impl MateError {
  /// Checks if this error means the paper does not exist, as opposed to the request
  /// failing.
  ///
  /// ```
  /// use arxivmate::errors::MateError;
  ///
  /// assert!(MateError::NotFound("2301.99999".into()).is_not_found());
  /// assert!(!MateError::ApiError("incorrect id format".into()).is_not_found());
  /// ```
  pub fn is_not_found(&self) -> bool { matches!(self, MateError::NotFound(_)) }

  /// Checks if this error happened while talking to a remote server.
  pub fn is_transport_error(&self) -> bool {
    matches!(self, MateError::Network(_) | MateError::Status { .. })
  }
}
