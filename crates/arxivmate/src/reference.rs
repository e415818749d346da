//! Validation and normalization of arXiv links.
//!
//! Only two link shapes are accepted:
//! - `https://arxiv.org/abs/<id>`
//! - `https://arxiv.org/pdf/<id>.pdf`
//!
//! where `<id>` is made of ASCII letters, digits and dots. Either shape is turned into a
//! [`PaperReference`] carrying the bare identifier together with the canonical abstract
//! and PDF links.
//!
//! # Examples
//!
//! ```
//! use arxivmate::reference::{is_valid_arxiv_url, PaperReference};
//!
//! assert!(is_valid_arxiv_url("https://arxiv.org/pdf/2301.00001.pdf"));
//!
//! let reference: PaperReference = "https://arxiv.org/pdf/2301.00001.pdf".parse().unwrap();
//! assert_eq!(reference.paper_id, "2301.00001");
//! assert_eq!(reference.abs_url, "https://arxiv.org/abs/2301.00001");
//! ```

use lazy_static::lazy_static;
use regex::Regex;

use super::*;

/// Prefix shared by all canonical abstract links.
pub const ABS_PREFIX: &str = "https://arxiv.org/abs/";

/// Prefix shared by all canonical PDF links.
pub const PDF_PREFIX: &str = "https://arxiv.org/pdf/";

lazy_static! {
  static ref ABS_PATTERN: Regex = Regex::new(r"^https://arxiv\.org/abs/([a-zA-Z0-9.]+)$").unwrap();
  static ref PDF_PATTERN: Regex =
    Regex::new(r"^https://arxiv\.org/pdf/([a-zA-Z0-9.]+)\.pdf$").unwrap();
}

/// Returns `true` iff `url` is exactly an arXiv abstract link or an arXiv PDF link.
///
/// Partial matches, trailing slashes, query strings and plain `http` are all rejected.
/// No network activity happens before this check passes.
///
/// ```
/// use arxivmate::reference::is_valid_arxiv_url;
///
/// assert!(is_valid_arxiv_url("https://arxiv.org/abs/2301.00001"));
/// assert!(!is_valid_arxiv_url("https://arxiv.org/abs/2301.00001/"));
/// assert!(!is_valid_arxiv_url("https://arxiv.org/pdf/2301.00001"));
/// ```
pub fn is_valid_arxiv_url(url: &str) -> bool { ABS_PATTERN.is_match(url) || PDF_PATTERN.is_match(url) }

/// Returns the canonical abstract link for an accepted arXiv link.
///
/// The result is itself an accepted link and normalizing it again returns it unchanged.
pub fn normalize(url: &str) -> Result<String, MateError> {
  Ok(PaperReference::parse(url)?.abs_url)
}

/// A validated arXiv paper link split into its identifier and canonical forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperReference {
  /// Bare arXiv identifier, e.g. `2301.00001`
  pub paper_id: String,
  /// Canonical abstract page, e.g. `https://arxiv.org/abs/2301.00001`
  pub abs_url:  String,
  /// Canonical PDF link, e.g. `https://arxiv.org/pdf/2301.00001.pdf`
  pub pdf_url:  String,
}

impl PaperReference {
  /// Validates `url` and takes the identifier from the matched link text.
  ///
  /// The identifier is used exactly as written: no dot-segment resolution or other URL
  /// normalization is applied, so the canonical links are always accepted again.
  ///
  /// # Errors
  ///
  /// Returns [`MateError::UnsupportedLink`] when `url` is not one of the accepted shapes.
  pub fn parse(url: &str) -> Result<Self, MateError> {
    // Only the trailing `.pdf` is the extension; `.pdf` inside the id stays.
    let paper_id = ABS_PATTERN
      .captures(url)
      .or_else(|| PDF_PATTERN.captures(url))
      .and_then(|captures| captures.get(1))
      .map(|id| id.as_str())
      .ok_or_else(|| MateError::UnsupportedLink(url.to_owned()))?;

    trace!("Parsed arXiv id {paper_id} from {url}");
    Ok(Self::from_id(paper_id))
  }

  /// Builds the canonical links for a bare identifier.
  pub fn from_id(paper_id: &str) -> Self {
    Self {
      paper_id: paper_id.to_owned(),
      abs_url:  format!("{ABS_PREFIX}{paper_id}"),
      pdf_url:  format!("{PDF_PREFIX}{paper_id}.pdf"),
    }
  }

  /// Name of the file the PDF is stored under: the last path segment of the PDF link.
  pub fn pdf_file_name(&self) -> &str {
    self.pdf_url.rsplit('/').next().unwrap_or(&self.pdf_url)
  }
}

impl FromStr for PaperReference {
  type Err = MateError;

  fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
}

impl std::fmt::Display for PaperReference {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.abs_url) }
}
