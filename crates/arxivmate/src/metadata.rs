//! The flat metadata record templates are rendered against.
//!
//! Field names are exposed to templates in camelCase: `paperId`, `title`, `summary`,
//! `authors`, `absUrl`, `pdfUrl`, `today`, `fileName`, `filePath`, `published`, `updated`
//! and `categories`.

use super::*;

/// Relative path from a page file to the graph's asset directory.
pub const ASSETS_PREFIX: &str = "../assets/";

/// Everything known about a paper at the moment its page is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperMetadata {
  /// Bare arXiv identifier
  pub paper_id:   String,
  /// Title with whitespace collapsed
  pub title:      String,
  /// Abstract with whitespace collapsed
  pub summary:    String,
  /// Author names in listed order
  pub authors:    Vec<String>,
  /// Canonical abstract page
  pub abs_url:    String,
  /// Canonical PDF link
  pub pdf_url:    String,
  /// Import date in the user's date format
  pub today:      String,
  /// Name of the downloaded PDF
  pub file_name:  String,
  /// Path of the PDF relative to a page, e.g. `../assets/2301.00001.pdf`
  pub file_path:  String,
  /// First version date in the user's date format, empty if unknown
  pub published:  String,
  /// Latest version date in the user's date format, empty if unknown
  pub updated:    String,
  /// arXiv category terms, primary category first
  pub categories: Vec<String>,
}

/// Path a page uses to link to an asset stored in the graph.
pub fn asset_path(file_name: &str) -> String { format!("{ASSETS_PREFIX}{file_name}") }

/// Collapses every run of whitespace, newlines included, into a single space and trims
/// the ends.
pub fn collapse_whitespace(text: &str) -> String { text.split_whitespace().collect::<Vec<_>>().join(" ") }
