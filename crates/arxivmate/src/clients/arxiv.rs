//! Client implementation for fetching paper metadata and PDFs from arXiv.org.
//!
//! Metadata comes from arXiv's Atom feed API (<https://export.arxiv.org/api/query>),
//! queried with a single `id_list` identifier. Only the first `entry` of the feed is
//! read. PDFs are downloaded from `https://arxiv.org/pdf/<id>.pdf`.
//!
//! # Examples
//!
//! ```no_run
//! use arxivmate::{clients::ArxivClient, reference::PaperReference};
//! use chrono::Local;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ArxivClient::new();
//! let reference = PaperReference::parse("https://arxiv.org/abs/2301.07041")?;
//! let metadata = client
//!   .extract_paper_metadata(&reference, "yyyy-MM-dd", Local::now().date_naive(), None)
//!   .await?;
//!
//! println!("Title: {}", metadata.title);
//! println!("Authors: {}", metadata.authors.len());
//! # Ok(())
//! # }
//! ```

use url::Url;

use super::*;
use crate::{
  config::ArxivConfig,
  format::format_date,
  metadata::{asset_path, collapse_whitespace, PaperMetadata},
  reference::PaperReference,
};

/// Atom query endpoint used unless configured otherwise.
pub const DEFAULT_API_URL: &str = "https://export.arxiv.org/api/query";

/// Base PDF links are built from unless configured otherwise.
pub const DEFAULT_PDF_URL: &str = "https://arxiv.org/pdf/";

/// Marker arXiv puts in the `id` of the entry it returns in place of an error.
const API_ERROR_MARKER: &str = "/api/errors";

/// Internal representation of the arXiv API's Atom feed response.
#[derive(Debug, Deserialize)]
struct Feed {
  /// Entries matching the query; empty when the identifier is unknown
  #[serde(rename = "entry", default)]
  entries: Vec<Entry>,
}

/// A paper entry from arXiv's API response.
#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
  /// arXiv URL (e.g., "http://arxiv.org/abs/2301.07041v1")
  #[serde(rename = "id")]
  arxiv_url:  String,
  /// Paper title as sent, line breaks included
  title:      String,
  /// Paper abstract as sent, line breaks included
  #[serde(default)]
  summary:    String,
  /// List of paper authors
  #[serde(rename = "author", default)]
  authors:    Vec<Author>,
  /// Date of the first version
  #[serde(default)]
  published:  Option<DateTime<Utc>>,
  /// Date of the latest version
  #[serde(default)]
  updated:    Option<DateTime<Utc>>,
  /// Subject categories
  #[serde(rename = "category", default)]
  categories: Vec<Category>,
}

/// Internal representation of an author from arXiv's API response.
#[derive(Debug, Clone, Deserialize)]
struct Author {
  /// Author's full name
  name: String,
}

/// Internal representation of a subject category.
#[derive(Debug, Clone, Deserialize)]
struct Category {
  /// Category term, e.g. `cs.CR`
  #[serde(rename = "@term")]
  term: String,
}

impl Entry {
  /// The title with all whitespace runs collapsed to single spaces.
  pub fn title(&self) -> String { collapse_whitespace(&self.title) }

  /// The abstract with all whitespace runs collapsed to single spaces.
  pub fn summary(&self) -> String { collapse_whitespace(&self.summary) }

  /// Author names in listed order.
  pub fn authors(&self) -> Vec<String> {
    self.authors.iter().map(|author| author.name.trim().to_string()).collect()
  }

  /// Category terms in listed order.
  pub fn categories(&self) -> Vec<String> {
    self.categories.iter().map(|category| category.term.clone()).collect()
  }

  /// Date of the first version, if arXiv sent one.
  pub fn published(&self) -> Option<DateTime<Utc>> { self.published }

  /// Date of the latest version, if arXiv sent one.
  pub fn updated(&self) -> Option<DateTime<Utc>> { self.updated }

  /// The entry's `id` link as sent by arXiv.
  pub fn arxiv_url(&self) -> &str { &self.arxiv_url }

  /// Whether this is the placeholder entry arXiv uses to report a failed query.
  fn is_api_error(&self) -> bool { self.arxiv_url.contains(API_ERROR_MARKER) }
}

/// Parses an Atom feed and returns its first entry.
///
/// # Errors
///
/// - [`MateError::Xml`] if the body is not a feed
/// - [`MateError::NotFound`] if the feed has no entry
/// - [`MateError::ApiError`] if the entry is arXiv's error report
pub fn parse_entry(paper_id: &str, xml: &str) -> Result<Entry, MateError> {
  let feed: Feed = from_str(xml)?;

  let entry = feed.entries.into_iter().next().ok_or_else(|| MateError::NotFound(paper_id.to_owned()))?;

  if entry.is_api_error() {
    return Err(MateError::ApiError(entry.summary()));
  }

  Ok(entry)
}

/// Client for interacting with the arXiv API.
///
/// Holds a reusable HTTP client and the endpoints queried, which default to arXiv's own
/// and can be pointed elsewhere through [`ArxivConfig`].
#[derive(Debug, Clone)]
pub struct ArxivClient {
  /// Internal web client used to connect to the API.
  client:  reqwest::Client,
  /// Atom query endpoint
  api_url: String,
  /// Base PDF links are resolved against
  pdf_url: String,
}

impl ArxivClient {
  /// Creates a new arXiv client talking to the public arXiv endpoints.
  pub fn new() -> Self {
    Self {
      client:  reqwest::Client::new(),
      api_url: DEFAULT_API_URL.to_string(),
      pdf_url: DEFAULT_PDF_URL.to_string(),
    }
  }

  /// Creates a client from configuration, applying its endpoints and request timeout.
  ///
  /// # Errors
  ///
  /// Fails if the HTTP client cannot be initialized.
  pub fn from_config(config: &ArxivConfig) -> Result<Self, MateError> {
    let client = reqwest::Client::builder().timeout(config.timeout()).build()?;
    Ok(Self { client, api_url: config.api_url.clone(), pdf_url: config.pdf_url.clone() })
  }

  /// Fetches the Atom entry for an arXiv identifier.
  ///
  /// # Errors
  ///
  /// This function will return an error if:
  /// - The network request fails ([`MateError::Network`])
  /// - arXiv answers with a non-success status ([`MateError::Status`])
  /// - The response is not a feed ([`MateError::Xml`])
  /// - No paper has this identifier ([`MateError::NotFound`])
  /// - arXiv reports an error for the query ([`MateError::ApiError`])
  pub async fn fetch_entry(&self, paper_id: &str) -> Result<Entry, MateError> {
    let url = Url::parse_with_params(&self.api_url, &[("id_list", paper_id)])?;

    debug!("Fetching from arXiv via: {url}");

    let response = check_status(&url, self.client.get(url.clone()).send().await?)?;
    let body = response.text().await?;

    trace!("arXiv response: {body}");

    parse_entry(paper_id, &body)
  }

  /// The link the PDF for `reference` is downloaded from.
  pub fn pdf_download_url(&self, reference: &PaperReference) -> Result<Url, MateError> {
    let mut base = self.pdf_url.clone();
    if !base.ends_with('/') {
      base.push('/');
    }
    Ok(Url::parse(&base)?.join(reference.pdf_file_name())?)
  }

  /// Downloads the paper's PDF into `dir` and returns the written path.
  ///
  /// The file is named after the last path segment of the PDF link, e.g.
  /// `2301.00001.pdf`. The download is complete when this returns.
  ///
  /// # Errors
  ///
  /// Returns an error if the request fails, the server answers with a non-success
  /// status, or writing the file fails.
  pub async fn download_pdf(&self, reference: &PaperReference, dir: &Path) -> Result<PathBuf, MateError> {
    let url = self.pdf_download_url(reference)?;

    debug!("Downloading PDF from: {url}");

    let response = check_status(&url, self.client.get(url.clone()).send().await?)?;
    let bytes = response.bytes().await?;

    if !bytes.starts_with(b"%PDF") {
      warn!("Response from {url} does not look like a PDF");
    }

    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(reference.pdf_file_name());
    debug!("Writing PDF to path: {path:?}");
    tokio::fs::write(&path, &bytes).await?;

    info!("Saved {} bytes to {}", bytes.len(), path.display());
    Ok(path)
  }

  /// Fetches a paper's metadata and, when `assets_dir` is given, downloads its PDF there.
  ///
  /// `today` and the entry's publication dates are formatted with `date_format` (see
  /// [`format_date`]). Without an asset directory nothing is written, but the file name
  /// and asset path the PDF would get are still filled in.
  pub async fn extract_paper_metadata(
    &self,
    reference: &PaperReference,
    date_format: &str,
    today: NaiveDate,
    assets_dir: Option<&Path>,
  ) -> Result<PaperMetadata, MateError> {
    let entry = self.fetch_entry(&reference.paper_id).await?;

    if let Some(dir) = assets_dir {
      self.download_pdf(reference, dir).await?;
    }

    let file_name = reference.pdf_file_name().to_string();
    let format_opt = |date: Option<DateTime<Utc>>| {
      date.map(|d| format_date(d.date_naive(), date_format)).unwrap_or_default()
    };

    Ok(PaperMetadata {
      paper_id: reference.paper_id.clone(),
      title: entry.title(),
      summary: entry.summary(),
      authors: entry.authors(),
      abs_url: reference.abs_url.clone(),
      pdf_url: reference.pdf_url.clone(),
      today: format_date(today, date_format),
      file_path: asset_path(&file_name),
      file_name,
      published: format_opt(entry.published()),
      updated: format_opt(entry.updated()),
      categories: entry.categories(),
    })
  }
}

impl Default for ArxivClient {
  fn default() -> Self { Self::new() }
}

/// Turns a non-success response into [`MateError::Status`].
fn check_status(url: &Url, response: reqwest::Response) -> Result<reqwest::Response, MateError> {
  let status = response.status();
  if !status.is_success() {
    warn!("{url} responded with {status}");
    return Err(MateError::Status { url: url.to_string(), status: status.as_u16() });
  }
  Ok(response)
}

#[cfg(test)]
mod tests {
  use mockito::{Matcher, Server, ServerGuard};

  use super::*;
  use crate::tests::{EMPTY_FEED, ERROR_FEED, PAPER_FEED};

  fn client_for(server: &ServerGuard) -> ArxivClient {
    ArxivClient::from_config(&ArxivConfig {
      api_url: format!("{}/api/query", server.url()),
      pdf_url: format!("{}/pdf", server.url()),
      ..ArxivConfig::default()
    })
    .unwrap()
  }

  #[test]
  fn test_parse_entry() {
    let entry = parse_entry("2301.00001", PAPER_FEED).unwrap();
    assert_eq!(entry.title(), "Verifiable Fully Homomorphic Encryption");
    assert_eq!(entry.summary(), "Fully Homomorphic Encryption (FHE) is seeing increasing real-world deployment.");
    assert_eq!(entry.authors(), vec!["Alexander Viand", "Christian Knabenhans", "Anwar Hithnawi"]);
    assert_eq!(entry.categories(), vec!["cs.CR", "cs.LG"]);
    assert_eq!(entry.published().unwrap().date_naive(), NaiveDate::from_ymd_opt(2023, 1, 17).unwrap());
    assert!(entry.arxiv_url().ends_with("2301.00001v1"));
  }

  #[test]
  fn test_parse_empty_feed_is_not_found() {
    let err = parse_entry("2301.99999", EMPTY_FEED).unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, MateError::NotFound(id) if id == "2301.99999"));
  }

  #[test]
  fn test_parse_error_entry() {
    match parse_entry("abc", ERROR_FEED) {
      Err(MateError::ApiError(message)) => assert_eq!(message, "incorrect id format for abc"),
      other => panic!("unexpected result: {other:?}"),
    }
  }

  #[test]
  fn test_parse_malformed_body() {
    assert!(matches!(parse_entry("2301.00001", "<feed><entry><title>x</feed>"), Err(MateError::Xml(_))));
  }

  #[traced_test]
  #[tokio::test]
  async fn test_fetch_entry() {
    let mut server = Server::new_async().await;
    let mock = server
      .mock("GET", "/api/query")
      .match_query(Matcher::UrlEncoded("id_list".into(), "2301.00001".into()))
      .with_status(200)
      .with_header("content-type", "application/atom+xml")
      .with_body(PAPER_FEED)
      .create_async()
      .await;

    let entry = client_for(&server).fetch_entry("2301.00001").await.unwrap();
    assert_eq!(entry.title(), "Verifiable Fully Homomorphic Encryption");
    mock.assert_async().await;
  }

  #[traced_test]
  #[tokio::test]
  async fn test_fetch_entry_distinguishes_failures() {
    let mut server = Server::new_async().await;
    let _missing = server
      .mock("GET", "/api/query")
      .match_query(Matcher::UrlEncoded("id_list".into(), "2301.99999".into()))
      .with_status(200)
      .with_body(EMPTY_FEED)
      .create_async()
      .await;
    let _broken = server
      .mock("GET", "/api/query")
      .match_query(Matcher::UrlEncoded("id_list".into(), "2301.00002".into()))
      .with_status(503)
      .create_async()
      .await;

    let client = client_for(&server);

    let err = client.fetch_entry("2301.99999").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(!err.is_transport_error());

    let err = client.fetch_entry("2301.00002").await.unwrap_err();
    assert!(matches!(err, MateError::Status { status: 503, .. }));
    assert!(err.is_transport_error());
  }

  #[traced_test]
  #[tokio::test]
  async fn test_unreachable_server_is_network_error() {
    let client = ArxivClient::from_config(&ArxivConfig {
      api_url: "http://127.0.0.1:1/api/query".into(),
      ..ArxivConfig::default()
    })
    .unwrap();
    let err = client.fetch_entry("2301.00001").await.unwrap_err();
    assert!(matches!(err, MateError::Network(_)));
  }

  #[traced_test]
  #[tokio::test]
  async fn test_download_pdf() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    let mock = server
      .mock("GET", "/pdf/2301.00001.pdf")
      .with_status(200)
      .with_header("content-type", "application/pdf")
      .with_body("%PDF-1.5 test")
      .create_async()
      .await;

    let dir = tempdir()?;
    let assets = dir.path().join("assets");
    let reference = PaperReference::from_id("2301.00001");
    let path = client_for(&server).download_pdf(&reference, &assets).await?;

    assert_eq!(path, assets.join("2301.00001.pdf"));
    assert_eq!(std::fs::read(&path)?, b"%PDF-1.5 test");
    mock.assert_async().await;
    Ok(())
  }

  #[traced_test]
  #[tokio::test]
  async fn test_download_failure_is_reported() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    let _mock = server.mock("GET", "/pdf/2301.00001.pdf").with_status(404).create_async().await;

    let dir = tempdir()?;
    let reference = PaperReference::from_id("2301.00001");
    let err = client_for(&server).download_pdf(&reference, dir.path()).await.unwrap_err();

    assert!(matches!(err, MateError::Status { status: 404, .. }));
    assert!(!dir.path().join("2301.00001.pdf").exists());
    Ok(())
  }

  #[traced_test]
  #[tokio::test]
  async fn test_extract_paper_metadata_without_download() -> anyhow::Result<()> {
    let mut server = Server::new_async().await;
    let _feed = server
      .mock("GET", "/api/query")
      .match_query(Matcher::Any)
      .with_body(PAPER_FEED)
      .create_async()
      .await;
    let pdf = server.mock("GET", "/pdf/2301.00001.pdf").expect(0).create_async().await;

    let reference = PaperReference::parse("https://arxiv.org/pdf/2301.00001.pdf")?;
    let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let metadata =
      client_for(&server).extract_paper_metadata(&reference, "yyyy-MM-dd", today, None).await?;

    assert_eq!(metadata.paper_id, "2301.00001");
    assert_eq!(metadata.abs_url, "https://arxiv.org/abs/2301.00001");
    assert_eq!(metadata.today, "2024-03-01");
    assert_eq!(metadata.published, "2023-01-17");
    assert_eq!(metadata.updated, "2023-01-18");
    assert_eq!(metadata.file_name, "2301.00001.pdf");
    assert_eq!(metadata.file_path, "../assets/2301.00001.pdf");
    pdf.assert_async().await;
    Ok(())
  }

  #[test]
  fn test_pdf_download_url() {
    let reference = PaperReference::from_id("2301.00001");
    assert_eq!(
      ArxivClient::new().pdf_download_url(&reference).unwrap().as_str(),
      "https://arxiv.org/pdf/2301.00001.pdf"
    );
  }

  #[ignore = "hits the live arXiv API"]
  #[traced_test]
  #[tokio::test]
  async fn test_arxiv_entry_fetch() {
    let entry = ArxivClient::new().fetch_entry("2301.07041").await.unwrap();
    assert_eq!(entry.title(), "Verifiable Fully Homomorphic Encryption");
    assert!(!entry.authors().is_empty());
  }
}
