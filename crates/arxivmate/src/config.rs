//! User configuration for imports.
//!
//! The configuration lives in a TOML file, by default at
//! `<config dir>/arxivmate/config.toml`. A missing file yields the defaults, and every
//! key in the file is optional:
//!
//! ```toml
//! template = """
//! Paper::
//! Link:: {{absUrl}}
//! """
//! date_format = "yyyy-MM-dd"
//! block_placement = "sibling"
//! graph_dir = "/home/me/notes"
//!
//! [arxiv]
//! api_url = "https://export.arxiv.org/api/query"
//! pdf_url = "https://arxiv.org/pdf/"
//! timeout_secs = 30
//! ```
//!
//! The arXiv endpoints can also be overridden with the `ARXIVMATE_API_URL` and
//! `ARXIVMATE_PDF_URL` environment variables.

use std::time::Duration;

use super::*;
use crate::{host::BlockPlacement, template::DEFAULT_TEMPLATE};

/// Environment variable overriding [`ArxivConfig::api_url`].
pub const API_URL_ENV: &str = "ARXIVMATE_API_URL";

/// Environment variable overriding [`ArxivConfig::pdf_url`].
pub const PDF_URL_ENV: &str = "ARXIVMATE_PDF_URL";

/// Settings read by an import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Template every imported page is rendered from
  pub template:        String,
  /// Date format overriding the one the host prefers
  #[serde(skip_serializing_if = "Option::is_none")]
  pub date_format:     Option<String>,
  /// How blocks after the first are placed in the page
  pub block_placement: BlockPlacement,
  /// Graph used when none is given on the command line
  #[serde(skip_serializing_if = "Option::is_none")]
  pub graph_dir:       Option<PathBuf>,
  /// arXiv endpoints and request settings
  pub arxiv:           ArxivConfig,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      template:        DEFAULT_TEMPLATE.to_string(),
      date_format:     None,
      block_placement: BlockPlacement::default(),
      graph_dir:       None,
      arxiv:           ArxivConfig::default(),
    }
  }
}

/// Where and how arXiv is contacted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArxivConfig {
  /// Atom query endpoint; the paper id is passed as `id_list`
  pub api_url:      String,
  /// Base the PDF file name is appended to when downloading
  pub pdf_url:      String,
  /// Per request timeout in seconds
  pub timeout_secs: u64,
}

impl Default for ArxivConfig {
  fn default() -> Self {
    Self {
      api_url:      clients::arxiv::DEFAULT_API_URL.to_string(),
      pdf_url:      clients::arxiv::DEFAULT_PDF_URL.to_string(),
      timeout_secs: 30,
    }
  }
}

impl ArxivConfig {
  /// The request timeout as a [`Duration`].
  pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }
}

impl Config {
  /// Get default configuration path in the user's config directory.
  pub fn default_path() -> PathBuf {
    dirs::config_dir()
      .unwrap_or_else(|| PathBuf::from("."))
      .join("arxivmate")
      .join("config.toml")
  }

  /// Loads the configuration at `path`, falling back to defaults when the file does not
  /// exist, then applies environment overrides.
  ///
  /// # Errors
  ///
  /// Fails if the file exists but cannot be read or parsed.
  pub fn load(path: impl AsRef<Path>) -> Result<Self, MateError> {
    let path = path.as_ref();
    let mut config = if path.exists() {
      debug!("Loading configuration from {}", path.display());
      Self::from_toml(&std::fs::read_to_string(path)?)?
    } else {
      debug!("No configuration at {}, using defaults", path.display());
      Self::default()
    };
    config.apply_env();
    Ok(config)
  }

  /// Parses a configuration from TOML text.
  pub fn from_toml(text: &str) -> Result<Self, MateError> { Ok(toml::from_str(text)?) }

  /// Writes the configuration to `path`, creating parent directories.
  pub fn save(&self, path: impl AsRef<Path>) -> Result<(), MateError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(self)?)?;
    info!("Wrote configuration to {}", path.display());
    Ok(())
  }

  /// Replaces the arXiv endpoints with values from the environment, when set.
  fn apply_env(&mut self) {
    if let Ok(url) = std::env::var(API_URL_ENV) {
      debug!("Using {API_URL_ENV}={url}");
      self.arxiv.api_url = url;
    }
    if let Ok(url) = std::env::var(PDF_URL_ENV) {
      debug!("Using {PDF_URL_ENV}={url}");
      self.arxiv.pdf_url = url;
    }
  }
}
