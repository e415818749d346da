//! The note-taking host an import writes into.
//!
//! An import only needs a handful of operations from its host: the user's preferred
//! date format, a place to store assets, page creation, ordered block insertion,
//! updating the block the import started from, and showing messages to the user.
//! [`MarkdownGraph`](crate::graph::MarkdownGraph) implements them over a directory of
//! markdown pages.

use super::*;

/// How the blocks rendered for a page are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockPlacement {
  /// Every block sits at the top level of the page
  #[default]
  Sibling,
  /// Blocks after the first are nested under the first
  Nested,
}

/// Severity of a message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
  /// Progress or outcome information
  Info,
  /// An operation finished
  Success,
  /// Something the user may want to look at
  Warning,
  /// An operation failed
  Error,
}

/// A page created in the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
  /// The page name as given at creation
  pub name: String,
}

impl Page {
  /// A reference to this page in block text, e.g. `[[Some Title]]`.
  pub fn link(&self) -> String { format!("[[{}]]", self.name) }
}

/// A block inserted into a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
  /// Nesting depth, zero for top-level blocks
  pub depth: usize,
}

/// The text an import starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBlock {
  /// Page holding the block, when the text came from the host
  pub page:    Option<String>,
  /// The block's text
  pub content: String,
}

impl SourceBlock {
  /// Text that does not live in any page, e.g. a command line argument.
  pub fn detached(content: impl Into<String>) -> Self { Self { page: None, content: content.into() } }

  /// A block of `page`.
  pub fn in_page(page: impl Into<String>, content: impl Into<String>) -> Self {
    Self { page: Some(page.into()), content: content.into() }
  }
}

/// Operations an import needs from the host application.
#[allow(async_fn_in_trait)]
pub trait Host {
  /// The user's preferred date format, in date-fns style tokens.
  async fn preferred_date_format(&self) -> Result<String, MateError>;

  /// Directory downloaded assets are stored in.
  fn assets_dir(&self) -> PathBuf;

  /// Creates an empty page named `title`.
  async fn create_page(&mut self, title: &str) -> Result<Page, MateError>;

  /// Appends a block to `page`, under `parent` when given.
  async fn insert_block(
    &mut self,
    page: &Page,
    content: &str,
    parent: Option<&Block>,
  ) -> Result<Block, MateError>;

  /// Replaces the content of the block in `page` whose text is `original`.
  async fn update_block(&mut self, page: &str, original: &str, content: &str) -> Result<(), MateError>;

  /// Shows a message to the user.
  async fn show_message(&self, message: &str, level: MessageLevel);
}
