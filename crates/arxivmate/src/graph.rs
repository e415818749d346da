//! A [`Host`] backed by a directory of markdown pages.
//!
//! The layout follows the one Logseq uses for a graph:
//!
//! ```text
//! <root>/
//!   pages/<page>.md        one file per page, blocks as "- " list items
//!   assets/                downloaded PDFs
//!   logseq/config.edn      read for :journal/page-title-format
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use arxivmate::{graph::MarkdownGraph, host::Host};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut graph = MarkdownGraph::open("/home/me/notes").await?;
//! let page = graph.create_page("Reading List").await?;
//! graph.insert_block(&page, "Paper::\nStatus:: #To-Read", None).await?;
//! # Ok(())
//! # }
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use tokio::io::AsyncWriteExt;

use super::*;
use crate::{
  format::{page_file_name, DEFAULT_DATE_FORMAT},
  host::{Block, Host, MessageLevel, Page},
};

lazy_static! {
  static ref PAGE_TITLE_FORMAT: Regex =
    Regex::new(r#":journal/page-title-format\s+"([^"]+)""#).unwrap();
}

/// A markdown note graph on disk.
#[derive(Debug, Clone)]
pub struct MarkdownGraph {
  /// Graph root directory
  root: PathBuf,
}

impl MarkdownGraph {
  /// Opens the graph at `root`, creating its `pages` and `assets` directories if needed.
  pub async fn open(root: impl AsRef<Path>) -> Result<Self, MateError> {
    let graph = Self { root: root.as_ref().to_path_buf() };
    tokio::fs::create_dir_all(graph.pages_dir()).await?;
    tokio::fs::create_dir_all(graph.assets_dir()).await?;
    debug!("Opened graph at {}", graph.root.display());
    Ok(graph)
  }

  /// Graph root directory.
  pub fn root(&self) -> &Path { &self.root }

  /// Directory holding page files.
  pub fn pages_dir(&self) -> PathBuf { self.root.join("pages") }

  /// File a page with this name is stored in.
  pub fn page_path(&self, name: &str) -> PathBuf {
    self.pages_dir().join(format!("{}.md", page_file_name(name)))
  }

  /// Reads a page's markdown.
  pub async fn read_page(&self, name: &str) -> Result<String, MateError> {
    let path = self.page_path(name);
    if !path.exists() {
      return Err(MateError::PageNotFound(name.to_owned()));
    }
    Ok(tokio::fs::read_to_string(path).await?)
  }
}

/// Renders a block as markdown list item text at `depth`.
///
/// The first line carries the bullet; further lines are indented to align with it.
fn format_block(content: &str, depth: usize) -> String {
  let indent = "\t".repeat(depth);
  let mut out = String::new();
  for (i, line) in content.lines().enumerate() {
    if i == 0 {
      out.push_str(&format!("{indent}- {line}\n"));
    } else if line.trim().is_empty() {
      out.push('\n');
    } else {
      out.push_str(&format!("{indent}  {line}\n"));
    }
  }
  if out.is_empty() {
    out = format!("{indent}-\n");
  }
  out
}

/// Parses a block's first line into its depth and text.
///
/// Block heads are indented with tabs only and sit at most `max_depth` deep; continuation
/// lines (indented with spaces after the tabs) never count, even when they start with
/// `- `.
fn block_head(line: &str, max_depth: usize) -> Option<(usize, &str)> {
  let body = line.trim_start_matches('\t');
  let depth = line.len() - body.len();
  if depth > max_depth {
    return None;
  }
  let text = body.strip_prefix("- ").or_else(|| (body.trim_end() == "-").then_some(""))?;
  Some((depth, text))
}

/// Finds the first block whose text is `content`, returning its line index and depth.
fn find_block(lines: &[String], content: &str) -> Option<(usize, usize)> {
  let mut max_depth = 0;
  for (index, line) in lines.iter().enumerate() {
    if let Some((depth, text)) = block_head(line, max_depth) {
      if text.trim() == content {
        return Some((index, depth));
      }
      max_depth = depth + 1;
    }
  }
  None
}

impl Host for MarkdownGraph {
  async fn preferred_date_format(&self) -> Result<String, MateError> {
    let config = self.root.join("logseq").join("config.edn");
    if !config.exists() {
      return Ok(DEFAULT_DATE_FORMAT.to_string());
    }

    let text = tokio::fs::read_to_string(&config).await?;
    let format = PAGE_TITLE_FORMAT
      .captures(&text)
      .and_then(|cap| cap.get(1))
      .map(|m| m.as_str().to_string())
      .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string());

    trace!("Graph date format from {}: {format}", config.display());
    Ok(format)
  }

  fn assets_dir(&self) -> PathBuf { self.root.join("assets") }

  async fn create_page(&mut self, title: &str) -> Result<Page, MateError> {
    if page_file_name(title).is_empty() {
      return Err(MateError::InvalidPageName(title.to_owned()));
    }

    let path = self.page_path(title);
    match tokio::fs::OpenOptions::new().write(true).create_new(true).open(&path).await {
      Ok(_) => {},
      Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists =>
        return Err(MateError::PageExists(title.to_owned())),
      Err(e) => return Err(e.into()),
    }
    info!("Created page {title} at {}", path.display());
    Ok(Page { name: title.to_owned() })
  }

  async fn insert_block(
    &mut self,
    page: &Page,
    content: &str,
    parent: Option<&Block>,
  ) -> Result<Block, MateError> {
    let path = self.page_path(&page.name);
    if !path.exists() {
      return Err(MateError::PageNotFound(page.name.clone()));
    }

    let block = Block { depth: parent.map_or(0, |parent| parent.depth + 1) };
    let mut file = tokio::fs::OpenOptions::new().append(true).open(&path).await?;
    file.write_all(format_block(content, block.depth).as_bytes()).await?;
    file.flush().await?;

    trace!("Inserted block at depth {} into {}", block.depth, page.name);
    Ok(block)
  }

  async fn update_block(&mut self, page: &str, original: &str, content: &str) -> Result<(), MateError> {
    let text = self.read_page(page).await?;
    let original = original.trim();

    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
    let (position, depth) = find_block(&lines, original)
      .ok_or_else(|| MateError::BlockNotFound { page: page.to_owned(), content: original.to_owned() })?;
    lines[position] = format!("{}- {content}", "\t".repeat(depth));

    let mut updated = lines.join("\n");
    if text.ends_with('\n') {
      updated.push('\n');
    }
    tokio::fs::write(self.page_path(page), updated).await?;

    debug!("Updated block in {page}: {original} -> {content}");
    Ok(())
  }

  async fn show_message(&self, message: &str, level: MessageLevel) {
    match level {
      MessageLevel::Error => error!("{message}"),
      MessageLevel::Warning => warn!("{message}"),
      MessageLevel::Info | MessageLevel::Success => info!("{message}"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_format_block() {
    assert_eq!(format_block("one line", 0), "- one line\n");
    assert_eq!(format_block("Paper::\nLink:: x", 0), "- Paper::\n  Link:: x\n");
    assert_eq!(format_block("child\nmore", 1), "\t- child\n\t  more\n");
    assert_eq!(format_block("a\n\nb", 0), "- a\n\n  b\n");
  }

  #[test]
  fn test_block_head() {
    assert_eq!(block_head("- hello", 0), Some((0, "hello")));
    assert_eq!(block_head("\t- nested", 1), Some((1, "nested")));
    assert_eq!(block_head("-", 0), Some((0, "")));
    assert_eq!(block_head("  continuation", 0), None);
    assert_eq!(block_head("  - dash in a continuation", 1), None);
    assert_eq!(block_head("\t  - dash in a nested continuation", 2), None);
    assert_eq!(block_head("\t\t- deeper than any parent", 1), None);
  }

  #[traced_test]
  #[tokio::test]
  async fn test_create_and_fill_page() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let mut graph = MarkdownGraph::open(dir.path()).await?;
    assert!(dir.path().join("pages").is_dir());
    assert!(dir.path().join("assets").is_dir());

    let page = graph.create_page("Proofs/Arguments").await?;
    assert_eq!(page.link(), "[[Proofs/Arguments]]");
    assert!(dir.path().join("pages").join("Proofs___Arguments.md").exists());

    let first = graph.insert_block(&page, "Paper::\nLink:: x", None).await?;
    graph.insert_block(&page, "child", Some(&first)).await?;
    graph.insert_block(&page, "sibling", None).await?;

    assert_eq!(graph.read_page("Proofs/Arguments").await?, "- Paper::\n  Link:: x\n\t- child\n- sibling\n");
    Ok(())
  }

  #[traced_test]
  #[tokio::test]
  async fn test_existing_page_is_not_overwritten() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let mut graph = MarkdownGraph::open(dir.path()).await?;
    let page = graph.create_page("Paper").await?;
    graph.insert_block(&page, "keep me", None).await?;

    assert!(matches!(graph.create_page("Paper").await, Err(MateError::PageExists(_))));
    assert_eq!(graph.read_page("Paper").await?, "- keep me\n");
    Ok(())
  }

  #[traced_test]
  #[tokio::test]
  async fn test_title_without_file_name_is_rejected() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let mut graph = MarkdownGraph::open(dir.path()).await?;

    for title in ["", "???", "...", "<>:\"|*"] {
      assert!(matches!(graph.create_page(title).await, Err(MateError::InvalidPageName(_))));
    }
    assert!(!graph.pages_dir().join(".md").exists());
    assert_eq!(std::fs::read_dir(graph.pages_dir())?.count(), 0);
    Ok(())
  }

  #[traced_test]
  #[tokio::test]
  async fn test_insert_into_missing_page() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let mut graph = MarkdownGraph::open(dir.path()).await?;
    let page = Page { name: "Nowhere".into() };
    assert!(matches!(graph.insert_block(&page, "x", None).await, Err(MateError::PageNotFound(_))));
    Ok(())
  }

  #[traced_test]
  #[tokio::test]
  async fn test_update_block() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let mut graph = MarkdownGraph::open(dir.path()).await?;
    std::fs::write(
      graph.page_path("Inbox"),
      "- todo\n\t- https://arxiv.org/abs/2301.00001\n- https://arxiv.org/abs/2301.00001\n",
    )?;

    graph.update_block("Inbox", " https://arxiv.org/abs/2301.00001 ", "[[A Paper]]").await?;
    assert_eq!(
      graph.read_page("Inbox").await?,
      "- todo\n\t- [[A Paper]]\n- https://arxiv.org/abs/2301.00001\n"
    );

    let err = graph.update_block("Inbox", "missing", "x").await.unwrap_err();
    assert!(matches!(err, MateError::BlockNotFound { .. }));
    Ok(())
  }

  #[traced_test]
  #[tokio::test]
  async fn test_update_block_skips_continuation_lines() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let mut graph = MarkdownGraph::open(dir.path()).await?;
    std::fs::write(
      graph.page_path("Inbox"),
      "- Reading::\n  - https://arxiv.org/abs/2301.00001\n- https://arxiv.org/abs/2301.00001\n",
    )?;

    graph.update_block("Inbox", "https://arxiv.org/abs/2301.00001", "[[A Paper]]").await?;
    assert_eq!(
      graph.read_page("Inbox").await?,
      "- Reading::\n  - https://arxiv.org/abs/2301.00001\n- [[A Paper]]\n"
    );

    std::fs::write(graph.page_path("Notes"), "- Reading::\n  - https://arxiv.org/abs/2301.00002\n")?;
    let err = graph.update_block("Notes", "https://arxiv.org/abs/2301.00002", "x").await.unwrap_err();
    assert!(matches!(err, MateError::BlockNotFound { .. }));
    Ok(())
  }

  #[traced_test]
  #[tokio::test]
  async fn test_preferred_date_format() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let graph = MarkdownGraph::open(dir.path()).await?;
    assert_eq!(graph.preferred_date_format().await?, DEFAULT_DATE_FORMAT);

    std::fs::create_dir_all(dir.path().join("logseq"))?;
    std::fs::write(
      dir.path().join("logseq").join("config.edn"),
      "{:meta/version 1\n :journal/page-title-format \"yyyy-MM-dd\"\n :feature/enable-journals? true}",
    )?;
    assert_eq!(graph.preferred_date_format().await?, "yyyy-MM-dd");
    Ok(())
  }
}
