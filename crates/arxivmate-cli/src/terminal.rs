//! A markdown graph that also reports host messages on the terminal.

use arxivmate::{
  host::{Block, Host, MessageLevel, Page},
  MarkdownGraph, MateError,
};
use console::style;

use super::*;

/// Wraps a [`MarkdownGraph`], printing every message the import shows to the user.
pub struct TerminalGraph {
  /// The graph pages are written to
  graph: MarkdownGraph,
}

impl TerminalGraph {
  /// Wraps `graph`.
  pub fn new(graph: MarkdownGraph) -> Self { Self { graph } }

  /// The wrapped graph.
  pub fn graph(&self) -> &MarkdownGraph { &self.graph }
}

impl Host for TerminalGraph {
  async fn preferred_date_format(&self) -> Result<String, MateError> {
    self.graph.preferred_date_format().await
  }

  fn assets_dir(&self) -> PathBuf { self.graph.assets_dir() }

  async fn create_page(&mut self, title: &str) -> Result<Page, MateError> {
    println!("{} Creating page: {}", style(PAPER).cyan(), style(title).yellow());
    self.graph.create_page(title).await
  }

  async fn insert_block(
    &mut self,
    page: &Page,
    content: &str,
    parent: Option<&Block>,
  ) -> Result<Block, MateError> {
    self.graph.insert_block(page, content, parent).await
  }

  async fn update_block(&mut self, page: &str, original: &str, content: &str) -> Result<(), MateError> {
    self.graph.update_block(page, original, content).await
  }

  async fn show_message(&self, message: &str, level: MessageLevel) {
    self.graph.show_message(message, level).await;
    match level {
      MessageLevel::Error => eprintln!("{} {}", style(WARNING).red(), style(message).red()),
      MessageLevel::Warning => println!("{} {}", style(WARNING).yellow(), style(message).yellow()),
      MessageLevel::Info => println!("{} {}", style("ℹ").blue(), message),
      MessageLevel::Success => println!("{} {}", style(SUCCESS).green(), style(message).green()),
    }
  }
}
