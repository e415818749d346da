//! Rendering paper metadata into page blocks.
//!
//! Templates use Handlebars syntax. The rendered text is split into blocks at blank
//! lines: each paragraph of output becomes one block of the page.
//!
//! # Examples
//!
//! ```
//! use arxivmate::{metadata::PaperMetadata, template::Template};
//!
//! let template =
//!   Template::new("# {{title}}\n\nBy {{#each authors}}{{this}}{{#unless @last}} & {{/unless}}{{/each}}")
//!     .unwrap();
//! let metadata = PaperMetadata {
//!   title: "A Paper".into(),
//!   authors: vec!["A. One".into(), "B. Two".into()],
//!   ..PaperMetadata::default()
//! };
//!
//! let blocks = template.render_blocks(&metadata).unwrap();
//! assert_eq!(blocks, vec!["# A Paper", "By A. One & B. Two"]);
//! ```

use handlebars::{no_escape, Handlebars};
use lazy_static::lazy_static;
use regex::Regex;

use super::*;
use crate::metadata::PaperMetadata;

/// Template used when the configuration does not provide one.
///
/// Produces a single block of page properties.
pub const DEFAULT_TEMPLATE: &str = "Paper::
Link:: {{absUrl}}
Status:: #To-Read
Tags:: Paper
Date:: [[{{today}}]]
Type:: Paper
Authors:: {{#each authors}}[[{{this}}]]{{#unless @last}}, {{/unless}}{{/each}}";

lazy_static! {
  /// A line break, any number of whitespace-only lines, and another line break.
  static ref BLANK_LINES: Regex = Regex::new(r"\r?\n[ \t]*(?:\r?\n[ \t]*)+").unwrap();
}

/// A user-editable page template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
  /// Raw Handlebars source
  source: String,
}

impl Default for Template {
  fn default() -> Self { Self { source: DEFAULT_TEMPLATE.to_string() } }
}

impl TryFrom<&Config> for Template {
  type Error = MateError;

  fn try_from(config: &Config) -> Result<Self, Self::Error> { Self::new(&config.template) }
}

impl Template {
  /// Checks that `source` is valid Handlebars and wraps it. Surrounding whitespace is
  /// ignored.
  ///
  /// # Errors
  ///
  /// Returns [`MateError::Template`] if the source does not compile, e.g. a block helper
  /// is never closed.
  pub fn new(source: &str) -> Result<Self, MateError> {
    let source = source.trim();
    handlebars::Template::compile(source)?;
    Ok(Self { source: source.to_string() })
  }

  /// The template source.
  pub fn source(&self) -> &str { &self.source }

  /// Renders the template against `metadata` into a single string.
  ///
  /// Placeholders that name no field render as empty text and values are inserted
  /// without HTML escaping.
  ///
  /// # Errors
  ///
  /// Returns [`MateError::Render`] if a helper fails while rendering.
  pub fn render(&self, metadata: &PaperMetadata) -> Result<String, MateError> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(false);
    handlebars.register_escape_fn(no_escape);

    let rendered = handlebars.render_template(&self.source, metadata)?;
    trace!("Rendered template for {}: {rendered:?}", metadata.paper_id);
    Ok(rendered)
  }

  /// Renders the template and splits the output into trimmed, non-empty blocks.
  pub fn render_blocks(&self, metadata: &PaperMetadata) -> Result<Vec<String>, MateError> {
    let rendered = self.render(metadata)?;
    let blocks = split_blocks(&rendered);
    debug!("Template produced {} block(s) for {}", blocks.len(), metadata.paper_id);
    Ok(blocks)
  }
}

/// Splits text on blank-line boundaries into trimmed blocks, dropping empty ones.
pub fn split_blocks(text: &str) -> Vec<String> {
  BLANK_LINES
    .split(text.trim())
    .map(str::trim)
    .filter(|block| !block.is_empty())
    .map(str::to_string)
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn metadata() -> PaperMetadata {
    PaperMetadata {
      paper_id: "2301.00001".into(),
      title: "Attention & Friends".into(),
      summary: "We study <things>.".into(),
      authors: vec!["A. One".into(), "B. Two".into(), "C. Three".into()],
      abs_url: "https://arxiv.org/abs/2301.00001".into(),
      pdf_url: "https://arxiv.org/pdf/2301.00001.pdf".into(),
      today: "Jan 2nd, 2023".into(),
      file_name: "2301.00001.pdf".into(),
      file_path: "../assets/2301.00001.pdf".into(),
      ..PaperMetadata::default()
    }
  }

  #[test]
  fn test_default_template_authors() {
    let template = Template::new("{{#each authors}}[[{{this}}]]{{#unless @last}}, {{/unless}}{{/each}}").unwrap();
    assert_eq!(template.render(&metadata()).unwrap(), "[[A. One]], [[B. Two]], [[C. Three]]");
  }

  #[test]
  fn test_default_template() {
    let blocks = Template::default().render_blocks(&metadata()).unwrap();
    assert_eq!(blocks, vec![
      "Paper::
Link:: https://arxiv.org/abs/2301.00001
Status:: #To-Read
Tags:: Paper
Date:: [[Jan 2nd, 2023]]
Type:: Paper
Authors:: [[A. One]], [[B. Two]], [[C. Three]]"
    ]);
  }

  #[test]
  fn test_single_author_has_no_separator() {
    let metadata = PaperMetadata { authors: vec!["Solo".into()], ..metadata() };
    let template = Template::new("{{#each authors}}[[{{this}}]]{{#unless @last}}, {{/unless}}{{/each}}").unwrap();
    assert_eq!(template.render(&metadata).unwrap(), "[[Solo]]");
  }

  #[test]
  fn test_split_on_blank_lines() {
    let template = Template::new("{{title}}\n\n\n\n  {{summary}}  \n\n![pdf]({{filePath}})\n").unwrap();
    let blocks = template.render_blocks(&metadata()).unwrap();
    assert_eq!(blocks, vec![
      "Attention & Friends",
      "We study <things>.",
      "![pdf](../assets/2301.00001.pdf)"
    ]);
  }

  #[test]
  fn test_whitespace_only_lines_separate_blocks() {
    assert_eq!(split_blocks("a\n  \t\nb\r\n\r\nc"), vec!["a", "b", "c"]);
    assert_eq!(split_blocks("a\nb"), vec!["a\nb"]);
    assert!(split_blocks("\n\n  \n").is_empty());
  }

  #[test]
  fn test_unknown_placeholder_renders_empty() {
    let template = Template::new("[{{doesNotExist}}] {{paperId}}").unwrap();
    assert_eq!(template.render(&metadata()).unwrap(), "[] 2301.00001");
  }

  #[test]
  fn test_conditional_fields() {
    let template = Template::new("{{#if today}}Date:: {{today}}{{/if}}").unwrap();
    assert_eq!(template.render(&metadata()).unwrap(), "Date:: Jan 2nd, 2023");

    let metadata = PaperMetadata { today: String::new(), ..metadata() };
    assert_eq!(template.render(&metadata).unwrap(), "");
  }

  #[test]
  fn test_malformed_template_is_rejected_up_front() {
    assert!(matches!(Template::new("{{#each authors}}"), Err(MateError::Template(_))));
    assert!(matches!(Template::new("{{#each authors}}{{this}}{{/if}}"), Err(MateError::Template(_))));

    let config = Config { template: "{{#if title}}".into(), ..Config::default() };
    assert!(matches!(Template::try_from(&config), Err(MateError::Template(_))));
  }

  #[test]
  fn test_default_template_compiles() {
    assert_eq!(Template::new(DEFAULT_TEMPLATE).unwrap(), Template::default());
  }
}
