//! Turning an arXiv link into a page.
//!
//! [`Importer::import`] runs every stage in order and stops at the first failure:
//!
//! 1. validate the link, showing `Link not supported!` for anything else
//! 2. fetch the metadata and wait for the PDF to land in the host's assets
//! 3. render the template into blocks
//! 4. create the page, named after the paper title, and insert the blocks in order
//! 5. replace the originating block with a link to the new page
//!
//! Nothing is written to the host before step 4, so a failed fetch or render leaves it
//! untouched.
//!
//! # Examples
//!
//! ```no_run
//! use arxivmate::{config::Config, graph::MarkdownGraph, host::SourceBlock, pipeline::Importer};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load(Config::default_path())?;
//! let importer = Importer::from_config(&config)?;
//! let mut graph = MarkdownGraph::open("/home/me/notes").await?;
//!
//! let source = SourceBlock::in_page("Inbox", "https://arxiv.org/abs/2301.07041");
//! let imported = importer.import(&mut graph, &source).await?;
//! println!("Created {}", imported.page.link());
//! # Ok(())
//! # }
//! ```

use chrono::Local;

use super::*;
use crate::{
  format::{format_date, DEFAULT_DATE_FORMAT},
  host::{Block, BlockPlacement, Host, MessageLevel, Page, SourceBlock},
  metadata::PaperMetadata,
  reference::{is_valid_arxiv_url, PaperReference},
  template::Template,
};

/// The outcome of a successful import.
#[derive(Debug, Clone)]
pub struct ImportedPage {
  /// The created page
  pub page:     Page,
  /// Metadata the page was rendered from
  pub metadata: PaperMetadata,
  /// Blocks inserted into the page, in order
  pub blocks:   Vec<String>,
}

/// Runs imports with a fixed client, template and layout.
#[derive(Debug, Clone)]
pub struct Importer {
  /// Client used to reach arXiv
  client:      ArxivClient,
  /// Template every page is rendered from
  template:    Template,
  /// How blocks after the first are placed
  placement:   BlockPlacement,
  /// Date format overriding the host's preference
  date_format: Option<String>,
  /// Fixed import date; the local date when unset
  today:       Option<NaiveDate>,
}

impl Importer {
  /// Creates an importer with the default layout and the host's date format.
  pub fn new(client: ArxivClient, template: Template) -> Self {
    Self { client, template, placement: BlockPlacement::default(), date_format: None, today: None }
  }

  /// Creates an importer from the user's configuration.
  pub fn from_config(config: &Config) -> Result<Self, MateError> {
    Ok(Self {
      client:      ArxivClient::from_config(&config.arxiv)?,
      template:    Template::try_from(config)?,
      placement:   config.block_placement,
      date_format: config.date_format.clone(),
      today:       None,
    })
  }

  /// Sets how blocks after the first are placed.
  pub fn with_placement(mut self, placement: BlockPlacement) -> Self {
    self.placement = placement;
    self
  }

  /// Uses `date_format` instead of the host's preferred one.
  pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
    self.date_format = Some(date_format.into());
    self
  }

  /// Stamps imports with `date` instead of the current local date.
  pub fn on_date(mut self, date: NaiveDate) -> Self {
    self.today = Some(date);
    self
  }

  /// The date imports are stamped with.
  fn today(&self) -> NaiveDate { self.today.unwrap_or_else(|| Local::now().date_naive()) }

  /// Fetches and renders a paper without touching any host or downloading the PDF.
  pub async fn preview(&self, url: &str) -> Result<(PaperMetadata, Vec<String>), MateError> {
    let reference = PaperReference::parse(url.trim())?;
    let date_format = self.date_format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT);
    let metadata =
      self.client.extract_paper_metadata(&reference, date_format, self.today(), None).await?;
    let blocks = self.template.render_blocks(&metadata)?;
    Ok((metadata, blocks))
  }

  /// Imports the paper linked by `source` into `host`.
  ///
  /// # Errors
  ///
  /// - [`MateError::UnsupportedLink`] if the text is not an arXiv link; the user is told
  ///   and nothing else happens
  /// - any fetch error ([`MateError::NotFound`], [`MateError::Network`], ...); the user is
  ///   told and no page is created
  /// - template and host errors as they occur
  pub async fn import<H: Host>(&self, host: &mut H, source: &SourceBlock) -> Result<ImportedPage, MateError> {
    let url = source.content.trim();
    if !is_valid_arxiv_url(url) {
      host.show_message(&format!("Link not supported!\n{}", source.content), MessageLevel::Error).await;
      return Err(MateError::UnsupportedLink(url.to_owned()));
    }
    let reference = PaperReference::parse(url)?;
    info!("Importing arXiv paper {}", reference.paper_id);

    let date_format = match &self.date_format {
      Some(format) => format.clone(),
      None => host.preferred_date_format().await?,
    };
    debug!("Import date: {}", format_date(self.today(), &date_format));

    let assets = host.assets_dir();
    let metadata = match self
      .client
      .extract_paper_metadata(&reference, &date_format, self.today(), Some(&assets))
      .await
    {
      Ok(metadata) => metadata,
      Err(e) => {
        let message = if e.is_not_found() {
          format!("No arXiv paper found for {}", reference.paper_id)
        } else {
          format!("Failed to fetch {}:\n{e}", reference.abs_url)
        };
        error!("{message}");
        host.show_message(&message, MessageLevel::Error).await;
        return Err(e);
      },
    };

    let blocks = self.template.render_blocks(&metadata)?;

    let page = host.create_page(&metadata.title).await?;
    let mut first: Option<Block> = None;
    for block in &blocks {
      let parent = match self.placement {
        BlockPlacement::Nested => first.as_ref(),
        BlockPlacement::Sibling => None,
      };
      let inserted = host.insert_block(&page, block, parent).await?;
      first.get_or_insert(inserted);
    }

    if let Some(source_page) = &source.page {
      host.update_block(source_page, &source.content, &page.link()).await?;
    }

    host.show_message(&format!("Imported {}", page.link()), MessageLevel::Success).await;
    Ok(ImportedPage { page, metadata, blocks })
  }
}
