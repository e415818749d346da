use std::path::PathBuf;

use arxivmate::{
  config::Config, is_valid_arxiv_url, Host, Importer, MarkdownGraph, MateError,
  PaperReference, SourceBlock,
};
use clap::{builder::ArgAction, Parser, Subcommand};
use console::{style, Emoji};
use errors::MateCliError;
use terminal::TerminalGraph;
use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

pub mod errors;
pub mod terminal;

static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
static BOOKS: Emoji<'_, '_> = Emoji("📚 ", "");
static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "");
static PAPER: Emoji<'_, '_> = Emoji("📄 ", "");
static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "");
static SUCCESS: Emoji<'_, '_> = Emoji("✨ ", "");

#[derive(Parser)]
#[command(author, version, about = "Import arXiv papers into a markdown note graph")]
struct Cli {
  /// Verbose mode (-v, -vv, -vvv)
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Configuration file to use instead of the default one
  #[arg(long, short, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Write a configuration file with the default template
  Init {
    /// Path where the configuration should be written
    #[arg(long, short)]
    path:            Option<PathBuf>,
    /// Overwrite an existing file without asking
    #[arg(long)]
    accept_defaults: bool,
  },
  /// Check whether a link can be imported and show its normalized forms
  Check {
    /// An arXiv abstract or PDF link
    url:  String,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
  },
  /// Fetch a paper and print the blocks its page would get, without writing anything
  Render {
    /// An arXiv abstract or PDF link
    url:  String,
    /// Print metadata and blocks as JSON
    #[arg(long)]
    json: bool,
  },
  /// Import a paper into a graph
  Import {
    /// An arXiv abstract or PDF link
    url:       String,
    /// Graph directory; defaults to `graph_dir` from the configuration
    #[arg(long, short)]
    graph:     Option<PathBuf>,
    /// Page containing the link as a block, which is replaced by a link to the new page
    #[arg(long)]
    from_page: Option<String>,
  },
}

/// Setup logging with the specified verbosity level
fn setup_logging(verbosity: u8) {
  let filter = match verbosity {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_thread_ids(true)
    .with_target(true)
    .init();
}

#[tokio::main]
async fn main() -> Result<(), MateCliError> {
  let cli = Cli::parse();
  setup_logging(cli.verbose);

  let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
  trace!("Using configuration at: {}", config_path.display());

  match cli.command {
    Commands::Init { path, accept_defaults } => {
      let path = path.or(cli.config).unwrap_or_else(|| {
        let default_path = Config::default_path();
        println!(
          "{} Using default configuration path: {}",
          style(BOOKS).cyan(),
          style(default_path.display()).yellow()
        );
        default_path
      });

      if path.exists() && !accept_defaults {
        println!(
          "{} Configuration already exists at: {}",
          style(WARNING).yellow(),
          style(path.display()).yellow()
        );

        let confirm = dialoguer::Confirm::new()
          .with_prompt("Do you want to replace it with the defaults?")
          .default(false)
          .interact()?;

        if !confirm {
          println!("{} Keeping existing configuration", style("ℹ").blue());
          return Ok(());
        }
      }

      println!(
        "{} Writing default configuration to: {}",
        style(ROCKET).cyan(),
        style(path.display()).yellow()
      );
      Config::default().save(&path)?;

      println!("{} Configuration initialized successfully!", style(SUCCESS).green());
      Ok(())
    },

    Commands::Check { url, json } => {
      let url = url.trim();
      if !is_valid_arxiv_url(url) {
        println!("{} Link not supported!\n{}", style(WARNING).yellow(), style(url).yellow());
        return Err(MateError::UnsupportedLink(url.to_owned()).into());
      }

      let reference = PaperReference::parse(url)?;
      if json {
        println!("{}", serde_json::to_string_pretty(&reference)?);
        return Ok(());
      }

      println!("{} Supported arXiv link", style(SUCCESS).green());
      println!("   {} {}", style("Paper ID:").green().bold(), style(&reference.paper_id).white());
      println!("   {} {}", style("Abstract:").green().bold(), style(&reference.abs_url).blue().underlined());
      println!("   {} {}", style("PDF:").green().bold(), style(&reference.pdf_url).blue().underlined());
      Ok(())
    },

    Commands::Render { url, json } => {
      let config = Config::load(&config_path)?;
      let importer = Importer::from_config(&config)?;

      if !json {
        println!("{} Fetching paper: {}", style(LOOKING_GLASS).cyan(), style(&url).yellow());
      }

      let (metadata, blocks) = importer.preview(&url).await?;
      debug!("Paper details: {:?}", metadata);

      if json {
        let output = serde_json::json!({ "metadata": metadata, "blocks": blocks });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
      }

      println!("\n{} Found paper:", style(SUCCESS).green());
      println!("   {} {}", style("Title:").green().bold(), style(&metadata.title).white());
      println!("   {} {}", style("Authors:").green().bold(), style(metadata.authors.join(", ")).white());

      println!("\n{} Blocks:", style(PAPER).green());
      for (i, block) in blocks.iter().enumerate() {
        println!("\n{}. {}", style(i + 1).yellow(), block);
      }
      Ok(())
    },

    Commands::Import { url, graph, from_page } => {
      let config = Config::load(&config_path)?;
      let graph_dir = graph
        .or_else(|| config.graph_dir.clone())
        .ok_or_else(|| MateCliError::MissingGraph(config_path.display().to_string()))?;
      trace!("Using graph at: {}", graph_dir.display());

      let importer = Importer::from_config(&config)?;
      let mut host = TerminalGraph::new(MarkdownGraph::open(&graph_dir).await?);

      let source = match from_page {
        Some(page) => SourceBlock::in_page(page, url.clone()),
        None => SourceBlock::detached(url.clone()),
      };

      println!("{} Fetching paper: {}", style(LOOKING_GLASS).cyan(), style(url.trim()).yellow());

      let imported = importer.import(&mut host, &source).await?;
      debug!("Imported blocks: {:?}", imported.blocks);

      println!("   {} {}", style("Title:").green().bold(), style(&imported.metadata.title).white());
      println!(
        "   {} {}",
        style("Authors:").green().bold(),
        style(imported.metadata.authors.join(", ")).white()
      );
      println!(
        "   {} {}",
        style("Page:").green().bold(),
        style(host.graph().page_path(&imported.page.name).display()).yellow()
      );
      println!(
        "   {} {}",
        style("PDF:").green().bold(),
        style(host.assets_dir().join(&imported.metadata.file_name).display()).yellow()
      );
      Ok(())
    },
  }
}
