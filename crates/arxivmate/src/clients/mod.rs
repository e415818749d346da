//! Clients for the remote services an import talks to.
//!
//! - [`arxiv`] - Client for the arXiv.org Atom query API and PDF downloads
//!
//! # Examples
//!
//! ```no_run
//! use arxivmate::{clients::ArxivClient, reference::PaperReference};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reference = PaperReference::parse("https://arxiv.org/abs/2301.07041")?;
//! let entry = ArxivClient::new().fetch_entry(&reference.paper_id).await?;
//! println!("Title: {}", entry.title());
//! # Ok(())
//! # }
//! ```

use quick_xml::de::from_str;

pub mod arxiv;

pub use arxiv::ArxivClient;

use super::*;
