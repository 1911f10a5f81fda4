//! Client for the AutoFocus threat intelligence API
//!
//! Searches are submitted once per page and then polled through a server side
//! cookie until the page is ready. [`AutoFocus::search`] hides that protocol
//! behind a lazy stream of hits:
//!
//! ```no_run
//! use autofocus::{AutoFocus, ClientConfig, SearchQuery};
//! use futures::TryStreamExt;
//!
//! # async fn run() -> autofocus::Result<()> {
//! let client = AutoFocus::from_config(&ClientConfig::load()?)?;
//! let mut samples = client
//!     .samples()
//!     .search(&SearchQuery::field("sample.malware", "1"))?;
//!
//! while let Some(sample) = samples.try_next().await? {
//!     println!("{}", sample.sha256);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod poller;
pub mod query;
pub mod resources;
pub mod stream;
pub mod transport;

#[cfg(test)]
mod testing;

pub use client::AutoFocus;
pub use config::{ClientConfig, PollConfig};
pub use error::{ApiFailure, Error, Result};
pub use poller::{Page, PageStream, PollPolicy, RESULT_CEILING, Record, SearchPoller, SearchState};
pub use query::{Clause, QueryDocument, SearchQuery};
pub use resources::{
    AnalysisRequest, ListTagsParams, Sample, Samples, Session, Sessions, SortOrder, Tag,
    TagSummary, Tags,
};
pub use stream::{RecordStream, TypedStream};
pub use transport::{ApiResponse, HttpTransport, Transport};
