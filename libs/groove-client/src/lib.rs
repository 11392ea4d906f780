//! Search execution for compiled catalog queries
//!
//! Runs a [`groove_query::CompiledQuery`] against a [`SearchBackend`] and
//! shapes the response into a page of records plus facet buckets.
//!
//! ```rust,no_run
//! use groove_client::{BackendConfig, ElasticsearchBackend, Searcher};
//! use groove_query::{CompilerConfig, QueryCompiler, SearchCriteria};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = ElasticsearchBackend::new(&BackendConfig::default())?;
//! let searcher = Searcher::new(QueryCompiler::new(CompilerConfig::default()), backend);
//! let results = searcher.search(&SearchCriteria::default()).await?;
//! println!("{} of {} records", results.records.len(), results.total);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod elasticsearch;
pub mod error;
pub mod results;
pub mod searcher;

pub use backend::{SearchBackend, SearchRequest};
pub use config::BackendConfig;
pub use elasticsearch::ElasticsearchBackend;
pub use error::{Error, Result};
pub use results::{Facet, FacetBucket, FacetValues, Hit, PriceStats, SearchResults};
pub use searcher::Searcher;
