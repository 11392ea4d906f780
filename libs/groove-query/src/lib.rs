//! Faceted catalog search query compiler
//!
//! Turns loosely-typed storefront search parameters into an Elasticsearch
//! request body:
//! - [`params`] normalizes request parameters into a typed [`SearchCriteria`]
//! - [`compiler`] builds the relevance query, filter tree, sort and recency boost
//! - [`facets`] plans the aggregations that accompany the query
//!
//! Compilation is pure: the same criteria and clock always produce the same body.
//!
//! ```
//! use groove_query::{CompilerConfig, QueryCompiler, SearchCriteria};
//!
//! let items = vec![
//!     ("keywords".to_string(), "blue note".to_string()),
//!     ("status".to_string(), "in-stock,on-sale".to_string()),
//! ];
//! let criteria = SearchCriteria::from_items(&items);
//! let compiled = QueryCompiler::new(CompilerConfig::default()).compile(&criteria);
//! assert_eq!(compiled.to_json()["min_score"], 0.1);
//! ```

pub mod clock;
pub mod compiler;
pub mod config;
pub mod criteria;
pub mod error;
pub mod escape;
pub mod facets;
pub mod fields;
pub mod params;

mod dsl;

pub use clock::Clock;
pub use compiler::{CompiledQuery, QueryCompiler, SortSpec};
pub use config::{CompilerConfig, DecayFunction, FacetMode, FieldWeights, TextStrategy};
pub use criteria::{CategoryScope, ReleaseDateBucket, SearchCriteria, SortKey, StatusTag};
pub use error::{Error, Result};
pub use facets::{FacetDimension, FacetKind, PlannedFacet};
