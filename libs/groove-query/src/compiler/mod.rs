//! Query compiler
//!
//! Compiles [`SearchCriteria`] into a backend request body in five steps:
//! 1. relevance query from the free text ([`text`])
//! 2. variant predicates for the nested collection ([`nested`])
//! 3. top-level filter context ([`filters`])
//! 4. sort resolution sharing the variant predicates ([`sort`])
//! 5. recency boost when the sort uses the relevance score ([`scoring`])
//!
//! Facets are planned from the same filter context (see [`crate::facets`]).

pub mod filters;
pub mod nested;
pub mod scoring;
pub mod sort;
pub mod text;

use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value as JsonValue};

use crate::clock::Clock;
use crate::config::CompilerConfig;
use crate::criteria::SearchCriteria;
use crate::facets::{FacetPlan, PlannedFacet};

pub use filters::{FilterContext, ScopedFilter};
pub use nested::{variant_predicates, VariantPredicates};
pub use sort::{FieldSort, NestedSort, SortMode, SortOrder, SortSpec};
pub use text::FieldSet;

/// A compiled request body plus the metadata needed to read its response.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub min_score: f64,
    pub query: JsonValue,
    pub sort: Vec<SortSpec>,
    pub aggs: Map<String, JsonValue>,
    pub post_filter: Option<JsonValue>,
    /// Facets in `aggs`, with the path to each one's result.
    pub facets: Vec<PlannedFacet>,
    variant_predicates: Arc<[JsonValue]>,
}

impl CompiledQuery {
    /// Predicates scoped to the nested variants, shared by filter and sort.
    pub fn variant_predicates(&self) -> &Arc<[JsonValue]> {
        &self.variant_predicates
    }

    pub fn uses_score(&self) -> bool {
        self.sort.iter().any(SortSpec::is_score)
    }

    pub fn to_json(&self) -> JsonValue {
        let mut body = Map::new();
        body.insert("min_score".to_string(), json!(self.min_score));
        body.insert("query".to_string(), self.query.clone());
        body.insert(
            "sort".to_string(),
            JsonValue::Array(self.sort.iter().map(SortSpec::to_json).collect()),
        );
        body.insert("aggs".to_string(), JsonValue::Object(self.aggs.clone()));
        if let Some(post_filter) = &self.post_filter {
            body.insert("post_filter".to_string(), post_filter.clone());
        }
        JsonValue::Object(body)
    }
}

impl Serialize for CompiledQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryCompiler {
    config: CompilerConfig,
}

impl QueryCompiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile with backend-evaluated date math.
    pub fn compile(&self, criteria: &SearchCriteria) -> CompiledQuery {
        self.compile_at(criteria, Clock::Relative)
    }

    pub fn compile_at(&self, criteria: &SearchCriteria, clock: Clock) -> CompiledQuery {
        let config = &self.config;

        let relevance = text::relevance_query(criteria, config);
        let variants = nested::variant_predicates(criteria, config, &clock);
        let context = FilterContext::build(relevance, criteria, &variants, config, &clock);
        let sort = sort::resolve_sort(criteria.sort_key, &variants);

        let query = scored_query(context.filtered_query(), &sort, config, &clock);

        let plan = FacetPlan::plan(&context, &variants, config);

        tracing::debug!(
            sort_key = criteria.sort_key.as_str(),
            scope = criteria.category_scope.as_str(),
            filters = context.clauses.len(),
            facets = plan.facets.len(),
            "Compiled search query"
        );

        CompiledQuery {
            min_score: config.min_score,
            query,
            sort,
            aggs: plan.aggs,
            post_filter: context.post_filter,
            facets: plan.facets,
            variant_predicates: variants.shared(),
        }
    }
}

/// Recency boosting only matters when the score takes part in ordering.
fn scored_query(
    filtered: JsonValue,
    sort: &[SortSpec],
    config: &CompilerConfig,
    clock: &Clock,
) -> JsonValue {
    if sort.iter().any(SortSpec::is_score) {
        scoring::with_recency_boost(filtered, config, clock)
    } else {
        filtered
    }
}
