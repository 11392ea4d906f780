//! Facet (aggregation) planning.
//!
//! In filtered mode a facet counts documents matching every applied filter
//! except its own dimension's, so a user can widen a selection:
//! - inactive dimension: plain aggregation under the main query
//! - active dimension: `global` escape, then a `filter` re-applying the query
//!   with that dimension lifted
//!
//! The format facet lives inside the nested variants and counts products via
//! `reverse_nested`. Browse mode only plans the catalog facet, computed
//! before the catalog `post_filter` applies.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};

use crate::compiler::filters::FilterContext;
use crate::compiler::nested::VariantPredicates;
use crate::config::{CompilerConfig, FacetMode};
use crate::dsl;
use crate::fields;

/// Aggregation names shared by the planner and response parsers.
pub const SCOPED_AGG: &str = "scoped";
pub const VARIANTS_AGG: &str = "variants";
pub const MATCHING_AGG: &str = "matching";
pub const VALUES_AGG: &str = "values";
pub const PRODUCTS_AGG: &str = "products";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetDimension {
    Catalog,
    Genre,
    Format,
    Price,
}

impl FacetDimension {
    pub const ALL: [FacetDimension; 4] = [Self::Catalog, Self::Genre, Self::Format, Self::Price];

    /// Aggregation name in the request body.
    pub fn name(self) -> &'static str {
        match self {
            Self::Catalog => "taxon_ids",
            Self::Genre => "genre_ids",
            Self::Format => "formats",
            Self::Price => "price",
        }
    }

    pub fn field(self) -> &'static str {
        match self {
            Self::Catalog => fields::TAXON_IDS,
            Self::Genre => fields::GENRE_IDS,
            Self::Format => fields::VARIANT_FORMAT,
            Self::Price => fields::PRICE,
        }
    }

    pub fn kind(self) -> FacetKind {
        match self {
            Self::Price => FacetKind::Stats,
            _ => FacetKind::Terms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetKind {
    Terms,
    Stats,
}

/// Where a facet's result lives in the response `aggregations` tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedFacet {
    pub name: String,
    pub dimension: FacetDimension,
    pub kind: FacetKind,
    /// Aggregation names from the response root down to the leaf.
    pub path: Vec<String>,
}

/// Aggregations for the configured facet dimensions.
///
/// Inactive facets run under the main query and so only see hits above
/// `min_score`. Active facets start from `global`, which discards the query
/// and its `min_score`; their counts include low-scoring documents.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FacetPlan {
    pub aggs: Map<String, JsonValue>,
    pub facets: Vec<PlannedFacet>,
}

impl FacetPlan {
    pub fn plan(
        context: &FilterContext,
        variants: &VariantPredicates,
        config: &CompilerConfig,
    ) -> Self {
        let mut plan = Self::default();

        let dimensions: &[FacetDimension] = match config.facet_mode {
            FacetMode::Browse => &[FacetDimension::Catalog],
            FacetMode::Filtered => config.facet_dimensions.as_slice(),
        };

        for &dimension in dimensions {
            if plan.facets.iter().any(|f| f.dimension == dimension) {
                continue;
            }
            plan.add(dimension, context, variants, config);
        }
        plan
    }

    fn add(
        &mut self,
        dimension: FacetDimension,
        context: &FilterContext,
        variants: &VariantPredicates,
        config: &CompilerConfig,
    ) {
        let name = dimension.name();
        let (leaf, mut inner_path) = leaf_aggregation(dimension, variants, config);

        let mut path = vec![name.to_string()];
        let agg = if context.is_active(dimension) {
            let leaf_name = inner_path[0].clone();
            path.push(SCOPED_AGG.to_string());
            json!({
                "global": {},
                "aggs": {
                    SCOPED_AGG: {
                        "filter": context.query_without(dimension),
                        "aggs": { leaf_name: leaf }
                    }
                }
            })
        } else {
            inner_path.remove(0);
            leaf
        };
        path.extend(inner_path);

        tracing::debug!(facet = name, active = context.is_active(dimension), "Planned facet");

        self.aggs.insert(name.to_string(), agg);
        self.facets.push(PlannedFacet {
            name: name.to_string(),
            dimension,
            kind: dimension.kind(),
            path,
        });
    }
}

/// Aggregation computing one dimension's values within the current scope,
/// plus the names leading from it to the leaf. The first name is the
/// aggregation's own.
fn leaf_aggregation(
    dimension: FacetDimension,
    variants: &VariantPredicates,
    config: &CompilerConfig,
) -> (JsonValue, Vec<String>) {
    let field = dimension.field();
    match dimension {
        FacetDimension::Price => (
            json!({ "stats": { "field": field } }),
            vec![VALUES_AGG.to_string()],
        ),
        FacetDimension::Format => {
            let agg = json!({
                "nested": { "path": fields::RELEASE_FORMATS },
                "aggs": {
                    MATCHING_AGG: {
                        "filter": dsl::bool_filter(&variants.without_format()),
                        "aggs": {
                            VALUES_AGG: {
                                "terms": { "field": field, "size": config.facet_max_buckets },
                                "aggs": { PRODUCTS_AGG: { "reverse_nested": {} } }
                            }
                        }
                    }
                }
            });
            (
                agg,
                vec![
                    VARIANTS_AGG.to_string(),
                    MATCHING_AGG.to_string(),
                    VALUES_AGG.to_string(),
                ],
            )
        }
        FacetDimension::Catalog | FacetDimension::Genre => (
            json!({ "terms": { "field": field, "size": config.facet_max_buckets } }),
            vec![VALUES_AGG.to_string()],
        ),
    }
}
