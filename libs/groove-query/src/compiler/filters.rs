//! Top-level filter context.
//!
//! Filters are kept as an ordered list tagged with the facet dimension they
//! restrict, so the facet planner can rebuild the query "minus one
//! dimension" without re-deriving anything from the criteria.

use serde_json::Value as JsonValue;

use super::nested::VariantPredicates;
use crate::clock::Clock;
use crate::config::{CompilerConfig, FacetMode};
use crate::criteria::{is_active_filter, SearchCriteria, StatusTag};
use crate::dsl;
use crate::facets::FacetDimension;
use crate::fields;

#[derive(Debug, Clone, PartialEq)]
pub struct ScopedFilter {
    /// Set only when this clause is that dimension's own filter.
    pub dimension: Option<FacetDimension>,
    pub clause: JsonValue,
    /// Replacement used when the dimension's filter is lifted. `None` drops
    /// the clause entirely.
    pub relaxed: Option<JsonValue>,
}

impl ScopedFilter {
    fn plain(clause: JsonValue) -> Self {
        Self {
            dimension: None,
            clause,
            relaxed: None,
        }
    }

    fn scoped(dimension: FacetDimension, clause: JsonValue) -> Self {
        Self {
            dimension: Some(dimension),
            clause,
            relaxed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterContext {
    pub relevance: JsonValue,
    pub clauses: Vec<ScopedFilter>,
    /// Filter applied to hits only, after aggregations run.
    pub post_filter: Option<JsonValue>,
}

impl FilterContext {
    pub fn build(
        relevance: JsonValue,
        criteria: &SearchCriteria,
        variants: &VariantPredicates,
        config: &CompilerConfig,
        clock: &Clock,
    ) -> Self {
        let mut clauses = Vec::new();
        let mut post_filter = None;

        if !criteria.catalog_ids.is_empty() {
            let clause = dsl::terms(fields::TAXON_IDS, criteria.catalog_ids.iter().cloned());
            match config.facet_mode {
                FacetMode::Filtered => {
                    clauses.push(ScopedFilter::scoped(FacetDimension::Catalog, clause))
                }
                FacetMode::Browse => post_filter = Some(clause),
            }
        }

        clauses.extend(criteria.raw_clauses.iter().cloned().map(ScopedFilter::plain));

        let nested = variants.to_filter();
        if variants.has_format_filter() {
            clauses.push(ScopedFilter {
                dimension: Some(FacetDimension::Format),
                clause: nested,
                relaxed: Some(dsl::nested(
                    fields::RELEASE_FORMATS,
                    &variants.without_format(),
                )),
            });
        } else {
            clauses.push(ScopedFilter::plain(nested));
        }

        if is_active_filter(&criteria.tag_ids) {
            clauses.push(ScopedFilter::scoped(
                FacetDimension::Genre,
                dsl::terms(fields::GENRE_IDS, criteria.tag_ids.iter().cloned()),
            ));
        }

        if criteria.price_min.is_some() || criteria.price_max.is_some() {
            let mut bounds = serde_json::Map::new();
            if let Some(min) = criteria.price_min {
                bounds.insert("gte".to_string(), min.into());
            }
            if let Some(max) = criteria.price_max {
                bounds.insert("lte".to_string(), max.into());
            }
            clauses.push(ScopedFilter::scoped(
                FacetDimension::Price,
                dsl::range(fields::PRICE, bounds),
            ));
        }

        clauses.push(ScopedFilter::plain(dsl::range_lte(
            fields::AVAILABLE_ON,
            clock.now(),
        )));
        clauses.push(ScopedFilter::plain(dsl::missing(fields::DELETED_AT)));
        clauses.push(ScopedFilter::plain(dsl::term(fields::PUBLISHED, true)));

        if criteria.status_tags.contains(&StatusTag::Recommended) {
            clauses.push(ScopedFilter::plain(dsl::terms(
                fields::TAXON_IDS,
                [config.recommended_category_id.as_str()],
            )));
        }

        Self {
            relevance,
            clauses,
            post_filter,
        }
    }

    pub fn filters(&self) -> Vec<JsonValue> {
        self.clauses.iter().map(|c| c.clause.clone()).collect()
    }

    pub fn is_active(&self, dimension: FacetDimension) -> bool {
        self.clauses.iter().any(|c| c.dimension == Some(dimension))
    }

    /// Every filter with `dimension`'s own restriction lifted.
    pub fn filters_without(&self, dimension: FacetDimension) -> Vec<JsonValue> {
        self.clauses
            .iter()
            .filter_map(|c| {
                if c.dimension == Some(dimension) {
                    c.relaxed.clone()
                } else {
                    Some(c.clause.clone())
                }
            })
            .collect()
    }

    pub fn query_without(&self, dimension: FacetDimension) -> JsonValue {
        dsl::filtered(self.relevance.clone(), self.filters_without(dimension))
    }

    pub fn filtered_query(&self) -> JsonValue {
        dsl::filtered(self.relevance.clone(), self.filters())
    }
}
