//! Predicates over the `release_formats` nested collection.
//!
//! Every variant-level condition lands in one list so the backend evaluates
//! them against the same element. The list is built once per compilation and
//! the filter tree, the sort spec and the facet planner all read that one
//! allocation.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::clock::Clock;
use crate::config::CompilerConfig;
use crate::criteria::{is_active_filter, SearchCriteria, StatusTag};
use crate::dsl;
use crate::fields;

#[derive(Debug, Clone, PartialEq)]
pub struct VariantPredicates {
    predicates: Arc<[JsonValue]>,
    format_position: Option<usize>,
}

impl VariantPredicates {
    pub fn as_slice(&self) -> &[JsonValue] {
        &self.predicates
    }

    pub fn shared(&self) -> Arc<[JsonValue]> {
        Arc::clone(&self.predicates)
    }

    pub fn has_format_filter(&self) -> bool {
        self.format_position.is_some()
    }

    /// The list minus the format membership predicate.
    pub fn without_format(&self) -> Vec<JsonValue> {
        self.predicates
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != self.format_position)
            .map(|(_, p)| p.clone())
            .collect()
    }

    pub fn to_filter(&self) -> JsonValue {
        dsl::nested(fields::RELEASE_FORMATS, &self.predicates)
    }
}

/// Build the variant predicate list in its fixed order: publication, format,
/// stock, sale, release window, release bucket.
pub fn variant_predicates(
    criteria: &SearchCriteria,
    config: &CompilerConfig,
    clock: &Clock,
) -> VariantPredicates {
    let mut predicates = vec![dsl::term(fields::VARIANT_PUBLISHED, true)];
    let mut format_position = None;

    if is_active_filter(&criteria.format_tags) {
        let expanded: BTreeSet<&str> = criteria
            .format_tags
            .iter()
            .flat_map(|tag| config.expand_format(tag))
            .collect();
        format_position = Some(predicates.len());
        predicates.push(dsl::terms(fields::VARIANT_FORMAT, expanded));
    }

    let status = &criteria.status_tags;
    match (
        status.contains(&StatusTag::InStock),
        status.contains(&StatusTag::OutOfStock),
    ) {
        (true, false) => predicates.push(dsl::term(fields::VARIANT_IN_STOCK, true)),
        (false, true) => predicates.push(dsl::term(fields::VARIANT_IN_STOCK, false)),
        // Asking for both is the same as asking for neither.
        _ => {}
    }

    if status.contains(&StatusTag::OnSale) {
        predicates.push(dsl::term(fields::VARIANT_ON_SALE, true));
        predicates.push(dsl::range_gte(
            fields::VARIANT_SALE_ENDS_AT,
            clock.start_of_tomorrow(),
        ));
    }

    if status.contains(&StatusTag::PreOrder) {
        predicates.push(dsl::term(fields::VARIANT_PREORDERABLE, true));
        predicates.push(dsl::range_gte(fields::VARIANT_RELEASE_DATE, clock.now()));
    } else {
        predicates.push(dsl::range_lte(fields::VARIANT_RELEASE_DATE, clock.now()));
    }

    if let Some(bound) = clock.release_lower_bound(criteria.release_date_bucket) {
        predicates.push(dsl::range_gte(fields::VARIANT_RELEASE_DATE, bound));
    }

    tracing::debug!(
        predicates = predicates.len(),
        format_filter = format_position.is_some(),
        "Built variant predicates"
    );

    VariantPredicates {
        predicates: predicates.into(),
        format_position,
    }
}
