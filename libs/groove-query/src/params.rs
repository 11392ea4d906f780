//! Storefront search parameter normalization
//!
//! Handles parsing of request parameters into [`SearchCriteria`]:
//! - Comma-joined multi-value parameters (`taxon`, `genre`, `format`, `status`)
//! - Symbolic tokens (`sorting`, `search_in`, `released`)
//! - Pagination with defaults (`page`, `per_page`)
//!
//! Normalization is total: malformed values degrade to their documented
//! default instead of failing the request.

use std::collections::{BTreeSet, HashMap};

use crate::criteria::{
    CategoryScope, ReleaseDateBucket, SearchCriteria, SortKey, StatusTag, ALL_SENTINEL,
    DEFAULT_PAGE, DEFAULT_PAGE_SIZE,
};

impl SearchCriteria {
    /// Parse criteria from a parameter map.
    ///
    /// Keys are visited in sorted order so repeated parameters accumulate the
    /// same way regardless of map iteration order.
    pub fn from_params(params: &HashMap<String, Vec<String>>) -> Self {
        let mut keys: Vec<&String> = params.keys().collect();
        keys.sort();

        let mut items = Vec::new();
        for key in keys {
            for value in &params[key] {
                items.push((key.clone(), value.clone()));
            }
        }
        Self::from_items(&items)
    }

    /// Parse criteria from ordered (key, value) items.
    ///
    /// Repeating a multi-value key (`taxon=1&taxon=2`) is equivalent to
    /// joining its values (`taxon=1,2`).
    pub fn from_items(items: &[(String, String)]) -> Self {
        let mut criteria = Self::default();
        let mut status_tokens: Vec<String> = Vec::new();

        for (key, value) in items {
            match key.as_str() {
                "keywords" | "q" => {
                    let text = value.trim();
                    if !text.is_empty() {
                        criteria.text = text.to_string();
                    }
                }
                "search_in" => criteria.category_scope = CategoryScope::parse(value),
                "taxon" | "taxon[]" => criteria.catalog_ids.extend(split_multi(value)),
                "genre" => criteria.tag_ids.extend(split_multi(value)),
                "format" => criteria.format_tags.extend(split_multi(value)),
                "status" => status_tokens.extend(split_multi(value)),
                "released" => criteria.release_date_bucket = ReleaseDateBucket::parse(value),
                "sorting" => criteria.sort_key = SortKey::parse(value),
                "include_description" => criteria.include_description_text = parse_flag(value),
                "include_tracks" => criteria.include_sub_item_text = parse_flag(value),
                "price_min" => criteria.price_min = parse_price(value),
                "price_max" => criteria.price_max = parse_price(value),
                "page" => criteria.page = parse_positive(value).unwrap_or(DEFAULT_PAGE),
                "per_page" => {
                    criteria.page_size = parse_positive(value).unwrap_or(DEFAULT_PAGE_SIZE)
                }
                _ => {
                    tracing::trace!(parameter = %key, "Ignoring unknown search parameter");
                }
            }
        }

        criteria.status_tags = collect_status(&status_tokens);
        criteria
    }
}

/// Split a comma-joined value, dropping blanks.
fn split_multi(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `all` anywhere in the list disables the status filter entirely.
fn collect_status(tokens: &[String]) -> BTreeSet<StatusTag> {
    if tokens.iter().any(|t| t.eq_ignore_ascii_case(ALL_SENTINEL)) {
        return BTreeSet::new();
    }

    let mut out = BTreeSet::new();
    for token in tokens {
        match StatusTag::parse(token) {
            Some(tag) => {
                out.insert(tag);
            }
            None => tracing::debug!(token = %token, "Dropping unknown status token"),
        }
    }
    out
}

fn parse_positive(value: &str) -> Option<u32> {
    let parsed: i64 = value.trim().parse().ok()?;
    if parsed <= 0 {
        return None;
    }
    Some(u32::try_from(parsed).unwrap_or(u32::MAX))
}

fn parse_price(value: &str) -> Option<f64> {
    let parsed: f64 = value.trim().parse().ok()?;
    (parsed.is_finite() && parsed > 0.0).then_some(parsed)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
