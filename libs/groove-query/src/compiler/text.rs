//! Relevance query from free text.

use serde_json::{json, Value as JsonValue};

use crate::config::{CompilerConfig, FieldWeights, TextStrategy};
use crate::criteria::{CategoryScope, SearchCriteria};
use crate::dsl;
use crate::escape::escape_query_string;
use crate::fields;

/// Weighted field lists searched for one category scope.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldSet {
    /// Stemmed / tokenized representations.
    pub analyzed: Vec<String>,
    /// Case-folded keyword representations.
    pub exact: Vec<String>,
}

impl FieldSet {
    pub fn for_criteria(criteria: &SearchCriteria, weights: &FieldWeights) -> Self {
        let w = |field: &str, weight: u32| format!("{}^{}", field, weight);

        let mut set = match criteria.category_scope {
            CategoryScope::Default => Self {
                analyzed: vec![
                    w(fields::ARTISTS, weights.primary),
                    w(fields::NAME, weights.secondary),
                    w(fields::LABEL, weights.tertiary),
                    w(fields::CATALOGUE_NUMBER, weights.tertiary),
                ],
                exact: vec![
                    w(fields::ARTISTS_FOLDED, weights.primary),
                    w(fields::NAME_FOLDED, weights.secondary),
                    w(fields::LABEL_FOLDED, weights.tertiary),
                    w(fields::CATALOGUE_NUMBER, weights.tertiary),
                ],
            },
            CategoryScope::Artist => Self {
                analyzed: vec![w(fields::ARTISTS, weights.primary)],
                exact: vec![w(fields::ARTISTS_FOLDED, weights.primary)],
            },
            CategoryScope::Title => Self {
                analyzed: vec![w(fields::NAME, weights.secondary)],
                exact: vec![w(fields::NAME_FOLDED, weights.secondary)],
            },
            CategoryScope::Label => Self {
                analyzed: vec![w(fields::LABEL, weights.tertiary)],
                exact: vec![w(fields::LABEL_FOLDED, weights.tertiary)],
            },
            CategoryScope::CatalogueNumber => Self {
                analyzed: Vec::new(),
                exact: vec![w(fields::CATALOGUE_NUMBER, weights.tertiary)],
            },
        };

        if criteria.include_description_text {
            set.analyzed.push(fields::DESCRIPTION.to_string());
        }
        if criteria.include_sub_item_text {
            set.analyzed.push(fields::TRACK_TITLES.to_string());
        }
        set
    }
}

pub fn relevance_query(criteria: &SearchCriteria, config: &CompilerConfig) -> JsonValue {
    if !criteria.has_text() {
        return dsl::match_all();
    }

    let text = criteria.text.trim();
    let fields = FieldSet::for_criteria(criteria, &config.field_weights);
    match config.text_strategy {
        TextStrategy::Structured => structured(text, &fields, config.exact_boost),
        TextStrategy::QueryString => query_string(text, &fields),
    }
}

fn multi_match(text: &str, fields: &[String]) -> JsonValue {
    json!({
        "multi_match": {
            "query": text,
            "type": "best_fields",
            "operator": "and",
            "fields": fields,
        }
    })
}

fn structured(text: &str, fields: &FieldSet, exact_boost: f64) -> JsonValue {
    let mut should = Vec::with_capacity(2);
    if !fields.analyzed.is_empty() {
        should.push(multi_match(text, &fields.analyzed));
    }
    if !fields.exact.is_empty() {
        let mut exact = multi_match(text, &fields.exact);
        exact["multi_match"]["boost"] = json!(exact_boost);
        should.push(exact);
    }
    json!({ "bool": { "should": should, "minimum_should_match": 1 } })
}

fn query_string(text: &str, fields: &FieldSet) -> JsonValue {
    let searched = if fields.analyzed.is_empty() {
        &fields.exact
    } else {
        &fields.analyzed
    };
    json!({
        "query_string": {
            "query": escape_query_string(text),
            "fields": searched,
            "default_operator": "AND",
            "use_dis_max": true,
        }
    })
}
