//! Sort resolution.
//!
//! Date and stock sorts read a value from the nested variants. Those sorts
//! carry the same predicate list as the filter, so the variant picked for the
//! sort value is always one that passed the filter.

use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value as JsonValue};

use super::nested::VariantPredicates;
use crate::criteria::SortKey;
use crate::dsl;
use crate::fields;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Which nested value a multi-valued sort picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    Min,
    Max,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NestedSort {
    pub path: String,
    pub predicates: Arc<[JsonValue]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSort {
    pub field: String,
    pub order: SortOrder,
    pub mode: Option<SortMode>,
    pub nested: Option<NestedSort>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SortSpec {
    Score,
    Field(FieldSort),
}

impl SortSpec {
    fn field(field: &str, order: SortOrder) -> Self {
        Self::Field(FieldSort {
            field: field.to_string(),
            order,
            mode: None,
            nested: None,
        })
    }

    fn variant(
        field: &str,
        order: SortOrder,
        mode: SortMode,
        variants: &VariantPredicates,
    ) -> Self {
        Self::Field(FieldSort {
            field: field.to_string(),
            order,
            mode: Some(mode),
            nested: Some(NestedSort {
                path: fields::RELEASE_FORMATS.to_string(),
                predicates: variants.shared(),
            }),
        })
    }

    pub fn is_score(&self) -> bool {
        matches!(self, Self::Score)
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Score => JsonValue::String(fields::SCORE.to_string()),
            Self::Field(sort) => {
                let mut spec = Map::new();
                spec.insert("order".to_string(), json!(sort.order.as_str()));
                if let Some(mode) = sort.mode {
                    spec.insert("mode".to_string(), json!(mode.as_str()));
                }
                if let Some(nested) = &sort.nested {
                    spec.insert(
                        "nested".to_string(),
                        json!({
                            "path": nested.path,
                            "filter": dsl::bool_filter(&nested.predicates),
                        }),
                    );
                }
                let mut out = Map::new();
                out.insert(sort.field.clone(), JsonValue::Object(spec));
                JsonValue::Object(out)
            }
        }
    }
}

impl Serialize for SortSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

pub fn resolve_sort(key: SortKey, variants: &VariantPredicates) -> Vec<SortSpec> {
    use SortOrder::{Asc, Desc};

    match key {
        SortKey::NameAsc | SortKey::NameDesc => {
            let order = if key == SortKey::NameAsc { Asc } else { Desc };
            vec![
                SortSpec::field(fields::NAME_UNTOUCHED, order),
                SortSpec::field(fields::PRICE, Asc),
                SortSpec::Score,
            ]
        }
        SortKey::PriceAsc | SortKey::PriceDesc => {
            let order = if key == SortKey::PriceAsc { Asc } else { Desc };
            vec![
                SortSpec::field(fields::PRICE, order),
                SortSpec::field(fields::NAME_UNTOUCHED, Asc),
                SortSpec::Score,
            ]
        }
        SortKey::PreOrder | SortKey::Oldest => vec![
            SortSpec::variant(fields::VARIANT_RELEASE_DATE, Asc, SortMode::Min, variants),
            SortSpec::Score,
        ],
        SortKey::Newest => vec![
            SortSpec::variant(fields::VARIANT_RELEASE_DATE, Desc, SortMode::Max, variants),
            SortSpec::Score,
        ],
        SortKey::Relevance => vec![
            SortSpec::Score,
            SortSpec::field(fields::NAME_UNTOUCHED, Asc),
            SortSpec::field(fields::PRICE, Asc),
        ],
        SortKey::Discount => vec![
            SortSpec::field(fields::DISCOUNT_RATE, Desc),
            SortSpec::Score,
        ],
        SortKey::Popularity => vec![
            SortSpec::field(fields::POPULARITY_SCORE, Desc),
            SortSpec::Score,
        ],
        SortKey::Default => vec![
            SortSpec::variant(fields::VARIANT_IN_STOCK, Desc, SortMode::Max, variants),
            SortSpec::Score,
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Clock;
    use crate::compiler::nested::variant_predicates;
    use crate::config::CompilerConfig;
    use crate::criteria::SearchCriteria;

    fn variants() -> VariantPredicates {
        variant_predicates(
            &SearchCriteria::default(),
            &CompilerConfig::default(),
            &Clock::Relative,
        )
    }

    #[test]
    fn name_sort_tiebreaks_on_price_then_score() {
        let sort: Vec<JsonValue> = resolve_sort(SortKey::NameDesc, &variants())
            .iter()
            .map(SortSpec::to_json)
            .collect();
        assert_eq!(
            sort,
            vec![
                json!({ "name.untouched": { "order": "desc" } }),
                json!({ "price": { "order": "asc" } }),
                json!("_score"),
            ]
        );
    }

    #[test]
    fn newest_sorts_on_latest_variant_within_filter_scope() {
        let v = variants();
        let sort = resolve_sort(SortKey::Newest, &v);
        let first = sort[0].to_json();
        let spec = &first["release_formats.release_date"];
        assert_eq!(spec["order"], "desc");
        assert_eq!(spec["mode"], "max");
        assert_eq!(spec["nested"]["path"], "release_formats");
        assert_eq!(
            spec["nested"]["filter"]["bool"]["filter"].as_array().unwrap().as_slice(),
            v.as_slice()
        );
        assert!(sort[1].is_score());
    }

    #[test]
    fn variant_sorts_share_the_filter_predicates() {
        let v = variants();
        for key in [SortKey::PreOrder, SortKey::Oldest, SortKey::Newest, SortKey::Default] {
            match &resolve_sort(key, &v)[0] {
                SortSpec::Field(FieldSort {
                    nested: Some(nested),
                    ..
                }) => assert!(Arc::ptr_eq(&nested.predicates, &v.shared())),
                other => panic!("expected nested sort for {:?}, got {:?}", key, other),
            }
        }
    }

    #[test]
    fn relevance_sort_leads_with_score() {
        let sort = resolve_sort(SortKey::Relevance, &variants());
        assert!(sort[0].is_score());
        assert_eq!(sort.len(), 3);
    }

    #[test]
    fn ranking_sorts_are_product_level_then_score() {
        for (key, field) in [
            (SortKey::Discount, "discount_rate"),
            (SortKey::Popularity, "popularity_score"),
        ] {
            let sort: Vec<JsonValue> = resolve_sort(key, &variants())
                .iter()
                .map(SortSpec::to_json)
                .collect();
            assert_eq!(sort, vec![json!({ field: { "order": "desc" } }), json!("_score")]);
        }
    }
}
