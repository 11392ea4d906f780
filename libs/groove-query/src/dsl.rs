//! Small constructors for query DSL fragments.

use serde_json::{json, Map, Value as JsonValue};

pub(crate) fn match_all() -> JsonValue {
    json!({ "match_all": {} })
}

pub(crate) fn term(field: &str, value: impl Into<JsonValue>) -> JsonValue {
    let value: JsonValue = value.into();
    json!({ "term": { field: value } })
}

pub(crate) fn terms<I, S>(field: &str, values: I) -> JsonValue
where
    I: IntoIterator<Item = S>,
    S: Into<JsonValue>,
{
    let values: Vec<JsonValue> = values.into_iter().map(Into::into).collect();
    json!({ "terms": { field: values } })
}

pub(crate) fn range(field: &str, bounds: Map<String, JsonValue>) -> JsonValue {
    json!({ "range": { field: bounds } })
}

pub(crate) fn range_gte(field: &str, value: impl Into<JsonValue>) -> JsonValue {
    let mut bounds = Map::new();
    bounds.insert("gte".to_string(), value.into());
    range(field, bounds)
}

pub(crate) fn range_lte(field: &str, value: impl Into<JsonValue>) -> JsonValue {
    let mut bounds = Map::new();
    bounds.insert("lte".to_string(), value.into());
    range(field, bounds)
}

pub(crate) fn missing(field: &str) -> JsonValue {
    json!({ "bool": { "must_not": [ { "exists": { "field": field } } ] } })
}

pub(crate) fn bool_filter(predicates: &[JsonValue]) -> JsonValue {
    json!({ "bool": { "filter": predicates } })
}

pub(crate) fn filtered(query: JsonValue, filters: Vec<JsonValue>) -> JsonValue {
    json!({ "bool": { "must": [query], "filter": filters } })
}

pub(crate) fn nested(path: &str, predicates: &[JsonValue]) -> JsonValue {
    json!({ "nested": { "path": path, "query": bool_filter(predicates) } })
}
