#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use groove_query::{Clock, CompiledQuery, CompilerConfig, QueryCompiler, SearchCriteria};
use serde_json::Value;

pub fn params(pairs: &[(&str, &str)]) -> SearchCriteria {
    let items: Vec<(String, String)> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    SearchCriteria::from_items(&items)
}

pub fn compile(criteria: &SearchCriteria) -> CompiledQuery {
    QueryCompiler::new(CompilerConfig::default()).compile(criteria)
}

pub fn compile_with(criteria: &SearchCriteria, config: CompilerConfig) -> CompiledQuery {
    QueryCompiler::new(config).compile(criteria)
}

/// 2024-06-15T13:30:00Z
pub fn fixed_clock() -> Clock {
    Clock::fixed(Utc.with_ymd_and_hms(2024, 6, 15, 13, 30, 0).unwrap())
}

/// The filtered query, looking through the recency boost if present.
pub fn filtered_query(body: &Value) -> &Value {
    let query = &body["query"];
    if query.get("function_score").is_some() {
        &query["function_score"]["query"]
    } else {
        query
    }
}

pub fn top_level_filters(body: &Value) -> &Vec<Value> {
    filtered_query(body)["bool"]["filter"]
        .as_array()
        .expect("filter list")
}

pub fn relevance(body: &Value) -> &Value {
    &filtered_query(body)["bool"]["must"][0]
}

pub fn nested_predicates(body: &Value) -> &Vec<Value> {
    top_level_filters(body)
        .iter()
        .find_map(|f| f.get("nested"))
        .expect("nested filter")["query"]["bool"]["filter"]
        .as_array()
        .expect("nested predicate list")
}
