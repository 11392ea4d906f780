//! Response shaping.
//!
//! Facet results are located through the paths recorded in each
//! [`PlannedFacet`]. A path that does not resolve (a field missing from the
//! index, an aggregation the backend dropped) yields an empty facet and a
//! schema warning rather than an error.

use groove_query::facets::PRODUCTS_AGG;
use groove_query::{CompiledQuery, FacetDimension, FacetKind, PlannedFacet, SearchCriteria};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_source", default)]
    pub source: JsonValue,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<JsonValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetBucket {
    pub key: String,
    /// Matching products, not variants, for nested facets.
    pub doc_count: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceStats {
    pub count: u64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
    pub sum: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetValues {
    Terms(Vec<FacetBucket>),
    Stats(PriceStats),
}

impl FacetValues {
    fn empty(kind: FacetKind) -> Self {
        match kind {
            FacetKind::Terms => Self::Terms(Vec::new()),
            FacetKind::Stats => Self::Stats(PriceStats::default()),
        }
    }

    pub fn buckets(&self) -> &[FacetBucket] {
        match self {
            Self::Terms(buckets) => buckets,
            Self::Stats(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Facet {
    pub name: String,
    pub dimension: FacetDimension,
    pub values: FacetValues,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub records: Vec<Hit>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub facets: Vec<Facet>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub schema_warnings: Vec<String>,
}

impl SearchResults {
    pub fn from_response(
        body: JsonValue,
        compiled: &CompiledQuery,
        criteria: &SearchCriteria,
    ) -> Result<Self> {
        let raw: RawResponse =
            serde_json::from_value(body).map_err(|e| Error::InvalidResponse(e.to_string()))?;

        let mut schema_warnings = Vec::new();
        let facets = compiled
            .facets
            .iter()
            .map(|planned| read_facet(planned, &raw.aggregations, &mut schema_warnings))
            .collect();

        let total = match raw.hits.total {
            Some(RawTotal::Count(n)) | Some(RawTotal::Object { value: n }) => n,
            None => raw.hits.hits.len() as u64,
        };

        Ok(Self {
            records: raw.hits.hits,
            total,
            page: criteria.page,
            page_size: criteria.page_size,
            facets,
            schema_warnings,
        })
    }

    pub fn facet(&self, name: &str) -> Option<&Facet> {
        self.facets.iter().find(|f| f.name == name)
    }

    pub fn total_pages(&self) -> u64 {
        let size = u64::from(self.page_size.max(1));
        self.total.div_ceil(size)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Deserialize)]
struct RawResponse {
    hits: RawHits,
    #[serde(default)]
    aggregations: Map<String, JsonValue>,
}

#[derive(Deserialize)]
struct RawHits {
    #[serde(default)]
    total: Option<RawTotal>,
    #[serde(default)]
    hits: Vec<Hit>,
}

/// `hits.total` is a bare number on older backends and `{value, relation}`
/// on newer ones.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTotal {
    Count(u64),
    Object { value: u64 },
}

fn read_facet(
    planned: &PlannedFacet,
    aggregations: &Map<String, JsonValue>,
    warnings: &mut Vec<String>,
) -> Facet {
    let values = match resolve(aggregations, &planned.path) {
        Some(leaf) => match planned.kind {
            FacetKind::Terms => read_buckets(planned, leaf, warnings),
            FacetKind::Stats => read_stats(planned, leaf, warnings),
        },
        None => {
            warn_schema(
                warnings,
                planned,
                format!("aggregation path {} missing", planned.path.join(".")),
            );
            FacetValues::empty(planned.kind)
        }
    };

    Facet {
        name: planned.name.clone(),
        dimension: planned.dimension,
        values,
    }
}

fn resolve<'a>(
    aggregations: &'a Map<String, JsonValue>,
    path: &[String],
) -> Option<&'a JsonValue> {
    let (first, rest) = path.split_first()?;
    let mut node = aggregations.get(first)?;
    for name in rest {
        node = node.get(name)?;
    }
    (!node.is_null()).then_some(node)
}

fn read_buckets(
    planned: &PlannedFacet,
    leaf: &JsonValue,
    warnings: &mut Vec<String>,
) -> FacetValues {
    let Some(raw_buckets) = leaf.get("buckets").and_then(JsonValue::as_array) else {
        warn_schema(warnings, planned, "terms aggregation has no buckets".to_string());
        return FacetValues::empty(FacetKind::Terms);
    };

    let buckets = raw_buckets
        .iter()
        .filter_map(|bucket| {
            let key = bucket_key(bucket)?;
            let doc_count = bucket
                .get(PRODUCTS_AGG)
                .and_then(|p| p.get("doc_count"))
                .or_else(|| bucket.get("doc_count"))
                .and_then(JsonValue::as_u64)
                .unwrap_or(0);
            Some(FacetBucket { key, doc_count })
        })
        .collect();
    FacetValues::Terms(buckets)
}

fn bucket_key(bucket: &JsonValue) -> Option<String> {
    if let Some(text) = bucket.get("key_as_string").and_then(JsonValue::as_str) {
        return Some(text.to_string());
    }
    match bucket.get("key")? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn read_stats(
    planned: &PlannedFacet,
    leaf: &JsonValue,
    warnings: &mut Vec<String>,
) -> FacetValues {
    match serde_json::from_value::<PriceStats>(leaf.clone()) {
        Ok(stats) => FacetValues::Stats(stats),
        Err(e) => {
            warn_schema(warnings, planned, format!("unreadable stats aggregation: {}", e));
            FacetValues::empty(FacetKind::Stats)
        }
    }
}

fn warn_schema(warnings: &mut Vec<String>, planned: &PlannedFacet, detail: String) {
    tracing::warn!(facet = %planned.name, detail = %detail, "Facet does not match index schema");
    warnings.push(format!("{}: {}", planned.name, detail));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn terms_facet(path: &[&str]) -> PlannedFacet {
        PlannedFacet {
            name: path[0].to_string(),
            dimension: FacetDimension::Genre,
            kind: FacetKind::Terms,
            path: path.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn bucket_count_prefers_reverse_nested_products() {
        let aggs = json!({
            "formats": { "matching": { "values": { "buckets": [
                { "key": "lp", "doc_count": 12, "products": { "doc_count": 5 } },
                { "key": 7, "doc_count": 3 }
            ] } } }
        });
        let mut warnings = Vec::new();
        let facet = read_facet(
            &terms_facet(&["formats", "matching", "values"]),
            aggs.as_object().unwrap(),
            &mut warnings,
        );
        assert_eq!(
            facet.values.buckets(),
            &[
                FacetBucket { key: "lp".to_string(), doc_count: 5 },
                FacetBucket { key: "7".to_string(), doc_count: 3 },
            ]
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn missing_or_null_aggregations_become_warnings() {
        let aggs = json!({ "genre_ids": null });
        let mut warnings = Vec::new();
        let facet = read_facet(
            &terms_facet(&["genre_ids"]),
            aggs.as_object().unwrap(),
            &mut warnings,
        );
        assert!(facet.values.buckets().is_empty());
        assert_eq!(warnings.len(), 1);

        let facet = read_facet(
            &terms_facet(&["taxon_ids"]),
            aggs.as_object().unwrap(),
            &mut warnings,
        );
        assert!(facet.values.buckets().is_empty());
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn stats_with_no_documents_have_null_bounds() {
        let planned = PlannedFacet {
            name: "price".to_string(),
            dimension: FacetDimension::Price,
            kind: FacetKind::Stats,
            path: vec!["price".to_string()],
        };
        let aggs = json!({
            "price": { "count": 0, "min": null, "max": null, "avg": null, "sum": 0.0 }
        });
        let mut warnings = Vec::new();
        let facet = read_facet(&planned, aggs.as_object().unwrap(), &mut warnings);
        assert_eq!(facet.values, FacetValues::Stats(PriceStats::default()));
        assert!(warnings.is_empty());
    }
}
