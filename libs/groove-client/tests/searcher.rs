mod support;

use groove_client::{Error, FacetValues, Searcher};
use groove_query::{QueryCompiler, SearchCriteria};
use serde_json::json;
use support::*;

fn searcher(backend: FakeBackend) -> Searcher<FakeBackend> {
    Searcher::new(QueryCompiler::default(), backend)
}

#[tokio::test]
async fn requests_the_page_window() {
    let s = searcher(FakeBackend::returning(empty_response()));
    let criteria = SearchCriteria::from_items(&items(&[("page", "3"), ("per_page", "20")]));

    let results = s.search(&criteria).await.unwrap();
    assert_eq!((results.page, results.page_size), (3, 20));

    let sent = s.backend().requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["from"], 40);
    assert_eq!(sent[0]["size"], 20);
    assert_eq!(sent[0]["min_score"], 0.1);
}

#[tokio::test]
async fn zero_matches_is_an_empty_page() {
    let s = searcher(FakeBackend::returning(empty_response()));
    let results = s.search(&SearchCriteria::default()).await.unwrap();

    assert!(results.is_empty());
    assert_eq!(results.total, 0);
    assert_eq!(results.total_pages(), 0);
    assert_eq!(results.facets.len(), 4);
    assert!(results.schema_warnings.is_empty());
    assert!(results.facet("taxon_ids").unwrap().values.buckets().is_empty());
}

#[tokio::test]
async fn shapes_hits_and_facets() {
    let response = json!({
        "hits": {
            "total": 2,
            "hits": [
                { "_id": "101", "_score": 1.5, "_source": { "name": "Blue Train" }, "sort": [true, 1.5] },
                { "_id": "102", "_score": null, "_source": { "name": "Giant Steps" } }
            ]
        },
        "aggregations": {
            "taxon_ids": { "global": {}, "doc_count": 900, "scoped": { "doc_count": 40, "values": { "buckets": [
                { "key": "42", "doc_count": 30 }, { "key": "7", "doc_count": 10 }
            ] } } },
            "genre_ids": { "buckets": [ { "key": "jazz", "doc_count": 2 } ] },
            "formats": { "doc_count": 6, "matching": { "doc_count": 4, "values": { "buckets": [
                { "key": "lp", "doc_count": 3, "products": { "doc_count": 2 } }
            ] } } },
            "price": { "count": 2, "min": 18.0, "max": 24.5, "avg": 21.25, "sum": 42.5 }
        }
    });
    let s = searcher(FakeBackend::returning(response));
    let criteria = SearchCriteria::from_items(&items(&[("taxon", "42")]));
    let results = s.search(&criteria).await.unwrap();

    assert_eq!(results.total, 2);
    assert_eq!(results.records[0].id, "101");
    assert_eq!(results.records[0].sort, vec![json!(true), json!(1.5)]);
    assert_eq!(results.records[1].score, None);

    let catalog = results.facet("taxon_ids").unwrap().values.buckets();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog[0].doc_count, 30);

    assert_eq!(results.facet("formats").unwrap().values.buckets()[0].doc_count, 2);
    match &results.facet("price").unwrap().values {
        FacetValues::Stats(stats) => {
            assert_eq!(stats.count, 2);
            assert_eq!(stats.max, Some(24.5));
        }
        other => panic!("expected stats, got {:?}", other),
    }
    assert!(results.schema_warnings.is_empty());
}

#[tokio::test]
async fn missing_aggregations_are_schema_warnings() {
    let response = json!({
        "hits": { "total": { "value": 1 }, "hits": [ { "_id": "7", "_source": {} } ] },
        "aggregations": { "taxon_ids": { "buckets": null } }
    });
    let s = searcher(FakeBackend::returning(response));
    let results = s.search(&SearchCriteria::default()).await.unwrap();

    assert_eq!(results.total, 1);
    assert_eq!(results.schema_warnings.len(), 4);
    assert!(results.facets.iter().all(|f| match &f.values {
        FacetValues::Terms(buckets) => buckets.is_empty(),
        FacetValues::Stats(stats) => stats.count == 0,
    }));
}

#[tokio::test]
async fn backend_errors_propagate() {
    let s = searcher(FakeBackend::rejecting(400, "parsing_exception"));
    match s.search(&SearchCriteria::default()).await {
        Err(Error::QueryExecution { status, body }) => {
            assert_eq!(status, 400);
            assert_eq!(body, "parsing_exception");
        }
        other => panic!("expected query execution error, got {:?}", other),
    }

    let s = searcher(FakeBackend::unavailable());
    assert!(matches!(
        s.search(&SearchCriteria::default()).await,
        Err(Error::BackendUnavailable(_))
    ));
}

#[tokio::test]
async fn unparseable_body_is_invalid_response() {
    let s = searcher(FakeBackend::returning(json!({ "error": "no hits here" })));
    assert!(matches!(
        s.search(&SearchCriteria::default()).await,
        Err(Error::InvalidResponse(_))
    ));
}
