use groove_query::{Clock, QueryCompiler, SearchCriteria};

use crate::backend::{SearchBackend, SearchRequest};
use crate::error::Result;
use crate::results::SearchResults;

/// Compiles criteria, runs one page against the backend and shapes the result.
pub struct Searcher<B> {
    compiler: QueryCompiler,
    backend: B,
}

impl<B: SearchBackend> Searcher<B> {
    pub fn new(compiler: QueryCompiler, backend: B) -> Self {
        Self { compiler, backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The request `search_at` would send, without sending it.
    pub fn request_for(&self, criteria: &SearchCriteria, clock: Clock) -> SearchRequest {
        SearchRequest {
            query: self.compiler.compile_at(criteria, clock),
            from: criteria.offset(),
            size: criteria.page_size,
        }
    }

    pub async fn search(&self, criteria: &SearchCriteria) -> Result<SearchResults> {
        self.search_at(criteria, Clock::Relative).await
    }

    #[tracing::instrument(
        name = "catalog_search",
        skip_all,
        fields(
            page = criteria.page,
            page_size = criteria.page_size,
            sort = criteria.sort_key.as_str()
        )
    )]
    pub async fn search_at(
        &self,
        criteria: &SearchCriteria,
        clock: Clock,
    ) -> Result<SearchResults> {
        let request = self.request_for(criteria, clock);
        let body = self.backend.execute(&request).await?;
        let results = SearchResults::from_response(body, &request.query, criteria)?;

        tracing::debug!(
            total = results.total,
            returned = results.records.len(),
            warnings = results.schema_warnings.len(),
            "Search completed"
        );
        Ok(results)
    }
}
