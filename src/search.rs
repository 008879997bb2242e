//! Public paginated STE search

use crate::error::Error;
use crate::fetch::HttpClient;
use crate::ste::Ste;
use crate::types::Paginated;

/// Parameters for `/api/search`.
///
/// Only parameters that differ from the server defaults are sent: `exact`
/// when true, `page`/`per_page` when non-zero, `category_id` when set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchParams {
    pub query: String,
    pub exact: bool,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub category_id: Option<i64>,
    /// Fuzzy matching; ignored by the server when `exact` is set
    pub fuzzy: Option<bool>,
}

impl SearchParams {
    pub fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            ..Self::default()
        }
    }

    pub fn exact(mut self, exact: bool) -> Self {
        self.exact = exact;
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn category(mut self, category_id: Option<i64>) -> Self {
        self.category_id = category_id;
        self
    }

    /// Filter by the first of several categories; the endpoint takes one
    pub fn categories(mut self, category_ids: &[i64]) -> Self {
        self.category_id = category_ids.first().copied();
        self
    }

    pub fn fuzzy(mut self, fuzzy: bool) -> Self {
        self.fuzzy = Some(fuzzy);
        self
    }

    fn to_query(&self) -> Vec<(String, String)> {
        let mut params = vec![("query".to_string(), self.query.clone())];
        if self.exact {
            params.push(("exact".to_string(), "true".to_string()));
        }
        if let Some(page) = self.page.filter(|p| *p > 0) {
            params.push(("page".to_string(), page.to_string()));
        }
        if let Some(per_page) = self.per_page.filter(|p| *p > 0) {
            params.push(("per_page".to_string(), per_page.to_string()));
        }
        if let Some(category_id) = self.category_id {
            params.push(("category_id".to_string(), category_id.to_string()));
        }
        if let Some(fuzzy) = self.fuzzy {
            params.push(("fuzzy".to_string(), fuzzy.to_string()));
        }
        params
    }
}

/// Client for the search endpoint
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: HttpClient,
}

impl SearchClient {
    /// Create a new SearchClient
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Search STE records, one page at a time
    pub async fn search(&self, params: &SearchParams) -> Result<Paginated<Ste>, Error> {
        self.http
            .get("/api/search")
            .query_pairs(params.to_query())
            .execute::<Paginated<Ste>>()
            .await
    }
}
