//! Read-only category listing

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::fetch::HttpClient;

/// A product category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Client for the categories endpoint
#[derive(Debug, Clone)]
pub struct CategoriesClient {
    http: HttpClient,
}

impl CategoriesClient {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// All categories known to the backend
    pub async fn list(&self) -> Result<Vec<Category>, Error> {
        self.http
            .get("/api/categories")
            .execute::<Vec<Category>>()
            .await
    }
}
