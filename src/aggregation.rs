//! Re-aggregation jobs
//!
//! Re-aggregation recomputes which card each STE belongs to. It runs either
//! for an explicit set of STE ids or for the whole catalog.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::fetch::HttpClient;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaggregateRequest {
    pub ste_ids: Vec<i64>,
}

/// Outcome of a re-aggregation run, as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaggregateResponse {
    pub status: String,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub updated: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Client for the re-aggregation endpoints
#[derive(Debug, Clone)]
pub struct AggregationClient {
    http: HttpClient,
}

impl AggregationClient {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Re-aggregate the given STE records
    pub async fn reaggregate(&self, ste_ids: &[i64]) -> Result<ReaggregateResponse, Error> {
        let body = ReaggregateRequest {
            ste_ids: ste_ids.to_vec(),
        };
        self.http
            .post("/api/admin/reaggregate")
            .json(&body)?
            .execute::<ReaggregateResponse>()
            .await
    }

    /// Re-aggregate every STE record
    pub async fn reaggregate_all(&self) -> Result<ReaggregateResponse, Error> {
        self.http
            .post("/api/admin/reaggregate/all")
            .execute::<ReaggregateResponse>()
            .await
    }

    /// Re-aggregate `ste_ids`, or everything when `None`
    pub async fn reaggregate_selection(&self, ste_ids: Option<&[i64]>) -> Result<ReaggregateResponse, Error> {
        match ste_ids {
            Some(ids) => self.reaggregate(ids).await,
            None => self.reaggregate_all().await,
        }
    }
}
