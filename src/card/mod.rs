//! Cards: admin CRUD and the public card/STE relation lookup

mod types;

use crate::error::Error;
use crate::fetch::HttpClient;
use crate::ste::Ste;
use crate::types::MessageResponse;

pub use types::*;

/// Client for the card endpoints
#[derive(Debug, Clone)]
pub struct CardClient {
    http: HttpClient,
}

impl CardClient {
    /// Create a new CardClient
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// List cards
    pub async fn list(&self, params: &CardListParams) -> Result<Vec<Card>, Error> {
        self.http
            .get("/api/admin/card/")
            .query_pairs(params.to_query())
            .execute::<Vec<Card>>()
            .await
    }

    /// Get a card by id
    pub async fn get(&self, id: i64) -> Result<Card, Error> {
        self.http
            .get(&format!("/api/admin/card/{}", id))
            .execute::<Card>()
            .await
    }

    /// Create a card
    pub async fn create(&self, data: &CardCreate) -> Result<Card, Error> {
        self.http
            .post("/api/admin/card/")
            .json(data)?
            .execute::<Card>()
            .await
    }

    /// Update a card
    pub async fn update(&self, id: i64, data: &CardUpdate) -> Result<Card, Error> {
        self.http
            .patch(&format!("/api/admin/card/{}", id))
            .json(data)?
            .execute::<Card>()
            .await
    }

    /// Delete a card; its STE records are detached, not deleted
    pub async fn delete(&self, id: i64) -> Result<MessageResponse, Error> {
        self.http
            .delete(&format!("/api/admin/card/{}", id))
            .execute::<MessageResponse>()
            .await
    }

    /// The STE record if it belongs to the card; a 404 otherwise
    pub async fn ste_relation(&self, card_id: i64, ste_id: i64) -> Result<Ste, Error> {
        self.http
            .get(&format!("/api/card/{}/{}", card_id, ste_id))
            .execute::<Ste>()
            .await
    }
}
