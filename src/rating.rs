//! Feedback on card/STE aggregation quality

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::fetch::HttpClient;

/// A rating to submit: `score` is 1 when the STE belongs on the card, 0 when not
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackCreate {
    pub card_id: i64,
    pub ste_id: i64,
    pub score: u8,
}

/// A stored rating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i64,
    pub card_id: i64,
    pub ste_id: i64,
    pub score: u8,
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// Client for the rating endpoints
#[derive(Debug, Clone)]
pub struct RatingClient {
    http: HttpClient,
}

impl RatingClient {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Rate whether an STE belongs on a card.
    ///
    /// Scores other than 0 or 1 are rejected locally.
    pub async fn rate(&self, feedback: &FeedbackCreate) -> Result<Feedback, Error> {
        if feedback.score > 1 {
            return Err(Error::validation(format!(
                "score must be 0 or 1, got {}",
                feedback.score
            )));
        }

        self.http
            .post("/api/rating")
            .json(feedback)?
            .execute::<Feedback>()
            .await
    }

    /// Every rating submitted so far
    pub async fn history(&self) -> Result<Vec<Feedback>, Error> {
        self.http
            .get("/api/rating/history")
            .execute::<Vec<Feedback>>()
            .await
    }
}
