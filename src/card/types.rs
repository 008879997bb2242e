//! Types for cards

use serde::{Deserialize, Serialize};

use crate::ste::{filter_query, Ste};

/// A card grouping zero or more STE records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub stes: Vec<Ste>,
}

/// Payload for creating a card
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// STE records to attach to the new card
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ste_ids: Option<Vec<i64>>,
}

impl CardCreate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_stes(mut self, ste_ids: &[i64]) -> Self {
        self.ste_ids = Some(ste_ids.to_vec());
        self
    }
}

/// Partial update for a card
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Filters for listing cards
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardListParams {
    pub query: Option<String>,
    /// Only the first id is sent
    pub category_ids: Vec<i64>,
    pub fuzzy: Option<bool>,
}

impl CardListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: &str) -> Self {
        self.query = Some(query.to_string());
        self
    }

    pub fn with_categories(mut self, category_ids: &[i64]) -> Self {
        self.category_ids = category_ids.to_vec();
        self
    }

    pub fn with_fuzzy(mut self, fuzzy: bool) -> Self {
        self.fuzzy = Some(fuzzy);
        self
    }

    pub(crate) fn to_query(&self) -> Vec<(String, String)> {
        filter_query(self.query.as_deref(), &self.category_ids, self.fuzzy)
    }
}
