//! Types for STE records

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;
use std::fmt;

/// A single characteristic value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacteristicValue {
    Bool(bool),
    Number(Number),
    Text(String),
}

impl fmt::Display for CharacteristicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharacteristicValue::Bool(b) => write!(f, "{}", b),
            CharacteristicValue::Number(n) => write!(f, "{}", n),
            CharacteristicValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CharacteristicValue {
    fn from(value: &str) -> Self {
        CharacteristicValue::Text(value.to_string())
    }
}

impl From<String> for CharacteristicValue {
    fn from(value: String) -> Self {
        CharacteristicValue::Text(value)
    }
}

impl From<bool> for CharacteristicValue {
    fn from(value: bool) -> Self {
        CharacteristicValue::Bool(value)
    }
}

impl From<i64> for CharacteristicValue {
    fn from(value: i64) -> Self {
        CharacteristicValue::Number(value.into())
    }
}

/// Characteristic name to scalar value.
///
/// Only scalars are kept when reading server data: `null`, arrays and nested
/// objects are dropped instead of failing the whole record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Characteristics(BTreeMap<String, CharacteristicValue>);

impl Characteristics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<CharacteristicValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<CharacteristicValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&CharacteristicValue> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CharacteristicValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Characteristics {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
        let mut map = BTreeMap::new();
        for (name, value) in raw {
            let scalar = match value {
                Value::Bool(b) => CharacteristicValue::Bool(b),
                Value::Number(n) => CharacteristicValue::Number(n),
                Value::String(s) => CharacteristicValue::Text(s),
                other => {
                    log::debug!("dropping non-scalar characteristic {:?}: {}", name, other);
                    continue;
                }
            };
            map.insert(name, scalar);
        }
        Ok(Self(map))
    }
}

/// An STE record as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ste {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub characteristics: Characteristics,
    #[serde(default)]
    pub card_id: Option<i64>,

    /// Id in the imported source spreadsheet
    #[serde(default)]
    pub external_id: Option<i64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub country_of_origin: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
}

/// Payload for creating an STE record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SteCreate {
    pub name: String,
    pub category_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub characteristics: Option<Characteristics>,
}

impl SteCreate {
    pub fn new(name: &str, category_id: i64) -> Self {
        Self {
            name: name.to_string(),
            category_id,
            description: None,
            characteristics: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_characteristics(mut self, characteristics: Characteristics) -> Self {
        self.characteristics = Some(characteristics);
        self
    }
}

/// Partial update for an STE record; unset fields are left untouched.
///
/// `card_id` distinguishes "leave as is" (`None`) from "detach from its card"
/// (`Some(None)`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SteUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub characteristics: Option<Characteristics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_id: Option<Option<i64>>,
}

impl SteUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_characteristics(mut self, characteristics: Characteristics) -> Self {
        self.characteristics = Some(characteristics);
        self
    }

    pub fn with_card(mut self, card_id: Option<i64>) -> Self {
        self.card_id = Some(card_id);
        self
    }
}

/// Filters for listing STE records
#[derive(Debug, Clone, PartialEq)]
pub struct SteListParams {
    /// Free-text query, sent as `q`; empty means no query
    pub query: Option<String>,
    /// Category filter; the endpoint takes one id, so only the first is sent
    pub category_ids: Vec<i64>,
    pub limit: usize,
    pub skip: usize,
    pub fuzzy: Option<bool>,
}

impl Default for SteListParams {
    fn default() -> Self {
        Self {
            query: None,
            category_ids: Vec::new(),
            limit: 100,
            skip: 0,
            fuzzy: None,
        }
    }
}

impl SteListParams {
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

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn with_fuzzy(mut self, fuzzy: bool) -> Self {
        self.fuzzy = Some(fuzzy);
        self
    }

    pub(crate) fn to_query(&self) -> Vec<(String, String)> {
        let mut params = filter_query(self.query.as_deref(), &self.category_ids, self.fuzzy);
        params.push(("limit".to_string(), self.limit.to_string()));
        params.push(("skip".to_string(), self.skip.to_string()));
        params
    }
}

/// `q`, `category_id` and `fuzzy` parameters shared by the admin listings
pub(crate) fn filter_query(query: Option<&str>, category_ids: &[i64], fuzzy: Option<bool>) -> Vec<(String, String)> {
    let mut params = Vec::new();
    if let Some(q) = query.filter(|q| !q.is_empty()) {
        params.push(("q".to_string(), q.to_string()));
    }
    if let Some(first) = category_ids.first() {
        params.push(("category_id".to_string(), first.to_string()));
    }
    if let Some(fuzzy) = fuzzy {
        params.push(("fuzzy".to_string(), fuzzy.to_string()));
    }
    params
}

/// Result of a spreadsheet import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadSummary {
    pub msg: String,
    #[serde(default)]
    pub created: Option<u64>,
    #[serde(default)]
    pub updated: Option<u64>,
}
