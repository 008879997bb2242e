#![allow(dead_code)]

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use catalog_admin_client::auth::{MemoryTokenStorage, TokenStorage};
use catalog_admin_client::config::ClientOptions;
use catalog_admin_client::CatalogClient;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};

pub fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// HS256 token shaped like the ones the backend issues
pub fn mint_token(sub: &str, login: &str, is_admin: bool, exp: Option<i64>) -> String {
    let mut claims = json!({
        "sub": sub,
        "login": login,
        "is_admin": is_admin,
        "iat": now_secs(),
    });
    if let Some(exp) = exp {
        claims["exp"] = json!(exp);
    }
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"test-secret")).unwrap()
}

pub fn admin_token() -> String {
    mint_token("1", "admin", true, Some(now_secs() + 3600))
}

pub fn expired_token() -> String {
    mint_token("2", "stale", false, Some(now_secs() - 60))
}

pub fn client_for(uri: &str) -> CatalogClient {
    CatalogClient::new(ClientOptions::default().with_base_url(uri)).unwrap()
}

pub fn client_with_storage(uri: &str, storage: Arc<dyn TokenStorage>) -> CatalogClient {
    CatalogClient::with_storage(ClientOptions::default().with_base_url(uri), storage).unwrap()
}

/// A client that already holds a valid admin token
pub fn signed_in_client(uri: &str) -> (CatalogClient, String) {
    let token = admin_token();
    let client = client_with_storage(uri, Arc::new(MemoryTokenStorage::with_token(&token)));
    (client, token)
}

pub fn ste_json(id: i64) -> Value {
    json!({
        "id": id,
        "name": format!("STE {}", id),
        "category_id": 3,
        "characteristics": {"Weight": id},
        "card_id": null
    })
}

pub fn ste_page(range: std::ops::Range<i64>) -> Value {
    Value::Array(range.map(ste_json).collect())
}
