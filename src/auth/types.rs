//! Types for authentication

use serde::{Deserialize, Serialize};

/// Login and registration credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl Credentials {
    pub fn new(login: &str, password: &str) -> Self {
        Self {
            login: login.to_string(),
            password: password.to_string(),
        }
    }
}

/// Token issued by a successful login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The bearer token
    pub access_token: String,

    /// The token type, `bearer`
    pub token_type: String,
}
