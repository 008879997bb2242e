//! Authentication: login/registration endpoints, token decoding and token storage

mod storage;
mod token;
mod types;

use crate::error::Error;
use crate::fetch::HttpClient;
use crate::types::MessageResponse;

pub use storage::*;
pub use token::*;
pub use types::*;

/// Client for the authentication endpoints
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: HttpClient,
}

impl AuthClient {
    /// Create a new AuthClient
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Exchange credentials for a bearer token.
    ///
    /// This does not store the token; see `CatalogClient::sign_in`.
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, Error> {
        self.http
            .post("/api/auth/login")
            .json(credentials)?
            .execute::<TokenResponse>()
            .await
    }

    /// Register a new user
    pub async fn register(&self, credentials: &Credentials) -> Result<MessageResponse, Error> {
        self.http
            .post("/api/auth/register")
            .json(credentials)?
            .execute::<MessageResponse>()
            .await
    }
}
