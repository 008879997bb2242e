//! Catalog Admin Client Library
//!
//! A Rust client for the catalog admin REST API: STE records, cards, search,
//! categories, re-aggregation and ratings, plus the auth state derived from the
//! bearer token.

pub mod aggregation;
pub mod auth;
pub mod card;
pub mod categories;
pub mod config;
pub mod error;
pub mod fetch;
pub mod paginate;
pub mod rating;
pub mod search;
pub mod ste;
pub mod store;
pub mod types;

use std::sync::Arc;

use crate::aggregation::AggregationClient;
use crate::auth::{AuthClient, Credentials, MemoryTokenStorage, TokenStorage};
use crate::card::CardClient;
use crate::categories::CategoriesClient;
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::HttpClient;
use crate::rating::RatingClient;
use crate::search::SearchClient;
use crate::ste::SteClient;
use crate::store::{AuthState, AuthStore};

/// The main entry point for the catalog client.
///
/// Owns the HTTP context and the auth store; both share one token storage, so
/// a token adopted by the store is sent with every later request.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: HttpClient,
    auth_store: AuthStore,
    options: ClientOptions,
}

impl CatalogClient {
    /// Create a client with in-memory token storage
    ///
    /// # Example
    ///
    /// ```
    /// use catalog_admin_client::{CatalogClient, config::ClientOptions};
    ///
    /// let client = CatalogClient::new(ClientOptions::default()).unwrap();
    /// assert!(!client.auth_store().is_authenticated());
    /// ```
    pub fn new(options: ClientOptions) -> Result<Self, Error> {
        Self::with_storage(options, Arc::new(MemoryTokenStorage::new()))
    }

    /// Create a client around a caller-provided token storage.
    ///
    /// The auth store is initialized from the storage right away.
    pub fn with_storage(options: ClientOptions, storage: Arc<dyn TokenStorage>) -> Result<Self, Error> {
        let http = HttpClient::new(&options, storage.clone())?;
        let auth_store = AuthStore::new(storage);
        auth_store.init();

        Ok(Self {
            http,
            auth_store,
            options,
        })
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// The shared HTTP context
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// The auth state container
    pub fn auth_store(&self) -> &AuthStore {
        &self.auth_store
    }

    pub fn auth(&self) -> AuthClient {
        AuthClient::new(self.http.clone())
    }

    pub fn ste(&self) -> SteClient {
        SteClient::new(
            self.http.clone(),
            self.options.fetch_all_batch_size,
            self.options.fetch_all_max_pages,
        )
    }

    pub fn cards(&self) -> CardClient {
        CardClient::new(self.http.clone())
    }

    pub fn search(&self) -> SearchClient {
        SearchClient::new(self.http.clone())
    }

    pub fn categories(&self) -> CategoriesClient {
        CategoriesClient::new(self.http.clone())
    }

    pub fn aggregation(&self) -> AggregationClient {
        AggregationClient::new(self.http.clone())
    }

    pub fn ratings(&self) -> RatingClient {
        RatingClient::new(self.http.clone())
    }

    /// Log in and adopt the issued token.
    ///
    /// Fails with [`Error::Auth`] if the backend returns a token that cannot
    /// be decoded or is already expired; the store is left anonymous then.
    pub async fn sign_in(&self, login: &str, password: &str) -> Result<AuthState, Error> {
        let response = self.auth().login(&Credentials::new(login, password)).await?;
        self.auth_store.set_token(Some(&response.access_token));

        let state = self.auth_store.get();
        if !state.is_authenticated() {
            return Err(Error::auth("server issued an invalid or expired token"));
        }
        Ok(state)
    }

    /// Forget the current session
    pub fn sign_out(&self) {
        self.auth_store.logout();
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::{Credentials, FileTokenStorage, MemoryTokenStorage, TokenStorage};
    pub use crate::config::ClientOptions;
    pub use crate::error::{ApiError, Error, Result};
    pub use crate::search::SearchParams;
    pub use crate::ste::{SteCreate, SteListParams, SteUpdate, UploadFile};
    pub use crate::store::{AppStore, AuthState, AuthStore};
    pub use crate::CatalogClient;
}
