//! HTTP client abstraction for making requests to the catalog API

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{multipart, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use url::Url;

use crate::auth::TokenStorage;
use crate::config::ClientOptions;
use crate::error::{ApiError, ApiErrorBody, Error};

/// Shared request context: base URL, connection pool and token slot.
///
/// Cheap to clone; every resource client holds one.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: Client,
    storage: Arc<dyn TokenStorage>,
}

impl HttpClient {
    /// Create a new HttpClient
    pub fn new(options: &ClientOptions, storage: Arc<dyn TokenStorage>) -> Result<Self, Error> {
        let mut builder = Client::builder().user_agent(options.user_agent.clone());
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self::with_client(&options.base_url, builder.build()?, storage))
    }

    /// Create a new HttpClient around an existing reqwest client
    pub fn with_client(base_url: &str, client: Client, storage: Arc<dyn TokenStorage>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            storage,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn storage(&self) -> &Arc<dyn TokenStorage> {
        &self.storage
    }

    /// Full URL for an endpoint path
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Start a request against an endpoint path
    pub fn request(&self, method: Method, endpoint: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, endpoint, method)
    }

    /// Create a GET request
    pub fn get(&self, endpoint: &str) -> FetchBuilder<'_> {
        self.request(Method::GET, endpoint)
    }

    /// Create a POST request
    pub fn post(&self, endpoint: &str) -> FetchBuilder<'_> {
        self.request(Method::POST, endpoint)
    }

    /// Create a PATCH request
    pub fn patch(&self, endpoint: &str) -> FetchBuilder<'_> {
        self.request(Method::PATCH, endpoint)
    }

    /// Create a DELETE request
    pub fn delete(&self, endpoint: &str) -> FetchBuilder<'_> {
        self.request(Method::DELETE, endpoint)
    }
}

enum Body {
    Json(Vec<u8>),
    Multipart(multipart::Form),
}

/// Helper for building and executing HTTP requests.
///
/// Headers start as `Content-Type: application/json` plus the bearer token when
/// one is stored; headers added by the caller are applied afterwards and
/// replace earlier values with the same name.
pub struct FetchBuilder<'a> {
    http: &'a HttpClient,
    endpoint: String,
    method: Method,
    headers: HeaderMap,
    query_params: Vec<(String, String)>,
    body: Option<Body>,
    invalid_header: Option<Error>,
    caller_content_type: bool,
}

impl<'a> FetchBuilder<'a> {
    /// Create a new FetchBuilder
    pub fn new(http: &'a HttpClient, endpoint: &str, method: Method) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = http.storage.get() {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => log::warn!("stored token is not a valid header value; sending request without it"),
            }
        }

        Self {
            http,
            endpoint: endpoint.to_string(),
            method,
            headers,
            query_params: Vec::new(),
            body: None,
            invalid_header: None,
            caller_content_type: false,
        }
    }

    /// Add a header to the request, replacing any earlier value.
    ///
    /// A caller-set `Content-Type` is kept even if [`multipart`](Self::multipart)
    /// is called afterwards.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                self.caller_content_type |= name == CONTENT_TYPE;
                self.headers.insert(name, value);
            }
            _ => {
                self.invalid_header
                    .get_or_insert_with(|| Error::validation(format!("invalid header {:?}", name)));
            }
        }
        self
    }

    /// Add a query parameter; parameters keep insertion order
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query_params.push((key.to_string(), value.to_string()));
        self
    }

    /// Add every pair to the query string
    pub fn query_pairs(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query_params.extend(pairs);
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, Error> {
        let json = serde_json::to_vec(body)?;
        self.body = Some(Body::Json(json));
        Ok(self)
    }

    /// Send a multipart form instead of JSON.
    ///
    /// The default JSON content type is dropped so the transport can set the
    /// multipart boundary; the bearer token and caller headers stay.
    pub fn multipart(mut self, form: multipart::Form) -> Self {
        if !self.caller_content_type {
            self.headers.remove(CONTENT_TYPE);
        }
        self.body = Some(Body::Multipart(form));
        self
    }

    /// Build the request
    fn build(self) -> Result<RequestBuilder, Error> {
        if let Some(err) = self.invalid_header {
            return Err(err);
        }

        let mut url = Url::parse(&self.http.url(&self.endpoint))?;
        if !self.query_params.is_empty() {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in &self.query_params {
                query_pairs.append_pair(key, value);
            }
        }

        log::debug!("{} {}", self.method, url);

        let req = self.http.client.request(self.method, url.as_str());
        let req = match self.body {
            Some(Body::Json(bytes)) => req.body(bytes),
            Some(Body::Multipart(form)) => req.multipart(form),
            None => req,
        };

        // applied last so our headers replace any the body set
        Ok(req.headers(self.headers))
    }

    /// Execute the request and parse the response as JSON.
    ///
    /// Non-2xx responses become [`Error::Api`]. The body of a successful
    /// response is only checked to be JSON of the requested type.
    pub async fn execute<T: DeserializeOwned>(self) -> Result<T, Error> {
        let response = self.execute_checked().await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Execute the request, turning non-2xx responses into errors
    pub async fn execute_checked(self) -> Result<Response, Error> {
        let response = self.execute_raw().await?;
        if !response.status().is_success() {
            return Err(handle_api_error(response).await);
        }
        Ok(response)
    }

    /// Execute the request and return the raw response
    pub async fn execute_raw(self) -> Result<Response, Error> {
        let req = self.build()?;
        let response = req.send().await?;
        Ok(response)
    }
}

/// Convert a non-2xx response into an [`ApiError`].
///
/// An unreadable or non-JSON body is treated as absent.
pub async fn handle_api_error(response: Response) -> Error {
    let status = response.status();
    let status_text = status.canonical_reason().unwrap_or("").to_string();

    let body = match response.bytes().await {
        Ok(bytes) => ApiErrorBody::from_slice(&bytes),
        Err(e) => {
            log::debug!("could not read error body for {}: {}", status, e);
            None
        }
    };

    let err = ApiError::new(status.as_u16(), status_text, body);
    log::debug!("request failed with {}: {}", err.status, err);
    Error::Api(err)
}
