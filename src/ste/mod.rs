//! STE records: admin CRUD, bulk listing and file imports

mod types;
mod upload;

use crate::error::Error;
use crate::fetch::HttpClient;
use crate::paginate;
use crate::types::MessageResponse;

pub(crate) use types::filter_query;
pub use types::*;
pub use upload::*;

/// Client for the admin STE endpoints
#[derive(Debug, Clone)]
pub struct SteClient {
    http: HttpClient,
    batch_size: usize,
    max_pages: Option<usize>,
}

impl SteClient {
    /// Create a new SteClient
    pub(crate) fn new(http: HttpClient, batch_size: usize, max_pages: Option<usize>) -> Self {
        Self {
            http,
            batch_size,
            max_pages,
        }
    }

    /// List one page of STE records
    pub async fn list(&self, params: &SteListParams) -> Result<Vec<Ste>, Error> {
        self.http
            .get("/api/admin/ste")
            .query_pairs(params.to_query())
            .execute::<Vec<Ste>>()
            .await
    }

    /// Load every STE matching the filters, one batch at a time.
    ///
    /// `params.limit` and `params.skip` are ignored; batches use the configured
    /// batch size.
    pub async fn fetch_all(&self, params: &SteListParams) -> Result<Vec<Ste>, Error> {
        paginate::fetch_all(self.batch_size, self.max_pages, |skip, limit| {
            let page = params.clone().with_skip(skip).with_limit(limit);
            async move { self.list(&page).await }
        })
        .await
    }

    /// Get an STE by id
    pub async fn get(&self, id: i64) -> Result<Ste, Error> {
        self.http
            .get(&format!("/api/admin/ste/{}", id))
            .execute::<Ste>()
            .await
    }

    /// Create an STE
    pub async fn create(&self, data: &SteCreate) -> Result<Ste, Error> {
        self.http
            .post("/api/admin/ste")
            .json(data)?
            .execute::<Ste>()
            .await
    }

    /// Update an STE; only the set fields change
    pub async fn update(&self, id: i64, data: &SteUpdate) -> Result<Ste, Error> {
        self.http
            .patch(&format!("/api/admin/ste/{}", id))
            .json(data)?
            .execute::<Ste>()
            .await
    }

    /// Delete an STE
    pub async fn delete(&self, id: i64) -> Result<MessageResponse, Error> {
        self.http
            .delete(&format!("/api/admin/ste/{}", id))
            .execute::<MessageResponse>()
            .await
    }

    /// Import a CSV or Excel spreadsheet.
    ///
    /// Files that are neither are rejected locally with [`Error::Validation`].
    pub async fn upload(&self, file: UploadFile) -> Result<UploadSummary, Error> {
        file.validate_spreadsheet()?;
        log::info!("uploading {} ({} bytes)", file.file_name, file.data.len());

        self.http
            .post("/api/admin/ste/upload")
            .multipart(file.into_form()?)
            .execute::<UploadSummary>()
            .await
    }

    /// Bulk-create STE records from a JSON file
    pub async fn upload_json(&self, file: UploadFile) -> Result<MessageResponse, Error> {
        file.validate_json()?;

        self.http
            .post("/api/admin/ste/upload-json")
            .multipart(file.into_form()?)
            .execute::<MessageResponse>()
            .await
    }
}
