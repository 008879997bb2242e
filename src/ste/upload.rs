//! Files sent to the import endpoints

use reqwest::multipart;
use std::path::Path;

use crate::error::Error;

/// MIME types accepted by the spreadsheet import
pub const SPREADSHEET_MIME_TYPES: &[&str] = &[
    "text/csv",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

/// Extensions accepted by the spreadsheet import
pub const SPREADSHEET_EXTENSIONS: &[&str] = &[".csv", ".xlsx", ".xls"];

/// MIME types accepted by the JSON import
pub const JSON_MIME_TYPES: &[&str] = &["application/json"];

/// Extensions accepted by the JSON import
pub const JSON_EXTENSIONS: &[&str] = &[".json"];

/// An in-memory file to upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    /// Name sent with the form part; its extension drives validation
    pub file_name: String,
    /// Declared MIME type, if known
    pub mime_type: Option<String>,
    pub data: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: &str, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            mime_type: None,
            data,
        }
    }

    pub fn with_mime_type(mut self, mime_type: &str) -> Self {
        self.mime_type = Some(mime_type.to_string());
        self
    }

    /// Read a file from disk, naming the part after the file
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "file".to_string());
        Ok(Self::new(&file_name, data))
    }

    /// Lowercased extension including the dot, e.g. `.csv`
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rfind('.')
            .map(|idx| self.file_name[idx..].to_lowercase())
    }

    /// Whether the declared MIME type or the extension is in the given lists
    pub fn matches(&self, mime_types: &[&str], extensions: &[&str]) -> bool {
        let mime_ok = self
            .mime_type
            .as_deref()
            .map_or(false, |mime| mime_types.contains(&mime));
        let ext_ok = self
            .extension()
            .map_or(false, |ext| extensions.contains(&ext.as_str()));
        mime_ok || ext_ok
    }

    /// Reject anything that is not CSV or Excel, before any request is made
    pub fn validate_spreadsheet(&self) -> Result<(), Error> {
        if self.matches(SPREADSHEET_MIME_TYPES, SPREADSHEET_EXTENSIONS) {
            Ok(())
        } else {
            Err(Error::validation(format!(
                "unsupported file format for {:?}; allowed formats: .csv, .xlsx, .xls",
                self.file_name
            )))
        }
    }

    /// Reject anything that is not JSON, before any request is made
    pub fn validate_json(&self) -> Result<(), Error> {
        if self.matches(JSON_MIME_TYPES, JSON_EXTENSIONS) {
            Ok(())
        } else {
            Err(Error::validation(format!(
                "unsupported file format for {:?}; allowed format: .json",
                self.file_name
            )))
        }
    }

    /// Multipart form carrying this file under the `file` field.
    ///
    /// A declared type that is blank or not `type/subtype` is left off the
    /// part; the server then sniffs the file name.
    pub(crate) fn into_form(self) -> Result<multipart::Form, Error> {
        let mut part = multipart::Part::bytes(self.data).file_name(self.file_name.clone());
        if let Some(mime) = self.mime_type.as_deref().filter(|m| is_mime_type(m)) {
            part = part.mime_str(mime).map_err(|e| {
                Error::validation(format!("invalid MIME type {:?} for {:?}: {}", mime, self.file_name, e))
            })?;
        }
        Ok(multipart::Form::new().part("file", part))
    }
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$&-^_.+".contains(&b))
}

/// `type/subtype`, optionally followed by `;` parameters
fn is_mime_type(mime: &str) -> bool {
    let essence = mime.split(';').next().unwrap_or("").trim();
    match essence.split_once('/') {
        Some((kind, subtype)) => is_token(kind) && is_token(subtype),
        None => false,
    }
}
