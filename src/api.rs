// API client module: the Transfer Client. It sends one file to the transform
// service as multipart/form-data and returns the response body untouched.
// It does not interpret, retry or time out requests; the controller owns the
// deadline.

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart;
use reqwest::Client;

use crate::config::Config;
use crate::error::TransferError;
use crate::mode::Mode;

/// Multipart field the service reads the upload from.
pub const FILE_FIELD: &str = "file";

/// A selected file held in memory: its display name and its bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileBlob {
    name: String,
    bytes: Bytes,
}

impl FileBlob {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a whole file from disk. The blob is named after the last path
    /// component.
    pub async fn read(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .with_context(|| format!("Not a file path: {}", path.display()))?
            .to_string();
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self::new(name, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }
}

/// Something that can run one transform on the remote side.
///
/// [`TransferClient`] is the HTTP implementation; tests substitute their own.
#[async_trait]
pub trait Transfer: Send + Sync {
    async fn submit(&self, mode: Mode, file: &FileBlob) -> Result<Bytes, TransferError>;
}

/// HTTP client for the transform service. Holds a reqwest client and the
/// base URL endpoints are resolved against.
#[derive(Clone)]
pub struct TransferClient {
    client: Client,
    base_url: String,
}

impl TransferClient {
    /// Create a client for the base address in `config`.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(TransferClient {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, mode: Mode) -> String {
        format!("{}{}", self.base_url, mode.endpoint())
    }
}

#[async_trait]
impl Transfer for TransferClient {
    /// POST the file to the endpoint for `mode` and return the raw body.
    async fn submit(&self, mode: Mode, file: &FileBlob) -> Result<Bytes, TransferError> {
        let url = self.url_for(mode);

        let part = multipart::Part::bytes(file.bytes().to_vec()).file_name(file.name().to_string());
        let form = multipart::Form::new().part(FILE_FIELD, part);

        tracing::info!(%url, file = file.name(), size = file.size(), "Submitting file");

        let res = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| TransferError::Request {
                url: url.clone(),
                source,
            })?;

        let status = res.status();
        if !status.is_success() {
            return Err(TransferError::Status { url, status });
        }

        let body = res
            .bytes()
            .await
            .map_err(|source| TransferError::Body {
                url: url.clone(),
                source,
            })?;
        tracing::info!(%url, size = body.len(), "Received transformed payload");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_urls_join_base() {
        let config = Config::default().with_base_url("http://svc:9000/");
        let client = TransferClient::new(&config).unwrap();
        assert_eq!(client.url_for(Mode::Forward), "http://svc:9000/transform/forward");
        assert_eq!(client.url_for(Mode::Reverse), "http://svc:9000/transform/reverse");
    }

    #[test]
    fn blob_reports_name_and_size() {
        let blob = FileBlob::new("notes.txt", vec![7u8; 1024]);
        assert_eq!(blob.name(), "notes.txt");
        assert_eq!(blob.size(), 1024);
    }

    #[tokio::test]
    async fn read_names_blob_after_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, b"abc").unwrap();

        let blob = FileBlob::read(&path).await.unwrap();
        assert_eq!(blob.name(), "data.bin");
        assert_eq!(blob.bytes().as_ref(), b"abc");
    }

    #[tokio::test]
    async fn read_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileBlob::read(&dir.path().join("missing")).await.is_err());
    }
}
