//! HTTP client for the sharelink API.
//!
//! Provides a minimal client built from an injected [`ClientConfig`], generic
//! GET/POST helpers, raw transfer-target helpers, and the [`ShareApi`]
//! implementation the orchestrators run against. The CLI uses this client
//! directly.

pub mod api;

use std::path::{Path, PathBuf};

use bytes::Bytes;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use sharelink_core::{ClientConfig, ShareError, ShareResult};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;

/// HTTP client for the sharing API.
#[derive(Clone, Debug)]
pub struct ShareClient {
    client: Client,
    config: ClientConfig,
}

impl ShareClient {
    pub fn new(config: ClientConfig) -> ShareResult<Self> {
        config.validate()?;

        let mut builder = Client::builder().user_agent(concat!(
            "sharelink/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ShareError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn build_url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ShareResult<T> {
        let url = self.build_url(path);
        let mut request = self.client.get(&url);

        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(transport_error)?;
        let response = ensure_success(response).await?;
        parse_json(response).await
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ShareResult<T> {
        let url = self.build_url(path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let response = ensure_success(response).await?;
        parse_json(response).await
    }

    /// PUT raw bytes to a transfer target. Only the status is inspected.
    pub async fn put_bytes(&self, url: &str, content_type: &str, body: Bytes) -> ShareResult<()> {
        let response = self
            .client
            .put(url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(transport_error)?;

        ensure_success(response).await?;
        Ok(())
    }

    /// Stream a transfer target into a new file at `dest`.
    ///
    /// An existing file is never overwritten: when `dest` is taken the file
    /// is saved as `name (1).ext`, `name (2).ext` and so on. Cancelling
    /// `cancel` stops the transfer. Only a file created by this call is
    /// removed on failure or cancellation.
    pub async fn fetch_to_path(
        &self,
        url: &str,
        dest: &Path,
        cancel: &CancellationToken,
    ) -> ShareResult<SavedFile> {
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ShareError::Cancelled),
            response = self.client.get(url).send() => response.map_err(transport_error)?,
        };
        let mut response = ensure_success(response).await?;

        let path = available_path(dest);
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        let mut written: u64 = 0;

        let result: ShareResult<()> = async {
            loop {
                let chunk = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(ShareError::Cancelled),
                    chunk = response.chunk() => chunk.map_err(transport_error)?,
                };
                let Some(chunk) = chunk else {
                    break;
                };
                file.write_all(&chunk).await?;
                written += chunk.len() as u64;
            }
            file.flush().await?;
            Ok(())
        }
        .await;

        if let Err(err) = result {
            drop(file);
            if let Err(remove_err) = tokio::fs::remove_file(&path).await {
                tracing::warn!(
                    path = %path.display(),
                    error = %remove_err,
                    "Failed to remove partial download"
                );
            }
            return Err(err);
        }

        tracing::debug!(path = %path.display(), bytes = written, "Transfer target saved");
        Ok(SavedFile {
            path,
            bytes: written,
        })
    }
}

/// A file written by [`ShareClient::fetch_to_path`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub path: PathBuf,
    pub bytes: u64,
}

/// First path based on `dest` that does not exist yet.
///
/// `report.pdf` becomes `report (1).pdf`, then `report (2).pdf`.
pub fn available_path(dest: &Path) -> PathBuf {
    if !dest.exists() {
        return dest.to_path_buf();
    }

    let stem = dest
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = dest
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter = 1;
    loop {
        let candidate = dest.with_file_name(format!("{} ({}){}", stem, counter, extension));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

fn transport_error(err: reqwest::Error) -> ShareError {
    ShareError::Transport(err.to_string())
}

async fn ensure_success(response: Response) -> ShareResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(ShareError::Api {
        status: status.as_u16(),
        body,
    })
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> ShareResult<T> {
    let bytes = response.bytes().await.map_err(transport_error)?;
    serde_json::from_slice(&bytes).map_err(ShareError::from)
}
