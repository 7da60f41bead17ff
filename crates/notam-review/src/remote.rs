//! Remote dataset download and feedback upload.
//!
//! The reference dataset is frozen on a third-party storage service and
//! fetched once; completed feedback files can optionally be pushed back to a
//! storage API. Both sides sit behind a trait so the HTTP client is
//! swappable in tests.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::config::Config;
use crate::error::{Error, Result};

/// A third-party storage service holding the dataset and feedback files.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Download `url` into `dest`, creating parent directories as needed.
    async fn download(&self, url: &str, dest: &Path) -> Result<()>;

    /// Upload the file at `path` to `endpoint` as a multipart form,
    /// authenticating with `token` when present.
    async fn upload(&self, endpoint: &str, token: Option<&str>, path: &Path) -> Result<()>;
}

/// HTTP-backed remote store.
#[derive(Debug, Clone)]
pub struct HttpRemoteStore {
    client: reqwest::Client,
}

impl Default for HttpRemoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpRemoteStore {
    /// Create a remote store with a request timeout suited to file transfers.
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(Error::download(
                url,
                format!("status {}", response.status()),
            ));
        }
        let bytes = response.bytes().await?;

        if let Some(parent) = dest.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        // Same temp-then-rename discipline as the store writes.
        let tmp = dest.with_extension("download.tmp");
        std::fs::write(&tmp, &bytes)?;
        std::fs::rename(&tmp, dest)?;
        Ok(())
    }

    async fn upload(&self, endpoint: &str, token: Option<&str>, path: &Path) -> Result<()> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::upload(format!("not a file path: {}", path.display())))?;
        let bytes = std::fs::read(path)?;

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("text/csv")
            .map_err(|e| Error::upload(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let mut request = self.client.post(endpoint).multipart(form);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Error::upload(format!(
                "endpoint {} returned status {}",
                endpoint,
                response.status()
            )));
        }
        Ok(())
    }
}

/// Make sure the reference dataset exists locally, downloading it if a URL is
/// configured.
///
/// Returns the dataset path. With `force`, an existing file is re-downloaded.
///
/// # Errors
///
/// Returns [`Error::DatasetMissing`] when the file is absent and no URL is
/// configured, or a download error.
pub async fn ensure_dataset(
    config: &Config,
    remote: &dyn RemoteStore,
    force: bool,
) -> Result<PathBuf> {
    let path = config.dataset_path();
    if path.exists() && !force {
        return Ok(path);
    }

    let Some(url) = &config.dataset.url else {
        return Err(Error::DatasetMissing { path });
    };

    info!("Downloading reference dataset from {}", url);
    remote.download(url, &path).await?;
    info!("Dataset stored at {}", path.display());
    Ok(path)
}

/// Push a user's feedback file to the configured storage API.
///
/// # Errors
///
/// Returns an error when no upload endpoint is configured, the user has no
/// feedback file, or the upload itself fails.
pub async fn upload_feedback(config: &Config, remote: &dyn RemoteStore, user: &str) -> Result<()> {
    let Some(endpoint) = &config.upload.endpoint else {
        return Err(Error::validation(
            "no upload endpoint configured (set upload.endpoint)",
        ));
    };

    let user = crate::store::normalize_username(user)?;
    let path = config.feedback_path(&user);
    if !path.exists() {
        return Err(Error::UserFileMissing { user, path });
    }

    info!("Uploading {} to {}", path.display(), endpoint);
    remote
        .upload(endpoint, config.upload.token.as_deref(), &path)
        .await?;
    info!("Upload complete");
    Ok(())
}
