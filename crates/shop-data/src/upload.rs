//! Unsigned media uploads.
//!
//! Files go to the media host as a multipart form carrying an upload
//! preset instead of credentials. The body is streamed in chunks so
//! progress can be observed through a [`watch`] channel.

use crate::client::{build_client, error_for_status, parse_url, DEFAULT_TIMEOUT};
use crate::FetchError;
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Bytes per streamed chunk.
const CHUNK_SIZE: usize = 64 * 1024;

/// Media host settings.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Upload endpoint, e.g. `https://api.cloudinary.com/v1_1/<cloud>/image/upload`.
    pub endpoint: String,
    pub upload_preset: String,
    pub timeout: Duration,
}

impl MediaConfig {
    pub fn new(endpoint: impl Into<String>, upload_preset: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            upload_preset: upload_preset.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Upload progress in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadProgress {
    pub sent: u64,
    pub total: u64,
}

impl UploadProgress {
    /// Whole percent sent, 100 for an empty body.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.sent.min(self.total) * 100) / self.total) as u8
    }

    pub fn is_complete(&self) -> bool {
        self.sent >= self.total
    }
}

/// Create a progress channel starting at zero.
pub fn progress_channel() -> (watch::Sender<UploadProgress>, watch::Receiver<UploadProgress>) {
    watch::channel(UploadProgress::default())
}

/// Where an uploaded file ended up.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedMedia {
    /// Durable HTTPS URL.
    #[serde(rename = "secure_url")]
    pub url: String,
    #[serde(default)]
    pub public_id: Option<String>,
}

/// Uploads images to the media host.
#[derive(Clone)]
pub struct MediaUploader {
    client: reqwest::Client,
    endpoint: reqwest::Url,
    upload_preset: String,
}

impl MediaUploader {
    pub fn new(config: MediaConfig) -> Result<Self, FetchError> {
        Ok(Self {
            endpoint: parse_url(&config.endpoint)?,
            client: build_client(config.timeout)?,
            upload_preset: config.upload_preset,
        })
    }

    /// Read a local file and upload it.
    pub async fn upload_file(
        &self,
        path: &Path,
        progress: watch::Sender<UploadProgress>,
    ) -> Result<UploadedMedia, FetchError> {
        let data = tokio::fs::read(path).await.map_err(|e| FetchError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        self.upload(&file_name, data, progress).await
    }

    /// Upload bytes, reporting progress as the body is streamed.
    pub async fn upload(
        &self,
        file_name: &str,
        data: Vec<u8>,
        progress: watch::Sender<UploadProgress>,
    ) -> Result<UploadedMedia, FetchError> {
        let total = data.len() as u64;
        progress.send_replace(UploadProgress { sent: 0, total });

        let chunks: Vec<Vec<u8>> = data.chunks(CHUNK_SIZE).map(<[u8]>::to_vec).collect();
        let progress = Arc::new(progress);
        let tracker = Arc::clone(&progress);
        let mut sent = 0u64;
        let body = stream::iter(chunks).map(move |chunk| {
            sent += chunk.len() as u64;
            tracker.send_replace(UploadProgress { sent, total });
            Ok::<_, std::io::Error>(chunk)
        });

        let part = reqwest::multipart::Part::stream_with_length(reqwest::Body::wrap_stream(body), total)
            .file_name(file_name.to_string())
            .mime_str(mime_for(file_name))?;
        let form = reqwest::multipart::Form::new()
            .text("upload_preset", self.upload_preset.clone())
            .part("file", part);

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;
        let media: UploadedMedia = error_for_status(response).await?.json().await?;

        progress.send_replace(UploadProgress { sent: total, total });
        tracing::info!(file = file_name, bytes = total, url = %media.url, "media uploaded");
        Ok(media)
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::serve_once;

    #[test]
    fn test_progress_percent() {
        assert_eq!(UploadProgress { sent: 0, total: 0 }.percent(), 100);
        assert_eq!(UploadProgress { sent: 50, total: 200 }.percent(), 25);
        assert!(!UploadProgress { sent: 50, total: 200 }.is_complete());
        assert!(UploadProgress { sent: 200, total: 200 }.is_complete());
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for("honey.JPG"), "image/jpeg");
        assert_eq!(mime_for("label.webp"), "image/webp");
        assert_eq!(mime_for("README"), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_upload_returns_secure_url() {
        let (url, server) = serve_once(
            200,
            r#"{"secure_url":"https://media.example.com/honey.png","public_id":"honey"}"#,
        )
        .await;
        let uploader = MediaUploader::new(MediaConfig::new(format!("{url}/upload"), "unsigned_shop")).unwrap();
        let (tx, rx) = progress_channel();

        let data = vec![7u8; CHUNK_SIZE * 2 + 10];
        let media = uploader.upload("honey.png", data, tx).await.unwrap();

        assert_eq!(media.url, "https://media.example.com/honey.png");
        assert_eq!(media.public_id.as_deref(), Some("honey"));
        let done = *rx.borrow();
        assert_eq!(done.total, (CHUNK_SIZE * 2 + 10) as u64);
        assert!(done.is_complete());

        let captured = server.await.unwrap();
        let body = captured.body_text();
        assert!(body.contains("name=\"upload_preset\""));
        assert!(body.contains("unsigned_shop"));
        assert!(body.contains("filename=\"honey.png\""));
    }

    #[tokio::test]
    async fn test_upload_rejected() {
        let (url, _server) = serve_once(400, r#"{"error":{"message":"Upload preset not found"}}"#).await;
        let uploader = MediaUploader::new(MediaConfig::new(url, "missing")).unwrap();
        let (tx, _rx) = progress_channel();

        let err = uploader.upload("a.png", vec![1, 2, 3], tx).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert!(err.to_string().contains("Upload preset not found"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let uploader = MediaUploader::new(MediaConfig::new("http://127.0.0.1:9", "p")).unwrap();
        let (tx, _rx) = progress_channel();
        let err = uploader
            .upload_file(Path::new("/definitely/not/here.png"), tx)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));
    }
}
