//! Outbound HTTP for the storefront.
//!
//! - [`WebhookNotifier`]: fire-and-forget order notifications
//! - [`MediaUploader`]: unsigned image uploads with progress reporting

mod client;
mod error;
mod upload;
mod webhook;

#[cfg(test)]
mod testing;

pub use client::DEFAULT_TIMEOUT;
pub use error::FetchError;
pub use upload::{progress_channel, MediaConfig, MediaUploader, UploadProgress, UploadedMedia};
pub use webhook::{WebhookConfig, WebhookNotifier};
