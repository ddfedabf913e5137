// Dropbox-to-YouTube sync module
// Lists a remote folder, stages the first file locally, publishes it as a
// Short, then removes the staged copy.

use async_trait::async_trait;
use std::path::Path;

pub mod models;
pub mod pipeline;
pub mod uploader;

// Re-export commonly used types
pub use models::*;
pub use pipeline::{SyncError, SyncOutcome, SyncPipeline};
pub use uploader::ShortsUploader;

pub type ClientError = Box<dyn std::error::Error + Send + Sync>;

/// Remote storage that can enumerate a folder and hand over file bytes.
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn list_folder(&self, folder: &str) -> Result<Vec<RemoteFile>, ClientError>;

    /// Write the object's bytes to `dest`, returning the byte count.
    async fn download_to(&self, remote_path: &str, dest: &Path) -> Result<u64, ClientError>;
}

/// Somewhere a staged video file can be published to.
#[async_trait]
pub trait VideoDestination: Send + Sync {
    async fn publish(
        &self,
        local_path: &Path,
        request: &UploadRequest,
    ) -> Result<PublishedVideo, ClientError>;
}
