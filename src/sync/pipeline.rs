// One-shot sync pipeline: list the remote folder, stage the first file,
// publish it, then drop the staged copy.

use std::path::PathBuf;
use thiserror::Error;

use crate::sync::{
    description_for, staging_file_name, title_from_file_name, ClientError, MediaSource,
    PublishedVideo, UploadRequest, VideoDestination,
};

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Failed to list remote folder: {0}")]
    Listing(ClientError),
    #[error("Download failed for '{name}': {reason}")]
    Download { name: String, reason: ClientError },
    #[error("Upload failed for '{name}': {reason}")]
    Upload { name: String, reason: ClientError },
    #[error("Staging error: {0}")]
    Staging(#[from] std::io::Error),
}

/// Result of one pipeline run
#[derive(Debug)]
pub enum SyncOutcome {
    /// The remote folder had no entries
    NothingToDo,
    Published(PublishedVideo),
}

pub struct SyncPipeline<S, D> {
    source: S,
    destination: D,
    remote_folder: String,
    staging_dir: PathBuf,
}

impl<S, D> SyncPipeline<S, D>
where
    S: MediaSource,
    D: VideoDestination,
{
    pub fn new(source: S, destination: D, remote_folder: String, staging_dir: PathBuf) -> Self {
        Self {
            source,
            destination,
            remote_folder,
            staging_dir,
        }
    }

    /// Run the full chain once. A download failure leaves any partial file
    /// in place; an upload failure removes the staged copy before the
    /// error propagates.
    pub async fn run_once(&self) -> Result<SyncOutcome, SyncError> {
        let entries = self
            .source
            .list_folder(&self.remote_folder)
            .await
            .map_err(SyncError::Listing)?;

        let Some(entry) = entries.first() else {
            return Ok(SyncOutcome::NothingToDo);
        };

        tracing::info!("📥 Staging file: {}", entry.name);

        tokio::fs::create_dir_all(&self.staging_dir).await?;
        let local_path = self.staging_dir.join(staging_file_name(&entry.name));

        self.source
            .download_to(&entry.remote_path, &local_path)
            .await
            .map_err(|e| SyncError::Download {
                name: entry.name.clone(),
                reason: e,
            })?;

        let request = UploadRequest::shorts(
            title_from_file_name(&entry.name),
            description_for(&entry.name),
        );

        tracing::info!("📤 Uploading to YouTube...");

        let published = match self.destination.publish(&local_path, &request).await {
            Ok(video) => video,
            Err(e) => {
                // A staged copy has no further use once its upload failed
                if let Err(remove_err) = tokio::fs::remove_file(&local_path).await {
                    tracing::warn!(
                        "Failed to remove staged file {}: {}",
                        local_path.display(),
                        remove_err
                    );
                }
                return Err(SyncError::Upload {
                    name: entry.name.clone(),
                    reason: e,
                });
            }
        };

        tracing::info!("🗑️ Deleting staged file {}", local_path.display());
        tokio::fs::remove_file(&local_path).await?;

        Ok(SyncOutcome::Published(published))
    }
}
