// Dropbox HTTP API v2 client for folder listing and content download
// Docs: https://www.dropbox.com/developers/documentation/http

use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use tokio_util::io::StreamReader;

use crate::sync::{ClientError, MediaSource, RemoteFile};

const API_BASE: &str = "https://api.dropboxapi.com/2";
const CONTENT_BASE: &str = "https://content.dropboxapi.com/2";

#[derive(Debug, Clone)]
pub struct DropboxClient {
    client: Client,
    access_token: String,
}

#[derive(Debug, Deserialize)]
pub struct ListFolderResponse {
    pub entries: Vec<FolderEntry>,
    pub cursor: Option<String>,
    pub has_more: bool,
}

/// One entry of a folder listing, as returned by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct FolderEntry {
    #[serde(rename = ".tag")]
    pub tag: String,
    pub name: String,
    pub path_lower: String,
    pub path_display: Option<String>,
    pub id: Option<String>,
    pub client_modified: Option<DateTime<Utc>>,
    pub size: Option<u64>,
}

impl DropboxClient {
    pub fn new(access_token: String) -> Self {
        Self {
            client: Client::new(),
            access_token,
        }
    }

    /// List entries of a folder. Only the first page is fetched; `has_more`
    /// is surfaced but never followed.
    pub async fn list_folder(&self, folder: &str) -> Result<ListFolderResponse, ClientError> {
        let url = format!("{}/files/list_folder", API_BASE);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .json(&json!({ "path": folder }))
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(format!("Failed to list Dropbox folder: {}", error_text).into());
        }

        let listing: ListFolderResponse = response.json().await?;
        Ok(listing)
    }

    /// Download one object to a local path, overwriting any existing file.
    /// The body is streamed to disk; returns the number of bytes written.
    pub async fn download_file(&self, remote_path: &str, dest: &Path) -> Result<u64, ClientError> {
        let url = format!("{}/files/download", CONTENT_BASE);

        // The content endpoint carries its argument in a header, not the body
        let api_arg = serde_json::to_string(&json!({ "path": remote_path }))?;

        tracing::info!("⬇️ Downloading {} -> {}", remote_path, dest.display());

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .header("Dropbox-API-Arg", api_arg)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(format!("Failed to download file: {}", error_text).into());
        }

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let stream = response
            .bytes_stream()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e));
        let mut reader = StreamReader::new(stream);
        let mut file = tokio::fs::File::create(dest).await?;
        let bytes = tokio::io::copy(&mut reader, &mut file).await?;

        tracing::info!("✅ Downloaded {} bytes to {}", bytes, dest.display());
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl MediaSource for DropboxClient {
    async fn list_folder(&self, folder: &str) -> Result<Vec<RemoteFile>, ClientError> {
        let listing = DropboxClient::list_folder(self, folder).await?;
        Ok(listing
            .entries
            .into_iter()
            .map(|entry| RemoteFile {
                name: entry.name,
                remote_path: entry.path_lower,
            })
            .collect())
    }

    async fn download_to(&self, remote_path: &str, dest: &Path) -> Result<u64, ClientError> {
        self.download_file(remote_path, dest).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Captured from a real files/list_folder response, trimmed to the
    // fields this client reads.
    const LIST_FOLDER_SAMPLE: &str = r#"{
        "entries": [
            {
                ".tag": "file",
                "name": "riddle-042.mp4",
                "path_lower": "/riddles shorts/riddle-042.mp4",
                "path_display": "/Riddles Shorts/riddle-042.mp4",
                "id": "id:a4ayc_80_OEAAAAAAAAAXw",
                "client_modified": "2024-09-15T15:50:38Z",
                "server_modified": "2024-09-15T15:50:38Z",
                "rev": "a1c10ce0dd78",
                "size": 7212864,
                "is_downloadable": true,
                "content_hash": "e3b0c44298fc1c149afbf4c8996fb924"
            },
            {
                ".tag": "folder",
                "name": "archive",
                "path_lower": "/riddles shorts/archive",
                "path_display": "/Riddles Shorts/archive",
                "id": "id:a4ayc_80_OEAAAAAAAAAYa"
            }
        ],
        "cursor": "ZtkX9_EHj3x7PMkVuFIhwKYXEpwpLwyxp9vMKomUhllil9q7eWiAu",
        "has_more": false
    }"#;

    #[test]
    fn list_folder_payload_deserializes() {
        let listing: ListFolderResponse = serde_json::from_str(LIST_FOLDER_SAMPLE).unwrap();

        assert_eq!(listing.entries.len(), 2);
        assert!(!listing.has_more);

        let first = &listing.entries[0];
        assert_eq!(first.tag, "file");
        assert_eq!(first.name, "riddle-042.mp4");
        assert_eq!(first.path_lower, "/riddles shorts/riddle-042.mp4");
        assert_eq!(first.size, Some(7212864));
        assert!(first.client_modified.is_some());

        // Folder entries carry no size but must still parse
        let second = &listing.entries[1];
        assert_eq!(second.tag, "folder");
        assert_eq!(second.size, None);
    }

    #[test]
    fn remote_file_maps_name_and_lowered_path() {
        let listing: ListFolderResponse = serde_json::from_str(LIST_FOLDER_SAMPLE).unwrap();
        let remote: Vec<RemoteFile> = listing
            .entries
            .into_iter()
            .map(|entry| RemoteFile {
                name: entry.name,
                remote_path: entry.path_lower,
            })
            .collect();

        assert_eq!(remote[0].name, "riddle-042.mp4");
        assert_eq!(remote[0].remote_path, "/riddles shorts/riddle-042.mp4");
    }
}
