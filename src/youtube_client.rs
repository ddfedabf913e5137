// YouTube Data API v3 client for video uploads
// Docs: https://developers.google.com/youtube/v3

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;
use tokio::io::AsyncReadExt;

use crate::sync::ClientError;

const UPLOAD_URL: &str = "https://www.googleapis.com/upload/youtube/v3/videos";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Files at or below this size go up in a single multipart request;
/// anything larger uses a resumable session. Resumable chunks must be a
/// multiple of 256 KiB.
const RESUMABLE_THRESHOLD: u64 = 8 * 1024 * 1024;
const CHUNK_SIZE: usize = 8 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct YouTubeClient {
    client: Client,
}

// ============================================================================
// Video Upload Structures
// ============================================================================

#[derive(Debug, Serialize)]
pub struct VideoSnippet {
    pub title: String,
    pub description: String,
    #[serde(rename = "categoryId")]
    pub category_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct VideoStatus {
    #[serde(rename = "privacyStatus")]
    pub privacy_status: String, // "public", "private", "unlisted"
}

#[derive(Debug, Serialize)]
pub struct VideoResource {
    pub snippet: VideoSnippet,
    pub status: VideoStatus,
}

#[derive(Debug, Deserialize)]
pub struct VideoUploadResponse {
    pub id: String,
    pub snippet: VideoResponseSnippet,
}

#[derive(Debug, Deserialize)]
pub struct VideoResponseSnippet {
    pub title: String,
    #[serde(rename = "publishedAt")]
    pub published_at: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

enum ChunkOutcome {
    Accepted,
    Complete(VideoUploadResponse),
}

// ============================================================================
// YouTube Client Implementation
// ============================================================================

impl YouTubeClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Refresh an expired access token using a refresh token
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<TokenRefreshResponse, ClientError> {
        let params = json!({
            "client_id": client_id,
            "client_secret": client_secret,
            "refresh_token": refresh_token,
            "grant_type": "refresh_token"
        });

        let response = self.client.post(TOKEN_URL).json(&params).send().await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(format!("Failed to refresh token: {}", error_text).into());
        }

        let token_response: TokenRefreshResponse = response.json().await?;
        Ok(token_response)
    }

    /// Upload a video file. Small files go up in a single multipart
    /// request; larger files use a resumable session with progress logged
    /// per chunk.
    pub async fn upload_video(
        &self,
        access_token: &str,
        video_path: &Path,
        title: &str,
        description: &str,
        privacy_status: &str,
        category_id: Option<&str>,
        tags: Option<Vec<String>>,
    ) -> Result<VideoUploadResponse, ClientError> {
        if !["public", "private", "unlisted"].contains(&privacy_status) {
            return Err("Invalid privacy status. Must be 'public', 'private', or 'unlisted'".into());
        }

        let metadata = VideoResource {
            snippet: VideoSnippet {
                title: title.to_string(),
                description: description.to_string(),
                category_id: category_id.unwrap_or("22").to_string(), // Default: People & Blogs
                tags,
            },
            status: VideoStatus {
                privacy_status: privacy_status.to_string(),
            },
        };

        let file_size = tokio::fs::metadata(video_path).await?.len();
        if file_size == 0 {
            return Err(format!("Refusing to upload empty file: {}", video_path.display()).into());
        }

        tracing::info!("🎬 Uploading '{}' ({} bytes) to YouTube", title, file_size);

        let upload_response = if file_size <= RESUMABLE_THRESHOLD {
            self.upload_multipart(access_token, video_path, &metadata)
                .await?
        } else {
            self.upload_resumable(access_token, video_path, &metadata, file_size)
                .await?
        };

        tracing::info!(
            "✅ Video uploaded to YouTube: {} (ID: {})",
            upload_response.snippet.title,
            upload_response.id
        );

        Ok(upload_response)
    }

    /// Single-request multipart upload for small files
    async fn upload_multipart(
        &self,
        access_token: &str,
        video_path: &Path,
        metadata: &VideoResource,
    ) -> Result<VideoUploadResponse, ClientError> {
        let video_data = tokio::fs::read(video_path).await?;
        let file_name = video_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("video.mp4");

        let metadata_json = serde_json::to_string(metadata)?;

        let form = reqwest::multipart::Form::new()
            .part(
                "snippet",
                reqwest::multipart::Part::text(metadata_json).mime_str("application/json")?,
            )
            .part(
                "media",
                reqwest::multipart::Part::bytes(video_data)
                    .file_name(file_name.to_string())
                    .mime_str("video/*")?,
            );

        let response = self
            .client
            .post(UPLOAD_URL)
            .query(&[("part", "snippet,status"), ("uploadType", "multipart")])
            .header("Authorization", format!("Bearer {}", access_token))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            tracing::error!("YouTube upload failed: {}", error_text);
            return Err(format!("Failed to upload video: {}", error_text).into());
        }

        let upload_response: VideoUploadResponse = response.json().await?;
        Ok(upload_response)
    }

    /// Resumable upload: initiate a session, then send the file chunk by
    /// chunk, logging progress after each accepted chunk.
    async fn upload_resumable(
        &self,
        access_token: &str,
        video_path: &Path,
        metadata: &VideoResource,
        file_size: u64,
    ) -> Result<VideoUploadResponse, ClientError> {
        let session_url = self
            .initiate_resumable_session(access_token, metadata, file_size)
            .await?;

        let mut file = tokio::fs::File::open(video_path).await?;
        let mut start: u64 = 0;

        loop {
            let mut chunk = vec![0u8; CHUNK_SIZE];
            let mut filled = 0;
            while filled < chunk.len() {
                let n = file.read(&mut chunk[filled..]).await?;
                if n == 0 {
                    break;
                }
                filled += n;
            }
            if filled == 0 {
                return Err("Upload session ended before the file was fully sent".into());
            }
            chunk.truncate(filled);

            let end = start + filled as u64 - 1;
            match self
                .upload_chunk(&session_url, chunk, start, end, file_size)
                .await?
            {
                ChunkOutcome::Accepted => {
                    let progress = ((end + 1) * 100) / file_size;
                    tracing::info!("Upload progress: {}%", progress);
                    start = end + 1;
                }
                ChunkOutcome::Complete(video_response) => {
                    tracing::info!("Upload progress: 100%");
                    return Ok(video_response);
                }
            }
        }
    }

    async fn initiate_resumable_session(
        &self,
        access_token: &str,
        metadata: &VideoResource,
        file_size: u64,
    ) -> Result<String, ClientError> {
        let response = self
            .client
            .post(UPLOAD_URL)
            .query(&[("uploadType", "resumable"), ("part", "snippet,status")])
            .header("Authorization", format!("Bearer {}", access_token))
            .header("Content-Type", "application/json")
            .header("X-Upload-Content-Length", file_size.to_string())
            .header("X-Upload-Content-Type", "video/*")
            .json(metadata)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            tracing::error!("Failed to initiate resumable upload: {}", error_text);
            return Err(format!("Failed to initiate resumable upload: {}", error_text).into());
        }

        let session_url = response
            .headers()
            .get("Location")
            .and_then(|v| v.to_str().ok())
            .ok_or("No upload session URL in response")?
            .to_string();

        Ok(session_url)
    }

    async fn upload_chunk(
        &self,
        session_url: &str,
        chunk: Vec<u8>,
        start_byte: u64,
        end_byte: u64,
        total_bytes: u64,
    ) -> Result<ChunkOutcome, ClientError> {
        let content_range = format!("bytes {}-{}/{}", start_byte, end_byte, total_bytes);

        let response = self
            .client
            .put(session_url)
            .header("Content-Length", chunk.len().to_string())
            .header("Content-Range", content_range)
            .header("Content-Type", "video/*")
            .body(chunk)
            .send()
            .await?;

        let status = response.status();

        // 308 Resume Incomplete = chunk accepted, more expected
        if status.as_u16() == 308 {
            return Ok(ChunkOutcome::Accepted);
        }

        if status.is_success() {
            let video_response: VideoUploadResponse = response.json().await?;
            return Ok(ChunkOutcome::Complete(video_response));
        }

        let error_text = response.text().await?;
        tracing::error!("Failed to upload chunk: {}", error_text);
        Err(format!("Failed to upload chunk: {}", error_text).into())
    }
}

impl Default for YouTubeClient {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Google OAuth Helpers
// ============================================================================

/// Build the Google OAuth consent URL for obtaining a refresh token.
/// `access_type=offline` is what makes Google return one.
pub fn build_authorization_url(
    client_id: &str,
    redirect_uri: &str,
    scopes: &[&str],
    state: &str,
) -> String {
    let scope_string = scopes.join(" ");

    format!(
        "https://accounts.google.com/o/oauth2/v2/auth?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&state={}&prompt=consent",
        urlencoding::encode(client_id),
        urlencoding::encode(redirect_uri),
        urlencoding::encode(&scope_string),
        urlencoding::encode(state)
    )
}

/// Exchange an authorization code for access and refresh tokens
pub async fn exchange_code_for_token(
    client: &Client,
    code: &str,
    client_id: &str,
    client_secret: &str,
    redirect_uri: &str,
) -> Result<GoogleTokenResponse, ClientError> {
    let params = json!({
        "code": code,
        "client_id": client_id,
        "client_secret": client_secret,
        "redirect_uri": redirect_uri,
        "grant_type": "authorization_code"
    });

    let response = client.post(TOKEN_URL).json(&params).send().await?;

    if !response.status().is_success() {
        let error_text = response.text().await?;
        return Err(format!("Failed to exchange code: {}", error_text).into());
    }

    let token_response: GoogleTokenResponse = response.json().await?;
    Ok(token_response)
}

#[derive(Debug, Deserialize)]
pub struct GoogleTokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    pub token_type: String,
    pub scope: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_resource_serializes_with_provider_field_names() {
        let metadata = VideoResource {
            snippet: VideoSnippet {
                title: "riddle-042".to_string(),
                description: "Automated upload from Dropbox: riddle-042.mp4".to_string(),
                category_id: "22".to_string(),
                tags: Some(vec!["shorts".to_string()]),
            },
            status: VideoStatus {
                privacy_status: "public".to_string(),
            },
        };

        let value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(value["snippet"]["categoryId"], "22");
        assert_eq!(value["snippet"]["tags"][0], "shorts");
        assert_eq!(value["status"]["privacyStatus"], "public");
    }

    #[test]
    fn video_resource_omits_absent_tags() {
        let metadata = VideoResource {
            snippet: VideoSnippet {
                title: "t".to_string(),
                description: "d".to_string(),
                category_id: "22".to_string(),
                tags: None,
            },
            status: VideoStatus {
                privacy_status: "private".to_string(),
            },
        };

        let value = serde_json::to_value(&metadata).unwrap();
        assert!(value["snippet"].get("tags").is_none());
    }

    #[tokio::test]
    async fn upload_rejects_invalid_privacy_before_any_io() {
        let client = YouTubeClient::new();
        let err = client
            .upload_video(
                "token",
                Path::new("does-not-exist.mp4"),
                "title",
                "description",
                "friends-only",
                None,
                None,
            )
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Invalid privacy status"));
    }

    #[test]
    fn authorization_url_encodes_scope_and_state() {
        let url = build_authorization_url(
            "client-id",
            "https://developers.google.com/oauthplayground",
            &["https://www.googleapis.com/auth/youtube.upload"],
            "abc123",
        );

        assert!(url.contains("client_id=client-id"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("state=abc123"));
        assert!(url.contains(
            urlencoding::encode("https://www.googleapis.com/auth/youtube.upload").as_ref()
        ));
    }
}
