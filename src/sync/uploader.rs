// Shorts upload manager for posting staged files to YouTube

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::sync::{ClientError, PublishedVideo, UploadRequest, VideoDestination};
use crate::youtube_client::YouTubeClient;

pub struct ShortsUploader {
    youtube_client: Arc<YouTubeClient>,
    oauth_client_id: String,
    oauth_client_secret: String,
    refresh_token: String,
    cached_token: Mutex<Option<CachedToken>>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expiry: DateTime<Utc>,
}

impl ShortsUploader {
    pub fn new(
        youtube_client: Arc<YouTubeClient>,
        oauth_client_id: String,
        oauth_client_secret: String,
        refresh_token: String,
    ) -> Self {
        Self {
            youtube_client,
            oauth_client_id,
            oauth_client_secret,
            refresh_token,
            cached_token: Mutex::new(None),
        }
    }

    /// Ensure the access token is valid, refreshing it if absent or
    /// expiring within the next five minutes.
    async fn ensure_valid_token(&self) -> Result<String, ClientError> {
        let mut cached = self.cached_token.lock().await;

        let now = Utc::now();
        if let Some(token) = cached.as_ref() {
            if !expires_soon(token.expiry, now) {
                return Ok(token.access_token.clone());
            }
            tracing::info!("Access token expiring soon, refreshing...");
        }

        let new_token = self
            .youtube_client
            .refresh_access_token(
                &self.refresh_token,
                &self.oauth_client_id,
                &self.oauth_client_secret,
            )
            .await?;

        let access_token = new_token.access_token.clone();
        *cached = Some(CachedToken {
            access_token: new_token.access_token,
            expiry: now + Duration::seconds(new_token.expires_in),
        });

        Ok(access_token)
    }
}

fn expires_soon(expiry: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    expiry < now + Duration::minutes(5)
}

#[async_trait]
impl VideoDestination for ShortsUploader {
    async fn publish(
        &self,
        local_path: &Path,
        request: &UploadRequest,
    ) -> Result<PublishedVideo, ClientError> {
        let access_token = self.ensure_valid_token().await?;

        let upload_result = self
            .youtube_client
            .upload_video(
                &access_token,
                local_path,
                &request.title,
                &request.description,
                &request.privacy_status,
                Some(&request.category_id),
                Some(request.tags.clone()),
            )
            .await?;

        let url = format!("https://youtube.com/shorts/{}", upload_result.id);

        Ok(PublishedVideo {
            video_id: upload_result.id,
            title: upload_result.snippet.title,
            url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_refresh_margin_is_five_minutes() {
        let now = Utc::now();
        assert!(expires_soon(now + Duration::minutes(4), now));
        assert!(expires_soon(now - Duration::minutes(1), now));
        assert!(!expires_soon(now + Duration::minutes(6), now));
    }
}
