// Environment-driven configuration. A .env file is honored via dotenvy
// before this is read (see main).

use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_DROPBOX_FOLDER: &str = "/Riddles Shorts";
const DEFAULT_STAGING_DIR: &str = "downloads";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    MissingVar(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub dropbox_token: String,
    pub youtube_client_id: String,
    pub youtube_client_secret: String,
    pub youtube_refresh_token: String,
    pub dropbox_folder: String,
    pub staging_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            dropbox_token: required_var("DROPBOX_TOKEN")?,
            youtube_client_id: required_var("YOUTUBE_CLIENT_ID")?,
            youtube_client_secret: required_var("YOUTUBE_CLIENT_SECRET")?,
            youtube_refresh_token: required_var("YOUTUBE_REFRESH_TOKEN")?,
            dropbox_folder: std::env::var("DROPBOX_FOLDER")
                .unwrap_or_else(|_| DEFAULT_DROPBOX_FOLDER.to_string()),
            staging_dir: std::env::var("STAGING_DIR")
                .unwrap_or_else(|_| DEFAULT_STAGING_DIR.to_string())
                .into(),
        })
    }
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name))
}
