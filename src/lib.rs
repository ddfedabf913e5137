// lib.rs - Main library file that exports all modules
pub mod config;
pub mod dropbox_client;
pub mod sync;
pub mod youtube_client;

// Re-export commonly used types for convenience
pub use config::Config;
pub use dropbox_client::DropboxClient;
pub use sync::{ShortsUploader, SyncOutcome, SyncPipeline};
pub use youtube_client::YouTubeClient;
