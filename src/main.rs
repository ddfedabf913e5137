use std::sync::Arc;

use shorts_uploader::{Config, DropboxClient, ShortsUploader, SyncOutcome, SyncPipeline, YouTubeClient};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_logging().expect("Failed to initialize logging");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let source = DropboxClient::new(config.dropbox_token.clone());
    let destination = ShortsUploader::new(
        Arc::new(YouTubeClient::new()),
        config.youtube_client_id.clone(),
        config.youtube_client_secret.clone(),
        config.youtube_refresh_token.clone(),
    );

    let pipeline = SyncPipeline::new(
        source,
        destination,
        config.dropbox_folder.clone(),
        config.staging_dir.clone(),
    );

    match pipeline.run_once().await {
        Ok(SyncOutcome::NothingToDo) => {
            tracing::info!("No files found in Dropbox folder.");
        }
        Ok(SyncOutcome::Published(video)) => {
            tracing::info!("✅ Published '{}' ({})", video.title, video.url);
        }
        Err(e) => {
            tracing::error!("❌ Sync run failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    // Get log level from environment or default to INFO for production
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug,shorts_uploader=trace,reqwest=info,hyper=info".to_string()
        } else {
            "info,shorts_uploader=info,reqwest=warn,hyper=warn".to_string()
        }
    });

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log_level))?;

    let fmt_layer = if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        // JSON logging for log aggregation in the job runner
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .boxed()
    } else {
        // Human-readable logging for development
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("📦 Shorts uploader starting up...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Log level: {}", log_level);

    Ok(())
}
