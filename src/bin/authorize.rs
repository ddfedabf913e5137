// One-shot helper to obtain a YouTube refresh token for the uploader.
// Prints the Google consent URL, then exchanges the pasted code.

use rand::RngCore;
use std::io::{self, Write};

use shorts_uploader::youtube_client::{build_authorization_url, exchange_code_for_token};

const UPLOAD_SCOPE: &str = "https://www.googleapis.com/auth/youtube.upload";
const DEFAULT_REDIRECT_URI: &str = "https://developers.google.com/oauthplayground";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    println!("📺 Shorts Uploader - YouTube Authorization");
    println!("==========================================");

    // Load environment variables
    dotenvy::dotenv().ok();

    let client_id = std::env::var("YOUTUBE_CLIENT_ID")
        .expect("YOUTUBE_CLIENT_ID must be set in the environment or .env file");
    let client_secret = std::env::var("YOUTUBE_CLIENT_SECRET")
        .expect("YOUTUBE_CLIENT_SECRET must be set in the environment or .env file");
    let redirect_uri = std::env::var("YOUTUBE_REDIRECT_URI")
        .unwrap_or_else(|_| DEFAULT_REDIRECT_URI.to_string());

    let mut state_bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut state_bytes);
    let state = hex::encode(state_bytes);

    let url = build_authorization_url(&client_id, &redirect_uri, &[UPLOAD_SCOPE], &state);

    println!();
    println!("Open this URL in your browser and approve access:");
    println!("{}", url);
    println!();

    print!("Paste the authorization code here: ");
    io::stdout().flush()?;
    let mut code = String::new();
    io::stdin().read_line(&mut code)?;
    let code = code.trim();

    if code.is_empty() {
        eprintln!("❌ No authorization code provided");
        return Ok(());
    }

    let client = reqwest::Client::new();
    let token =
        exchange_code_for_token(&client, code, &client_id, &client_secret, &redirect_uri).await?;

    match token.refresh_token {
        Some(refresh_token) => {
            println!();
            println!("✅ Authorization complete! Add this to your environment:");
            println!();
            println!("YOUTUBE_REFRESH_TOKEN={}", refresh_token);
        }
        None => {
            eprintln!("❌ Google returned no refresh token.");
            eprintln!("   Revoke the app's access at https://myaccount.google.com/permissions");
            eprintln!("   and run this command again.");
        }
    }

    Ok(())
}
