use mock_server::Settings;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_TRACING_LEVEL: &str = "mock_server=debug,tower_http=debug";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = mock_server::optional_env_file(dotenvy::dotenv())?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_TRACING_LEVEL.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    if let Some(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded .env overrides");
    }

    let api_key = std::env::var("TEST_API_KEY")
        .map_err(|_| "TEST_API_KEY environment variable is required")?;
    let mut settings = Settings::new(api_key);
    if let Ok(public_url) = std::env::var("PUBLIC_URL") {
        settings.public_url = public_url;
    }

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on {addr}");
    mock_server::run(listener, settings).await?;
    Ok(())
}
