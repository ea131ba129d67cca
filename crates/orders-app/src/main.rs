use orders_dispatch::config::Config;
use orders_dispatch::inbound::http::{Dispatcher, HttpServer, HttpServerConfig};
use orders_store::{build_connector, Connector, StoreSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for SUPABASE_URL / SUPABASE_ANON_KEY / SERVER_PORT when present.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let config = Config::from_env()?;
    let settings = StoreSettings::from_env()?;
    let connector: Connector = build_connector(&settings).await?;
    tracing::info!(route = %config.route, reject_unrouted = config.reject_unrouted, "orders endpoint configured");

    let server_cfg = HttpServerConfig {
        port: config.server_port.clone(),
    };

    let http = HttpServer::new(Dispatcher::new(connector, &config), server_cfg).await?;
    http.run().await
}
