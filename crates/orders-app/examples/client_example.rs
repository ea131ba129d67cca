///  To run :
///  cargo r --example client_example
use orders_client::OrdersClient;
use orders_dispatch::config::Config;
use orders_dispatch::inbound::http::{Dispatcher, HttpServer, HttpServerConfig};
use orders_store::{build_connector, Backend, StoreSettings};
use orders_types::domain::order::OrderPatch;
use serde_json::json;
use tempfile::tempdir;

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let port = find_free_port();
    let config = Config::default();
    let base = format!("http://127.0.0.1:{port}/{}", config.route);

    // Serve from a temp file-backed SQLite store.
    let tmp = tempdir()?;
    let settings = StoreSettings {
        backend: Backend::Sqlite,
        url: None,
        public_key: None,
        table: "orders".into(),
        database_url: Some(format!("sqlite://{}", tmp.path().join("orders.db").display())),
    };
    let connector = build_connector(&settings).await?;
    let server = HttpServer::new(
        Dispatcher::new(connector, &config),
        HttpServerConfig {
            port: port.to_string(),
        },
    )
    .await?;

    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let client = OrdersClient::builder(&base)?.with_bearer("example-user")?.build()?;

    let order: OrderPatch = serde_json::from_value(json!({
        "id": "example-1",
        "name": "Example",
        "email": "example@example.com",
        "total_price": 12.5
    }))?;
    let echoed = client.create_order(&order).await?;
    println!("Created order {:?}", echoed.id.flatten());

    let patch: OrderPatch = serde_json::from_value(json!({ "paid": true }))?;
    client.update_order("example-1", &patch).await?;

    let rows = client.get_order("example-1").await?;
    println!("Fetched paid={:?} updated_at={:?}", rows[0].paid, rows[0].updated_at);
    assert_eq!(rows[0].paid, Some(true));

    println!("All orders: {}", client.list_orders().await?.len());
    println!("{}", client.delete_order("example-1").await?);

    // A second delete is still a success.
    println!("{}", client.delete_order("example-1").await?);

    handle.abort();
    Ok(())
}
