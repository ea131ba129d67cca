use orders_dispatch::config::Config;
use orders_dispatch::inbound::http::{Dispatcher, HttpServer, HttpServerConfig};
use orders_store::memory::InMemoryConnector;
use reqwest::StatusCode;
use serde_json::{json, Value};

const TOKEN: &str = "Bearer user-jwt";

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

async fn spawn(connector: InMemoryConnector) -> (String, tokio::task::JoinHandle<()>) {
    let port = find_free_port();
    let config = HttpServerConfig {
        port: port.to_string(),
    };
    let dispatcher = Dispatcher::new(connector, &Config::default());
    let server = HttpServer::new(dispatcher, config).await.unwrap();

    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });
    // Give the server a moment to start.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    (format!("http://127.0.0.1:{port}/restful-tasks"), handle)
}

#[tokio::test]
async fn create_get_update_delete_over_http() {
    let connector = InMemoryConnector::new().with_required_credential(TOKEN);
    let (base, handle) = spawn(connector).await;
    let client = reqwest::Client::new();

    let res = client
        .post(&base)
        .header("authorization", TOKEN)
        .json(&json!({ "order": { "id": "xyz", "name": "Jane", "total_price": 42 } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "order": { "id": "xyz", "name": "Jane", "total_price": 42 } })
    );

    let res = client
        .put(format!("{base}/xyz"))
        .header("authorization", TOKEN)
        .json(&json!({ "order": { "paid": true } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "order": { "paid": true } }));

    let body: Value = client
        .get(format!("{base}/xyz"))
        .header("authorization", TOKEN)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let row = &body["order"][0];
    assert_eq!(row["paid"], json!(true));
    assert_eq!(row["name"], json!("Jane"));
    assert_eq!(row["total_price"], json!(42));

    let body: Value = client
        .get(&base)
        .header("authorization", TOKEN)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["orders"].as_array().map(Vec::len), Some(1));

    // Deleting twice succeeds both times.
    for _ in 0..2 {
        let res = client
            .delete(format!("{base}/xyz"))
            .header("authorization", TOKEN)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body, json!({ "status": "Order deleted" }));
    }

    let body: Value = client
        .get(format!("{base}/xyz"))
        .header("authorization", TOKEN)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({ "order": [] }));

    handle.abort();
}

#[tokio::test]
async fn preflight_and_rejected_credentials() {
    let connector = InMemoryConnector::new().with_required_credential(TOKEN);
    let (base, handle) = spawn(connector).await;
    let client = reqwest::Client::new();

    let res = client
        .request(reqwest::Method::OPTIONS, &base)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()["access-control-allow-headers"],
        "authorization, x-client-info, apikey"
    );
    assert_eq!(res.text().await.unwrap(), "ok");

    let res = client
        .get(format!("{base}/abc123"))
        .header("authorization", "Bearer someone-else")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.headers()["content-type"], "application/json");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "permission denied" }));

    // No credential at all is not checked up front; the store refuses it.
    let res = client.get(&base).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    handle.abort();
}

#[tokio::test]
async fn unknown_ids_and_unrouted_methods() {
    let (base, handle) = spawn(InMemoryConnector::new()).await;
    let client = reqwest::Client::new();

    let res = client.get(format!("{base}/abc123")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "order": [] }));

    // PUT without an id still parses its body, then lists everything.
    let res = client
        .put(&base)
        .json(&json!({ "order": { "paid": true } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "orders": [] }));

    handle.abort();
}
