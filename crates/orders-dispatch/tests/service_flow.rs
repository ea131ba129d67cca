use orders_dispatch::application::order_service::OrderService;
use orders_store::memory::InMemoryConnector;
use orders_types::domain::order::OrderPatch;
use orders_types::ports::order_store::StoreConnector;
use serde_json::json;

// End-to-end service flow against the in-memory adapter, one handle per "request".
#[tokio::test]
async fn create_list_update_delete_flow() {
    let connector = InMemoryConnector::new();
    let request = || OrderService::new(connector.connect(Some("Bearer eve")).unwrap());

    let order: OrderPatch = serde_json::from_value(json!({
        "name": "Eve",
        "email": "eve@example.com",
        "cart_products": ["gadget"],
        "cart_price": 21.5
    }))
    .unwrap();
    let echo = request().create(order.clone()).await.unwrap();
    assert_eq!(echo.order, order);

    let list = request().fetch_all().await.unwrap().orders;
    assert_eq!(list.len(), 1);
    let id = list[0]["id"].as_str().unwrap().to_string();

    let patch: OrderPatch = serde_json::from_value(json!({ "approved": true })).unwrap();
    request().update(&id, patch).await.unwrap();
    let fetched = request().fetch_one(&id).await.unwrap().order;
    assert_eq!(fetched[0]["approved"], json!(true));
    assert_eq!(fetched[0]["email"], json!("eve@example.com"));

    request().delete(&id).await.unwrap();
    let after_delete = request().fetch_all().await.unwrap().orders;
    assert!(after_delete.is_empty());
}
