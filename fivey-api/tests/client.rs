use fivey_api::endpoints::orders::{GetOrder, ListOrders, OrderStatus, ReviseOrder};
use fivey_api::{ApiError, Client};
use fivey_auth::Session;
use wiremock::matchers::{header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    let session = Session::new("test-token".to_string());
    Client::with_base_url(&session, server.uri())
}

fn order_body() -> serde_json::Value {
    serde_json::json!({
        "id": "a1b2",
        "human_id": 512,
        "status": 0,
        "total_sum": "500.00",
        "final_sum": "520.00",
        "is_active": true,
        "address": {"house": "43", "street": "Каменноостровский проспект", "city": "Санкт-Петербург"},
        "created": "2024-11-02T18:20:00+03:00",
        "sap_code": "Y232",
        "shop_address": "Санкт-Петербург, Кронверкский пр., 23",
        "basket": {"items": []}
    })
}

#[tokio::test]
async fn send_attaches_the_session_header_set() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders/v4/orders/a1b2/"))
        .and(header("x-authorization", "Bearer test-token"))
        .and(header("x-package-name", "ru.pyaterochka.app.browser"))
        .and(header("x-platform", "android"))
        .and(header_exists("x-device-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_body()))
        .expect(1)
        .mount(&server)
        .await;

    let order = client_for(&server).send(GetOrder::new("a1b2")).await.unwrap();
    assert_eq!(order.id, "a1b2");
    assert_eq!(order.status, OrderStatus::InCart);
    assert_eq!(order.order_sum, 500.0);
    assert_eq!(order.service_sum, 20.0);
}

#[tokio::test]
async fn query_data_is_sent_as_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders/v3/orders/"))
        .and(query_param("limit", "10"))
        .and(query_param("in_action", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})))
        .mount(&server)
        .await;

    let page = client_for(&server)
        .send(ListOrders::new().limit(10u32))
        .await
        .unwrap();
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn detail_entries_come_back_as_structured_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders/v3/orders/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "detail": [
                {"type": "value_error", "loc": ["body", "qty"], "msg": "must be positive"}
            ]
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .send(ListOrders::new())
        .await
        .unwrap_err();
    match err {
        ApiError::Api { status, errors } => {
            assert_eq!(status, 400);
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].kind, "value_error");
            assert_eq!(errors[0].location, vec!["body", "qty"]);
            assert_eq!(errors[0].message, "must be positive");
        }
        other => panic!("expected ApiError::Api, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_error_bodies_are_preserved_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders/v3/orders/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .send(ListOrders::new())
        .await
        .unwrap_err();
    match err {
        ApiError::Api { status, errors } => {
            assert_eq!(status, 500);
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].kind, "Unknown");
            assert_eq!(errors[0].message, "internal error");
        }
        other => panic!("expected ApiError::Api, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_success_bodies_satisfy_empty_responses() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders/v1/orders/a1b2/revise"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    client_for(&server)
        .send(ReviseOrder::new("a1b2"))
        .await
        .unwrap();
}

#[tokio::test]
async fn malformed_success_bodies_are_decode_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders/v4/orders/a1b2/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "a1b2"})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .send(GetOrder::new("a1b2"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}
