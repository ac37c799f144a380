//! Request shape and success mapping against a live HTTP exchange

use bytes::Bytes;
use flora_client::{FloraClient, OperationDescriptor, Payload, Select};
use mockito::Matcher;
use serde_json::json;

use crate::integration::mock_server::{
    envelope, MockServerFixture, TEST_REFERER, TEST_TIMESTAMP,
};

#[tokio::test]
async fn test_json_response_is_decoded() {
    let mut fixture = MockServerFixture::new().await;
    let body = envelope(json!({"id": 1337, "firstname": "John", "lastname": "Doe"}));
    let mock = fixture
        .mock_json_response("GET", "/user/1337", 200, &body)
        .await;

    let client = fixture.create_test_client();
    let payload = client
        .execute(OperationDescriptor::new("user").id(1337))
        .await
        .expect("request should succeed");

    mock.assert_async().await;
    let data = payload.as_json().expect("json payload");
    assert_eq!(data["data"]["firstname"], "John");
    assert_eq!(data["error"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_non_json_success_is_returned_raw() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_text_response("/user/1337.pdf", 200, "application/pdf", "%PDF-1.4")
        .await;

    let client = fixture.create_test_client();
    let payload = client
        .execute(OperationDescriptor::new("user").id(1337).format("pdf"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(payload, Payload::Raw(Bytes::from_static(b"%PDF-1.4")));
}

#[tokio::test]
async fn test_referer_header_is_sent() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("GET", "/user/")
        .match_header("referer", TEST_REFERER)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(envelope(json!([])))
        .create_async()
        .await;

    let client = fixture.create_test_client();
    client.execute(OperationDescriptor::new("user")).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_query_parameters_and_nested_select() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_get_with_query(
            "/article/",
            vec![
                ("select", "id,title,author[firstname,lastname]"),
                ("filter", "status=published"),
                ("limit", "10"),
            ],
            &envelope(json!([])),
        )
        .await;

    let select = Select::from_value(&json!([
        "id",
        "title",
        {"author": ["firstname", "lastname"]}
    ]))
    .unwrap();

    let client = fixture.create_test_client();
    client
        .execute(
            OperationDescriptor::new("article")
                .select(select)
                .filter("status=published")
                .limit(10),
        )
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_cache_false_adds_timestamp() {
    let mut fixture = MockServerFixture::new().await;
    let timestamp = TEST_TIMESTAMP.to_string();
    let mock = fixture
        .mock_get_with_query("/user/", vec![("_", timestamp.as_str())], &envelope(json!([])))
        .await;

    let client = fixture.create_test_client();
    client
        .execute(OperationDescriptor::new("user").cache(false))
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_action_posts_form_body() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/article/1")
        .match_query(Matcher::UrlEncoded("action".into(), "update".into()))
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::Exact("title=Hello+World".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(envelope(json!({"id": 1})))
        .create_async()
        .await;

    let client = fixture.create_test_client();
    client
        .execute(
            OperationDescriptor::new("article")
                .id(1)
                .action("update")
                .param("title", "Hello World"),
        )
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_data_is_sent_as_json_body() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/article/")
        .match_query(Matcher::UrlEncoded("action".into(), "create".into()))
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({"title": "Lorem", "tags": ["a", "b"]})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(envelope(json!({"id": 2})))
        .create_async()
        .await;

    let client = fixture.create_test_client();
    client
        .execute(
            OperationDescriptor::new("article")
                .action("create")
                .data(json!({"title": "Lorem", "tags": ["a", "b"]})),
        )
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_explicit_http_method_wins() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json_response("DELETE", "/article/5", 200, &envelope(json!(null)))
        .await;

    let client = fixture.create_test_client();
    client
        .execute(OperationDescriptor::new("article").id(5).http_method("delete"))
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_long_query_switches_to_post() {
    let mut fixture = MockServerFixture::new().await;
    let filter = "a".repeat(2100);
    let mock = fixture
        .server
        .mock("POST", "/article/")
        .match_body(Matcher::UrlEncoded("filter".into(), filter.clone()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(envelope(json!([])))
        .create_async()
        .await;

    let client = fixture.create_test_client();
    client
        .execute(OperationDescriptor::new("article").filter(filter))
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_default_params_are_merged_underneath() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_get_with_query(
            "/article/",
            vec![("portalId", "2"), ("client_id", "app")],
            &envelope(json!([])),
        )
        .await;

    let client = fixture
        .client_builder()
        .default_param("portalId", 1)
        .default_param("client_id", "app")
        .build()
        .unwrap();
    client
        .execute(OperationDescriptor::new("article").param("portalId", 2))
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_base_uri_path_prefix_is_kept() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json_response("GET", "/api/v2/user/7", 200, &envelope(json!({"id": 7})))
        .await;

    let client = FloraClient::builder(format!("{}api/v2/", fixture.base_url))
        .build()
        .unwrap();
    client
        .execute(OperationDescriptor::new("user").id(7))
        .await
        .unwrap();

    mock.assert_async().await;
}

#[test]
fn test_execute_blocking_outside_runtime() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/user/1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(envelope(json!({"id": 1})))
        .create();

    let client = FloraClient::new(&format!("{}/", server.url())).unwrap();
    let payload = client
        .execute_blocking(OperationDescriptor::new("user").id(1))
        .unwrap();

    mock.assert();
    assert_eq!(payload.as_json().unwrap()["data"]["id"], 1);
}

#[tokio::test]
async fn test_execute_blocking_inside_runtime_is_rejected() {
    let client = FloraClient::new("http://localhost/").unwrap();
    let err = client
        .execute_blocking(OperationDescriptor::new("user"))
        .unwrap_err();
    assert!(matches!(err, flora_client::Error::Runtime { .. }));
}
