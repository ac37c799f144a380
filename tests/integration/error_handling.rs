//! Integration tests for error mapping of failure statuses and transport faults

use std::time::Duration;

use flora_client::{Error, ErrorKind, FloraClient, OperationDescriptor};

use crate::integration::mock_server::{error_envelope, MockServerFixture};

#[tokio::test]
async fn test_json_error_message_is_surfaced() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json_response("GET", "/user/1337", 404, &error_envelope("Item not found"))
        .await;

    let client = fixture.create_test_client();
    let err = client
        .execute(OperationDescriptor::new("user").id(1337))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Item not found");
    assert_eq!(err.kind(), Some(ErrorKind::NotFound));
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_non_json_error_uses_reason_phrase() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_text_response("/user/", 504, "text/html", "<html>timeout</html>")
        .await;

    let client = fixture.create_test_client();
    let err = client
        .execute(OperationDescriptor::new("user"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::GatewayTimeout));
    assert_eq!(err.to_string(), "Gateway Timeout");
}

#[tokio::test]
async fn test_unmapped_status_without_message_is_runtime() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json_response("GET", "/teapot/", 418, r#"{"error":null}"#)
        .await;

    let client = fixture.create_test_client();
    let err = client
        .execute(OperationDescriptor::new("teapot"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::Runtime));
    assert_eq!(err.status(), Some(418));
}

#[tokio::test]
async fn test_each_mapped_status() {
    let cases = [
        (400, ErrorKind::BadRequest),
        (401, ErrorKind::Unauthorized),
        (403, ErrorKind::Forbidden),
        (404, ErrorKind::NotFound),
        (500, ErrorKind::Server),
        (502, ErrorKind::BadGateway),
        (503, ErrorKind::ServiceUnavailable),
        (504, ErrorKind::GatewayTimeout),
    ];

    let mut fixture = MockServerFixture::new().await;
    let client = fixture.create_test_client();
    for (status, kind) in cases {
        let resource = format!("status{status}");
        let _mock = fixture
            .mock_json_response("GET", &format!("/{resource}/"), status, &error_envelope("failed"))
            .await;
        let err = client
            .execute(OperationDescriptor::new(resource))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), Some(kind), "status {status}");
    }
}

#[tokio::test]
async fn test_connection_refused_is_transfer_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let client = FloraClient::new(&format!("http://127.0.0.1:{port}/")).unwrap();
    let err = client
        .execute(OperationDescriptor::new("user"))
        .await
        .unwrap_err();

    assert!(err.is_transfer(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_timeout_is_transfer_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    // Accept and hold connections without answering.
    let server = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let client = FloraClient::builder(format!("http://127.0.0.1:{port}/"))
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let err = client
        .execute(OperationDescriptor::new("user"))
        .await
        .unwrap_err();

    assert!(err.is_transfer(), "unexpected error: {err:?}");
    assert!(matches!(
        err,
        Error::Transfer(flora_client::transport::TransportError::Timeout(_))
    ));
    server.abort();
}

#[tokio::test]
async fn test_missing_resource_fails_before_sending() {
    let client = FloraClient::new("http://127.0.0.1:9/").unwrap();
    let err = client
        .execute(OperationDescriptor::default())
        .await
        .unwrap_err();

    assert!(err.is_implementation());
    assert!(err.to_string().starts_with("Resource must be set"));
}
