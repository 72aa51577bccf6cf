use rstest::rstest;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::reqwest_client::ReqwestClient;
use super::{Error, HttpClient, Response, StatusCode, format_headers};

fn response(status: u16, body: &[u8]) -> Response {
    Response {
        status: StatusCode(status),
        body: body.to_vec(),
        url: "http://backend/api/companies/requests/7".to_owned(),
    }
}

#[test]
fn test_status_code_classes() {
    assert!(StatusCode(204).is_success());
    assert!(!StatusCode(302).is_success());
    assert!(!StatusCode(503).is_success());
    assert!(StatusCode(404).is_not_found());
    assert!(!StatusCode(410).is_not_found());
}

#[test]
fn test_authorization_header_is_redacted() {
    let headers = [
        ("Authorization".to_owned(), "Bearer secret".to_owned()),
        ("Accept".to_owned(), "application/json".to_owned()),
    ]
    .into_iter()
    .collect();

    assert_eq!(
        format_headers(&headers),
        "Accept: application/json, Authorization: <redacted>"
    );
}

#[rstest]
#[case(br#"{ "message": "  Reason is required  " }"#.as_slice(), Some("Reason is required"))]
#[case(br#"{ "message": "   " }"#.as_slice(), None)]
#[case(br#"{ "message": 42 }"#.as_slice(), None)]
#[case(b"<html>Bad gateway</html>".as_slice(), None)]
fn test_backend_message(#[case] body: &[u8], #[case] expected: Option<&str>) {
    assert_eq!(response(422, body).backend_message().as_deref(), expected);
}

#[tokio::test]
async fn test_patch_sends_json_and_bearer_token() {
    let mock_server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/companies/requests/7"))
        .and(header("Authorization", "Bearer token"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({ "status": "approved" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 7 })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/companies/requests/7", mock_server.uri());
    let response = ReqwestClient::default()
        .patch(&url)
        .bearer_auth("token")
        .json(json!({ "status": "approved" }))
        .unwrap()
        .send()
        .await
        .unwrap();

    assert!(response.status.is_success());
    assert_eq!(response.url, url);
    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["id"], 7);
}

#[tokio::test]
async fn test_error_status_is_returned_as_response() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "Database offline" })),
        )
        .mount(&mock_server)
        .await;

    let response = ReqwestClient::default()
        .get(&mock_server.uri())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode(500));
    assert_eq!(response.backend_message().as_deref(), Some("Database offline"));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let result = ReqwestClient::default()
        .get("http://127.0.0.1:1/companies/requests")
        .send()
        .await;

    assert!(matches!(result, Err(Error::Transport(_))));
}
