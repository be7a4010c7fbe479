use realtime_http::{HttpClient, HttpError, RequestOpts};
use serde_json::{Value, json};
use std::borrow::Cow;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpClient {
    HttpClient::new(&format!("{}/realtime/", server.uri())).expect("client builds")
}

#[tokio::test]
async fn get_json_sends_query_and_decodes_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/realtime/api/v1/transition"))
        .and(query_param("p", "rust"))
        .and(query_param("interval", "900"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let got: Value = client_for(&server)
        .get_json(
            "api/v1/transition",
            RequestOpts {
                query: Some(vec![("p", Cow::Borrowed("rust")), ("interval", "900".into())]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(got, json!({"ok": true}));
}

#[tokio::test]
async fn get_text_returns_html_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/realtime/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>hi</html>"))
        .mount(&server)
        .await;

    let html = client_for(&server)
        .get_text("search", RequestOpts::default())
        .await
        .unwrap();
    assert_eq!(html, "<html>hi</html>");
}

#[tokio::test]
async fn non_success_status_is_an_error_and_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/realtime/api/v1/pagination"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"message": "maintenance"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_json::<Value>("api/v1/pagination", RequestOpts::default())
        .await
        .unwrap_err();

    match err {
        HttpError::Status { status, message } => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(message, "maintenance");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn undecodable_json_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_json::<Value>("api/v1/autoscroll", RequestOpts::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::Decode(_, ref snip) if snip == "not json"));
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    // Port 9 (discard) on localhost is expected to refuse connections.
    let client = HttpClient::new("http://127.0.0.1:9/").unwrap();
    let err = client
        .get_text("", RequestOpts::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::Network(_)));
}
