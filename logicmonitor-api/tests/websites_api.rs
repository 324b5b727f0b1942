//! HTTP contract tests for the websites client.

use logicmonitor_api::{ApiError, WebsitesClient};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> WebsitesClient {
    WebsitesClient::builder()
        .endpoint(format!("{}/santaba/rest", server.uri()))
        .token("test-token")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_list_websites_sends_version_and_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/santaba/rest/website/websites"))
        .and(header("X-Version", "3"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 1,
            "items": [{
                "id": 42,
                "domain": "www.example.com",
                "name": "Example",
                "status": "active",
                "alertStatus": "none"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let websites = client_for(&server).list_websites().await.unwrap();
    assert_eq!(websites.len(), 1);
    assert_eq!(websites[0].id, 42);
    assert_eq!(websites[0].domain, "www.example.com");
}

#[tokio::test]
async fn test_list_websites_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/santaba/rest/website/websites"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let err = client_for(&server).list_websites().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    match err {
        ApiError::Status { body, .. } => assert_eq!(body, "unauthorized"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_performance_data_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/santaba/rest/website/websites/42/graphs/performance/data"))
        .and(query_param("start", "1700000000"))
        .and(query_param("end", "1700003600"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "timestamps": [1700000060000_i64, 1700000120000_i64],
            "lines": [
                {"legend": "Response Time - Overall", "data": [120.5, 98]}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let graph = client_for(&server)
        .performance_data(42, 1_700_000_000, 1_700_003_600)
        .await
        .unwrap();

    assert_eq!(graph.timestamps.len(), 2);
    assert_eq!(graph.lines[0].data, vec![Some(120.5), Some(98.0)]);
}

#[tokio::test]
async fn test_performance_data_without_series() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/santaba/rest/website/websites/7/graphs/performance/data"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"errmsg": "no data"}"#))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .performance_data(7, 0, 60)
        .await
        .unwrap_err();

    match err {
        ApiError::MalformedSeries { body, .. } => assert!(body.contains("no data")),
        other => panic!("unexpected error: {:?}", other),
    }
}
