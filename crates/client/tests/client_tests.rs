//! Integration tests for the management API client

use serde_json::json;
use stirrup_client::{ClientError, ManagementClient};
use stirrup_core::{ApiError, ManagementApi};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn builder_requires_base_url() {
    let result = ManagementClient::builder().build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn builder_normalizes_base_url() {
    let client = ManagementClient::new("https://mgmt.example.com/v3/").unwrap();
    assert_eq!(client.base_url(), "https://mgmt.example.com/v3");
}

#[tokio::test]
async fn authenticate_installs_token_on_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3"))
        .and(header("authorization", "Bearer good-tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let client = ManagementClient::new(mock_server.uri()).unwrap();
    client.authenticate("good-tok").await.unwrap();
    assert_eq!(client.token().await.as_deref(), Some("good-tok"));
}

#[tokio::test]
async fn failed_authentication_keeps_previous_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&mock_server)
        .await;

    let client = ManagementClient::builder()
        .base_url(mock_server.uri())
        .token("original")
        .build()
        .unwrap();

    let result = client.authenticate("bad-tok").await;
    assert!(matches!(result, Err(ApiError::AuthenticationFailed(_))));
    assert_eq!(client.token().await.as_deref(), Some("original"));
}

#[tokio::test]
async fn login_posts_credentials_with_ttl_in_millis() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3-public/localProviders/local"))
        .and(query_param("action", "login"))
        .and(body_partial_json(json!({
            "username": "admin",
            "password": "admin",
            "ttl": 3_600_000
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"token": "login-tok"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ManagementClient::new(mock_server.uri()).unwrap();
    let token = client.login("admin", "admin", 60).await.unwrap();
    assert_eq!(token, "login-tok");
}

#[tokio::test]
async fn version_segment_in_base_url_is_not_duplicated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/settings/server-url"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "server-url",
            "value": "https://mgmt.example.com"
        })))
        .mount(&mock_server)
        .await;

    let client = ManagementClient::new(format!("{}/v3", mock_server.uri())).unwrap();
    let value = client.get_setting("server-url").await.unwrap();
    assert_eq!(value, "https://mgmt.example.com");
}

#[tokio::test]
async fn upsert_setting_updates_in_place() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v3/settings/telemetry-opt"))
        .and(body_partial_json(json!({"name": "telemetry-opt", "value": "in"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ManagementClient::new(mock_server.uri()).unwrap();
    client.upsert_setting("telemetry-opt", "in").await.unwrap();
}

#[tokio::test]
async fn upsert_setting_creates_when_absent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v3/settings/server-url"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v3/settings"))
        .and(body_partial_json(json!({
            "name": "server-url",
            "value": "https://mgmt.example.com"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ManagementClient::new(mock_server.uri()).unwrap();
    client
        .upsert_setting("server-url", "https://mgmt.example.com")
        .await
        .unwrap();
}

#[tokio::test]
async fn create_token_converts_ttl_to_millis() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/tokens"))
        .and(body_partial_json(json!({
            "description": "bootstrap admin token",
            "ttl": 1_800_000
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "tok-1",
            "token": "tok-1:secret"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ManagementClient::new(mock_server.uri()).unwrap();
    let created = client
        .create_token("admin", "bootstrap admin token", 30)
        .await
        .unwrap();
    assert_eq!(created.id, "tok-1");
    assert_eq!(created.token, "tok-1:secret");
}

#[tokio::test]
async fn create_token_with_zero_ttl_never_expires() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/tokens"))
        .and(body_partial_json(json!({"ttl": 0})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "tok-1",
            "token": "tok-1:secret"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ManagementClient::new(mock_server.uri()).unwrap();
    client.create_token("admin", "desc", 0).await.unwrap();
}

#[tokio::test]
async fn delete_token_by_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v3/tokens/tok-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ManagementClient::new(mock_server.uri()).unwrap();
    client.delete_token("tok-1").await.unwrap();
}

#[tokio::test]
async fn set_password_resolves_user_by_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/users"))
        .and(query_param("username", "admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "user-abc", "username": "admin"}]
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v3/users/user-abc"))
        .and(query_param("action", "setpassword"))
        .and(body_partial_json(json!({"newPassword": "s3cret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "password": "s3cret",
            "user": {"id": "user-abc", "username": "admin"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ManagementClient::new(mock_server.uri()).unwrap();
    let reset = client
        .set_password_by_username("admin", "s3cret")
        .await
        .unwrap();
    assert_eq!(reset.password, "s3cret");
    assert_eq!(reset.user.id, "user-abc");
    assert_eq!(reset.user.username, "admin");
}

#[tokio::test]
async fn unknown_user_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&mock_server)
        .await;

    let client = ManagementClient::new(mock_server.uri()).unwrap();
    let result = client.set_password_by_username("ghost", "pw").await;
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn error_statuses_map_to_variants() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3/settings/forbidden"))
        .respond_with(ResponseTemplate::new(403).set_body_string("no"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3/settings/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let client = ManagementClient::new(mock_server.uri()).unwrap();

    let forbidden = client.get_setting("forbidden").await;
    assert!(matches!(forbidden, Err(ApiError::Forbidden(_))));

    let broken = client.get_setting("broken").await;
    assert!(matches!(broken, Err(ApiError::Server { status: 500, .. })));
}
