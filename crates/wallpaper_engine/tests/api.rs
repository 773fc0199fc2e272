mod common;

use common::{link_child, listing, preview_child, USER_AGENT};
use wallpaper_core::FetchMode;
use wallpaper_engine::{
    user_agent_for, AccessToken, ApiSettings, AuthError, Credentials, FailureKind, FetchSettings,
    ListingApi, RedditClient, PRODUCT_TOKEN,
};
use wiremock::matchers::{basic_auth, bearer_token, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> RedditClient {
    let settings = ApiSettings {
        auth_base: format!("{}/api/v1", server.uri()),
        oauth_base: server.uri(),
        user_agent: USER_AGENT.to_string(),
        page_limit: 100,
    };
    RedditClient::new(settings, &FetchSettings::default()).unwrap()
}

fn credentials() -> Credentials {
    Credentials {
        client_id: "cid".to_string(),
        client_secret: "csecret".to_string(),
        username: "tester".to_string(),
        password: "hunter2".to_string(),
    }
}

#[tokio::test]
async fn authenticate_uses_password_grant_with_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .and(basic_auth("cid", "csecret"))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("username=tester"))
        .and(body_string_contains("password=hunter2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "tok-123",
            "token_type": "bearer",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = client(&server).authenticate(&credentials()).await.unwrap();
    assert_eq!(token.secret(), "tok-123");
}

#[tokio::test]
async fn authenticate_fails_on_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client(&server).authenticate(&credentials()).await.unwrap_err();
    assert!(matches!(err, AuthError::Status(401)));
}

#[tokio::test]
async fn authenticate_fails_on_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "error": "invalid_grant" })),
        )
        .mount(&server)
        .await;

    let err = client(&server).authenticate(&credentials()).await.unwrap_err();
    assert!(matches!(err, AuthError::Rejected(ref message) if message.contains("invalid_grant")));
}

#[tokio::test]
async fn authenticate_fails_on_unparsable_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client(&server).authenticate(&credentials()).await.unwrap_err();
    assert!(matches!(err, AuthError::Malformed(_)));
}

#[tokio::test]
async fn browse_requests_the_default_feed_after_the_cursor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/wallpapers.json"))
        .and(bearer_token("tok"))
        .and(header("user-agent", USER_AGENT))
        .and(query_param("limit", "100"))
        .and(query_param("after", "t3_prev"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![
            link_child("a", "https://img.example.com/a.png", "default"),
            preview_child("b", "https://img.example.com/b.png", 1920, 1080, "nsfw"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server)
        .fetch_page(&AccessToken::new("tok"), "wallpapers", &FetchMode::Browse, "t3_prev")
        .await
        .unwrap();

    assert_eq!(page.raw_count, 2);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.last_id.as_deref(), Some("t3_b"));
    assert!(page.items[1].sensitive);
}

#[tokio::test]
async fn search_restricts_to_the_collection_newest_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/wallpapers/search.json"))
        .and(query_param("q", "1920x1080"))
        .and(query_param("restrict_sr", "on"))
        .and(query_param("include_over_18", "on"))
        .and(query_param("limit", "100"))
        .and(query_param("sort", "new"))
        .and(query_param("t", "all"))
        .and(query_param("after", ""))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(Vec::new())))
        .expect(1)
        .mount(&server)
        .await;

    let mode = FetchMode::Search {
        query: "1920x1080".to_string(),
    };
    let page = client(&server)
        .fetch_page(&AccessToken::new("tok"), "wallpapers", &mode, "")
        .await
        .unwrap();
    assert_eq!(page.raw_count, 0);
}

#[tokio::test]
async fn listing_failures_are_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/down.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/r/garbled.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"data\": 5}"))
        .mount(&server)
        .await;

    let api = client(&server);
    let token = AccessToken::new("tok");

    let err = api
        .fetch_page(&token, "down", &FetchMode::Browse, "")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));

    let err = api
        .fetch_page(&token, "garbled", &FetchMode::Browse, "")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Parse);
}

#[test]
fn secrets_stay_out_of_debug_output() {
    let rendered = format!("{:?} {:?}", credentials(), AccessToken::new("tok-123"));
    assert!(!rendered.contains("hunter2"));
    assert!(!rendered.contains("csecret"));
    assert!(!rendered.contains("tok-123"));
}

#[test]
fn default_user_agent_names_an_owner() {
    assert_eq!(user_agent_for("tester"), "wallpaper_server/0.1 by /u/tester");
    let defaults = ApiSettings::default();
    assert!(defaults.user_agent.starts_with(PRODUCT_TOKEN));
    assert!(defaults.user_agent.contains(" by /u/"));
}
