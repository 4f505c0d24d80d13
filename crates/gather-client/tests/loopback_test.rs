/// Integration test: drive the resource clients against a canned HTTP
/// server on loopback and verify the request/normalization contract.
mod support;

use std::sync::Arc;

use gather_client::{ApiClient, ApiError, Config};
use gather_store::Store;

use support::TestServer;

fn client_for(server: &TestServer) -> ApiClient {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let store = Arc::new(Store::in_memory().unwrap());
    ApiClient::new(
        Config {
            base_url: server.base_url(),
        },
        store,
    )
}

fn client_with_token(server: &TestServer, token: &str) -> ApiClient {
    let store = Arc::new(Store::in_memory().unwrap());
    store.set_token(token).unwrap();
    ApiClient::new(
        Config {
            base_url: server.base_url(),
        },
        store,
    )
}

#[tokio::test]
async fn list_events_decodes_wire_shapes() {
    let server = TestServer::start(|_, path| match path {
        "/api/events/getAllEvents" => (
            200,
            r#"[
                {"_id": "e1", "title": "Conf", "date": "2025-08-06T00:00:00.000Z",
                 "time": "10:00", "attendees": ["u1"], "eventstatus": "upcoming"},
                {"_id": "e2", "title": "Meetup", "date": "2025-09-01"}
            ]"#
            .to_string(),
        ),
        _ => (404, "{}".to_string()),
    })
    .await;

    let api = client_for(&server);
    let events = api.events().list().await.unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].id, "e1");
    assert!(events[0].has_attendee("u1"));
    assert!(events[1].time.is_none());
}

#[tokio::test]
async fn not_found_reads_normalize_to_empty() {
    let server = TestServer::start(|_, _| (404, r#"{"message": "nothing here"}"#.to_string())).await;
    let api = client_for(&server);

    assert!(api.events().list().await.unwrap().is_empty());
    assert!(api.events().get_by_id("missing").await.unwrap().is_none());
    assert!(api.feedbacks().by_user("u1").await.unwrap().is_empty());
    assert!(api.users().profile("u1").await.unwrap().is_none());
}

#[tokio::test]
async fn server_message_field_becomes_the_error_text() {
    let server = TestServer::start(|method, _| {
        if method == "POST" {
            (422, r#"{"message": "Event date is in the past"}"#.to_string())
        } else {
            (200, "[]".to_string())
        }
    })
    .await;
    let api = client_for(&server);

    let err = api.events().attend("e1", "u1").await.unwrap_err();
    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status.as_u16(), 422);
            assert_eq!(message, "Event date is in the past");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn error_field_and_generic_fallback() {
    let server = TestServer::start(|_, path| match path {
        "/api/events/attendEvent/e1" => (400, r#"{"error": "already attending"}"#.to_string()),
        _ => (500, r#"{"unrelated": true}"#.to_string()),
    })
    .await;
    let api = client_for(&server);

    let err = api.events().attend("e1", "u1").await.unwrap_err();
    assert_eq!(err.to_string(), "already attending");

    let err = api.events().delete("e9").await.unwrap_err();
    assert_eq!(err.to_string(), "An error occurred");
}

#[tokio::test]
async fn bearer_token_is_attached_when_present() {
    let server = TestServer::start(|_, _| (200, "[]".to_string())).await;
    let api = client_with_token(&server, "tok-123");

    api.events().list().await.unwrap();

    let requests = server.requests();
    assert_eq!(
        requests[0].authorization.as_deref(),
        Some("Bearer tok-123")
    );
}

#[tokio::test]
async fn no_token_means_no_authorization_header() {
    let server = TestServer::start(|_, _| (200, "[]".to_string())).await;
    let api = client_for(&server);

    api.events().list().await.unwrap();

    assert!(server.requests()[0].authorization.is_none());
}

#[tokio::test]
async fn attend_posts_the_user_id_to_the_event_path() {
    let server = TestServer::start(|_, _| (200, "{}".to_string())).await;
    let api = client_for(&server);

    api.events().attend("e7", "u9").await.unwrap();

    let requests = server.requests();
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/api/events/attendEvent/e7");
    let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(body["userId"], "u9");
}

#[tokio::test]
async fn wrapped_feedback_list_is_unwrapped() {
    let server = TestServer::start(|_, _| {
        (
            200,
            r#"{"feedbacks": [
                {"_id": "f1", "userId": "u1", "eventId": {"_id": "e1"},
                 "type": "positive", "rating": 5, "isAnonymous": true}
            ]}"#
            .to_string(),
        )
    })
    .await;
    let api = client_for(&server);

    let feedbacks = api.feedbacks().by_user("u1").await.unwrap();
    assert_eq!(feedbacks.len(), 1);
    assert_eq!(feedbacks[0].event_id.id(), "e1");
    assert!(feedbacks[0].is_anonymous);
}

#[tokio::test]
async fn garbage_success_body_is_a_decode_error() {
    let server = TestServer::start(|_, _| (200, r#"{"surprise": "shape"}"#.to_string())).await;
    let api = client_for(&server);

    let err = api.events().list().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn connection_refused_is_a_network_error() {
    // Bind-then-drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = Arc::new(Store::in_memory().unwrap());
    let api = ApiClient::new(
        Config {
            base_url: format!("http://{}/api", addr),
        },
        store,
    );

    let err = api.events().list().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(err.to_string(), "Network error. Please check your connection.");
}
