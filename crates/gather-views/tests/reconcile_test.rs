/// View reconcilers against a canned loopback backend: derivation after a
/// real fetch, the optimistic join path with its reconciling refetch, and
/// the profile cache fallback.
mod support;

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use gather_client::{ApiClient, Config};
use gather_store::Store;
use gather_types::models::{FeedbackKind, UserProfile};
use gather_views::events_page::EventsView;
use gather_views::home::{FeedbackDraft, HomeView};
use gather_views::notice::NoticeKind;
use gather_views::profile::ProfileView;

use support::TestServer;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 6).unwrap()
}

fn now() -> chrono::NaiveDateTime {
    today().and_hms_opt(9, 0, 0).unwrap()
}

fn api_for(server: &TestServer) -> (ApiClient, Arc<Store>) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let store = Arc::new(Store::in_memory().unwrap());
    store.set_token("tok").unwrap();
    store.set_user_id("u1").unwrap();
    let api = ApiClient::new(
        Config {
            base_url: server.base_url(),
        },
        store.clone(),
    );
    (api, store)
}

fn events_body(joined: bool) -> String {
    let attendees = if joined { r#"["u1"]"# } else { "[]" };
    format!(
        r#"[
            {{"_id": "e1", "title": "Tomorrow", "date": "2025-08-07", "time": "10:00",
              "attendees": {attendees}, "eventstatus": "upcoming"}},
            {{"_id": "e2", "title": "Long gone", "date": "2025-08-01", "time": "10:00",
              "attendees": ["u2"], "eventstatus": "finished"}},
            {{"_id": "e3", "title": "Far out", "date": "2025-09-01",
              "attendees": ["u1", "u2"], "eventstatus": "upcoming"}}
        ]"#
    )
}

#[tokio::test]
async fn load_derives_joined_set_and_partitions() {
    let server = TestServer::start(|_, path| match path {
        "/api/events/getAllEvents" => (200, events_body(false)),
        p if p.starts_with("/api/feedbacks/user/") => (
            200,
            r#"[{"_id": "f1", "userId": "u1", "eventId": {"_id": "e2"},
                 "type": "positive", "rating": 4}]"#
                .to_string(),
        ),
        _ => (404, "{}".to_string()),
    })
    .await;
    let (api, _store) = api_for(&server);

    let mut view = HomeView::new(Some("u1".to_string()));
    view.load(&api, today()).await;

    assert!(view.error().is_none());
    assert_eq!(view.events().len(), 3);

    // u1 attends only e3; the joined set tracks attendee membership exactly.
    let joined = view.joined();
    assert_eq!(joined.len(), 1);
    assert!(joined.contains("e3"));

    // Date-only partition: e1 (tomorrow) and e3 available, e2 past.
    let available: Vec<_> = view.available_page(today()).iter().map(|e| e.id.clone()).collect();
    assert_eq!(available, vec!["e1", "e3"]);
    let past: Vec<_> = view.past_page(today()).iter().map(|e| e.id.clone()).collect();
    assert_eq!(past, vec!["e2"]);

    // The feedback arrived with an embedded event id and still matches.
    assert_eq!(view.feedbacks().len(), 1);
    assert_eq!(view.feedbacks()[0].event_id.id(), "e2");
}

#[tokio::test]
async fn join_applies_optimistically_then_reconciles_with_the_refetch() {
    let joined_flag = Arc::new(Mutex::new(false));
    let flag = joined_flag.clone();
    let server = TestServer::start(move |method, path| match path {
        "/api/events/getAllEvents" => (200, events_body(*flag.lock().unwrap())),
        "/api/events/attendEvent/e1" if method == "POST" => {
            *flag.lock().unwrap() = true;
            (200, "{}".to_string())
        }
        "/api/events/cancelEventAttendance/e1" if method == "POST" => {
            *flag.lock().unwrap() = false;
            (200, "{}".to_string())
        }
        _ => (404, "{}".to_string()),
    })
    .await;
    let (api, _store) = api_for(&server);

    let mut view = HomeView::new(Some("u1".to_string()));
    view.load(&api, today()).await;
    assert!(!view.joined().contains("e1"));

    view.join_event(&api, "e1", now()).await;

    // The refetch confirmed the optimistic join.
    assert!(view.joined().contains("e1"));
    let kinds: Vec<_> = view.notices.iter().map(|n| n.kind).collect();
    assert!(kinds.contains(&NoticeKind::Success));

    // Round-trip: cancel restores the pre-join membership.
    view.cancel_event(&api, "e1", now()).await;
    assert!(!view.joined().contains("e1"));
    assert!(!*joined_flag.lock().unwrap());
}

#[tokio::test]
async fn rejected_join_rolls_the_overlay_back() {
    let server = TestServer::start(|method, path| match path {
        "/api/events/getAllEvents" => (200, events_body(false)),
        "/api/events/attendEvent/e1" if method == "POST" => {
            (409, r#"{"message": "Event is full"}"#.to_string())
        }
        _ => (404, "{}".to_string()),
    })
    .await;
    let (api, _store) = api_for(&server);

    let mut view = HomeView::new(Some("u1".to_string()));
    view.load(&api, today()).await;

    view.join_event(&api, "e1", now()).await;

    assert!(!view.joined().contains("e1"));
    let error = view
        .notices
        .iter()
        .find(|n| n.kind == NoticeKind::Error)
        .expect("an error notice");
    assert_eq!(error.message, "Event is full");
}

#[tokio::test]
async fn deadline_gating_blocks_without_touching_the_network() {
    let server = TestServer::start(|_, path| match path {
        "/api/events/getAllEvents" => (200, events_body(false)),
        _ => (404, "{}".to_string()),
    })
    .await;
    let (api, _store) = api_for(&server);

    let mut view = HomeView::new(Some("u1".to_string()));
    view.load(&api, today()).await;
    let before = server.requests().len();

    // e1 starts tomorrow 10:00; 20 hours out is inside the join cutoff.
    let close_now = today().and_hms_opt(14, 0, 0).unwrap();
    view.join_event(&api, "e1", close_now).await;

    assert!(!view.joined().contains("e1"));
    assert_eq!(server.requests().len(), before);
    assert!(view
        .notices
        .iter()
        .any(|n| n.kind == NoticeKind::Warning && n.title == "Registration Deadline Passed"));

    // A finished event is refused by the status check, not the cutoff.
    view.join_event(&api, "e2", now()).await;
    assert!(view
        .notices
        .iter()
        .any(|n| n.title == "Event Completed"));
}

#[tokio::test]
async fn second_fresh_feedback_becomes_an_update() {
    let update_hits = Arc::new(Mutex::new(0usize));
    let hits = update_hits.clone();
    let server = TestServer::start(move |method, path| match (method, path) {
        ("GET", "/api/events/getAllEvents") => (200, events_body(false)),
        ("GET", p) if p.starts_with("/api/feedbacks/user/") => (
            200,
            r#"[{"_id": "f1", "userId": "u1", "eventId": "e2", "type": "neutral", "rating": 3}]"#
                .to_string(),
        ),
        ("PUT", "/api/feedbacks/f1") => {
            *hits.lock().unwrap() += 1;
            (200, "{}".to_string())
        }
        ("POST", "/api/feedbacks/create") => {
            panic!("duplicate feedback must route to update, not create")
        }
        _ => (404, "{}".to_string()),
    })
    .await;
    let (api, _store) = api_for(&server);

    let mut view = EventsView::new(Some("u1".to_string()));
    view.load(&api).await;
    assert!(view.feedback_for("e2").is_some());
    assert!(!view.can_open_feedback_form("e2"));

    view.submit_feedback(
        &api,
        "e2",
        FeedbackDraft {
            comment: "even better the second time".into(),
            kind: FeedbackKind::Positive,
            rating: 5,
            is_anonymous: false,
        },
    )
    .await;

    assert_eq!(*update_hits.lock().unwrap(), 1);
}

#[tokio::test]
async fn profile_falls_back_to_the_cached_copy() {
    let server = TestServer::start(|_, path| match path {
        p if p.starts_with("/api/users/getUserbyId/") => {
            (500, r#"{"message": "database offline"}"#.to_string())
        }
        _ => (404, "{}".to_string()),
    })
    .await;
    let (api, store) = api_for(&server);

    store
        .cache_profile(&UserProfile {
            id: "u1".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone: "0123456789".into(),
        })
        .unwrap();

    let mut view = ProfileView::new(Some("u1".to_string()));
    view.load(&api, &store).await;

    let profile = view.profile().expect("cached profile");
    assert_eq!(profile.display_name(), "Ada Lovelace");
    // The page is usable, so the fetch failure is not surfaced as an error.
    assert!(view.error().is_none());
}
