//! End-to-end tests for a scripted test-step flow: stage inputs, perform a
//! (simulated) call, record the outcome, and read it back in later steps.

use rest_testkit::models::{RequestDescriptor, ResponseDescriptor};
use rest_testkit::projector::{stage_recorded, VariableProjector};
use rest_testkit::random::{generate_user_info, one_of_value};
use rest_testkit::recorder::{RecordOptions, ResponseRecorder};
use rest_testkit::store::{InMemoryStore, ScopedStore, VariableStore};
use serde_json::{json, Map, Value};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn path(segments: &str) -> Vec<String> {
    segments
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[test]
fn create_then_update_flow() {
    init_logging();
    let mut store = InMemoryStore::new();

    // Step 1: create a user and record the response
    let request = RequestDescriptor::new("create", path("/api/users/create"));
    let response = ResponseDescriptor::new(201, r#"{"id": 7, "name": "Ada"}"#);
    let scope_id = request.scope_id().unwrap();
    {
        let mut scoped = ScopedStore::new(&mut store);
        let recorded = ResponseRecorder::new(&mut scoped, &response, scope_id.as_str())
            .set("user", &RecordOptions::none())
            .unwrap();
        assert!(recorded);
    }

    // Step 2: update the user, recording under a different scope
    let request = RequestDescriptor::new("update", path("/api/users/update"));
    let response = ResponseDescriptor::new(200, r#"{"id": 7, "name": "Ada L."}"#);
    let scope_id = request.scope_id().unwrap();
    {
        let mut scoped = ScopedStore::new(&mut store);
        ResponseRecorder::new(&mut scoped, &response, scope_id.as_str())
            .set("user", &RecordOptions::none())
            .unwrap();
    }

    // Step 3: later steps see the update as most recent, but can still
    // reach the creation response by scope
    let scoped = ScopedStore::new(&mut store);
    assert_eq!(
        scoped.get("user", None).unwrap(),
        Some(json!({"id": 7, "name": "Ada L."}))
    );
    assert_eq!(
        scoped.get("user", Some("users/create")).unwrap(),
        Some(json!({"id": 7, "name": "Ada"}))
    );
}

#[test]
fn staged_identity_feeds_template_paths() {
    let mut store = InMemoryStore::new();

    let user = generate_user_info();
    let value = serde_json::to_value(&user).unwrap();
    VariableProjector::new(&mut store).set("userInfo", &value);

    // The templating layer reads flat dotted paths
    assert_eq!(store.get("userInfo.firstName"), Some(user.first_name));
    assert_eq!(store.get("userInfo.email"), Some(user.email.clone()));
    assert_eq!(store.get("userInfo.userName"), Some(user.email));
    assert_eq!(store.get("userInfo.tin"), Some(user.tin.to_string()));
}

#[test]
fn recorded_value_staged_for_next_request() {
    let mut store = InMemoryStore::new();

    {
        let mut scoped = ScopedStore::new(&mut store);
        scoped
            .set(
                "session",
                json!({"token": "abc123", "ttl": 3600}),
                "auth/login",
            )
            .unwrap();
    }

    // Pass the recorded session into the flat namespace for templating
    assert!(stage_recorded(&mut store, "session", None).unwrap());
    assert_eq!(store.get("session.token"), Some("abc123".to_string()));
    assert_eq!(store.get("session.ttl"), Some("3600".to_string()));
}

#[test]
fn failed_call_leaves_store_untouched() {
    init_logging();
    let mut store = InMemoryStore::new();

    let response = ResponseDescriptor::new(401, r#"{"error": "unauthorized"}"#);
    {
        let mut scoped = ScopedStore::new(&mut store);
        let recorded = ResponseRecorder::new(&mut scoped, &response, "auth/login")
            .set("session", &RecordOptions::none())
            .unwrap();
        assert!(!recorded);
    }

    assert!(store.is_empty());
    assert!(!stage_recorded(&mut store, "session", None).unwrap());
}

#[test]
fn request_body_with_comments_round_trips_through_store() {
    let mut store = InMemoryStore::new();

    let request = RequestDescriptor::with_body(
        "create",
        path("/api/orders/create"),
        r#"{
            // order lines
            "items": [{"sku": "A-1"}, {"sku": "B-2"}],
            "priority": 1
        }"#,
    );

    let body = request.body_json().unwrap();
    let scope_id = request.scope_id().unwrap();
    {
        let mut scoped = ScopedStore::new(&mut store);
        scoped.set("lastOrder", body.clone(), &scope_id).unwrap();
    }

    let scoped = ScopedStore::new(&mut store);
    assert_eq!(scoped.get("lastOrder", None).unwrap(), Some(body.clone()));

    // Random selection over the recorded order lines
    let items = body.get("items").unwrap();
    let picked = one_of_value(items).unwrap().unwrap();
    assert!(items.as_array().unwrap().contains(picked));
}

#[test]
fn accumulating_ids_across_steps() {
    let mut store = InMemoryStore::new();

    for (status, id) in [(201u16, 1), (201, 2), (500, 3), (201, 4)] {
        let response = ResponseDescriptor::new(status, format!(r#"{{"id": {}}}"#, id));
        let mut scoped = ScopedStore::new(&mut store);
        let mut fields = Map::new();
        fields.insert("step".to_string(), Value::from(id));
        ResponseRecorder::new(&mut scoped, &response, "orders/create")
            .push(
                "createdOrders",
                &RecordOptions::with_fields(fields),
            )
            .unwrap();
    }

    let scoped = ScopedStore::new(&mut store);
    let orders = scoped.get("createdOrders", None).unwrap().unwrap();
    let orders = orders.as_array().unwrap();

    // The failed step was skipped, the rest appended in call order
    assert_eq!(orders.len(), 3);
    assert_eq!(orders[0], json!({"id": 1, "step": 1}));
    assert_eq!(orders[2], json!({"id": 4, "step": 4}));
}
