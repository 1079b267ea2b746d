mod common;

use actix_web::{http::StatusCode, test as actix_test};
use common::TestApplication;
use minimal_weather_api::{
    AuthAuditEvent, AuthEventOutcome, AuthEventType, create_app, models::audit,
};
use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex},
};
use tracing::{
    Event, Subscriber,
    field::{Field, Visit},
};
use tracing_subscriber::{
    Layer,
    layer::{Context, SubscriberExt},
};

type Fields = HashMap<String, String>;

/// Collects the fields of every `auth_audit` event
#[derive(Clone, Default)]
struct AuditCapture {
    events: Arc<Mutex<Vec<Fields>>>,
}

impl AuditCapture {
    fn events(&self) -> Vec<Fields> {
        self.events.lock().unwrap().clone()
    }
}

#[derive(Default)]
struct FieldCollector(Fields);

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }
}

impl<S: Subscriber> Layer<S> for AuditCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target() != "auth_audit" {
            return;
        }
        let mut collector = FieldCollector::default();
        event.record(&mut collector);
        collector
            .0
            .insert("level".to_string(), event.metadata().level().to_string());
        self.events.lock().unwrap().push(collector.0);
    }
}

/// Install the capture for the current thread; the actix test runtime is
/// single-threaded so middleware events land here too
fn capture_audit_events() -> (AuditCapture, tracing::subscriber::DefaultGuard) {
    let capture = AuditCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let guard = tracing::subscriber::set_default(subscriber);
    (capture, guard)
}

#[actix_web::test]
async fn test_rejected_token_emits_failure_audit_event() {
    let (capture, _guard) = capture_audit_events();
    let application = TestApplication::new();
    let app = actix_test::init_service(create_app(application.config())).await;

    // A syntactically broken token, from an identifiable client
    let req = actix_test::TestRequest::get()
        .uri("/weatherforecast")
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .insert_header(("User-Agent", "audit-test-agent"))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;

    // Audit logging must not change the outcome of the request
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let events = capture.events();
    assert_eq!(events.len(), 1, "Exactly one audit event expected: {events:?}");
    let event = &events[0];
    assert_eq!(event["event_type"], "TokenRejected");
    assert_eq!(event["outcome"], "Failure");
    assert_eq!(event["level"], "WARN");
    assert_eq!(event["method"], "GET");
    assert_eq!(event["endpoint"], "/weatherforecast");
    assert_eq!(event["user_agent"], "Some(\"audit-test-agent\")");
    assert!(
        event["reason"].contains("invalid bearer token"),
        "Reason should describe the rejection, got: {}",
        event["reason"]
    );
}

#[actix_web::test]
async fn test_missing_token_emits_missing_audit_event() {
    let (capture, _guard) = capture_audit_events();
    let application = TestApplication::new();
    let app = actix_test::init_service(create_app(application.config())).await;

    let req = actix_test::TestRequest::get()
        .uri("/weatherforecast")
        .to_request();
    let resp = actix_test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let events = capture.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["event_type"], "TokenMissing");
    assert_eq!(events[0]["outcome"], "Failure");
}

#[actix_web::test]
async fn test_accepted_token_emits_success_audit_event() {
    let (capture, _guard) = capture_audit_events();
    let application = TestApplication::new();
    let app = actix_test::init_service(create_app(application.config())).await;

    let req = application
        .authorized_get("audited-user", "/weatherforecast")
        .insert_header(("X-Request-ID", "audit-req-1"))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);

    let events = capture.events();
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event["event_type"], "TokenAccepted");
    assert_eq!(event["outcome"], "Success");
    assert_eq!(event["level"], "INFO");
    assert_eq!(event["subject"], "Some(\"audited-user\")");
    // The request ID middleware runs first, so its ID is on the audit record
    assert_eq!(event["request_id"], "Some(\"audit-req-1\")");
}

#[actix_web::test]
async fn test_anonymous_routes_emit_no_audit_event() {
    let (capture, _guard) = capture_audit_events();
    let application = TestApplication::new();
    let app = actix_test::init_service(create_app(application.config())).await;

    // The OpenAPI viewer is not guarded in Development
    let req = actix_test::TestRequest::get().uri("/swagger").to_request();
    let resp = actix_test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(capture.events().is_empty());
}

#[test]
fn test_audit_event_creation() {
    let event = AuthAuditEvent::new(
        AuthEventType::TokenAccepted,
        AuthEventOutcome::Success,
        "192.168.1.100".to_string(),
        "GET".to_string(),
        "/weatherforecast".to_string(),
    )
    .with_subject(Some("abc".to_string()))
    .with_user_agent(Some("Test Agent".to_string()))
    .with_request_id(Some("req-1".to_string()));

    // Verify event properties
    assert_eq!(event.ip_address, "192.168.1.100");
    assert_eq!(event.subject, Some("abc".to_string()));
    assert_eq!(event.user_agent, Some("Test Agent".to_string()));
    assert_eq!(event.reason, None);

    // Verify the event serializes with snake_case enum values
    let json = serde_json::to_string(&event).expect("Should serialize to JSON");
    assert!(json.contains("token_accepted"), "JSON should contain event type");
    assert!(json.contains("\"success\""), "JSON should contain outcome");
    assert!(json.contains("req-1"), "JSON should contain request ID");

    // Verify event can be deserialized from JSON
    let parsed: audit::AuthAuditEvent =
        serde_json::from_str(&json).expect("Should deserialize from JSON");
    assert_eq!(parsed.event_type, AuthEventType::TokenAccepted);
    assert_eq!(parsed.outcome, AuthEventOutcome::Success);
}

#[test]
fn test_failure_event_carries_reason() {
    let (capture, _guard) = capture_audit_events();
    let event = AuthAuditEvent::new(
        AuthEventType::TokenRejected,
        AuthEventOutcome::Failure,
        "10.0.0.1".to_string(),
        "GET".to_string(),
        "/weatherforecast".to_string(),
    )
    .with_reason(Some("ExpiredSignature".to_string()));

    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["event_type"], "token_rejected");
    assert_eq!(json["outcome"], "failure");
    assert_eq!(json["reason"], "ExpiredSignature");
    assert!(json["subject"].is_null());

    // Logging emits exactly one warn-level record carrying the reason
    event.log();
    let events = capture.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["level"], "WARN");
    assert_eq!(events[0]["reason"], "Some(\"ExpiredSignature\")");
}
