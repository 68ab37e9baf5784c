//! Behavioural tests for exception handling.
//!
//! These scenarios drive real requests through an Actix application wrapped
//! with the registry's middleware and check the rendered status, body, and
//! observer events.

// `expect` is idiomatic in test code for failing fast on precondition violations.
#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, test as actix_test, web};
use exception_handler::test_support::RecordingObserver;
use exception_handler::{
    Dispatcher, ExceptionHandlingSettings, FailureSignal, HandlerRegistry, IncorrectData,
    Registration, UpstreamRelayFailure, Violation, configure_with,
};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use serde_json::{Value, json};

// ============================================================================
// Test fixtures and constants
// ============================================================================

const NEWS_SERVICE_BODY: &str = r#"{"exception":"NewsGoneException","error_message":"News with id=3 was archived","error_code":"410 GONE"}"#;

/// Failure raised by the handler under test.
#[derive(Debug, Clone)]
enum Raised {
    Signal(FailureSignal),
    Foreign(String),
}

impl Raised {
    fn into_error(self) -> actix_web::Error {
        match self {
            Self::Signal(signal) => signal.into(),
            Self::Foreign(message) => actix_web::error::ErrorServiceUnavailable(message),
        }
    }
}

/// Status and raw body observed by the client.
#[derive(Debug, Clone)]
struct Rendered {
    status: u16,
    body: Vec<u8>,
}

impl Rendered {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("body should be JSON")
    }
}

/// Test world holding the registry, the raised failure and the response.
#[derive(Default, ScenarioState)]
struct World {
    registry: Slot<HandlerRegistry>,
    observer: Slot<RecordingObserver>,
    raised: Slot<Raised>,
    rendered: Slot<Rendered>,
}

impl World {
    fn observer(&self) -> RecordingObserver {
        self.observer.get().expect("observer should be set")
    }

    fn rendered(&self) -> Rendered {
        self.rendered.get().expect("request should be handled")
    }

    fn install(&self, enabled: bool) {
        let observer = RecordingObserver::new();
        let recorder = observer.clone();
        let mut registry = HandlerRegistry::new();
        let outcome = configure_with(
            &ExceptionHandlingSettings { enabled },
            &mut registry,
            move || Dispatcher::new(Arc::new(recorder)),
        );
        let expected = if enabled {
            Registration::Registered
        } else {
            Registration::Disabled
        };
        assert_eq!(outcome, expected);
        self.registry.set(registry);
        self.observer.set(observer);
    }
}

#[fixture]
fn world() -> World {
    World::default()
}

// ============================================================================
// Given steps
// ============================================================================

#[given("exception handling is enabled")]
fn exception_handling_is_enabled(world: &World) {
    world.install(true);
}

#[given("exception handling is disabled")]
fn exception_handling_is_disabled(world: &World) {
    world.install(false);
}

#[given("a handler that reports user 7 as missing")]
fn a_handler_that_reports_user_7_as_missing(world: &World) {
    world
        .raised
        .set(Raised::Signal(FailureSignal::not_found("User with id=7 not found")));
}

#[given("a handler that rejects a news draft with two violations")]
fn a_handler_that_rejects_a_news_draft(world: &World) {
    world
        .raised
        .set(Raised::Signal(FailureSignal::constraint_violation(vec![
            Violation::new("title", "must not be blank"),
            Violation::new("text", "size must be between 1 and 2000"),
        ])));
}

#[given("a handler that relays a gone response from the news service")]
fn a_handler_that_relays_a_gone_response(world: &World) {
    let relay = UpstreamRelayFailure::decode(410, NEWS_SERVICE_BODY.as_bytes())
        .expect("news service body decodes");
    world.raised.set(Raised::Signal(relay.into()));
}

#[given("a handler that fails with an unrecognised error")]
fn a_handler_that_fails_with_an_unrecognised_error(world: &World) {
    world
        .raised
        .set(Raised::Foreign("connection pool exhausted".to_owned()));
}

#[given("a handler that denies access to guests")]
fn a_handler_that_denies_access_to_guests(world: &World) {
    world
        .raised
        .set(Raised::Signal(FailureSignal::access_denied("role=GUEST")));
}

// ============================================================================
// When steps
// ============================================================================

#[when("the request is handled")]
fn the_request_is_handled(world: &World) {
    let middleware = world
        .registry
        .get()
        .expect("registry should be set")
        .middleware();
    let raised = world.raised.get().expect("handler failure should be set");

    let rendered = actix_rt::System::new().block_on(async move {
        let app = actix_test::init_service(App::new().wrap(middleware).route(
            "/",
            web::get().to(move || {
                let failure = raised.clone();
                async move { Err::<HttpResponse, _>(failure.into_error()) }
            }),
        ))
        .await;
        let req = actix_test::TestRequest::get().uri("/").to_request();
        let res = actix_test::call_service(&app, req).await;
        let status = res.status().as_u16();
        let body = actix_test::read_body(res).await;
        Rendered {
            status,
            body: body.to_vec(),
        }
    });
    world.rendered.set(rendered);
}

// ============================================================================
// Then steps
// ============================================================================

#[then("the response status is {status}")]
fn the_response_status_is(world: &World, status: u16) {
    assert_eq!(world.rendered().status, status);
}

#[then("the body describes the missing user")]
fn the_body_describes_the_missing_user(world: &World) {
    assert_eq!(
        world.rendered().json(),
        json!({
            "exception": "EntityNotFoundException",
            "error_message": "User with id=7 not found",
            "error_code": "404 NOT_FOUND",
        })
    );
}

#[then("the body lists both violations in order")]
fn the_body_lists_both_violations_in_order(world: &World) {
    assert_eq!(
        world.rendered().json(),
        json!({
            "error_code": "409 CONFLICT",
            "violations": [
                {"field_name": "title", "error_message": "must not be blank"},
                {"field_name": "text", "error_message": "size must be between 1 and 2000"},
            ],
        })
    );
}

#[then("the body equals the upstream body")]
fn the_body_equals_the_upstream_body(world: &World) {
    let body: IncorrectData =
        serde_json::from_slice(&world.rendered().body).expect("body is an error document");
    let upstream: IncorrectData =
        serde_json::from_str(NEWS_SERVICE_BODY).expect("fixture is an error document");
    assert_eq!(body, upstream);
}

#[then("the body describes a runtime failure")]
fn the_body_describes_a_runtime_failure(world: &World) {
    assert_eq!(
        world.rendered().json(),
        json!({
            "exception": "RuntimeException",
            "error_message": "connection pool exhausted",
            "error_code": "500 INTERNAL_SERVER_ERROR",
        })
    );
}

#[then("the body is the plain failure message")]
fn the_body_is_the_plain_failure_message(world: &World) {
    assert_eq!(world.rendered().body, b"role=GUEST".to_vec());
}

#[then("exactly one failure is logged")]
fn exactly_one_failure_is_logged(world: &World) {
    let events = world.observer().events();
    assert_eq!(events.len(), 1, "unexpected events: {events:?}");
    let event = events.first().expect("one event recorded");
    assert_eq!(event.status, StatusCode::NOT_FOUND);
    assert_eq!(event.handler, "entity_not_found");
}

#[then("no failure is logged")]
fn no_failure_is_logged(world: &World) {
    assert!(world.observer().events().is_empty());
    let registry = world.registry.get().expect("registry should be set");
    assert!(registry.dispatcher().is_none());
}

// ============================================================================
// Scenario bindings
// ============================================================================

#[scenario(
    path = "tests/features/exception_handling.feature",
    name = "Missing entity renders a not-found body"
)]
fn missing_entity_renders_a_not_found_body(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/exception_handling.feature",
    name = "Constraint violations render every violation in order"
)]
fn constraint_violations_render_every_violation_in_order(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/exception_handling.feature",
    name = "Upstream failures are relayed verbatim"
)]
fn upstream_failures_are_relayed_verbatim(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/exception_handling.feature",
    name = "Unrecognised errors fall back to a runtime failure"
)]
fn unrecognised_errors_fall_back_to_a_runtime_failure(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/exception_handling.feature",
    name = "Disabled exception handling intercepts nothing"
)]
fn disabled_exception_handling_intercepts_nothing(world: World) {
    drop(world);
}
