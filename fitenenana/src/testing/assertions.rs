//! HTMX-specific assertion helpers

use axum_test::TestResponse;

/// Assert that the response carries `HX-Refresh: true`
///
/// # Panics
///
/// Panics if the header is missing or not `true`
pub fn assert_hx_refresh(response: &TestResponse) {
    let header = response
        .headers()
        .get("HX-Refresh")
        .expect("HX-Refresh header not found");
    assert_eq!(header, "true", "Expected HX-Refresh: true");
}

/// Assert that an `HX-Trigger-After-Settle` header names the expected event
///
/// # Panics
///
/// Panics if the header is missing or doesn't contain the event
pub fn assert_hx_trigger_after_settle(response: &TestResponse, expected_event: &str) {
    let header = response
        .headers()
        .get("HX-Trigger-After-Settle")
        .expect("HX-Trigger-After-Settle header not found");
    let actual = header
        .to_str()
        .expect("Invalid HX-Trigger-After-Settle header value");
    assert!(
        actual.contains(expected_event),
        "Expected HX-Trigger-After-Settle to contain {expected_event}, got {actual}"
    );
}

/// Assert that the body contains the screen with the given element id
///
/// # Panics
///
/// Panics if the screen section is missing
pub fn assert_screen(response: &TestResponse, screen_id: &str) {
    let body = response.text();
    let marker = format!(r#"<section id="{screen_id}""#);
    assert!(body.contains(&marker), "Expected screen {screen_id}, got {body}");
}
