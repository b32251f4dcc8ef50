use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::lifestyle::router::lifestyle_router;
use crate::workflows::lifestyle::service::LifestyleCheckService;

fn app(registry: Arc<StubRegistry>) -> axum::Router {
    let service = LifestyleCheckService::new(registry).with_fixed_date(today());
    lifestyle_router(Arc::new(service))
}

async fn post_json(app: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds");

    let response = app.oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let payload = serde_json::from_slice(&bytes).expect("json body");
    (status, payload)
}

#[tokio::test]
async fn validate_endpoint_returns_age_on_success() {
    let (status, body) = post_json(
        app(doe_registry("14-01-2005")),
        "/api/v1/lifestyle/validate",
        json!({ "nhs_number": "111222333", "surname": "Doe", "date_of_birth": "2005-01-14" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "validated");
    assert_eq!(body["age"], 20);
    assert_eq!(body["message"], "Validation successful");
}

#[tokio::test]
async fn validate_endpoint_maps_rejections_to_statuses() {
    let cases = [
        (
            json!({ "surname": "Doe", "date_of_birth": "2005-01-14" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "missing_field",
            "Please enter your NHS number",
        ),
        (
            json!({ "nhs_number": "12345", "surname": "Doe", "date_of_birth": "2005-01-14" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid_format",
            "Please enter a valid NHS number",
        ),
        (
            json!({ "nhs_number": "111222333", "surname": "Doe", "date_of_birth": "2010-01-14" }),
            StatusCode::FORBIDDEN,
            "not_eligible",
            "You are not eligible for this service",
        ),
        (
            json!({ "nhs_number": "111222333", "surname": "Smith", "date_of_birth": "2005-01-14" }),
            StatusCode::NOT_FOUND,
            "record_mismatch",
            "Your details could not be found",
        ),
        (
            json!({ "nhs_number": "999888777", "surname": "Doe", "date_of_birth": "2005-01-14" }),
            StatusCode::NOT_FOUND,
            "record_mismatch",
            "Your details could not be found",
        ),
    ];

    for (request, status, kind, message) in cases {
        let (actual, body) = post_json(
            app(doe_registry("14-01-2005")),
            "/api/v1/lifestyle/validate",
            request.clone(),
        )
        .await;
        assert_eq!(actual, status, "{request}");
        assert_eq!(body["error_kind"], kind, "{request}");
        assert_eq!(body["message"], message, "{request}");
    }
}

#[tokio::test]
async fn validate_endpoint_reports_upstream_faults_as_bad_gateway() {
    let registry = Arc::new(StubRegistry::with("111222333", StubReply::Status(503)));
    let (status, body) = post_json(
        app(registry),
        "/api/v1/lifestyle/validate",
        json!({ "nhs_number": "111222333", "surname": "Doe", "date_of_birth": "2005-01-14" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "An unexpected error occurred");
}

#[tokio::test]
async fn score_endpoint_returns_band_and_breakdown() {
    let (status, body) = post_json(
        app(doe_registry("14-01-2005")),
        "/api/v1/lifestyle/score",
        json!({ "age": 50, "answers": { "q1": "yes", "q2": "no", "q3": "no" } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["band"], "C");
    assert_eq!(body["score"], 5);
    assert_eq!(body["recommendation"], "improvement_recommended");
    assert_eq!(body["components"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn score_endpoint_rejects_invalid_age_and_blank_answers() {
    let (status, body) = post_json(
        app(doe_registry("14-01-2005")),
        "/api/v1/lifestyle/score",
        json!({ "age": 15, "answers": { "q1": "yes", "q2": "no", "q3": "no" } }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Invalid age supplied");

    let (status, body) = post_json(
        app(doe_registry("14-01-2005")),
        "/api/v1/lifestyle/score",
        json!({ "age": 30, "answers": { "q1": "yes", "q2": "", "q3": "no" } }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Please answer: Do you drink alcohol?");
}

#[tokio::test]
async fn malformed_bodies_use_the_rejection_shape() {
    let (status, body) = post_json(
        app(doe_registry("14-01-2005")),
        "/api/v1/lifestyle/score",
        json!({ "answers": { "q1": "yes", "q2": "no", "q3": "no" } }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_kind"], "malformed_request");
    assert!(body["message"].as_str().is_some_and(|text| text.contains("age")));

    let (status, body) = post_json(
        app(doe_registry("14-01-2005")),
        "/api/v1/lifestyle/validate",
        json!("not an object"),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_kind"], "malformed_request");
    assert_eq!(body["field"], Value::Null);
}

#[tokio::test]
async fn scorer_rejections_are_tagged() {
    let (status, body) = post_json(
        app(doe_registry("14-01-2005")),
        "/api/v1/lifestyle/score",
        json!({ "age": 15, "answers": { "q1": "yes", "q2": "no", "q3": "no" } }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_kind"], "invalid_age");
}
