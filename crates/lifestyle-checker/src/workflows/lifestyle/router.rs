use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{RejectionReason, ValidationOutcome, VALIDATION_SUCCESS_MESSAGE};
use super::questionnaire::{
    AgeBand, Answers, Recommendation, ScoreComponent, ScoringError, INVALID_AGE_MESSAGE,
};
use super::registry::PatientRegistry;
use super::service::LifestyleCheckService;
use super::validator::claim_from_text;

/// Identity details as submitted by the form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidateRequest {
    #[serde(default)]
    pub nhs_number: String,
    #[serde(default)]
    pub surname: String,
    /// `YYYY-MM-DD`; blank when the picker was left empty.
    #[serde(default)]
    pub date_of_birth: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatedResponse {
    pub status: String,
    pub age: u32,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoreRequest {
    pub age: u32,
    #[serde(default)]
    pub answers: Answers,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub band: AgeBand,
    pub score: u32,
    pub recommendation: Recommendation,
    pub message: String,
    pub components: Vec<ScoreComponent>,
}

/// Router exposing the two stages over HTTP.
pub fn lifestyle_router<R>(service: Arc<LifestyleCheckService<R>>) -> Router
where
    R: PatientRegistry + ?Sized + 'static,
{
    Router::new()
        .route("/api/v1/lifestyle/validate", post(validate_handler::<R>))
        .route("/api/v1/lifestyle/score", post(score_handler::<R>))
        .with_state(service)
}

pub(crate) fn rejection_status(reason: RejectionReason) -> StatusCode {
    match reason {
        RejectionReason::MissingField(_) | RejectionReason::InvalidFormat(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        RejectionReason::NotEligible => StatusCode::FORBIDDEN,
        RejectionReason::RecordMismatch => StatusCode::NOT_FOUND,
        RejectionReason::UnexpectedError => StatusCode::BAD_GATEWAY,
    }
}

fn rejection_response(reason: RejectionReason) -> Response {
    let field = match reason {
        RejectionReason::MissingField(field) => Some(field.key()),
        RejectionReason::InvalidFormat(field) => Some(field.key()),
        _ => None,
    };
    let payload = json!({
        "error_kind": reason.kind(),
        "field": field,
        "message": reason.message(),
    });
    (rejection_status(reason), axum::Json(payload)).into_response()
}

/// Unreadable request bodies use the same error shape as every other rejection.
fn malformed_body_response(rejection: JsonRejection) -> Response {
    let payload = json!({
        "error_kind": "malformed_request",
        "field": null,
        "message": rejection.body_text(),
    });
    (rejection.status(), axum::Json(payload)).into_response()
}

pub(crate) async fn validate_handler<R>(
    State(service): State<Arc<LifestyleCheckService<R>>>,
    payload: Result<axum::Json<ValidateRequest>, JsonRejection>,
) -> Response
where
    R: PatientRegistry + ?Sized + 'static,
{
    let request = match payload {
        Ok(axum::Json(request)) => request,
        Err(rejection) => return malformed_body_response(rejection),
    };
    let claim = match claim_from_text(&request.nhs_number, &request.surname, &request.date_of_birth)
    {
        Ok(claim) => claim,
        Err(reason) => return rejection_response(reason),
    };

    match service.validate(&claim).await {
        ValidationOutcome::Success { age } => {
            let body = ValidatedResponse {
                status: "validated".to_string(),
                age,
                message: VALIDATION_SUCCESS_MESSAGE.to_string(),
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        ValidationOutcome::Rejected(reason) => rejection_response(reason),
    }
}

pub(crate) async fn score_handler<R>(
    State(service): State<Arc<LifestyleCheckService<R>>>,
    payload: Result<axum::Json<ScoreRequest>, JsonRejection>,
) -> Response
where
    R: PatientRegistry + ?Sized + 'static,
{
    let request = match payload {
        Ok(axum::Json(request)) => request,
        Err(rejection) => return malformed_body_response(rejection),
    };
    match service.score(request.age, &request.answers) {
        Ok(result) => {
            let body = ScoreResponse {
                band: result.band,
                score: result.total,
                recommendation: result.recommendation,
                message: result.message().to_string(),
                components: result.components,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => {
            let message = match error {
                ScoringError::InvalidAge(_) => INVALID_AGE_MESSAGE.to_string(),
                ScoringError::IncompleteAnswers(question) => {
                    format!("Please answer: {}", question.prompt())
                }
            };
            let payload = json!({
                "error_kind": error.kind(),
                "error": error.to_string(),
                "message": message,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}
