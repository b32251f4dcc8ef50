use std::sync::Arc;

use chrono::{Local, NaiveDate};

use super::domain::{SubjectClaim, ValidationOutcome};
use super::questionnaire::{score_for_age, Answers, ScoreResult, ScoringError};
use super::registry::PatientRegistry;
use super::validator::IdentityValidator;

/// Stateless facade over both stages for request/response callers.
///
/// Each call is self-contained: the caller carries the validated age from `validate` into
/// `score`, nothing is remembered between requests.
pub struct LifestyleCheckService<R: ?Sized> {
    validator: IdentityValidator<R>,
    fixed_today: Option<NaiveDate>,
}

impl<R> LifestyleCheckService<R>
where
    R: PatientRegistry + ?Sized,
{
    pub fn new(registry: Arc<R>) -> Self {
        Self {
            validator: IdentityValidator::new(registry),
            fixed_today: None,
        }
    }

    /// Pin the evaluation date instead of reading the local clock.
    pub fn with_fixed_date(mut self, today: NaiveDate) -> Self {
        self.fixed_today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.fixed_today
            .unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn validator(&self) -> &IdentityValidator<R> {
        &self.validator
    }

    pub async fn validate(&self, claim: &SubjectClaim) -> ValidationOutcome {
        self.validator.validate(claim, self.today()).await
    }

    pub fn score(&self, age: u32, answers: &Answers) -> Result<ScoreResult, ScoringError> {
        score_for_age(age, answers)
    }
}
