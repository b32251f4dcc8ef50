//! Two-stage lifestyle check: identity validation against the patient registry, then an
//! age-banded lifestyle questionnaire.

pub mod dates;
pub mod domain;
pub mod questionnaire;
pub mod registry;
pub mod router;
pub mod service;
pub mod validator;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use dates::{age_in_years, parse_form_date, parse_registry_date, DateParseError};
pub use domain::{
    FormField, FormatField, Identifier, RegistryRecord, RejectionReason, SubjectClaim, ValidationOutcome,
    MINIMUM_AGE,
};
pub use questionnaire::{
    compute_score, AgeBand, Answer, Answers, Question, Questionnaire, Recommendation,
    ScoreComponent, ScoreResult, ScoreWeights, ScoringError,
};
pub use registry::{HttpPatientRegistry, PatientRegistry, RegistryClientError, RegistryError};
pub use router::lifestyle_router;
pub use service::LifestyleCheckService;
pub use validator::{IdentityForm, IdentityPhase, IdentityValidator};
pub use wizard::{LifestyleWizard, Stage, WizardError};
