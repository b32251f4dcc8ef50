use chrono::NaiveDate;
use tracing::info;

use super::domain::ValidationOutcome;
use super::questionnaire::{Questionnaire, ScoreResult, ScoringError};
use super::registry::PatientRegistry;
use super::validator::{IdentityForm, IdentityValidator};

/// Stage currently shown to the patient.
#[derive(Debug, Clone)]
pub enum Stage {
    Identity(IdentityForm),
    Questionnaire(Questionnaire),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("identity has already been validated")]
    IdentityComplete,
    #[error("identity has not been validated yet")]
    IdentityPending,
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

/// Controller gating the questionnaire on a successful identity check.
///
/// The validated age is handed over exactly once, when the identity stage yields
/// `ValidationOutcome::Success`; there is no way back to the identity stage afterwards.
pub struct LifestyleWizard<R: ?Sized> {
    validator: IdentityValidator<R>,
    stage: Stage,
}

impl<R> LifestyleWizard<R>
where
    R: PatientRegistry + ?Sized,
{
    pub fn new(validator: IdentityValidator<R>) -> Self {
        Self {
            validator,
            stage: Stage::Identity(IdentityForm::new()),
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn identity_form_mut(&mut self) -> Option<&mut IdentityForm> {
        match &mut self.stage {
            Stage::Identity(form) => Some(form),
            Stage::Questionnaire(_) => None,
        }
    }

    pub fn questionnaire_mut(&mut self) -> Option<&mut Questionnaire> {
        match &mut self.stage {
            Stage::Questionnaire(questionnaire) => Some(questionnaire),
            Stage::Identity(_) => None,
        }
    }

    pub async fn submit_identity(
        &mut self,
        today: NaiveDate,
    ) -> Result<ValidationOutcome, WizardError> {
        let form = match &mut self.stage {
            Stage::Identity(form) => form,
            Stage::Questionnaire(_) => return Err(WizardError::IdentityComplete),
        };

        let outcome = form.submit(&self.validator, today).await;
        if let ValidationOutcome::Success { age } = outcome {
            info!(age, "advancing to lifestyle questionnaire");
            self.stage = Stage::Questionnaire(Questionnaire::new(age));
        }
        Ok(outcome)
    }

    pub fn submit_questionnaire(&mut self) -> Result<ScoreResult, WizardError> {
        let questionnaire = self
            .questionnaire_mut()
            .ok_or(WizardError::IdentityPending)?;
        let result = questionnaire.submit()?;
        Ok(result.clone())
    }

    /// Text currently displayed for whichever stage is active.
    pub fn message(&self) -> Option<&'static str> {
        match &self.stage {
            Stage::Identity(form) => form.message(),
            Stage::Questionnaire(questionnaire) => questionnaire.message(),
        }
    }
}
