//! First stage: confirm who the patient is before any questions are asked.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::dates::{age_in_years, parse_form_date, parse_registry_date};
use super::domain::{
    FormField, FormatField, Identifier, RegistryRecord, RejectionReason, SubjectClaim,
    ValidationOutcome, MINIMUM_AGE,
};
use super::registry::{PatientRegistry, RegistryError};

/// Claim that passed the local checks and may be sent to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedClaim {
    pub identifier: Identifier,
    pub family_name: String,
    pub birth_date: NaiveDate,
    pub age: u32,
}

/// Local input checks, in fixed order, stopping at the first failure.
///
/// Nothing here touches the registry, so every rejection is returned before a lookup is made.
pub fn check_claim(claim: &SubjectClaim, today: NaiveDate) -> Result<CheckedClaim, RejectionReason> {
    if claim.identifier.trim().is_empty() {
        return Err(RejectionReason::MissingField(FormField::Identifier));
    }
    if claim.family_name.trim().is_empty() {
        return Err(RejectionReason::MissingField(FormField::FamilyName));
    }
    let birth_date = claim
        .birth_date
        .ok_or(RejectionReason::MissingField(FormField::BirthDate))?;

    let identifier = Identifier::parse(&claim.identifier)
        .ok_or(RejectionReason::InvalidFormat(FormatField::Identifier))?;

    let age = age_in_years(birth_date, today);
    if age < MINIMUM_AGE {
        return Err(RejectionReason::NotEligible);
    }

    Ok(CheckedClaim {
        identifier,
        family_name: claim.family_name.trim().to_string(),
        birth_date,
        age,
    })
}

/// Build a claim from raw form text, where the birth date is still a `YYYY-MM-DD` string.
///
/// An unreadable date is reported as `InvalidFormat(BirthDate)` only after the presence checks
/// and the identifier format check have passed, so the usual rejection order still holds.
pub fn claim_from_text(
    identifier: &str,
    family_name: &str,
    birth_date: &str,
) -> Result<SubjectClaim, RejectionReason> {
    let parsed = if birth_date.trim().is_empty() {
        None
    } else {
        match parse_form_date(birth_date) {
            Ok(date) => Some(date),
            Err(err) => {
                debug!(error = %err, "unreadable birth date on form");
                return Err(unreadable_date_rejection(identifier, family_name));
            }
        }
    };

    Ok(SubjectClaim::new(identifier, family_name, parsed))
}

fn unreadable_date_rejection(identifier: &str, family_name: &str) -> RejectionReason {
    if identifier.trim().is_empty() {
        RejectionReason::MissingField(FormField::Identifier)
    } else if family_name.trim().is_empty() {
        RejectionReason::MissingField(FormField::FamilyName)
    } else if Identifier::parse(identifier).is_none() {
        RejectionReason::InvalidFormat(FormatField::Identifier)
    } else {
        RejectionReason::InvalidFormat(FormatField::BirthDate)
    }
}

/// Compare a registry record against a checked claim, returning the registry-derived age.
pub fn match_record(
    claim: &CheckedClaim,
    record: &RegistryRecord,
    today: NaiveDate,
) -> Result<u32, RejectionReason> {
    let registry_birth = parse_registry_date(&record.birth_date).map_err(|err| {
        warn!(error = %err, "registry returned an unreadable birth date");
        RejectionReason::UnexpectedError
    })?;

    let age = age_in_years(registry_birth, today);
    if age < MINIMUM_AGE {
        return Err(RejectionReason::NotEligible);
    }

    let name_matches =
        record.family_name().to_uppercase() == claim.family_name.trim().to_uppercase();
    let birth_matches = registry_birth == claim.birth_date;
    if !name_matches || !birth_matches {
        debug!(name_matches, birth_matches, "registry record disagrees with claim");
        return Err(RejectionReason::RecordMismatch);
    }

    Ok(age)
}

fn rejection_for(err: &RegistryError) -> RejectionReason {
    match err {
        RegistryError::NotFound => RejectionReason::RecordMismatch,
        RegistryError::Status(_) | RegistryError::Transport(_) | RegistryError::Decode(_) => {
            RejectionReason::UnexpectedError
        }
    }
}

/// Runs one submission: local checks, a single registry lookup, then the cross-check.
pub struct IdentityValidator<R: ?Sized> {
    registry: Arc<R>,
}

impl<R: ?Sized> Clone for IdentityValidator<R> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<R> IdentityValidator<R>
where
    R: PatientRegistry + ?Sized,
{
    pub fn new(registry: Arc<R>) -> Self {
        Self { registry }
    }

    pub async fn validate(&self, claim: &SubjectClaim, today: NaiveDate) -> ValidationOutcome {
        let checked = match check_claim(claim, today) {
            Ok(checked) => checked,
            Err(reason) => {
                info!(reason = reason.kind(), "identity submission rejected locally");
                return ValidationOutcome::Rejected(reason);
            }
        };

        self.confirm(&checked, today).await
    }

    /// Registry half of a submission for a claim that already passed `check_claim`.
    pub async fn confirm(&self, checked: &CheckedClaim, today: NaiveDate) -> ValidationOutcome {
        let record = match self.registry.lookup(&checked.identifier).await {
            Ok(record) => record,
            Err(err) => {
                let reason = rejection_for(&err);
                match &err {
                    RegistryError::NotFound => info!("no registry record for submission"),
                    _ => warn!(error = %err, "registry lookup failed"),
                }
                return ValidationOutcome::Rejected(reason);
            }
        };

        match match_record(checked, &record, today) {
            Ok(age) => {
                info!(age, "identity validated");
                ValidationOutcome::Success { age }
            }
            Err(reason) => {
                info!(reason = reason.kind(), "registry cross-check rejected submission");
                ValidationOutcome::Rejected(reason)
            }
        }
    }
}

/// Where the identity form is in its submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityPhase {
    Idle,
    Submitted,
    RegistryLookup,
    Validated { age: u32 },
    Rejected(RejectionReason),
}

/// View model for the identity stage: the three inputs plus the last outcome.
#[derive(Debug, Clone)]
pub struct IdentityForm {
    claim: SubjectClaim,
    phase: IdentityPhase,
}

impl Default for IdentityForm {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityForm {
    pub fn new() -> Self {
        Self {
            claim: SubjectClaim::default(),
            phase: IdentityPhase::Idle,
        }
    }

    pub fn set_identifier(&mut self, value: impl Into<String>) {
        self.claim.identifier = value.into();
    }

    pub fn set_family_name(&mut self, value: impl Into<String>) {
        self.claim.family_name = value.into();
    }

    pub fn set_birth_date(&mut self, value: Option<NaiveDate>) {
        self.claim.birth_date = value;
    }

    pub fn claim(&self) -> &SubjectClaim {
        &self.claim
    }

    pub fn phase(&self) -> IdentityPhase {
        self.phase
    }

    /// Message for the most recent submission, replacing any earlier one.
    pub fn message(&self) -> Option<&'static str> {
        self.outcome().map(|outcome| outcome.message())
    }

    pub fn outcome(&self) -> Option<ValidationOutcome> {
        match self.phase {
            IdentityPhase::Validated { age } => Some(ValidationOutcome::Success { age }),
            IdentityPhase::Rejected(reason) => Some(ValidationOutcome::Rejected(reason)),
            IdentityPhase::Idle | IdentityPhase::Submitted | IdentityPhase::RegistryLookup => None,
        }
    }

    /// Submit the current field values. Field values survive a rejection so the patient can
    /// correct them and try again.
    pub async fn submit<R>(
        &mut self,
        validator: &IdentityValidator<R>,
        today: NaiveDate,
    ) -> ValidationOutcome
    where
        R: PatientRegistry + ?Sized,
    {
        self.phase = IdentityPhase::Submitted;

        let outcome = match check_claim(&self.claim, today) {
            Ok(checked) => {
                self.phase = IdentityPhase::RegistryLookup;
                validator.confirm(&checked, today).await
            }
            Err(reason) => {
                info!(reason = reason.kind(), "identity submission rejected locally");
                ValidationOutcome::Rejected(reason)
            }
        };

        self.phase = match outcome {
            ValidationOutcome::Success { age } => IdentityPhase::Validated { age },
            ValidationOutcome::Rejected(reason) => IdentityPhase::Rejected(reason),
        };
        outcome
    }
}
