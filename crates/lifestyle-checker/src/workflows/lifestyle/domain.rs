use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Minimum age, in whole years, accepted by the lifestyle service.
pub const MINIMUM_AGE: u32 = 16;

const IDENTIFIER_DIGITS: usize = 9;

/// Registry identifier: exactly nine ASCII digits once whitespace is removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Strip all whitespace and accept the remainder only if it is nine digits.
    pub fn parse(raw: &str) -> Option<Self> {
        let cleaned: String = raw.chars().filter(|ch| !ch.is_whitespace()).collect();
        let well_formed = cleaned.len() == IDENTIFIER_DIGITS
            && cleaned.bytes().all(|byte| byte.is_ascii_digit());
        well_formed.then_some(Self(cleaned))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Details a patient enters in the first stage, exactly as typed.
///
/// `birth_date` is `None` while the date picker is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectClaim {
    pub identifier: String,
    pub family_name: String,
    pub birth_date: Option<NaiveDate>,
}

impl SubjectClaim {
    pub fn new(
        identifier: impl Into<String>,
        family_name: impl Into<String>,
        birth_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            family_name: family_name.into(),
            birth_date,
        }
    }
}

/// Record returned by the registry for an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryRecord {
    #[serde(rename = "nhsNumber")]
    pub identifier: String,
    /// `"SURNAME, Given"`.
    #[serde(rename = "name")]
    pub full_name: String,
    /// `DD-MM-YYYY`.
    #[serde(rename = "born")]
    pub birth_date: String,
}

impl RegistryRecord {
    /// Family name as the text before the first comma.
    pub fn family_name(&self) -> &str {
        self.full_name
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
    }
}

/// Inputs on the identity form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    Identifier,
    FamilyName,
    BirthDate,
}

impl FormField {
    pub fn key(&self) -> &'static str {
        match self {
            FormField::Identifier => "identifier",
            FormField::FamilyName => "familyName",
            FormField::BirthDate => "birthDate",
        }
    }
}

/// Inputs whose content is checked for shape, not just presence. Any non-blank surname is
/// accepted as typed and left to the registry cross-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormatField {
    Identifier,
    BirthDate,
}

impl FormatField {
    pub fn key(&self) -> &'static str {
        self.form_field().key()
    }

    pub fn form_field(&self) -> FormField {
        match self {
            FormatField::Identifier => FormField::Identifier,
            FormatField::BirthDate => FormField::BirthDate,
        }
    }
}

/// Reasons a submission can be turned away, each with a single user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "field", rename_all = "snake_case")]
pub enum RejectionReason {
    MissingField(FormField),
    InvalidFormat(FormatField),
    NotEligible,
    RecordMismatch,
    UnexpectedError,
}

impl RejectionReason {
    pub fn message(&self) -> &'static str {
        match self {
            RejectionReason::MissingField(FormField::Identifier) => "Please enter your NHS number",
            RejectionReason::MissingField(FormField::FamilyName) => "Please enter your surname",
            RejectionReason::MissingField(FormField::BirthDate) => {
                "Please enter your date of birth"
            }
            RejectionReason::InvalidFormat(FormatField::Identifier) => {
                "Please enter a valid NHS number"
            }
            RejectionReason::InvalidFormat(FormatField::BirthDate) => {
                "Please enter a valid date of birth"
            }
            RejectionReason::NotEligible => "You are not eligible for this service",
            RejectionReason::RecordMismatch => "Your details could not be found",
            RejectionReason::UnexpectedError => "An unexpected error occurred",
        }
    }

    /// Stable snake_case tag for logs and API payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            RejectionReason::MissingField(_) => "missing_field",
            RejectionReason::InvalidFormat(_) => "invalid_format",
            RejectionReason::NotEligible => "not_eligible",
            RejectionReason::RecordMismatch => "record_mismatch",
            RejectionReason::UnexpectedError => "unexpected_error",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

pub const VALIDATION_SUCCESS_MESSAGE: &str = "Validation successful";

/// Terminal result of one identity submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationOutcome {
    Success { age: u32 },
    Rejected(RejectionReason),
}

impl ValidationOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            ValidationOutcome::Success { .. } => VALIDATION_SUCCESS_MESSAGE,
            ValidationOutcome::Rejected(reason) => reason.message(),
        }
    }

    pub fn validated_age(&self) -> Option<u32> {
        match self {
            ValidationOutcome::Success { age } => Some(*age),
            ValidationOutcome::Rejected(_) => None,
        }
    }
}
