use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::workflows::lifestyle::domain::{Identifier, RegistryRecord, SubjectClaim};
use crate::workflows::lifestyle::registry::{PatientRegistry, RegistryError};
use crate::workflows::lifestyle::validator::IdentityValidator;

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn doe_record(born: &str) -> RegistryRecord {
    RegistryRecord {
        identifier: "111222333".to_string(),
        full_name: "DOE, John".to_string(),
        birth_date: born.to_string(),
    }
}

pub(super) fn doe_claim() -> SubjectClaim {
    SubjectClaim::new("111222333", "Doe", Some(date(2005, 1, 14)))
}

#[derive(Debug, Clone)]
pub(super) enum StubReply {
    Record(RegistryRecord),
    NotFound,
    Status(u16),
    Transport,
}

/// Registry double answering from a fixed table and recording each lookup.
#[derive(Debug, Default)]
pub(super) struct StubRegistry {
    replies: HashMap<String, StubReply>,
    calls: Mutex<Vec<String>>,
}

impl StubRegistry {
    pub(super) fn with(identifier: &str, reply: StubReply) -> Self {
        let mut registry = Self::default();
        registry.replies.insert(identifier.to_string(), reply);
        registry
    }

    pub(super) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }
}

#[async_trait::async_trait]
impl PatientRegistry for StubRegistry {
    async fn lookup(&self, identifier: &Identifier) -> Result<RegistryRecord, RegistryError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(identifier.as_str().to_string());

        match self.replies.get(identifier.as_str()) {
            Some(StubReply::Record(record)) => Ok(record.clone()),
            Some(StubReply::Status(code)) => Err(RegistryError::Status(*code)),
            Some(StubReply::Transport) => {
                Err(RegistryError::Transport("connection reset".to_string()))
            }
            Some(StubReply::NotFound) | None => Err(RegistryError::NotFound),
        }
    }
}

pub(super) fn doe_registry(born: &str) -> Arc<StubRegistry> {
    Arc::new(StubRegistry::with(
        "111222333",
        StubReply::Record(doe_record(born)),
    ))
}

pub(super) fn validator(registry: &Arc<StubRegistry>) -> IdentityValidator<StubRegistry> {
    IdentityValidator::new(Arc::clone(registry))
}
