use chrono::NaiveDate;
use lifestyle_checker::config::RegistryConfig;
use lifestyle_checker::error::AppError;
use lifestyle_checker::workflows::lifestyle::{
    parse_form_date, Answer, HttpPatientRegistry, LifestyleCheckService, PatientRegistry,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type SharedService = Arc<LifestyleCheckService<dyn PatientRegistry>>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Registry client backed by the configured HTTP endpoint.
pub(crate) fn http_registry(config: &RegistryConfig) -> Result<Arc<dyn PatientRegistry>, AppError> {
    let registry = HttpPatientRegistry::new(config)?;
    Ok(Arc::new(registry))
}

pub(crate) fn lifestyle_service(registry: Arc<dyn PatientRegistry>) -> SharedService {
    Arc::new(LifestyleCheckService::new(registry))
}

/// Form dates on the command line follow the same rules as the HTTP form.
pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    parse_form_date(raw).map_err(|err| err.to_string())
}

pub(crate) fn parse_answer(raw: &str) -> Result<Answer, String> {
    raw.parse::<Answer>().map_err(|err| err.to_string())
}
