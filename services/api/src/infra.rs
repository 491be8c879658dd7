use bootcamp::auth::ResumeStore;
use bootcamp::config::AppConfig;
use bootcamp::http::ApiContext;
use bootcamp::repository::InMemoryStore;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Services wired to a fresh in-memory store; the process owns all state.
pub(crate) fn in_memory_context<S>(
    resumes: Arc<S>,
    config: &AppConfig,
) -> Arc<ApiContext<InMemoryStore, S>>
where
    S: ResumeStore + 'static,
{
    let store = Arc::new(InMemoryStore::new());
    Arc::new(ApiContext::new(store, resumes, config))
}
