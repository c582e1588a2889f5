use crate::application::services::EnquiryService;
use crate::config::Config;
use crate::domain::ports::enquiry_repository::EnquiryRepository;
use crate::infrastructure::http::middleware::AppState;
use crate::infrastructure::persistence::DatabaseGateway;
use std::sync::Arc;

/// Opens the store and brings its schema up to date.
pub async fn prepare_store(config: &Config) -> anyhow::Result<Arc<DatabaseGateway>> {
    let gateway = Arc::new(DatabaseGateway::new(config.database_url.clone()));

    gateway.database().await?.run_migrations().await?;
    tracing::info!("Database migrations applied");

    Ok(gateway)
}

pub fn build_app_state(enquiry_repo: Arc<dyn EnquiryRepository>) -> AppState {
    AppState {
        enquiry_service: EnquiryService::new(enquiry_repo),
    }
}
