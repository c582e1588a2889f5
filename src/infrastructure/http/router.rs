use crate::infrastructure::http::controllers::enquiries;
use crate::infrastructure::http::middleware::AppState;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

pub const ADMIN_ENQUIRIES_PATH: &str = "/api/admin/enquiries";

pub fn build_router(state: AppState) -> Router {
    let admin = Router::new().route(
        ADMIN_ENQUIRIES_PATH,
        get(enquiries::list_enquiries).delete(enquiries::delete_enquiry),
    );

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root_handler() -> &'static str {
    "Enquiry Desk Admin API"
}

async fn health_handler() -> &'static str {
    "OK"
}
