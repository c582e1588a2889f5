use axum::Router;
use enquiry_desk::bootstrap::build_app_state;
use enquiry_desk::domain::ports::enquiry_repository::EnquiryRepository;
use enquiry_desk::infrastructure::http::router::build_router;
use std::sync::Arc;
use tokio::net::TcpListener;

pub fn test_router(repo: Arc<dyn EnquiryRepository>) -> Router {
    build_router(build_app_state(repo))
}

/// Serves the router on an ephemeral port and returns its base URL.
pub async fn spawn_router(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    format!("http://{}", addr)
}

pub async fn spawn_app(repo: Arc<dyn EnquiryRepository>) -> String {
    spawn_router(test_router(repo)).await
}
