use crate::{
    domain::entities::{ApiResponse, Enquiry, SoftDeleteOutcome},
    infrastructure::http::middleware::{ApiError, ApiResult, AppState},
};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct DeleteEnquiryParams {
    pub id: Option<String>,
}

pub async fn list_enquiries(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<Enquiry>>>> {
    tracing::info!("GET /api/admin/enquiries - request received");

    let enquiries = state
        .enquiry_service
        .list_enquiries()
        .await
        .map_err(|e| {
            tracing::error!("Error fetching enquiries: {}", e);
            metrics::counter!("enquiry_requests_failed_total", "operation" => "list").increment(1);
            ApiError::internal("Failed to fetch enquiries", &e)
        })?;

    tracing::info!("Enquiries fetched: {} enquiries found", enquiries.len());
    metrics::counter!("enquiries_listed_total").increment(1);

    Ok(Json(ApiResponse::with_data(
        "Enquiries fetched successfully",
        enquiries,
    )))
}

pub async fn delete_enquiry(
    State(state): State<AppState>,
    Query(params): Query<DeleteEnquiryParams>,
) -> ApiResult<Json<ApiResponse<()>>> {
    // Blank ids are rejected; anything else reaches the store as sent
    let id = params
        .id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Enquiry ID is required".to_string()))?;

    tracing::info!("DELETE /api/admin/enquiries - deleting enquiry: {}", id);

    let outcome = state.enquiry_service.delete_enquiry(id).await.map_err(|e| {
        tracing::error!("Error deleting enquiry {}: {}", id, e);
        metrics::counter!("enquiry_requests_failed_total", "operation" => "delete").increment(1);
        ApiError::internal("Failed to delete enquiry", &e)
    })?;

    match outcome {
        SoftDeleteOutcome::Updated(_) => {
            tracing::info!("Enquiry deleted successfully: {}", id);
            metrics::counter!("enquiries_deleted_total").increment(1);
            Ok(Json(ApiResponse::acknowledged(
                "Enquiry deleted successfully",
            )))
        }
        SoftDeleteOutcome::NotFound => {
            tracing::warn!("Enquiry not found for delete: {}", id);
            Err(ApiError::NotFound("Enquiry not found".to_string()))
        }
    }
}
