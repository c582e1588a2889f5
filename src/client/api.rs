use crate::domain::entities::{ApiResponse, Enquiry};
use reqwest::{Client, Response};
use thiserror::Error;

pub const ENQUIRIES_PATH: &str = "/api/admin/enquiries";

/// Any failed admin request, reduced to the message worth showing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct RequestError {
    pub message: String,
    /// HTTP status, when the server answered at all.
    pub status: Option<u16>,
}

impl RequestError {
    fn transport(err: reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
            status: None,
        }
    }

    /// Transport failures and 5xx answers may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        match self.status {
            Some(status) => status >= 500,
            None => true,
        }
    }
}

pub struct EnquiryApiClient {
    http: Client,
    base_url: String,
}

impl EnquiryApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), ENQUIRIES_PATH)
    }

    pub async fn list_enquiries(&self) -> Result<Vec<Enquiry>, RequestError> {
        let response = self
            .http
            .get(self.endpoint())
            .send()
            .await
            .map_err(RequestError::transport)?;

        if !response.status().is_success() {
            return Err(error_from_response(response, "Failed to fetch enquiries").await);
        }

        let status = response.status().as_u16();
        let body: ApiResponse<Vec<Enquiry>> = response.json().await.map_err(|e| RequestError {
            message: format!("Malformed enquiry list: {}", e),
            status: Some(status),
        })?;

        Ok(body.data.unwrap_or_default())
    }

    pub async fn delete_enquiry(&self, id: &str) -> Result<(), RequestError> {
        let response = self
            .http
            .delete(self.endpoint())
            .query(&[("id", id)])
            .send()
            .await
            .map_err(RequestError::transport)?;

        if !response.status().is_success() {
            return Err(error_from_response(response, "Failed to delete enquiry").await);
        }

        Ok(())
    }
}

/// Prefers the server's `error` field; falls back when the body has none.
async fn error_from_response(response: Response, fallback: &str) -> RequestError {
    let status = response.status().as_u16();
    let message = response
        .json::<ApiResponse<serde_json::Value>>()
        .await
        .ok()
        .and_then(|body| body.error)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| fallback.to_string());

    RequestError {
        message,
        status: Some(status),
    }
}
