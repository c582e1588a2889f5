use crate::domain::entities::{Enquiry, SoftDeleteOutcome};
use crate::domain::errors::StoreResult;
use crate::domain::ports::enquiry_repository::EnquiryRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct EnquiryService {
    enquiry_repo: Arc<dyn EnquiryRepository>,
}

impl EnquiryService {
    pub fn new(enquiry_repo: Arc<dyn EnquiryRepository>) -> Self {
        Self { enquiry_repo }
    }

    /// Active enquiries in wire form, newest first.
    pub async fn list_enquiries(&self) -> StoreResult<Vec<Enquiry>> {
        tracing::debug!("Connecting to enquiry store");
        self.enquiry_repo.connect().await?;

        let records = self.enquiry_repo.list_active().await?;
        Ok(records.into_iter().map(Enquiry::from).collect())
    }

    /// Flips `is_active` off for the enquiry; the record itself is kept.
    pub async fn delete_enquiry(&self, id: &str) -> StoreResult<SoftDeleteOutcome> {
        tracing::debug!("Connecting to enquiry store");
        self.enquiry_repo.connect().await?;

        self.enquiry_repo.soft_delete(id).await
    }
}
