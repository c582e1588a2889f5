use crate::domain::entities::{EnquiryRecord, NewEnquiry, SoftDeleteOutcome};
use crate::domain::errors::StoreResult;
use async_trait::async_trait;

#[async_trait]
pub trait EnquiryRepository: Send + Sync {
    /// Opens the store connection, or reuses the one already open.
    async fn connect(&self) -> StoreResult<()>;
    /// Active enquiries, newest `created_at` first.
    async fn list_active(&self) -> StoreResult<Vec<EnquiryRecord>>;
    async fn soft_delete(&self, id: &str) -> StoreResult<SoftDeleteOutcome>;
    async fn insert(&self, enquiry: &NewEnquiry) -> StoreResult<EnquiryRecord>;
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<EnquiryRecord>>;
}
