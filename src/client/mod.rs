//! Admin-side data access: a typed HTTP client for the enquiry endpoints and
//! the query/mutation hooks that cache its results.

pub mod api;
pub mod hooks;
pub mod notifier;
pub mod query_cache;

pub use api::{EnquiryApiClient, RequestError};
pub use hooks::{
    admin_enquiries_key, retry_delay, AdminEnquiries, DeleteEnquiry, EnquiryHooks,
    MutationStatus, QueryOptions, QueryState,
};
pub use notifier::TracingNotifier;
pub use query_cache::{QueryCache, QueryKey};
