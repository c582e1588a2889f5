use crate::client::api::{EnquiryApiClient, RequestError};
use crate::client::notifier::TracingNotifier;
use crate::client::query_cache::{QueryCache, QueryKey};
use crate::domain::entities::Enquiry;
use crate::domain::ports::notifier::Notifier;
use crate::domain::ports::time_service::TimeService;
use crate::infrastructure::runtime::tokio::TokioTimeService;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

pub const ADMIN_ENQUIRIES_KEY: &str = "admin-enquiries";

const DELETE_SUCCESS_MESSAGE: &str = "Enquiry deleted successfully!";
const DELETE_FALLBACK_MESSAGE: &str = "Failed to delete enquiry";
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

pub fn admin_enquiries_key() -> QueryKey {
    QueryKey::new([ADMIN_ENQUIRIES_KEY])
}

/// Backoff before retry number `attempt` (zero based): 1s, 2s, 4s... capped
/// at 30s.
pub fn retry_delay(attempt: u32) -> Duration {
    Duration::from_secs(1)
        .checked_mul(2u32.saturating_pow(attempt))
        .map_or(MAX_RETRY_DELAY, |delay| delay.min(MAX_RETRY_DELAY))
}

#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// How long a successful result is served without refetching.
    pub stale_time: Duration,
    /// How long an unobserved result stays cached.
    pub gc_time: Duration,
    pub retry: u32,
    pub refetch_on_window_focus: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(2 * 60),
            gc_time: Duration::from_secs(5 * 60),
            retry: 2,
            refetch_on_window_focus: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    Loading,
    Error { message: String },
    Success(Arc<T>),
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Success(data) => Some(data.as_ref()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            QueryState::Error { message } => Some(message.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationStatus {
    Idle,
    Pending,
    Success,
    Error(String),
}

/// Shared context for the admin enquiry hooks: one API client and one cache
/// that every list and delete hook created from it reads and invalidates.
#[derive(Clone)]
pub struct EnquiryHooks {
    api: Arc<EnquiryApiClient>,
    cache: Arc<QueryCache<Vec<Enquiry>>>,
    time: Arc<dyn TimeService>,
    notifier: Arc<dyn Notifier>,
    options: QueryOptions,
}

impl EnquiryHooks {
    pub fn new(api: EnquiryApiClient) -> Self {
        let options = QueryOptions::default();
        Self {
            api: Arc::new(api),
            cache: Arc::new(QueryCache::new(options.gc_time)),
            time: Arc::new(TokioTimeService::new()),
            notifier: Arc::new(TracingNotifier),
            options,
        }
    }

    /// Replaces the query options. Call before any hook is created: the
    /// cache is rebuilt with the new gc time.
    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.cache = Arc::new(QueryCache::new(options.gc_time));
        self.options = options;
        self
    }

    pub fn with_time_service(mut self, time: Arc<dyn TimeService>) -> Self {
        self.time = time;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn cache(&self) -> &Arc<QueryCache<Vec<Enquiry>>> {
        &self.cache
    }

    pub fn use_admin_enquiries(&self) -> AdminEnquiries {
        AdminEnquiries::new(
            self.api.clone(),
            self.cache.clone(),
            self.time.clone(),
            self.options.clone(),
        )
    }

    pub fn use_delete_enquiry(&self) -> DeleteEnquiry {
        DeleteEnquiry {
            api: self.api.clone(),
            cache: self.cache.clone(),
            notifier: self.notifier.clone(),
            status: Mutex::new(MutationStatus::Idle),
        }
    }

    /// Drops cached results nobody has observed for their gc time.
    pub fn collect_garbage(&self) -> usize {
        self.cache.collect_garbage(self.time.now())
    }
}

/// List hook for active enquiries. Observes the shared cache entry for as
/// long as it is alive.
pub struct AdminEnquiries {
    api: Arc<EnquiryApiClient>,
    cache: Arc<QueryCache<Vec<Enquiry>>>,
    time: Arc<dyn TimeService>,
    options: QueryOptions,
    key: QueryKey,
}

impl AdminEnquiries {
    fn new(
        api: Arc<EnquiryApiClient>,
        cache: Arc<QueryCache<Vec<Enquiry>>>,
        time: Arc<dyn TimeService>,
        options: QueryOptions,
    ) -> Self {
        let key = admin_enquiries_key();
        cache.subscribe(&key, options.gc_time);
        Self {
            api,
            cache,
            time,
            options,
            key,
        }
    }

    /// Serves the cached list while fresh, otherwise fetches it.
    pub async fn read(&self) -> QueryState<Vec<Enquiry>> {
        match self
            .cache
            .fresh_data(&self.key, self.options.stale_time, self.time.now())
        {
            Some(data) => QueryState::Success(data),
            None => self.fetch_shared().await,
        }
    }

    pub async fn refetch(&self) -> QueryState<Vec<Enquiry>> {
        self.fetch_shared().await
    }

    /// Returns `None` when focus does not trigger a fetch.
    pub async fn on_window_focus(&self) -> Option<QueryState<Vec<Enquiry>>> {
        if !self.options.refetch_on_window_focus {
            return None;
        }

        if self
            .cache
            .is_stale(&self.key, self.options.stale_time, self.time.now())
        {
            Some(self.fetch_shared().await)
        } else {
            None
        }
    }

    pub fn state(&self) -> QueryState<Vec<Enquiry>> {
        if let Some(message) = self.cache.error(&self.key) {
            return QueryState::Error { message };
        }

        match self.cache.data(&self.key) {
            Some(data) => QueryState::Success(data),
            None => QueryState::Loading,
        }
    }

    /// Joins a fetch already in flight for the key instead of starting a
    /// second request.
    async fn fetch_shared(&self) -> QueryState<Vec<Enquiry>> {
        let settled = self.cache.settled_count(&self.key);
        let fetch_lock = self.cache.fetch_lock(&self.key);
        let _in_flight = fetch_lock.lock().await;

        if self.cache.settled_count(&self.key) != settled {
            return self.state();
        }

        self.fetch().await
    }

    async fn fetch(&self) -> QueryState<Vec<Enquiry>> {
        let mut attempt = 0;

        loop {
            match self.api.list_enquiries().await {
                Ok(enquiries) => {
                    let data = self.cache.set_data(&self.key, enquiries, self.time.now());
                    return QueryState::Success(data);
                }
                Err(e) if attempt < self.options.retry && e.is_retryable() => {
                    let delay = retry_delay(attempt);
                    tracing::warn!(
                        "Fetching enquiries failed ({}), retrying in {:?}",
                        e,
                        delay
                    );
                    self.time.sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!("Fetching enquiries failed: {}", e);
                    self.cache.set_error(&self.key, e.message.clone(), self.time.now());
                    return QueryState::Error { message: e.message };
                }
            }
        }
    }
}

impl Drop for AdminEnquiries {
    fn drop(&mut self) {
        self.cache.unsubscribe(&self.key, self.time.now());
    }
}

/// Delete hook. A successful delete invalidates the cached list; a failed
/// one leaves it untouched.
pub struct DeleteEnquiry {
    api: Arc<EnquiryApiClient>,
    cache: Arc<QueryCache<Vec<Enquiry>>>,
    notifier: Arc<dyn Notifier>,
    status: Mutex<MutationStatus>,
}

impl DeleteEnquiry {
    pub async fn mutate(&self, id: &str) -> Result<(), RequestError> {
        self.set_status(MutationStatus::Pending);

        match self.api.delete_enquiry(id).await {
            Ok(()) => {
                self.cache.invalidate(&admin_enquiries_key());
                self.notifier.success(DELETE_SUCCESS_MESSAGE);
                self.set_status(MutationStatus::Success);
                Ok(())
            }
            Err(e) => {
                let message = if e.message.is_empty() {
                    DELETE_FALLBACK_MESSAGE.to_string()
                } else {
                    e.message.clone()
                };
                self.notifier.error(&message);
                tracing::error!("Delete enquiry error: {}", message);
                self.set_status(MutationStatus::Error(message));
                Err(e)
            }
        }
    }

    pub fn status(&self) -> MutationStatus {
        self.status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_status(&self, status: MutationStatus) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = status;
    }
}
