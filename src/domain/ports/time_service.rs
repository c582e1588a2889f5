use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Clock used by the query cache hooks: reads the time for freshness and
/// eviction checks, and suspends the caller between retry attempts.
#[async_trait]
pub trait TimeService: Send + Sync {
    fn now(&self) -> Instant;

    async fn sleep(&self, duration: Duration);
}
