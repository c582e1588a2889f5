use async_trait::async_trait;
use enquiry_desk::client::{EnquiryApiClient, EnquiryHooks, QueryOptions};
use enquiry_desk::domain::ports::notifier::Notifier;
use enquiry_desk::domain::ports::time_service::TimeService;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Default)]
pub struct RecordingNotifier {
    successes: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.successes.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

/// Virtual clock: sleeping returns immediately, advances the clock and
/// remembers what it was asked to wait.
pub struct NoDelay {
    start: Instant,
    elapsed: Mutex<Duration>,
    requested: Mutex<Vec<Duration>>,
}

impl Default for NoDelay {
    fn default() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
            requested: Mutex::new(Vec::new()),
        }
    }
}

impl NoDelay {
    pub fn advance(&self, duration: Duration) {
        *self.elapsed.lock().unwrap() += duration;
    }

    pub fn requested(&self) -> Vec<Duration> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl TimeService for NoDelay {
    fn now(&self) -> Instant {
        self.start + *self.elapsed.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        self.requested.lock().unwrap().push(duration);
        self.advance(duration);
    }
}

pub struct TestHooks {
    pub hooks: EnquiryHooks,
    pub notifier: Arc<RecordingNotifier>,
    pub time: Arc<NoDelay>,
}

pub fn test_hooks(base_url: &str, options: QueryOptions) -> TestHooks {
    let notifier = Arc::new(RecordingNotifier::default());
    let time = Arc::new(NoDelay::default());

    let hooks = EnquiryHooks::new(EnquiryApiClient::new(base_url))
        .with_options(options)
        .with_notifier(notifier.clone())
        .with_time_service(time.clone());

    TestHooks {
        hooks,
        notifier,
        time,
    }
}
