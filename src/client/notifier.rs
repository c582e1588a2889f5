use crate::domain::ports::notifier::Notifier;

/// Sends toast notifications to the log.
#[derive(Clone, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(target: "toast", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::warn!(target: "toast", "{}", message);
    }
}
