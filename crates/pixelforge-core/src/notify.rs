//! User feedback channel.
//!
//! The list layer never talks to a global toast service. Whoever builds a
//! table hands it an `Arc<dyn Notifier>`.

use std::fmt;
use std::sync::Mutex;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl NotifyLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for NotifyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Capability for surfacing a message to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NotifyLevel, message: &str);
}

/// Forwards notifications to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NotifyLevel, message: &str) {
        match level {
            NotifyLevel::Success | NotifyLevel::Info => tracing::info!(%level, "{message}"),
            NotifyLevel::Warning => tracing::warn!("{message}"),
            NotifyLevel::Error => tracing::error!("{message}"),
        }
    }
}

/// Keeps every notification in memory until drained.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    messages: Mutex<Vec<(NotifyLevel, String)>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every recorded notification, oldest first.
    pub fn messages(&self) -> Vec<(NotifyLevel, String)> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Removes and returns every recorded notification.
    pub fn drain(&self) -> Vec<(NotifyLevel, String)> {
        self.messages
            .lock()
            .map(|mut m| std::mem::take(&mut *m))
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<(NotifyLevel, String)> {
        self.messages().pop()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, level: NotifyLevel, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push((level, message.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_notifier_records_in_order() {
        let notifier = MemoryNotifier::new();
        notifier.notify(NotifyLevel::Info, "first");
        notifier.notify(NotifyLevel::Error, "second");

        let messages = notifier.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], (NotifyLevel::Info, "first".to_string()));
        assert_eq!(notifier.last().unwrap().0, NotifyLevel::Error);
    }

    #[test]
    fn drain_empties_the_buffer() {
        let notifier = MemoryNotifier::new();
        notifier.notify(NotifyLevel::Success, "done");
        assert_eq!(notifier.drain().len(), 1);
        assert!(notifier.messages().is_empty());
    }

    #[test]
    fn level_labels() {
        assert_eq!(NotifyLevel::Success.to_string(), "success");
        assert_eq!(NotifyLevel::Warning.label(), "warning");
    }

    #[test]
    fn tracing_notifier_is_object_safe() {
        let notifier: Box<dyn Notifier> = Box::new(TracingNotifier);
        notifier.notify(NotifyLevel::Info, "hello");
    }
}
