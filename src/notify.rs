//! User-facing notifications emitted by the conversion pipeline.
//!
//! The converter only produces the message; delivery (console line,
//! toast, anything else) is whatever the `Notifier` implementation
//! does with it.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationVariant {
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    /// Success message for a completed conversion.
    pub fn conversion_updated(amount: &str, source: &str, result: &str, target: &str) -> Self {
        Notification {
            title: "Conversion updated".to_string(),
            description: format!("{amount} {source} = {result} {target}"),
            variant: NotificationVariant::Default,
        }
    }

    /// Failure message for a conversion that could not produce a rate.
    pub fn conversion_failed() -> Self {
        Notification {
            title: "Conversion failed".to_string(),
            description: "Failed to convert currency. Please try again.".to_string(),
            variant: NotificationVariant::Destructive,
        }
    }
}

/// Fire-and-forget notification sink.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}
