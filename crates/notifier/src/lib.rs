// In crates/notifier/src/lib.rs

use async_trait::async_trait;

pub mod console;
pub mod error;
pub mod format;
pub mod slack;

// Re-export public types
pub use console::ConsoleNotifier;
pub use error::{Error, Result};
pub use format::{AlertFormatter, format_alert};
pub use slack::SlackNotifier;

/// The universal interface for an alert channel.
///
/// A `Notifier` takes a fully formatted message and hands it to a channel.
/// Delivery is attempted once; callers log a failure and move on.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// The name of the channel (e.g., "Slack", "Console").
    fn name(&self) -> &'static str;

    /// Delivers a message.
    ///
    /// # Returns
    ///
    /// `Ok(())` once the channel accepted the message, or
    /// `core_types::Error::DeliveryFailed` otherwise.
    async fn deliver(&self, message: &str) -> core_types::Result<()>;
}
