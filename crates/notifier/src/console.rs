// In crates/notifier/src/console.rs

use async_trait::async_trait;

use crate::Notifier;

/// Prints alerts to stdout instead of sending them anywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn name(&self) -> &'static str {
        "Console"
    }

    async fn deliver(&self, message: &str) -> core_types::Result<()> {
        tracing::info!(channel = "console", "{}", message);
        println!("{}", message);
        Ok(())
    }
}
