// In crates/notifier/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to build the notifier client: {0}")]
    ClientBuildError(String),
    #[error("No webhook URL configured")]
    MissingWebhook,
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Webhook rejected the message: HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for core_types::Error {
    fn from(e: Error) -> Self {
        core_types::Error::DeliveryFailed(e.to_string())
    }
}
