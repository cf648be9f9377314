use crate::error::TransportError;
use async_trait::async_trait;
use std::time::Duration;

/// Raw response of a single GET
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP collaborator used by the pipeline.
/// Kept as a trait so the pagination logic can run against scripted pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Perform a GET. `timeout` of `None` means wait as long as the transport does.
    async fn get(&self, url: &str, timeout: Option<Duration>) -> Result<FetchedPage, TransportError>;
}
