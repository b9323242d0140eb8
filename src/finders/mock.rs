use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use super::Finder;
use crate::{Configuration, Error, FaviconUrl, Fetcher, Format, Metadata, Result, Size, Source};

const FIXTURES: [(&str, f64, f64); 3] = [
    ("https://google.com", 100.0, 140.0),
    ("https://apple.com", 100.0, 90.0),
    ("https://facebook.com", 100.0, 90.0),
];

/// Answers with fixed favicons without touching the network.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockFinder {
    delay: Duration,
    fail: bool,
}

impl MockFinder {
    /// Wait before answering. Cancelling the lookup interrupts the wait.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fail with [`Error::NotFound`] instead of answering.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    fn favicons() -> Result<Vec<FaviconUrl>> {
        FIXTURES
            .iter()
            .map(|&(url, width, height)| {
                Ok(FaviconUrl::new(
                    Url::parse(url)?,
                    Metadata::with_size(
                        Format::AppleTouchIcon,
                        Source::Mock,
                        Size::new(width, height),
                    ),
                ))
            })
            .collect()
    }
}

#[async_trait]
impl Finder for MockFinder {
    async fn find(
        &self,
        _url: &Url,
        _configuration: &Configuration,
        fetcher: &Fetcher,
    ) -> Result<Vec<FaviconUrl>> {
        tokio::select! {
            biased;
            _ = fetcher.token().cancelled() => return Err(Error::Cancelled),
            _ = tokio::time::sleep(self.delay) => {}
        }
        if self.fail {
            return Err(Error::NotFound);
        }
        Self::favicons()
    }
}
