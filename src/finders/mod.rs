use std::borrow::Cow;

use async_trait::async_trait;
use url::Url;

use crate::{html::Document, Configuration, FaviconUrl, Fetcher, Result};

mod html;
mod ico;
mod manifest;
mod mock;

pub use self::{html::HtmlFinder, ico::IcoFinder, manifest::ManifestFinder, mock::MockFinder};

/// One way of discovering the favicons of a website.
#[async_trait]
pub trait Finder: Send + Sync {
    /// Look for favicons of the website at `url`. An `Ok` result is never
    /// empty. All requests go through `fetcher` so they share the lookup's
    /// headers and cancellation.
    async fn find(
        &self,
        url: &Url,
        configuration: &Configuration,
        fetcher: &Fetcher,
    ) -> Result<Vec<FaviconUrl>>;
}

/// The page at `url`, or the prefetched one, with the URL its relative
/// references resolve against.
async fn load_document<'a>(
    url: &Url,
    configuration: &'a Configuration,
    fetcher: &Fetcher,
) -> Result<(Cow<'a, Document>, Url)> {
    if let Some(document) = configuration.prefetched_document() {
        return Ok((Cow::Borrowed(document), url.clone()));
    }
    let response = fetcher
        .fetch(url, configuration.follow_meta_refresh())
        .await?;
    let document = Document::parse(&response.text())?;
    Ok((Cow::Owned(document), response.url().clone()))
}
