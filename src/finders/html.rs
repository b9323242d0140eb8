use async_trait::async_trait;
use url::Url;

use super::{load_document, Finder};
use crate::{extract, Configuration, Error, FaviconUrl, Fetcher, Result};

/// Collects the favicons declared by `<link>` and `<meta>` elements of the
/// page's head, in document order.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlFinder;

#[async_trait]
impl Finder for HtmlFinder {
    async fn find(
        &self,
        url: &Url,
        configuration: &Configuration,
        fetcher: &Fetcher,
    ) -> Result<Vec<FaviconUrl>> {
        let (document, page_url) = load_document(url, configuration, fetcher).await?;
        let head = document.head().ok_or(Error::NoHtmlHead)?;

        let favicons = extract::references(head, &page_url, configuration.accept_header_image());
        tracing::debug!("Found {} favicons in {page_url}", favicons.len());
        if favicons.is_empty() {
            return Err(Error::NotFound);
        }
        Ok(favicons)
    }
}
