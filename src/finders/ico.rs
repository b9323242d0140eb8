use async_trait::async_trait;
use url::Url;

use super::Finder;
use crate::{urls, Configuration, Error, FaviconUrl, Fetcher, Format, Metadata, Result, Source};

/// Probes a conventional file, `/favicon.ico` unless configured otherwise,
/// on the website's host and then on its subdomain-less domain.
#[derive(Debug, Default, Clone, Copy)]
pub struct IcoFinder;

impl IcoFinder {
    /// Whether `url` serves something the configured decoder accepts.
    async fn probe(
        &self,
        url: &Url,
        configuration: &Configuration,
        fetcher: &Fetcher,
    ) -> Result<Option<FaviconUrl>> {
        let response = fetcher
            .fetch(url, configuration.follow_meta_refresh())
            .await?;
        if configuration.decoder().decode(response.data()).is_some() {
            Ok(Some(FaviconUrl::new(
                url.clone(),
                Metadata::new(Format::Ico, Source::Ico),
            )))
        } else {
            tracing::debug!("{url} is not an image");
            Ok(None)
        }
    }

    /// The first of `urls` that serves an image. Only cancellation stops the
    /// search early.
    async fn probe_in_order(
        &self,
        urls: &[Url],
        configuration: &Configuration,
        fetcher: &Fetcher,
    ) -> Result<Option<FaviconUrl>> {
        for url in urls {
            match self.probe(url, configuration, fetcher).await {
                Ok(Some(favicon)) => return Ok(Some(favicon)),
                Ok(None) => {}
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => tracing::debug!("Failed to probe {url}: {e}"),
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl Finder for IcoFinder {
    async fn find(
        &self,
        url: &Url,
        configuration: &Configuration,
        fetcher: &Fetcher,
    ) -> Result<Vec<FaviconUrl>> {
        let candidates = candidate_urls(url, configuration.preference(Source::Ico))?;
        match self.probe_in_order(&candidates, configuration, fetcher).await? {
            Some(favicon) => Ok(vec![favicon]),
            None => Err(Error::NotFound),
        }
    }
}

/// The URLs probed for `file_name`: on the host of `url`, then on its domain
/// without subdomains when that is a different URL.
fn candidate_urls(url: &Url, file_name: &str) -> Result<Vec<Url>> {
    let favicon_url = urls::root_of(url)?.join(file_name)?;
    let mut candidates = vec![favicon_url];
    if let Some(domain) = urls::without_subdomains(url) {
        let domain_url = domain.join(file_name)?;
        if !candidates.contains(&domain_url) {
            candidates.push(domain_url);
        }
    }
    Ok(candidates)
}
