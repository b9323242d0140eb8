use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use super::{load_document, Finder};
use crate::{
    extract, Configuration, Error, FaviconUrl, Fetcher, Format, Metadata, Result, Size, Source,
};

/// Reads the launcher icons listed by the web app manifest the page links to.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManifestFinder;

impl ManifestFinder {
    async fn download(&self, url: &Url, fetcher: &Fetcher) -> Result<Value> {
        let response = fetcher.fetch(url, false).await.map_err(|e| {
            if e.is_cancelled() {
                e
            } else {
                Error::ManifestDownload(Box::new(e))
            }
        })?;
        serde_json::from_slice(response.data()).map_err(Error::ManifestParse)
    }
}

/// The launcher icons of a parsed manifest. Entries with an unknown `src` or
/// without a usable `sizes` are left out.
fn icons(manifest: &Value, page_url: &Url) -> Result<Vec<FaviconUrl>> {
    let entries = manifest
        .get("icons")
        .and_then(Value::as_array)
        .filter(|icons| !icons.is_empty())
        .ok_or(Error::ManifestNoIcons)?;

    Ok(entries
        .iter()
        .filter_map(|entry| {
            let src = entry.get("src")?.as_str()?;
            let format = Format::from_launcher_src(src)?;
            let size = entry
                .get("sizes")
                .and_then(Value::as_str)
                .and_then(Size::from_sizes_attr)?;
            let url = page_url.join(src.trim()).ok()?;
            Some(FaviconUrl::new(
                url,
                Metadata::with_size(format, Source::Manifest, Some(size)),
            ))
        })
        .collect())
}

#[async_trait]
impl Finder for ManifestFinder {
    async fn find(
        &self,
        url: &Url,
        configuration: &Configuration,
        fetcher: &Fetcher,
    ) -> Result<Vec<FaviconUrl>> {
        let (document, page_url) = load_document(url, configuration, fetcher).await?;
        let head = document.head().ok_or(Error::NoHtmlHead)?;

        let rel = configuration.preference(Source::Manifest);
        let manifest_url = head
            .select("link")
            .filter(|link| {
                link.attr("rel")
                    .is_some_and(|value| value.trim().eq_ignore_ascii_case(rel))
            })
            .find_map(|link| link.attr("href"))
            .filter(|href| !href.trim().is_empty())
            .and_then(|href| extract::resolve(href, head, &page_url))
            .ok_or(Error::ManifestReferenceNotFound)?;
        tracing::debug!("Downloading manifest {manifest_url}");

        let manifest = self.download(&manifest_url, fetcher).await?;
        let favicons = icons(&manifest, &page_url)?;
        if favicons.is_empty() {
            return Err(Error::NotFound);
        }
        Ok(favicons)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;
    use crate::LauncherScale;

    async fn serve_page(server: &MockServer, head: &str) {
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(format!("<html><head>{head}</head></html>")),
            )
            .mount(server)
            .await;
    }

    async fn find(server: &MockServer) -> Result<Vec<FaviconUrl>> {
        let url = Url::parse(&server.uri()).unwrap();
        ManifestFinder
            .find(&url, &Configuration::default(), &Fetcher::default())
            .await
    }

    #[tokio::test]
    async fn launcher_icons() {
        let server = MockServer::start().await;
        serve_page(&server, r#"<link rel="manifest" href="/manifest.json">"#).await;
        Mock::given(method("GET"))
            .and(path("/manifest.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "icons": [{"src": "launcher-icon-2x.png", "sizes": "96x96"}]
            })))
            .mount(&server)
            .await;

        let favicons = find(&server).await.unwrap();
        assert_eq!(favicons.len(), 1);
        assert_eq!(
            favicons[0].url().as_str(),
            format!("{}/launcher-icon-2x.png", server.uri())
        );
        assert_eq!(
            favicons[0].format(),
            Format::LauncherIcon(LauncherScale::X2)
        );
        assert_eq!(favicons[0].source(), Source::Manifest);
        assert_eq!(favicons[0].size(), Size::new(96.0, 96.0));
    }

    #[tokio::test]
    async fn drops_unknown_and_unsized_entries() {
        let server = MockServer::start().await;
        serve_page(&server, r#"<link rel="manifest" href="/app.webmanifest">"#).await;
        Mock::given(method("GET"))
            .and(path("/app.webmanifest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "icons": [
                    {"src": "icon-512.png", "sizes": "512x512"},
                    {"src": "launcher-icon-4x.png"},
                    {"src": "launcher-icon-1x.png", "sizes": "big"},
                    {"src": "/icons/launcher-icon-3x.png", "sizes": "144x144"},
                    {"src": "launcher-icon-0-75x.png", "sizes": "36x36"}
                ]
            })))
            .mount(&server)
            .await;

        let favicons = find(&server).await.unwrap();
        let paths = favicons.iter().map(|f| f.url().path()).collect::<Vec<_>>();
        assert_eq!(paths, ["/icons/launcher-icon-3x.png", "/launcher-icon-0-75x.png"]);
    }

    #[tokio::test]
    async fn no_matching_icons() {
        let server = MockServer::start().await;
        serve_page(&server, r#"<link rel="manifest" href="/manifest.json">"#).await;
        Mock::given(method("GET"))
            .and(path("/manifest.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "icons": [{"src": "icon.png", "sizes": "96x96"}]
            })))
            .mount(&server)
            .await;

        assert!(matches!(find(&server).await, Err(Error::NotFound)));
    }

    #[tokio::test]
    async fn missing_reference() {
        let server = MockServer::start().await;
        serve_page(&server, r#"<link rel="icon" href="/favicon.png">"#).await;
        assert!(matches!(
            find(&server).await,
            Err(Error::ManifestReferenceNotFound)
        ));
    }

    #[tokio::test]
    async fn custom_reference_key() {
        let server = MockServer::start().await;
        serve_page(&server, r#"<link rel="app-manifest" href="/m.json">"#).await;
        Mock::given(method("GET"))
            .and(path("/m.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "icons": [{"src": "launcher-icon-1-5x.png", "sizes": "72x72"}]
            })))
            .mount(&server)
            .await;

        let url = Url::parse(&server.uri()).unwrap();
        let configuration = Configuration::default().with_preference(Source::Manifest, "app-manifest");
        let favicons = ManifestFinder
            .find(&url, &configuration, &Fetcher::default())
            .await
            .unwrap();
        assert_eq!(
            favicons[0].format(),
            Format::LauncherIcon(LauncherScale::X1_5)
        );
    }

    #[tokio::test]
    async fn manifest_download_failure() {
        let server = MockServer::start().await;
        serve_page(&server, r#"<link rel="manifest" href="/manifest.json">"#).await;
        Mock::given(method("GET"))
            .and(path("/manifest.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert!(matches!(
            find(&server).await,
            Err(Error::ManifestDownload(_))
        ));
    }

    #[tokio::test]
    async fn manifest_parse_failure() {
        let server = MockServer::start().await;
        serve_page(&server, r#"<link rel="manifest" href="/manifest.json">"#).await;
        Mock::given(method("GET"))
            .and(path("/manifest.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{ not json"))
            .mount(&server)
            .await;

        assert!(matches!(find(&server).await, Err(Error::ManifestParse(_))));
    }

    #[tokio::test]
    async fn manifest_without_icons() {
        let server = MockServer::start().await;
        serve_page(&server, r#"<link rel="manifest" href="/manifest.json">"#).await;
        Mock::given(method("GET"))
            .and(path("/manifest.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"name": "App", "icons": []})),
            )
            .mount(&server)
            .await;

        assert!(matches!(find(&server).await, Err(Error::ManifestNoIcons)));
    }
}
