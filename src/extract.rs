//! Favicon references declared by `<link>` and `<meta>` elements.

use url::Url;

use crate::{html::Head, urls, FaviconUrl, Format, Metadata, Size, Source};

/// Every favicon referenced by `head`: links first, then metas, each in
/// document order.
pub fn references(head: &Head, page_url: &Url, accept_header_image: bool) -> Vec<FaviconUrl> {
    let mut favicons = links(head, page_url);
    favicons.extend(metas(head, page_url, accept_header_image));
    favicons
}

/// Favicons declared by `<link rel="...">`.
pub fn links(head: &Head, page_url: &Url) -> Vec<FaviconUrl> {
    head.select("link")
        .filter_map(|link| {
            let format = Format::from_rel(link.attr("rel")?)?;
            let href = link.attr("href").filter(|href| !href.trim().is_empty())?;
            let Some(url) = resolve(href, head, page_url) else {
                tracing::debug!("Skipping {format} link with unusable href {href:?}");
                return None;
            };
            let size = link.attr("sizes").and_then(Size::from_sizes_attr);
            Some(FaviconUrl::new(
                url,
                Metadata::with_size(format, Source::Html, size),
            ))
        })
        .collect()
}

/// Favicons declared by `<meta property="...">` or `<meta name="...">`.
pub fn metas(head: &Head, page_url: &Url, accept_header_image: bool) -> Vec<FaviconUrl> {
    head.select("meta")
        .filter_map(|meta| {
            let format = meta
                .attr("property")
                .and_then(Format::from_meta)
                .or_else(|| meta.attr("name").and_then(Format::from_meta))?;
            if format.is_header_image() && !accept_header_image {
                tracing::trace!("Skipping header image");
                return None;
            }
            let content = meta.attr("content").filter(|c| !c.trim().is_empty())?;
            let url = resolve(content, head, page_url)?;
            let size = query_size(&url);
            Some(FaviconUrl::new(
                url,
                Metadata::with_size(format, Source::Html, size),
            ))
        })
        .collect()
}

/// Resolve an `href` against the document's `<base href>`, or against the
/// page URL when there is none. Absolute `http(s)` URLs are kept as they are.
pub fn resolve(href: &str, head: &Head, page_url: &Url) -> Option<Url> {
    let href = href.trim();
    if urls::is_absolute_http(href) {
        return Url::parse(href).ok();
    }
    let base = head
        .select("base")
        .find_map(|base| base.attr("href"))
        .filter(|href| !href.trim().is_empty())
        .and_then(|href| page_url.join(href.trim()).ok())
        .unwrap_or_else(|| page_url.clone());
    base.join(href).ok()
}

/// Dimensions passed as `width`/`height` query parameters, as image CDNs do.
fn query_size(url: &Url) -> Option<Size> {
    let param = |name: &str| {
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    };
    Size::from_strs(&param("width")?, &param("height")?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::Document;

    fn parse(html: &str) -> Document {
        Document::parse(html).unwrap()
    }

    fn urls(favicons: &[FaviconUrl]) -> Vec<&str> {
        favicons.iter().map(|f| f.url().as_str()).collect()
    }

    #[test]
    fn links_with_sizes() {
        let document = parse(include_str!("../tests/parser/size.html"));
        let page_url = Url::parse("https://about.gitlab.com").unwrap();
        let favicons = links(document.head().unwrap(), &page_url);
        assert_eq!(favicons.len(), 16);

        assert_eq!(
            favicons[0],
            FaviconUrl::new(
                Url::parse("https://about.gitlab.com/nuxt-images/ico/mstile-144x144.png?cache=20220413")
                    .unwrap(),
                Metadata::new(Format::Icon, Source::Html),
            )
        );
        assert_eq!(
            favicons[1],
            FaviconUrl::new(
                Url::parse("https://about.gitlab.com/nuxt-images/ico/favicon.ico?cache=20220413")
                    .unwrap(),
                Metadata::new(Format::ShortcutIcon, Source::Html),
            )
        );
        assert_eq!(favicons[2].size(), Size::new(192.0, 192.0));
        assert_eq!(favicons[6].size(), Size::new(16.0, 16.0));
        assert_eq!(favicons[15].format(), Format::AppleTouchIcon);
        assert_eq!(
            favicons[15].url().as_str(),
            "https://about.gitlab.com/nuxt-images/ico/apple-touch-icon-180x180.png?cache=2022041"
        );
        assert_eq!(favicons[15].size(), Size::new(180.0, 180.0));
        assert!(favicons.iter().all(|f| f.source() == Source::Html));
    }

    #[test]
    fn resolves_against_base() {
        let document = parse(
            r#"<head>
                <base href="https://static.example.com/assets/">
                <link rel="icon" href="favicon.png">
                <link rel="apple-touch-icon" href="/touch.png">
                <link rel="shortcut icon" href="https://cdn.example.net/favicon.ico">
            </head>"#,
        );
        let page_url = Url::parse("https://example.com/blog/post").unwrap();
        let favicons = links(document.head().unwrap(), &page_url);
        assert_eq!(
            urls(&favicons),
            [
                "https://static.example.com/assets/favicon.png",
                "https://static.example.com/touch.png",
                "https://cdn.example.net/favicon.ico",
            ]
        );
    }

    #[test]
    fn resolves_against_page() {
        let document = parse(
            r#"<head>
                <link rel="icon" href="favicon.png">
                <link rel="icon" href="//cdn.example.com/favicon.png">
            </head>"#,
        );
        let page_url = Url::parse("http://127.0.0.1:8000/index.html").unwrap();
        let favicons = links(document.head().unwrap(), &page_url);
        assert_eq!(
            urls(&favicons),
            [
                "http://127.0.0.1:8000/favicon.png",
                "http://cdn.example.com/favicon.png"
            ]
        );
    }

    #[test]
    fn skips_unrelated_links() {
        let document = parse(
            r#"<head>
                <link rel="stylesheet" href="/style.css">
                <link rel="manifest" href="/manifest.json">
                <link rel="icon">
                <link rel="icon" href="">
                <link href="/favicon.png">
            </head>"#,
        );
        let page_url = Url::parse("https://example.com/").unwrap();
        assert!(links(document.head().unwrap(), &page_url).is_empty());
    }

    #[test]
    fn inline_data_icons() {
        let document =
            parse(r#"<head><link rel="icon" href="data:image/png;base64,aGVsbG8="></head>"#);
        let page_url = Url::parse("https://example.com/").unwrap();
        let favicons = links(document.head().unwrap(), &page_url);
        assert_eq!(favicons.len(), 1);
        assert!(favicons[0].is_data());
    }

    #[test]
    fn metas_with_query_sizes() {
        let document = parse(
            r#"<head>
                <meta name="description" content="A page">
                <meta name="thumbnail" content="/thumb.png?width=120&height=90">
                <meta property="og:image" content="https://img.example.com/og.png?width=1200&height=630">
                <meta name="msapplication-TileImage" content="/tile.png">
            </head>"#,
        );
        let head = document.head().unwrap();
        let page_url = Url::parse("https://example.com/").unwrap();

        let favicons = metas(head, &page_url, false);
        assert_eq!(
            urls(&favicons),
            [
                "https://example.com/thumb.png?width=120&height=90",
                "https://example.com/tile.png"
            ]
        );
        assert_eq!(favicons[0].format(), Format::MetaThumbnail);
        assert_eq!(favicons[0].size(), Size::new(120.0, 90.0));
        assert_eq!(favicons[1].size(), None);

        let favicons = metas(head, &page_url, true);
        assert_eq!(favicons.len(), 3);
        assert_eq!(favicons[1].format(), Format::MetaOpenGraphImage);
        assert_eq!(favicons[1].size(), Size::new(1200.0, 630.0));
    }

    #[test]
    fn links_come_before_metas() {
        let document = parse(
            r#"<head>
                <meta name="thumbnail" content="/thumb.png">
                <link rel="icon" href="/icon.png">
            </head>"#,
        );
        let page_url = Url::parse("https://example.com/").unwrap();
        let favicons = references(document.head().unwrap(), &page_url, false);
        assert_eq!(
            urls(&favicons),
            ["https://example.com/icon.png", "https://example.com/thumb.png"]
        );
    }
}
