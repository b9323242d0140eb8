use std::fmt;

use url::Url;

use crate::{
    data_url, Decoder, Error, Favicon, Fetcher, Format, ImageDecoder, Metadata, Result, Size,
    Source,
};

/// A discovered favicon that has not been downloaded yet.
#[derive(Clone, PartialEq)]
pub struct FaviconUrl {
    url: Url,
    metadata: Metadata,
}

impl FaviconUrl {
    pub fn new(url: Url, metadata: Metadata) -> Self {
        Self { url, metadata }
    }

    /// The favicon's absolute URL. Inline favicons use a `data:` URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn format(&self) -> Format {
        self.metadata.format()
    }

    pub fn source(&self) -> Source {
        self.metadata.source()
    }

    /// The size declared by the markup, if any.
    pub fn size(&self) -> Option<Size> {
        self.metadata.size()
    }

    pub fn is_data(&self) -> bool {
        self.url.scheme() == "data"
    }

    /// Download and decode the favicon.
    pub async fn download(&self) -> Result<Favicon> {
        self.download_with(&Fetcher::default(), &ImageDecoder).await
    }

    /// Download the favicon through `fetcher`, forwarding its headers and
    /// observing its cancellation token.
    ///
    /// Fails with [`Error::InvalidImage`] when the bytes do not decode.
    pub async fn download_with(&self, fetcher: &Fetcher, decoder: &dyn Decoder) -> Result<Favicon> {
        let data = if self.is_data() {
            data_url::decode(&self.url)?
        } else {
            fetcher.fetch(&self.url, false).await?.into_data()
        };
        match decoder.decode(&data) {
            Some(image) => Ok(Favicon::new(self.clone(), Some(image))),
            None => {
                tracing::debug!("{} is not a valid image", self.url);
                Err(Error::InvalidImage)
            }
        }
    }
}

/// Download every favicon, in order, leaving out the ones that fail.
pub async fn download_all(favicons: &[FaviconUrl]) -> Vec<Favicon> {
    download_all_with(favicons, &Fetcher::default(), &ImageDecoder).await
}

pub(crate) async fn download_all_with(
    favicons: &[FaviconUrl],
    fetcher: &Fetcher,
    decoder: &dyn Decoder,
) -> Vec<Favicon> {
    let mut downloaded = Vec::with_capacity(favicons.len());
    for favicon in favicons {
        match favicon.download_with(fetcher, decoder).await {
            Ok(favicon) => downloaded.push(favicon),
            Err(e) => tracing::debug!("Skipping {}: {e}", favicon.url()),
        }
    }
    downloaded
}

impl fmt::Debug for FaviconUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaviconUrl")
            .field("url", &self.url.as_str())
            .field("metadata", &self.metadata)
            .finish()
    }
}
