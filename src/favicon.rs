use std::fmt;

use crate::{Decoder, FaviconImage, FaviconUrl};

/// A favicon after its download.
#[derive(Clone, PartialEq)]
pub struct Favicon {
    url: FaviconUrl,
    image: Option<FaviconImage>,
}

impl Favicon {
    pub fn new(url: FaviconUrl, image: Option<FaviconImage>) -> Self {
        Self { url, image }
    }

    /// Wrap bytes obtained elsewhere. The image is absent when `decoder`
    /// cannot read them.
    pub fn from_data(url: FaviconUrl, data: &[u8], decoder: &dyn Decoder) -> Self {
        Self::new(url, decoder.decode(data))
    }

    /// Where the favicon was found.
    pub fn url(&self) -> &FaviconUrl {
        &self.url
    }

    /// The decoded image. `None` means it could not be decoded, not that it
    /// is empty.
    pub fn image(&self) -> Option<&FaviconImage> {
        self.image.as_ref()
    }

    /// The decoded dimensions in pixels.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.image
            .as_ref()
            .map(|image| (image.width(), image.height()))
    }
}

impl fmt::Debug for Favicon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Favicon")
            .field("url", &self.url.url().as_str())
            .field("metadata", self.url.metadata())
            .field("image", &self.image)
            .finish()
    }
}
