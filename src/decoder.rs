use std::fmt;

use image::GenericImageView;

/// A decoded favicon.
#[derive(Clone, PartialEq, Eq)]
pub struct FaviconImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
    is_svg: bool,
}

impl FaviconImage {
    pub fn new(data: Vec<u8>, width: u32, height: u32, is_svg: bool) -> Self {
        Self {
            data,
            width,
            height,
            is_svg,
        }
    }

    /// The raw bytes as downloaded.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel area, used to rank downloaded favicons.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn is_svg(&self) -> bool {
        self.is_svg
    }
}

impl fmt::Debug for FaviconImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaviconImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("is_svg", &self.is_svg)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Turns downloaded bytes into an image, or `None` when they are not one.
pub trait Decoder: Send + Sync {
    fn decode(&self, data: &[u8]) -> Option<FaviconImage>;
}

/// Decodes raster favicons with the `image` crate and reads the declared
/// dimensions of SVG ones.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageDecoder;

impl ImageDecoder {
    fn svg_dimensions(svg: &str) -> Option<(u32, u32)> {
        let metadata = svg_metadata::Metadata::parse(svg).ok()?;

        let width = metadata.width()? as u32;
        let height = metadata.height()? as u32;
        Some((width, height))
    }

    fn looks_like_svg(data: &[u8]) -> bool {
        let head = &data[..data.len().min(512)];
        String::from_utf8_lossy(head).to_ascii_lowercase().contains("<svg")
    }
}

impl Decoder for ImageDecoder {
    fn decode(&self, data: &[u8]) -> Option<FaviconImage> {
        if Self::looks_like_svg(data) {
            let svg = std::str::from_utf8(data).ok()?;
            let (width, height) = Self::svg_dimensions(svg)?;
            return Some(FaviconImage::new(data.to_vec(), width, height, true));
        }
        match image::load_from_memory(data) {
            Ok(image) => {
                let (width, height) = image.dimensions();
                Some(FaviconImage::new(data.to_vec(), width, height, false))
            }
            Err(e) => {
                tracing::debug!("Failed to decode favicon: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Cursor;

    use super::*;

    /// A PNG of the given dimensions.
    pub(crate) fn png(width: u32, height: u32) -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 40, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn decodes_png() {
        let image = ImageDecoder.decode(&png(32, 16)).unwrap();
        assert_eq!((image.width(), image.height()), (32, 16));
        assert_eq!(image.area(), 512);
        assert!(!image.is_svg());
    }

    #[test]
    fn decodes_svg_dimensions() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="48" height="24"></svg>"#;
        let image = ImageDecoder.decode(svg).unwrap();
        assert_eq!((image.width(), image.height()), (48, 24));
        assert!(image.is_svg());
    }

    #[test]
    fn rejects_html() {
        assert!(ImageDecoder
            .decode(b"<html><body>Not found</body></html>")
            .is_none());
        assert!(ImageDecoder.decode(b"").is_none());
    }
}
