use crate::{Format, Size, Source};

#[derive(Debug, Default, PartialEq, Clone, Copy)]
/// Favicon metadata.
pub struct Metadata {
    pub(crate) format: Format,
    pub(crate) source: Source,
    pub(crate) size: Option<Size>,
}

impl Metadata {
    pub fn new(format: Format, source: Source) -> Self {
        Self {
            format,
            source,
            size: None,
        }
    }

    pub fn with_size(format: Format, source: Source, size: Option<Size>) -> Self {
        Self {
            format,
            source,
            size,
        }
    }

    /// The reference kind the favicon was found through.
    pub fn format(&self) -> Format {
        self.format
    }

    /// The strategy that found the favicon.
    pub fn source(&self) -> Source {
        self.source
    }

    /// The favicon's size if it was specified by the markup or manifest.
    pub fn size(&self) -> Option<Size> {
        self.size
    }
}
