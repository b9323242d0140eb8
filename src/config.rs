use std::{collections::HashMap, fmt, sync::Arc};

use crate::{html::Document, Decoder, ImageDecoder, Source};

/// Settings for one favicon lookup.
///
/// ```
/// use favicon_finder::{Configuration, Source};
///
/// let configuration = Configuration::default()
///     .with_preferred_source(Source::Ico)
///     .with_preference(Source::Ico, "favicon.png")
///     .with_header("Accept-Language", "en");
/// assert_eq!(configuration.preference(Source::Ico), "favicon.png");
/// assert_eq!(configuration.preference(Source::Manifest), "manifest");
/// ```
#[derive(Clone)]
pub struct Configuration {
    preferred_source: Source,
    preferences: HashMap<Source, String>,
    follow_meta_refresh: bool,
    prefetched_document: Option<Document>,
    headers: Vec<(String, String)>,
    accept_header_image: bool,
    decoder: Arc<dyn Decoder>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            preferred_source: Source::default(),
            preferences: HashMap::new(),
            follow_meta_refresh: false,
            prefetched_document: None,
            headers: Vec::new(),
            accept_header_image: false,
            decoder: Arc::new(ImageDecoder),
        }
    }
}

impl Configuration {
    /// The source tried first. [`Source::Mock`] is used on its own.
    pub fn with_preferred_source(mut self, source: Source) -> Self {
        self.preferred_source = source;
        self
    }

    /// A hint for one source: the file name probed by [`Source::Ico`], the
    /// `rel` of the manifest link for [`Source::Manifest`], the preferred
    /// `rel`/`property` for [`Source::Html`].
    pub fn with_preference(mut self, source: Source, preference: impl Into<String>) -> Self {
        self.preferences.insert(source, preference.into());
        self
    }

    /// Follow `<meta http-equiv="refresh">` redirects when fetching pages.
    pub fn with_meta_refresh(mut self, follow: bool) -> Self {
        self.follow_meta_refresh = follow;
        self
    }

    /// Use an already parsed page instead of downloading it.
    pub fn with_prefetched_document(mut self, document: Document) -> Self {
        self.prefetched_document = Some(document);
        self
    }

    /// A header sent with every request of the lookup.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Whether an OpenGraph header image counts as a favicon.
    pub fn with_header_image(mut self, accept: bool) -> Self {
        self.accept_header_image = accept;
        self
    }

    pub fn with_decoder(mut self, decoder: impl Decoder + 'static) -> Self {
        self.decoder = Arc::new(decoder);
        self
    }

    pub fn preferred_source(&self) -> Source {
        self.preferred_source
    }

    /// The configured hint for `source`, or its default.
    pub fn preference(&self, source: Source) -> &str {
        self.preferences
            .get(&source)
            .map(String::as_str)
            .unwrap_or_else(|| source.default_preference())
    }

    pub fn follow_meta_refresh(&self) -> bool {
        self.follow_meta_refresh
    }

    pub fn prefetched_document(&self) -> Option<&Document> {
        self.prefetched_document.as_ref()
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn accept_header_image(&self) -> bool {
        self.accept_header_image
    }

    pub fn decoder(&self) -> &dyn Decoder {
        self.decoder.as_ref()
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("preferred_source", &self.preferred_source)
            .field("preferences", &self.preferences)
            .field("follow_meta_refresh", &self.follow_meta_refresh)
            .field("prefetched_document", &self.prefetched_document.is_some())
            .field("headers", &self.headers)
            .field("accept_header_image", &self.accept_header_image)
            .finish()
    }
}
