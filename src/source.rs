use std::fmt;

/// The discovery strategy that produced a favicon.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub enum Source {
    /// Links and metas found in the page's `<head>`.
    #[default]
    Html,
    /// A conventional file such as `/favicon.ico` probed directly.
    Ico,
    /// Icons listed by the web application manifest.
    Manifest,
    /// Canned results, used on its own for deterministic tests.
    Mock,
}

impl Source {
    /// The sources tried by a lookup, in default order. [`Source::Mock`] is
    /// never part of it.
    pub const ALL: [Source; 3] = [Self::Html, Self::Ico, Self::Manifest];

    /// The sources to try when `preferred` should go first. The remaining
    /// ones keep their default order.
    pub fn ordered(preferred: Self) -> Vec<Self> {
        if preferred.is_mock() {
            return vec![Self::Mock];
        }
        let mut sources = Self::ALL.to_vec();
        if let Some(index) = sources.iter().position(|s| *s == preferred) {
            let source = sources.remove(index);
            sources.insert(0, source);
        }
        sources
    }

    /// What a source looks for when the configuration does not say.
    pub fn default_preference(self) -> &'static str {
        match self {
            Self::Html => "apple-touch-icon",
            Self::Ico => "favicon.ico",
            Self::Manifest => "manifest",
            Self::Mock => "test.png",
        }
    }

    pub fn is_mock(self) -> bool {
        matches!(self, Self::Mock)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Html => f.write_str("html"),
            Self::Ico => f.write_str("ico"),
            Self::Manifest => f.write_str("manifest"),
            Self::Mock => f.write_str("mock"),
        }
    }
}
