use std::fmt;

/// Scale of an Android launcher icon listed by a web application manifest.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub enum LauncherScale {
    X0_75,
    X1,
    X1_5,
    X2,
    X3,
    X4,
}

impl LauncherScale {
    const ALL: [LauncherScale; 6] = [
        Self::X0_75,
        Self::X1,
        Self::X1_5,
        Self::X2,
        Self::X3,
        Self::X4,
    ];

    fn file_name(self) -> &'static str {
        match self {
            Self::X0_75 => "launcher-icon-0-75x.png",
            Self::X1 => "launcher-icon-1x.png",
            Self::X1_5 => "launcher-icon-1-5x.png",
            Self::X2 => "launcher-icon-2x.png",
            Self::X3 => "launcher-icon-3x.png",
            Self::X4 => "launcher-icon-4x.png",
        }
    }
}

/// The kind of reference a favicon was discovered through.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub enum Format {
    AppleTouchIcon,
    AppleTouchIconPrecomposed,
    ShortcutIcon,
    #[default]
    Icon,
    AlternateIcon,
    FluidIcon,
    /// `<meta name="thumbnail">`
    MetaThumbnail,
    /// `<meta property="og:image">`, usually a header or banner image.
    MetaOpenGraphImage,
    /// `<meta name="msapplication-TileImage">`
    MetaTileImage,
    /// A file probed at a conventional location.
    Ico,
    LauncherIcon(LauncherScale),
}

impl Format {
    const LINKS: [Format; 6] = [
        Self::AppleTouchIcon,
        Self::AppleTouchIconPrecomposed,
        Self::ShortcutIcon,
        Self::Icon,
        Self::AlternateIcon,
        Self::FluidIcon,
    ];

    const METAS: [Format; 3] = [
        Self::MetaThumbnail,
        Self::MetaOpenGraphImage,
        Self::MetaTileImage,
    ];

    /// Match the `rel` attribute of a `<link>`.
    ///
    /// ```
    /// use favicon_finder::Format;
    ///
    /// assert_eq!(Format::from_rel("shortcut icon"), Some(Format::ShortcutIcon));
    /// assert_eq!(Format::from_rel("Apple-Touch-Icon"), Some(Format::AppleTouchIcon));
    /// assert_eq!(Format::from_rel("stylesheet"), None);
    /// ```
    pub fn from_rel(rel: &str) -> Option<Self> {
        let rel = normalize(rel);
        Self::LINKS.into_iter().find(|f| f.as_str() == rel)
    }

    /// Match the `property` or `name` attribute of a `<meta>`.
    ///
    /// ```
    /// use favicon_finder::Format;
    ///
    /// assert_eq!(Format::from_meta("og:image"), Some(Format::MetaOpenGraphImage));
    /// assert_eq!(Format::from_meta("description"), None);
    /// ```
    pub fn from_meta(name: &str) -> Option<Self> {
        let name = normalize(name);
        Self::METAS
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(&name))
    }

    /// Match the `src` of a manifest icon against the launcher icon names,
    /// ignoring any directory and query.
    ///
    /// ```
    /// use favicon_finder::{Format, LauncherScale};
    ///
    /// assert_eq!(
    ///     Format::from_launcher_src("/icons/launcher-icon-2x.png"),
    ///     Some(Format::LauncherIcon(LauncherScale::X2))
    /// );
    /// assert_eq!(Format::from_launcher_src("android-chrome-192x192.png"), None);
    /// ```
    pub fn from_launcher_src(src: &str) -> Option<Self> {
        let path = src.split(['?', '#']).next().unwrap_or_default();
        let file_name = path.rsplit('/').next().unwrap_or_default();
        LauncherScale::ALL
            .into_iter()
            .find(|scale| scale.file_name() == file_name)
            .map(Self::LauncherIcon)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AppleTouchIcon => "apple-touch-icon",
            Self::AppleTouchIconPrecomposed => "apple-touch-icon-precomposed",
            Self::ShortcutIcon => "shortcut icon",
            Self::Icon => "icon",
            Self::AlternateIcon => "alternate icon",
            Self::FluidIcon => "fluid-icon",
            Self::MetaThumbnail => "thumbnail",
            Self::MetaOpenGraphImage => "og:image",
            Self::MetaTileImage => "msapplication-TileImage",
            Self::Ico => "ico",
            Self::LauncherIcon(scale) => scale.file_name(),
        }
    }

    /// Whether this is the OpenGraph header image, which is only a favicon
    /// candidate when the configuration accepts header images.
    pub fn is_header_image(self) -> bool {
        matches!(self, Self::MetaOpenGraphImage)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize(value: &str) -> String {
    value
        .split_ascii_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}
