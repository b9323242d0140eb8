use std::fmt;

/// Favicon dimensions inferred from markup, never checked against the
/// downloaded image.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    /// Both dimensions have to be finite and positive.
    pub fn new(width: f64, height: f64) -> Option<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        (valid(width) && valid(height)).then_some(Self { width, height })
    }

    /// Parse a single `WxH` tag such as `180x180`.
    ///
    /// ```
    /// use favicon_finder::Size;
    ///
    /// let size = Size::parse("180x180").unwrap();
    /// assert_eq!((size.width(), size.height()), (180.0, 180.0));
    /// assert_eq!(Size::parse("any"), None);
    /// ```
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_ascii_lowercase();
        let (width, height) = tag.split_once('x')?;
        Self::from_strs(width, height)
    }

    /// Parse an HTML `sizes` attribute, which may list several sizes. The
    /// largest one wins.
    pub fn from_sizes_attr(sizes: &str) -> Option<Self> {
        sizes
            .split_ascii_whitespace()
            .filter_map(Self::parse)
            .fold(None, |best: Option<Size>, size| match best {
                Some(best) if best.area() >= size.area() => Some(best),
                _ => Some(size),
            })
    }

    pub(crate) fn from_strs(width: &str, height: &str) -> Option<Self> {
        let width = width.trim().parse::<f64>().ok()?;
        let height = height.trim().parse::<f64>().ok()?;
        Self::new(width, height)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
