use reqwest::StatusCode;
use url::Url;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No favicon was found")]
    NotFound,
    #[error("Failed to parse the HTML document")]
    HtmlParse,
    #[error("The HTML document has no <head>")]
    NoHtmlHead,
    #[error("The HTML document does not reference a web application manifest")]
    ManifestReferenceNotFound,
    #[error("Failed to download the web application manifest: {0}")]
    ManifestDownload(#[source] Box<Error>),
    #[error("Failed to parse the web application manifest: {0}")]
    ManifestParse(#[source] serde_json::Error),
    #[error("The web application manifest lists no icons")]
    ManifestNoIcons,
    #[error("The downloaded data is not a valid image")]
    InvalidImage,
    #[error("The favicon image has not been downloaded")]
    ImageNotDownloaded,
    #[error("Gave up following meta refresh redirects after {0} hops")]
    RedirectLoop(usize),
    #[error("The favicon lookup was cancelled")]
    Cancelled,
    #[error("{url} answered with {status}")]
    Status { url: Url, status: StatusCode },
    #[error("{url} sent more than {limit} bytes")]
    BodyTooLarge { url: Url, limit: usize },
    #[error("Invalid HTTP header {0:?}")]
    InvalidHeader(String),
    #[error("Invalid data URL")]
    DataUrl,
    #[error("Reqwest Error {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("Url Parse Error {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Whether this error means the lookup was cancelled, including when the
    /// cancellation surfaced while downloading a manifest.
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Cancelled => true,
            Self::ManifestDownload(inner) => inner.is_cancelled(),
            _ => false,
        }
    }
}
