use std::sync::OnceLock;

use encoding_rs::Encoding;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, USER_AGENT};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{client, encoding, html::Document, urls, Error, Result};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 11_1) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0.2 Safari/605.1.15";

static REFRESH_PREFIX: OnceLock<Regex> = OnceLock::new();

/// The body of a successful GET and the encoding its text is in.
#[derive(Debug, Clone)]
pub struct Response {
    url: Url,
    data: Vec<u8>,
    encoding: &'static Encoding,
}

impl Response {
    pub fn new(url: Url, data: Vec<u8>, encoding: &'static Encoding) -> Self {
        Self {
            url,
            data,
            encoding,
        }
    }

    /// The URL the body was served from, after meta refresh redirects.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// The body decoded with the declared charset, replacing malformed
    /// sequences.
    pub fn text(&self) -> String {
        let (text, _, had_errors) = self.encoding.decode(&self.data);
        if had_errors {
            tracing::debug!(
                "{} is not valid {}, replaced malformed sequences",
                self.url,
                self.encoding.name()
            );
        }
        text.into_owned()
    }
}

/// Issues the GET requests of one lookup, with its headers and its
/// cancellation token.
#[derive(Debug, Clone)]
pub struct Fetcher {
    headers: HeaderMap,
    token: CancellationToken,
    max_redirect_depth: usize,
    max_body_size: usize,
}

impl Default for Fetcher {
    fn default() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        Self {
            headers,
            token: CancellationToken::new(),
            max_redirect_depth: Self::MAX_REDIRECT_DEPTH,
            max_body_size: Self::MAX_BODY_SIZE,
        }
    }
}

impl Fetcher {
    /// How many pages a single fetch may load while following meta refresh
    /// redirects.
    pub const MAX_REDIRECT_DEPTH: usize = 5;

    /// The largest body read from a single response, in bytes.
    pub const MAX_BODY_SIZE: usize = 2048 * 1024;

    pub fn new(headers: &[(String, String)], token: CancellationToken) -> Result<Self> {
        let mut fetcher = Self {
            token,
            ..Self::default()
        };
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| Error::InvalidHeader(name.clone()))?;
            let value =
                HeaderValue::from_str(value).map_err(|_| Error::InvalidHeader(name.to_string()))?;
            fetcher.headers.insert(name, value);
        }
        Ok(fetcher)
    }

    pub fn with_max_redirect_depth(mut self, depth: usize) -> Self {
        self.max_redirect_depth = depth;
        self
    }

    /// Fail with [`Error::BodyTooLarge`] once a response body grows past
    /// `size` bytes.
    pub fn with_max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// GET `url`. When `follow_redirect` is set and the page declares a
    /// `<meta http-equiv="refresh">`, load its target instead, up to
    /// [`Fetcher::MAX_REDIRECT_DEPTH`] pages in total.
    ///
    /// There is no cycle detection besides the depth bound.
    pub async fn fetch(&self, url: &Url, follow_redirect: bool) -> Result<Response> {
        let mut url = url.clone();
        let mut depth = 0;
        loop {
            if depth >= self.max_redirect_depth {
                return Err(Error::RedirectLoop(depth));
            }
            let response = self.get(&url).await?;
            if !follow_redirect {
                return Ok(response);
            }
            match refresh_target(&response) {
                Some(target) => {
                    tracing::debug!("Following meta refresh from {url} to {target}");
                    url = target;
                    depth += 1;
                }
                None => return Ok(response),
            }
        }
    }

    async fn get(&self, url: &Url) -> Result<Response> {
        if self.token.is_cancelled() {
            return Err(Error::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(Error::Cancelled),
            response = self.send(url) => response,
        }
    }

    async fn send(&self, url: &Url) -> Result<Response> {
        tracing::trace!("GET {url}");
        let mut res = client()
            .get(url.as_str())
            .headers(self.headers.clone())
            .send()
            .await?;
        let status = res.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.clone(),
                status,
            });
        }
        let encoding = encoding::from_content_type(
            res.headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
        );
        let too_large = || Error::BodyTooLarge {
            url: url.clone(),
            limit: self.max_body_size,
        };
        if res
            .content_length()
            .is_some_and(|length| length > self.max_body_size as u64)
        {
            return Err(too_large());
        }
        let mut data = Vec::new();
        while let Some(chunk) = res.chunk().await? {
            if data.len() + chunk.len() > self.max_body_size {
                return Err(too_large());
            }
            data.extend_from_slice(&chunk);
        }
        Ok(Response::new(url.clone(), data, encoding))
    }
}

/// Where a page's `<meta http-equiv="refresh">` points to, if anywhere.
fn refresh_target(response: &Response) -> Option<Url> {
    let document = Document::parse(&response.text()).ok()?;
    let head = document.head()?;
    let content = head
        .select("meta")
        .find(|meta| {
            meta.attr("http-equiv")
                .is_some_and(|value| value.trim().eq_ignore_ascii_case("refresh"))
        })?
        .attr("content")?;
    let target = strip_refresh_prefix(content)?;
    if urls::is_absolute_http(target) {
        return Url::parse(target).ok();
    }
    Url::parse(&concat_fragment(response.url().as_str(), target)).ok()
}

/// Drop the `0;URL=` part of a refresh declaration. Declarations without a
/// URL only reload the page and yield `None`.
fn strip_refresh_prefix(content: &str) -> Option<&str> {
    let prefix = REFRESH_PREFIX.get_or_init(|| {
        Regex::new(r#"(?i)^\s*\d+(\.\d+)?\s*[;,]\s*url\s*=\s*['"]?"#).expect("valid regex")
    });
    let found = prefix.find(content)?;
    let target = content[found.end()..].trim().trim_end_matches(['\'', '"']);
    (!target.is_empty()).then_some(target)
}

/// Append a relative refresh target to the URL of the page declaring it,
/// with exactly one `/` in between.
fn concat_fragment(url: &str, fragment: &str) -> String {
    match (url.ends_with('/'), fragment.starts_with('/')) {
        (true, true) => format!("{url}{}", &fragment[1..]),
        (false, false) => format!("{url}/{fragment}"),
        _ => format!("{url}{fragment}"),
    }
}
