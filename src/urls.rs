use std::sync::OnceLock;

use regex::Regex;
use url::Url;

/// Registrable suffixes recognized when stripping subdomains. Deliberately
/// short: hosts under any other suffix are left alone.
const TLDS: [&str; 4] = ["com", "com.au", "net", "org"];

static ABSOLUTE_HTTP: OnceLock<Regex> = OnceLock::new();

/// Whether `input` starts with `http://` or `https://`, in any case.
pub fn is_absolute_http(input: &str) -> bool {
    ABSOLUTE_HTTP
        .get_or_init(|| Regex::new(r"(?i)^(https?)://").expect("valid regex"))
        .is_match(input)
}

/// The origin of `url` with an empty path, e.g. `https://example.com/`.
pub fn root_of(url: &Url) -> Result<Url, url::ParseError> {
    url.join("/")
}

/// Strip every subdomain off `url`, keeping its scheme and port.
///
/// Returns `None` when the host does not end in a recognized suffix, which is
/// the case for IP addresses and most country code domains.
///
/// ```
/// use favicon_finder::urls::without_subdomains;
/// use url::Url;
///
/// let url = Url::parse("https://shop.eu.example.com/cart").unwrap();
/// assert_eq!(without_subdomains(&url).unwrap().as_str(), "https://example.com/");
///
/// let url = Url::parse("http://127.0.0.1:8000/").unwrap();
/// assert!(without_subdomains(&url).is_none());
/// ```
pub fn without_subdomains(url: &Url) -> Option<Url> {
    let host = url.host_str()?;
    let labels = host.split('.').collect::<Vec<_>>();
    let index = (0..labels.len()).find(|&i| TLDS.contains(&labels[i..].join(".").as_str()))?;
    if index == 0 {
        return None;
    }
    let mut stripped = format!("{}://{}", url.scheme(), labels[index - 1..].join("."));
    if let Some(port) = url.port() {
        stripped.push_str(&format!(":{port}"));
    }
    Url::parse(&stripped).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(url: &str) -> Option<String> {
        without_subdomains(&Url::parse(url).unwrap()).map(String::from)
    }

    #[test]
    fn absolute_http_detection() {
        assert!(is_absolute_http("https://example.com/favicon.ico"));
        assert!(is_absolute_http("HTTP://example.com"));
        assert!(!is_absolute_http("/favicon.ico"));
        assert!(!is_absolute_http("//cdn.example.com/favicon.ico"));
        assert!(!is_absolute_http("ftp://example.com/favicon.ico"));
        assert!(!is_absolute_http("data:image/png;base64,AAAA"));
    }

    #[test]
    fn root_drops_the_path() {
        let url = Url::parse("https://example.com:8443/a/b?c=d").unwrap();
        assert_eq!(root_of(&url).unwrap().as_str(), "https://example.com:8443/");
    }

    #[test]
    fn strips_subdomains() {
        assert_eq!(
            strip("https://shop.example.com/"),
            Some("https://example.com/".into())
        );
        assert_eq!(
            strip("http://a.b.example.org/x"),
            Some("http://example.org/".into())
        );
        assert_eq!(
            strip("https://www.example.com.au/"),
            Some("https://example.com.au/".into())
        );
        assert_eq!(
            strip("https://example.net:8080/"),
            Some("https://example.net:8080/".into())
        );
    }

    #[test]
    fn unknown_suffixes_are_not_stripped() {
        assert_eq!(strip("https://www.example.de/"), None);
        assert_eq!(strip("http://127.0.0.1:8000/"), None);
        assert_eq!(strip("https://com/"), None);
    }
}
