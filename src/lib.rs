//! Discover the favicons of a website.
//!
//! A [`FaviconFinder`] tries several strategies in turn: the `<link>` and
//! `<meta>` elements of the page, a conventional `/favicon.ico` file and the
//! web application manifest. The favicons it returns can then be ranked with
//! [`ranking`] and downloaded.
use std::sync::OnceLock;

static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
pub(crate) fn client<'a>() -> &'a reqwest::Client {
    CLIENT.get_or_init(reqwest::Client::new)
}

mod config;
mod data_url;
mod decoder;
pub mod encoding;
mod error;
pub mod extract;
mod favicon;
mod favicon_url;
mod fetcher;
mod finder;
pub mod finders;
mod format;
pub mod html;
mod metadata;
pub mod ranking;
mod size;
mod source;
pub mod urls;

pub use config::Configuration;
pub use decoder::{Decoder, FaviconImage, ImageDecoder};
pub use error::{Error, Result};
pub use favicon::Favicon;
pub use favicon_url::{download_all, FaviconUrl};
pub use fetcher::{Fetcher, Response};
pub use finder::{FaviconFinder, State};
pub use format::{Format, LauncherScale};
pub use metadata::Metadata;
pub use size::Size;
pub use source::Source;

#[cfg(test)]
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
