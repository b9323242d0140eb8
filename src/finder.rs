use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{
    favicon_url::download_all_with,
    finders::{Finder, HtmlFinder, IcoFinder, ManifestFinder, MockFinder},
    ranking, Configuration, Error, Favicon, FaviconUrl, Fetcher, Result, Source,
};

/// Where the latest lookup of a [`FaviconFinder`] stands.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum State {
    #[default]
    Idle,
    Running(Source),
    Succeeded,
    Failed,
    Cancelled,
}

#[derive(Default)]
struct Run {
    generation: u64,
    token: Option<CancellationToken>,
    state: State,
}

/// Looks up the favicons of a website by trying each [`Source`] in turn until
/// one of them finds something.
///
/// ```no_run
/// use favicon_finder::{Configuration, FaviconFinder, Source};
/// use url::Url;
///
/// # async fn run() -> favicon_finder::Result<()> {
/// let url = Url::parse("https://gitlab.com")?;
/// let finder = FaviconFinder::new(url, Configuration::default().with_preferred_source(Source::Ico));
/// let favicons = finder.discover().await?;
/// let best = favicon_finder::ranking::largest(&favicons)?;
/// let favicon = finder.download(best).await?;
/// println!("{:?}", favicon.size());
/// # Ok(())
/// # }
/// ```
pub struct FaviconFinder {
    url: Url,
    configuration: Configuration,
    finders: HashMap<Source, Arc<dyn Finder>>,
    run: Mutex<Run>,
}

impl FaviconFinder {
    pub fn new(url: Url, configuration: Configuration) -> Self {
        let finders = HashMap::from([
            (Source::Html, Arc::new(HtmlFinder) as Arc<dyn Finder>),
            (Source::Ico, Arc::new(IcoFinder) as Arc<dyn Finder>),
            (Source::Manifest, Arc::new(ManifestFinder) as Arc<dyn Finder>),
            (Source::Mock, Arc::new(MockFinder::default()) as Arc<dyn Finder>),
        ]);
        Self {
            url,
            configuration,
            finders,
            run: Mutex::default(),
        }
    }

    /// Replace the strategy used for `source`.
    pub fn with_finder(mut self, source: Source, finder: impl Finder + 'static) -> Self {
        self.finders.insert(source, Arc::new(finder));
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn state(&self) -> State {
        self.lock().state
    }

    /// Find the favicons of the website.
    ///
    /// The sources are tried one after the other, the preferred one first,
    /// and the favicons of the first one that succeeds are returned. Starting
    /// a lookup cancels the one still running on this finder.
    pub async fn discover(&self) -> Result<Vec<FaviconUrl>> {
        let token = CancellationToken::new();
        let generation = {
            let mut run = self.lock();
            if let Some(previous) = run.token.replace(token.clone()) {
                previous.cancel();
            }
            run.generation += 1;
            run.state = State::Idle;
            run.generation
        };

        let result = self.run(generation, &token).await;
        let state = match &result {
            Ok(_) => State::Succeeded,
            Err(e) if e.is_cancelled() => State::Cancelled,
            Err(_) => State::Failed,
        };
        self.set_state(generation, state);
        result
    }

    /// Stop the running lookup. It resolves to [`Error::Cancelled`].
    pub fn cancel(&self) {
        if let Some(token) = &self.lock().token {
            tracing::debug!("Cancelling favicon lookup of {}", self.url);
            token.cancel();
        }
    }

    /// Download a favicon with the configured headers and decoder.
    pub async fn download(&self, favicon: &FaviconUrl) -> Result<Favicon> {
        let fetcher = Fetcher::new(self.configuration.headers(), CancellationToken::new())?;
        favicon
            .download_with(&fetcher, self.configuration.decoder())
            .await
    }

    /// Download every favicon, leaving out the ones that fail.
    pub async fn download_all(&self, favicons: &[FaviconUrl]) -> Result<Vec<Favicon>> {
        let fetcher = Fetcher::new(self.configuration.headers(), CancellationToken::new())?;
        Ok(download_all_with(favicons, &fetcher, self.configuration.decoder()).await)
    }

    /// The first favicon in the format configured for [`Source::Html`].
    pub fn preferred<'a>(&self, favicons: &'a [FaviconUrl]) -> Option<&'a FaviconUrl> {
        ranking::preferred(favicons, self.configuration.preference(Source::Html))
    }

    async fn run(&self, generation: u64, token: &CancellationToken) -> Result<Vec<FaviconUrl>> {
        let fetcher = Fetcher::new(self.configuration.headers(), token.clone())?;
        for source in Source::ordered(self.configuration.preferred_source()) {
            if token.is_cancelled() {
                return Err(Error::Cancelled);
            }
            let Some(finder) = self.finders.get(&source) else {
                tracing::warn!("No finder registered for {source}");
                continue;
            };

            self.set_state(generation, State::Running(source));
            tracing::debug!("Looking for favicons of {} using {source}", self.url);
            match finder.find(&self.url, &self.configuration, &fetcher).await {
                Ok(favicons) if !favicons.is_empty() => return Ok(favicons),
                Ok(_) => tracing::debug!("{source} returned no favicons"),
                Err(e) if e.is_cancelled() => return Err(Error::Cancelled),
                Err(e) => tracing::debug!("{source} failed: {e}"),
            }
        }

        if token.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Err(Error::NotFound)
        }
    }

    fn set_state(&self, generation: u64, state: State) {
        let mut run = self.lock();
        if run.generation == generation {
            run.state = state;
        }
    }

    fn lock(&self) -> MutexGuard<'_, Run> {
        self.run.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for FaviconFinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaviconFinder")
            .field("url", &self.url.as_str())
            .field("configuration", &self.configuration)
            .field("state", &self.state())
            .finish()
    }
}
