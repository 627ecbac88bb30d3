//! The application instance.
//!
//! `Site` owns the page document and every piece of controller state (menu
//! flag, carousel, active stylesheet, bound form). It is cheap to clone; all
//! clones share one instance. Timers hold a weak reference so dropping the
//! last `Site` ends them.

use crate::api::ApiClient;
use crate::carousel::{self, Autoplay, Carousel};
use crate::dom::{self, Document, NodeId, Selector};
use crate::fetch::Fetcher;
use crate::style::StyleLoader;
use crate::{fixtures, Result, SiteConfig, Viewport};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) struct ActiveCarousel {
    pub(crate) state: Carousel,
    pub(crate) autoplay: Option<Autoplay>,
}

pub(crate) struct UiState {
    pub(crate) current_route: Option<String>,
    pub(crate) menu_open: bool,
    pub(crate) viewport: Viewport,
    pub(crate) scroll_y: u32,
    pub(crate) carousel: Option<ActiveCarousel>,
    pub(crate) contact_form: Option<NodeId>,
}

pub(crate) struct Inner {
    pub(crate) config: SiteConfig,
    pub(crate) fetcher: Arc<dyn Fetcher>,
    pub(crate) api: ApiClient,
    pub(crate) container: Selector,
    pub(crate) shell: String,
    pub(crate) styles: StyleLoader,
    document: Mutex<Document>,
    state: Mutex<UiState>,
    nav_seq: AtomicU64,
}

#[derive(Clone)]
pub struct Site {
    pub(crate) inner: Arc<Inner>,
}

impl Site {
    /// Create a site that talks HTTP to `config.base_url`
    #[cfg(feature = "http")]
    pub fn new(config: SiteConfig) -> Result<Self> {
        config.validate()?;
        let fetcher =
            crate::fetch::HttpFetcher::new(&config.base_url, &config.user_agent, config.timeout_ms)?;
        Self::with_fetcher(config, Arc::new(fetcher))
    }

    /// Create a site on top of any transport
    pub fn with_fetcher(config: SiteConfig, fetcher: Arc<dyn Fetcher>) -> Result<Self> {
        config.validate()?;
        let container = dom::selector(&config.container)?;
        let shell = config
            .shell_html
            .clone()
            .unwrap_or_else(|| fixtures::SHELL.to_string());
        let api = ApiClient::new(fetcher.clone(), config.api.clone());
        let state = UiState {
            current_route: None,
            menu_open: false,
            viewport: config.viewport,
            scroll_y: 0,
            carousel: None,
            contact_form: None,
        };
        Ok(Self {
            inner: Arc::new(Inner {
                document: Mutex::new(Document::parse(&shell)),
                state: Mutex::new(state),
                nav_seq: AtomicU64::new(0),
                styles: StyleLoader::new(),
                config,
                fetcher,
                api,
                container,
                shell,
            }),
        })
    }

    pub(crate) fn from_weak(weak: &Weak<Inner>) -> Option<Self> {
        weak.upgrade().map(|inner| Site { inner })
    }

    pub(crate) fn downgrade(&self) -> Weak<Inner> {
        Arc::downgrade(&self.inner)
    }

    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub fn fetcher(&self) -> &dyn Fetcher {
        self.inner.fetcher.as_ref()
    }

    /// Lock the page document. Do not hold the guard across an `.await`.
    pub fn dom(&self) -> MutexGuard<'_, Document> {
        lock(&self.inner.document)
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, UiState> {
        lock(&self.inner.state)
    }

    pub(crate) fn reset_document(&self) {
        *self.dom() = Document::parse(&self.inner.shell);
    }

    pub(crate) fn container_in(&self, doc: &Document) -> Option<NodeId> {
        doc.select_first_in(doc.root(), &self.inner.container)
    }

    pub fn container_html(&self) -> String {
        let doc = self.dom();
        self.container_in(&doc)
            .map(|c| doc.inner_html(c))
            .unwrap_or_default()
    }

    pub fn container_text(&self) -> String {
        let doc = self.dom();
        self.container_in(&doc)
            .map(|c| doc.text_content(c))
            .unwrap_or_default()
    }

    // --- navigation tokens ---

    /// Start a new navigation; completions holding older tokens are dropped
    pub(crate) fn issue_token(&self) -> u64 {
        self.inner.nav_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn current_token(&self) -> u64 {
        self.inner.nav_seq.load(Ordering::SeqCst)
    }

    pub(crate) fn is_current(&self, token: u64) -> bool {
        self.current_token() == token
    }

    /// Run `f` on the document only if `token` is still the latest navigation
    pub(crate) fn with_dom_if_current<R>(
        &self,
        token: u64,
        f: impl FnOnce(&mut Document) -> R,
    ) -> Option<R> {
        let mut doc = self.dom();
        if !self.is_current(token) {
            log::debug!("dropping write from superseded navigation {}", token);
            return None;
        }
        Some(f(&mut doc))
    }

    /// Run `f` on the UI state only if `token` is still the latest navigation.
    /// The token is checked under the state lock, so a newer navigation's
    /// `stop_carousel` either runs after the write or makes it a no-op.
    pub(crate) fn with_state_if_current<R>(
        &self,
        token: u64,
        f: impl FnOnce(&mut UiState) -> R,
    ) -> Option<R> {
        let mut state = self.state();
        if !self.is_current(token) {
            log::debug!("dropping state update from superseded navigation {}", token);
            return None;
        }
        Some(f(&mut state))
    }

    // --- observable state ---

    pub fn current_route(&self) -> Option<String> {
        self.state().current_route.clone()
    }

    pub fn menu_open(&self) -> bool {
        self.state().menu_open
    }

    pub fn viewport(&self) -> Viewport {
        self.state().viewport
    }

    pub fn scroll_y(&self) -> u32 {
        self.state().scroll_y
    }

    pub fn scroll_to_top(&self) {
        self.state().scroll_y = 0;
    }

    /// Route whose stylesheet is currently attached
    pub fn active_stylesheet(&self) -> Option<String> {
        self.inner.styles.active()
    }

    pub fn carousel(&self) -> Option<Carousel> {
        self.state().carousel.as_ref().map(|c| c.state)
    }

    /// Whether an autoplay timer is running
    pub fn autoplay_running(&self) -> bool {
        self.state()
            .carousel
            .as_ref()
            .and_then(|c| c.autoplay.as_ref())
            .map(|a| !a.is_finished())
            .unwrap_or(false)
    }

    // --- carousel ---

    /// Detect a carousel in the injected fragment and start its autoplay
    pub(crate) fn arm_carousel(&self, token: u64) {
        let detected = self.with_dom_if_current(token, |doc| {
            doc.query(carousel::CONTAINER).ok().flatten()?;
            let slides = doc.query_all(carousel::SLIDE).ok()?;
            let state = Carousel::new(slides.len())?;
            if let Err(e) = state.apply(doc) {
                log::warn!("carousel: {}", e);
            }
            Some(state)
        });
        let Some(Some(state)) = detected else {
            return;
        };

        let weak = self.downgrade();
        let period = Duration::from_millis(self.inner.config.carousel_interval_ms);
        let autoplay = Autoplay::start(period, move || match Site::from_weak(&weak) {
            Some(site) => site.advance_carousel(1).is_some(),
            None => false,
        });
        let total = state.total();
        // A refused install drops the timer, which aborts it
        let installed = self.with_state_if_current(token, move |ui| {
            ui.carousel = Some(ActiveCarousel {
                state,
                autoplay: Some(autoplay),
            });
        });
        if installed.is_some() {
            log::debug!("carousel armed with {} slides", total);
        }
    }

    /// Drop the carousel of the current fragment, stopping its timer
    pub(crate) fn stop_carousel(&self) {
        if let Some(active) = self.state().carousel.take() {
            if let Some(autoplay) = active.autoplay {
                autoplay.stop();
            }
        }
    }

    /// Move the carousel by `step`; `None` when no carousel is present
    pub fn advance_carousel(&self, step: isize) -> Option<usize> {
        let mut doc = self.dom();
        let mut state = self.state();
        let active = state.carousel.as_mut()?;
        let index = active.state.advance(step);
        if let Err(e) = active.state.apply(&mut doc) {
            log::warn!("carousel: {}", e);
        }
        Some(index)
    }

    /// Jump to slide `n` (1-based)
    pub fn go_to_slide(&self, n: usize) -> Result<Option<usize>> {
        let mut doc = self.dom();
        let mut state = self.state();
        let Some(active) = state.carousel.as_mut() else {
            return Ok(None);
        };
        let index = active.state.go_to(n)?;
        active.state.apply(&mut doc)?;
        Ok(Some(index))
    }
}
