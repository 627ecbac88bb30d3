//! Folio site runtime
//!
//! A headless runtime for a single-page portfolio site: it keeps the page
//! document in memory, loads route fragments and their stylesheets, binds
//! sample data into named slots, and drives the testimonial carousel and the
//! mobile menu. A mock REST backend serving the same sample data is included.
//!
//! # Features
//!
//! - **http** (default): `HttpFetcher`, a reqwest transport
//! - **mock-backend** (default): `backend::MockBackend` served with tiny_http
//!
//! # Example
//!
//! ```no_run
//! use folio::{Site, SiteConfig};
//!
//! # async fn run() -> folio::Result<()> {
//! let config = SiteConfig {
//!     base_url: "http://127.0.0.1:8080/".to_string(),
//!     ..Default::default()
//! };
//! let site = Site::new(config)?;
//! site.start().await;
//! println!("{}", site.container_text());
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod api;
pub mod bind;
pub mod carousel;
pub mod dom;
pub mod fetch;
pub mod fixtures;
pub mod model;
pub mod navigation;
pub mod placeholder;
pub mod render;
pub mod router;
pub mod site;
pub mod style;

// Mock REST backend (tiny_http server + request handler)
#[cfg(feature = "mock-backend")]
pub mod backend;

pub use api::ApiClient;
pub use dom::{Document, NodeId, Selector};
pub use fetch::{Fetcher, MemoryFetcher, Response};
#[cfg(feature = "http")]
pub use fetch::HttpFetcher;
pub use navigation::UiEvent;
pub use router::RouteOutcome;
pub use site::Site;

/// Configuration for the site runtime
///
/// The defaults mirror the behaviour of the published site: `home` is the
/// landing route, fragments go into `#corpo`, the mobile menu collapses
/// above 768px and the carousel advances every five seconds.
///
/// # Examples
///
/// ```
/// let cfg = folio::SiteConfig::default();
/// assert_eq!(cfg.default_route, "home");
/// assert_eq!(cfg.api.timeout_ms, 10000);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL fragments and stylesheets are resolved against
    pub base_url: String,
    /// User agent string sent with requests
    pub user_agent: String,
    /// Transport timeout for fragment and stylesheet requests in milliseconds
    pub timeout_ms: u64,
    /// Viewport dimensions at startup
    pub viewport: Viewport,
    /// Selector of the element fragments are injected into
    pub container: String,
    /// Route loaded by `Site::start`
    pub default_route: String,
    /// Widths above this force-close the mobile menu
    pub mobile_breakpoint: u32,
    /// Class applied to the container after a fragment is injected
    pub entrance_class: String,
    /// How long the entrance class stays on, in milliseconds
    pub entrance_ms: u64,
    /// Carousel autoplay period in milliseconds
    pub carousel_interval_ms: u64,
    /// How long the contact form acknowledgment stays visible, in milliseconds
    pub feedback_ms: u64,
    /// Page shell markup; the embedded shell is used when unset
    pub shell_html: Option<String>,
    /// Data client settings
    pub api: ApiConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/".to_string(),
            user_agent: format!("folio/{}", env!("CARGO_PKG_VERSION")),
            timeout_ms: 30000,
            viewport: Viewport::default(),
            container: "#corpo".to_string(),
            default_route: "home".to_string(),
            mobile_breakpoint: 768,
            entrance_class: "fade-in".to_string(),
            entrance_ms: 600,
            carousel_interval_ms: 5000,
            feedback_ms: 5000,
            shell_html: None,
            api: ApiConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Parse a (possibly partial) JSON configuration; missing keys keep
    /// their defaults
    pub fn from_json(src: &str) -> Result<Self> {
        let cfg: SiteConfig = serde_json::from_str(src)
            .map_err(|e| Error::ConfigError(format!("cannot parse config: {}", e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url)
            .map_err(|e| Error::ConfigError(format!("base_url {}: {}", self.base_url, e)))?;
        dom::selector(&self.container)
            .map_err(|_| Error::ConfigError(format!("container selector {}", self.container)))?;
        if self.default_route.trim().is_empty() {
            return Err(Error::ConfigError("default_route is empty".into()));
        }
        if self.timeout_ms == 0 || self.api.timeout_ms == 0 {
            return Err(Error::ConfigError("timeouts must be non-zero".into()));
        }
        if self.carousel_interval_ms == 0 {
            return Err(Error::ConfigError("carousel_interval_ms must be non-zero".into()));
        }
        Ok(())
    }
}

/// Data client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Prefix joined with the endpoint paths
    pub base_url: String,
    /// Paths of the remote collections
    pub endpoints: Endpoints,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Artificial latency of the embedded sources
    pub delays: SimulatedDelays,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://jsonplaceholder.typicode.com".to_string(),
            endpoints: Endpoints::default(),
            timeout_ms: 10000,
            delays: SimulatedDelays::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Endpoints {
    pub posts: String,
    pub users: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            posts: "/posts".to_string(),
            users: "/users".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulatedDelays {
    pub testimonials_ms: u64,
    pub stats_ms: u64,
    pub about_ms: u64,
}

impl Default for SimulatedDelays {
    fn default() -> Self {
        Self {
            testimonials_ms: 500,
            stats_ms: 300,
            about_ms: 400,
        }
    }
}

impl SimulatedDelays {
    /// No artificial latency
    pub fn none() -> Self {
        Self {
            testimonials_ms: 0,
            stats_ms: 0,
            about_ms: 0,
        }
    }
}

/// Viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}
