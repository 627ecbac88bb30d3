//! Per-route stylesheet installation.
//!
//! Each route may ship `pages/css/<route>.css`. The file is looked up under a
//! fixed list of relative paths and the first one that answers 2xx is linked
//! in the document head. Only one route stylesheet is attached at a time.

use crate::render::El;
use crate::site::{lock, Site};
use std::sync::Mutex;

/// Attribute marking links installed by the loader
pub const ROUTE_STYLE_ATTR: &str = "data-route-style";

/// Paths tried for a route's stylesheet, in priority order
pub fn candidate_paths(route: &str) -> [String; 4] {
    [
        format!("./pages/css/{}.css", route),
        format!("pages/css/{}.css", route),
        format!("/pages/css/{}.css", route),
        format!("../pages/css/{}.css", route),
    ]
}

pub fn link_id(route: &str) -> String {
    format!("css-{}", route)
}

#[derive(Debug, Default)]
pub struct StyleLoader {
    active: Mutex<Option<String>>,
}

impl StyleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route of the attached stylesheet
    pub fn active(&self) -> Option<String> {
        lock(&self.active).clone()
    }

    pub(crate) fn clear(&self) {
        *lock(&self.active) = None;
    }

    /// Replace the attached route stylesheet with the one for `route`.
    ///
    /// Returns the path that was installed, or `None` when no candidate
    /// resolved or the navigation was superseded. Failures are logged and
    /// never abort the page load.
    pub(crate) async fn load(&self, site: &Site, token: u64, route: &str) -> Option<String> {
        let removed = site.with_dom_if_current(token, |doc| {
            let selector = format!("link[{}]", ROUTE_STYLE_ATTR);
            for link in doc.query_all(&selector).unwrap_or_default() {
                doc.detach(link);
            }
            lock(&self.active).take()
        });
        match removed {
            Some(Some(previous)) => log::debug!("removed stylesheet for {}", previous),
            Some(None) => {}
            None => return None,
        }

        for path in candidate_paths(route) {
            if !site.is_current(token) {
                log::debug!("stylesheet lookup for {} abandoned at {}", route, path);
                return None;
            }
            match site.fetcher().get(&path).await {
                Ok(resp) if resp.is_success() => {
                    let installed = site.with_dom_if_current(token, |doc| {
                        let head = doc.head()?;
                        let link = El::new("link")
                            .attr("rel", "stylesheet")
                            .attr("href", path.as_str())
                            .id(&link_id(route))
                            .attr(ROUTE_STYLE_ATTR, route);
                        doc.append_view(head, link.into());
                        *lock(&self.active) = Some(route.to_string());
                        Some(())
                    });
                    return match installed {
                        Some(Some(())) => {
                            log::info!("Stylesheet loaded: {}", path);
                            Some(path)
                        }
                        Some(None) => {
                            log::warn!("Document has no <head>; stylesheet {} not attached", path);
                            None
                        }
                        None => None,
                    };
                }
                Ok(resp) => log::warn!("Stylesheet attempt failed for {}: status {}", path, resp.status),
                Err(e) => log::warn!("Stylesheet attempt failed for {}: {}", path, e),
            }
        }

        log::warn!("Could not load a stylesheet for {} from any candidate path", route);
        None
    }
}
