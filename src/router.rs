//! Route loading: fragment fetch, injection, styling and data binding.

use crate::bind::{self, BindContext};
use crate::placeholder;
use crate::site::Site;
use crate::Error;
use std::time::Duration;

/// How a `load_route` call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Fragment injected, styled and bound
    Rendered,
    /// Fragment could not be fetched; the error placeholder is shown
    Failed,
    /// A newer navigation started before this one finished; nothing applied
    Superseded,
}

/// Location of a route's HTML fragment
pub fn fragment_path(route: &str) -> String {
    format!("pages/{}.html", route)
}

impl Site {
    /// Load `route` into the container.
    ///
    /// Fetch failures never escape: a missing or broken fragment renders the
    /// error placeholder and yields [`RouteOutcome::Failed`]. Each call takes
    /// a fresh navigation token, and once a newer call starts this one stops
    /// writing to the document.
    pub async fn load_route(&self, route: &str) -> RouteOutcome {
        log::info!("Loading route {}", route);
        let token = self.issue_token();
        self.stop_carousel();
        self.state().contact_form = None;

        let entrance = self.config().entrance_class.clone();
        let shown = self.with_dom_if_current(token, |doc| {
            let container = self.container_in(doc)?;
            if !entrance.is_empty() {
                doc.remove_class(container, &entrance);
            }
            doc.replace_children(container, [placeholder::loading()]);
            Some(())
        });
        match shown {
            None => return RouteOutcome::Superseded,
            Some(None) => {
                log::error!("Container {} not found", self.config().container);
                return RouteOutcome::Failed;
            }
            Some(Some(())) => {}
        }

        let path = fragment_path(route);
        let fetched = match self.fetcher().get(&path).await {
            Ok(resp) if resp.is_success() => Ok(resp.body),
            Ok(resp) => Err(Error::Http {
                status: resp.status,
            }),
            Err(e) => Err(e),
        };

        let html = match fetched {
            Ok(html) => html,
            Err(e) => {
                log::error!("Failed to load page {}: {}", route, e);
                let applied = self.with_dom_if_current(token, |doc| {
                    if let Some(container) = self.container_in(doc) {
                        doc.replace_children(
                            container,
                            [placeholder::error(placeholder::PAGE_LOAD_FAILED)],
                        );
                    }
                });
                if applied.is_none() {
                    return RouteOutcome::Superseded;
                }
                self.close_menu();
                self.scroll_to_top();
                return RouteOutcome::Failed;
            }
        };

        let injected = self.with_dom_if_current(token, |doc| {
            if let Some(container) = self.container_in(doc) {
                doc.set_inner_html(container, &html);
            }
        });
        if injected.is_none() {
            return RouteOutcome::Superseded;
        }

        self.inner.styles.load(self, token, route).await;
        if !self.is_current(token) {
            return RouteOutcome::Superseded;
        }

        if let Err(e) = bind::bind_route(&BindContext::new(self, token), route).await {
            log::error!("Failed to bind data for {}: {}", route, e);
        }
        if !self.is_current(token) {
            return RouteOutcome::Superseded;
        }

        self.close_menu();
        self.scroll_to_top();
        self.play_entrance(token);
        self.arm_carousel(token);
        match self.with_state_if_current(token, |ui| ui.current_route = Some(route.to_string())) {
            Some(()) => RouteOutcome::Rendered,
            None => RouteOutcome::Superseded,
        }
    }

    /// Load the default route
    pub async fn start(&self) -> RouteOutcome {
        let route = self.config().default_route.clone();
        self.load_route(&route).await
    }

    /// Restore the page shell and start over, as a full page reload does
    pub async fn reload(&self) -> RouteOutcome {
        log::info!("Reloading site");
        self.issue_token();
        self.stop_carousel();
        self.reset_document();
        self.inner.styles.clear();
        {
            let mut state = self.state();
            state.current_route = None;
            state.contact_form = None;
            state.menu_open = false;
            state.scroll_y = 0;
        }
        self.start().await
    }

    /// Add the entrance class to the container and schedule its removal
    fn play_entrance(&self, token: u64) {
        let class = self.config().entrance_class.clone();
        if class.is_empty() {
            return;
        }
        let added = self.with_dom_if_current(token, |doc| {
            if let Some(container) = self.container_in(doc) {
                doc.add_class(container, &class);
            }
        });
        if added.is_none() {
            return;
        }

        let weak = self.downgrade();
        let delay = Duration::from_millis(self.config().entrance_ms);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(site) = Site::from_weak(&weak) {
                site.with_dom_if_current(token, |doc| {
                    if let Some(container) = site.container_in(doc) {
                        doc.remove_class(container, &class);
                    }
                });
            }
        });
    }
}
