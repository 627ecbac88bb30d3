//! Route-specific data binding.
//!
//! A binder fetches view models through the [`ApiClient`] and writes render
//! trees into named slots of the fragment that was just injected. Slots the
//! fragment does not contain are skipped. Routes without a binder are static.

pub mod about;
pub mod contact;
pub mod home;

use crate::api::ApiClient;
use crate::dom::{self, NodeId};
use crate::render::View;
use crate::site::{Site, UiState};
use crate::Result;

/// Slot access for one navigation. Writes become no-ops once a newer
/// navigation has started.
pub struct BindContext<'a> {
    site: &'a Site,
    token: u64,
}

impl<'a> BindContext<'a> {
    pub(crate) fn new(site: &'a Site, token: u64) -> Self {
        Self { site, token }
    }

    pub fn api(&self) -> &ApiClient {
        self.site.api()
    }

    pub fn site(&self) -> &Site {
        self.site
    }

    pub fn is_current(&self) -> bool {
        self.site.is_current(self.token)
    }

    /// Update the UI state unless the navigation is stale
    pub(crate) fn with_state<R>(&self, f: impl FnOnce(&mut UiState) -> R) -> Option<R> {
        self.site.with_state_if_current(self.token, f)
    }

    /// Run `f` on the slot matching `selector` inside the container.
    /// Returns `false` when the slot is absent or the navigation is stale.
    fn with_slot<F>(&self, selector: &str, f: F) -> Result<bool>
    where
        F: FnOnce(&mut crate::dom::Document, NodeId),
    {
        let sel = dom::selector(selector)?;
        let done = self.site.with_dom_if_current(self.token, |doc| {
            let container = self.site.container_in(doc)?;
            let slot = doc.select_first_in(container, &sel)?;
            f(doc, slot);
            Some(())
        });
        let found = matches!(done, Some(Some(())));
        if !found {
            log::debug!("slot {} skipped", selector);
        }
        Ok(found)
    }

    /// Replace the slot's content with `views`
    pub fn fill(&self, selector: &str, views: Vec<View>) -> Result<bool> {
        self.with_slot(selector, |doc, slot| doc.replace_children(slot, views))
    }

    /// Replace the slot's content with plain text
    pub fn set_text(&self, selector: &str, text: &str) -> Result<bool> {
        self.with_slot(selector, |doc, slot| doc.set_text(slot, text))
    }

    /// Node of a slot inside the container, if present
    pub fn slot(&self, selector: &str) -> Result<Option<NodeId>> {
        let sel = dom::selector(selector)?;
        Ok(self
            .site
            .with_dom_if_current(self.token, |doc| {
                let container = self.site.container_in(doc)?;
                doc.select_first_in(container, &sel)
            })
            .flatten())
    }
}

/// `value` unless it is blank, then `fallback`
pub fn or_fallback(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Run the binder registered for `route`
pub async fn bind_route(ctx: &BindContext<'_>, route: &str) -> Result<()> {
    match route {
        "home" => home::bind(ctx).await,
        "about" => about::bind(ctx).await,
        "contact" => contact::bind(ctx).await,
        _ => Ok(()),
    }
}
