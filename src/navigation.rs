//! User interaction: navigation buttons, the mobile menu, carousel controls
//! and form events.

use crate::bind::contact;
use crate::dom::{self, Document, NodeId, Selector};
use crate::placeholder;
use crate::site::Site;
use crate::{Error, Result, Viewport};

pub const NAV: &str = ".nav";
pub const MENU_TOGGLE: &str = ".mobile-menu-toggle";
pub const NAV_BUTTON: &str = ".nav-btn";
pub const CAROUSEL_PREV: &str = ".carousel-prev";
pub const CAROUSEL_NEXT: &str = ".carousel-next";
pub const SLIDE_INDICATOR: &str = ".indicator[data-slide]";

const MENU_ACTIVE: &str = "active";

/// Input delivered to a running site
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Click(NodeId),
    /// New value typed into a form control
    Input { target: NodeId, value: String },
    Submit(NodeId),
    Resize { width: u32, height: u32 },
    Scroll { y: u32 },
}

/// What a click resolved to, decided while the document is locked
enum ClickAction {
    None,
    Navigate(String),
    Reload,
    Advance(isize),
    GoTo(usize),
}

fn sel(s: &str) -> Result<Selector> {
    dom::selector(s)
}

fn set_menu_classes(doc: &mut Document, open: bool) -> Result<()> {
    for selector in [NAV, MENU_TOGGLE] {
        if let Some(node) = doc.query(selector)? {
            if open {
                doc.add_class(node, MENU_ACTIVE);
            } else {
                doc.remove_class(node, MENU_ACTIVE);
            }
        }
    }
    Ok(())
}

impl Site {
    /// Flip the mobile menu and return whether it is now open
    pub fn toggle_menu(&self) -> bool {
        let open = !self.menu_open();
        self.set_menu(open);
        open
    }

    pub fn close_menu(&self) {
        self.set_menu(false);
    }

    fn set_menu(&self, open: bool) {
        let mut doc = self.dom();
        if let Err(e) = set_menu_classes(&mut doc, open) {
            log::warn!("menu: {}", e);
        }
        self.state().menu_open = open;
    }

    /// Click the first element matching `selector`
    pub async fn click(&self, selector: &str) -> Result<()> {
        let target = self
            .dom()
            .query(selector)?
            .ok_or_else(|| Error::MissingNode(selector.to_string()))?;
        self.dispatch(UiEvent::Click(target)).await
    }

    /// Deliver an event. Events aimed at nodes that are no longer in the
    /// document are ignored.
    pub async fn dispatch(&self, event: UiEvent) -> Result<()> {
        match event {
            UiEvent::Click(target) => self.on_click(target).await,
            UiEvent::Input { target, value } => {
                let mut doc = self.dom();
                if live(&doc, target) {
                    contact::set_control_value(&mut doc, target, &value);
                }
                Ok(())
            }
            UiEvent::Submit(form) => {
                let bound = self.state().contact_form;
                let attached = live(&self.dom(), form);
                if attached && bound == Some(form) {
                    contact::handle_submit(self, form);
                } else {
                    log::debug!("submit on unbound form ignored");
                }
                Ok(())
            }
            UiEvent::Resize { width, height } => {
                self.state().viewport = Viewport { width, height };
                if width > self.config().mobile_breakpoint && self.menu_open() {
                    self.close_menu();
                }
                Ok(())
            }
            UiEvent::Scroll { y } => {
                self.state().scroll_y = y;
                Ok(())
            }
        }
    }

    async fn on_click(&self, target: NodeId) -> Result<()> {
        let action = {
            let doc = self.dom();
            if !live(&doc, target) {
                log::debug!("click on detached node ignored");
                return Ok(());
            }
            let toggle = doc.closest(target, &sel(MENU_TOGGLE)?);
            let nav = doc.closest(target, &sel(NAV)?);
            drop(doc);

            if toggle.is_some() {
                self.toggle_menu();
                return Ok(());
            }
            if nav.is_none() && self.menu_open() {
                self.close_menu();
            }

            let doc = self.dom();
            self.resolve_click(&doc, target)?
        };

        match action {
            ClickAction::None => {}
            ClickAction::Navigate(route) => {
                self.load_route(&route).await;
            }
            ClickAction::Reload => {
                self.reload().await;
            }
            ClickAction::Advance(step) => {
                self.advance_carousel(step);
            }
            ClickAction::GoTo(n) => {
                self.go_to_slide(n)?;
            }
        }
        Ok(())
    }

    fn resolve_click(&self, doc: &Document, target: NodeId) -> Result<ClickAction> {
        if doc.closest(target, &sel(CAROUSEL_PREV)?).is_some() {
            return Ok(ClickAction::Advance(-1));
        }
        if doc.closest(target, &sel(CAROUSEL_NEXT)?).is_some() {
            return Ok(ClickAction::Advance(1));
        }
        if let Some(indicator) = doc.closest(target, &sel(SLIDE_INDICATOR)?) {
            let n = doc
                .attr(indicator, "data-slide")
                .and_then(|v| v.trim().parse::<usize>().ok());
            return Ok(n.map(ClickAction::GoTo).unwrap_or(ClickAction::None));
        }
        if doc.closest(target, &sel(placeholder::RETRY_BUTTON)?).is_some() {
            return Ok(ClickAction::Reload);
        }
        if let Some(button) = doc.closest(target, &sel(NAV_BUTTON)?) {
            return Ok(match doc.attr(button, "id") {
                Some(route) if !route.is_empty() => ClickAction::Navigate(route.to_string()),
                _ => ClickAction::None,
            });
        }
        Ok(ClickAction::None)
    }
}

fn live(doc: &Document, id: NodeId) -> bool {
    doc.exists(id) && doc.is_attached(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_classes_follow_state() {
        let mut doc = Document::parse(
            r#"<button class="mobile-menu-toggle"></button><nav class="nav"></nav>"#,
        );
        set_menu_classes(&mut doc, true).unwrap();
        let nav = doc.query(NAV).unwrap().unwrap();
        let toggle = doc.query(MENU_TOGGLE).unwrap().unwrap();
        assert!(doc.has_class(nav, "active"));
        assert!(doc.has_class(toggle, "active"));
        set_menu_classes(&mut doc, false).unwrap();
        assert!(!doc.has_class(nav, "active"));
        assert!(!doc.has_class(toggle, "active"));
    }
}
