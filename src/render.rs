//! Render trees built by the view binders.
//!
//! Binders project view models into `View` values with the [`El`] builder and
//! hand them to [`Document::replace_children`](crate::dom::Document::replace_children).
//! Text is always stored as text, so record fields never need escaping.

use crate::dom::Document;

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Element(El),
    Text(String),
}

/// Element builder
#[derive(Debug, Clone, PartialEq)]
pub struct El {
    pub(crate) tag: String,
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) children: Vec<View>,
}

impl El {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, replacing an earlier value of the same name
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_string(), value)),
        }
        self
    }

    pub fn attr_if(self, cond: bool, name: &str, value: impl Into<String>) -> Self {
        if cond {
            self.attr(name, value)
        } else {
            self
        }
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Append one or more space separated classes
    pub fn class(mut self, class: &str) -> Self {
        let class = class.trim();
        if class.is_empty() {
            return self;
        }
        match self.attrs.iter_mut().find(|(k, _)| k == "class") {
            Some((_, v)) => {
                v.push(' ');
                v.push_str(class);
            }
            None => self.attrs.push(("class".to_string(), class.to_string())),
        }
        self
    }

    pub fn class_if(self, cond: bool, class: &str) -> Self {
        if cond {
            self.class(class)
        } else {
            self
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(View::Text(text.into()));
        self
    }

    pub fn child(mut self, child: impl Into<View>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I, V>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<View>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }
}

impl From<El> for View {
    fn from(el: El) -> Self {
        View::Element(el)
    }
}

impl From<String> for View {
    fn from(text: String) -> Self {
        View::Text(text)
    }
}

impl From<&str> for View {
    fn from(text: &str) -> Self {
        View::Text(text.to_string())
    }
}

impl View {
    /// Serialize the tree as HTML
    pub fn to_html(&self) -> String {
        let mut doc = Document::new();
        let root = doc.root();
        let id = doc.append_view(root, self.clone());
        doc.outer_html(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_merges_classes_and_replaces_attrs() {
        let el = El::new("DIV")
            .class("card")
            .class_if(true, "popular")
            .class_if(false, "hidden")
            .attr("data-plan", "1")
            .attr("data-plan", "2");
        assert_eq!(el.tag, "div");
        assert_eq!(
            el.attrs,
            vec![
                ("class".to_string(), "card popular".to_string()),
                ("data-plan".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn optional_children_are_skipped() {
        let badge: Option<El> = None;
        let view: View = El::new("div")
            .children(badge)
            .child(El::new("h1").text("Plano"))
            .into();
        assert_eq!(view.to_html(), "<div><h1>Plano</h1></div>");
    }

    #[test]
    fn text_is_escaped_on_output() {
        let view: View = El::new("p").text("<b>").into();
        assert_eq!(view.to_html(), "<p>&lt;b&gt;</p>");
    }
}
