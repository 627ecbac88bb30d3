//! In-memory page document.
//!
//! HTML is parsed with `scraper` and copied into an arena of owned nodes so the
//! router and the binders can replace subtrees, toggle classes and read form
//! values from any task. Queries use `scraper::Selector` through a
//! `selectors::Element` impl on the arena, and output goes through the
//! html5ever serializer. Detached nodes stay in the arena but are unreachable
//! from the root.

use crate::render::View;
use crate::{Error, Result};
use html5ever::serialize::{serialize, Serialize, SerializeOpts, Serializer, TraversalScope};
use html5ever::{LocalName, Namespace, QualName};
use scraper::selector::{NonTSPseudoClass, PseudoElement, Simple};
use scraper::{ElementRef, Html};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::matching::{self, ElementSelectorFlags, MatchingContext, MatchingMode, QuirksMode};
use selectors::OpaqueElement;
use std::io;

pub use scraper::Selector;

const HTML_NS: &str = "http://www.w3.org/1999/xhtml";

/// Parse a CSS selector group into the crate error type
pub fn selector(input: &str) -> Result<Selector> {
    Selector::parse(input).map_err(|_| Error::Selector(input.to_string()))
}

fn element_name(tag: &str) -> QualName {
    QualName::new(None, Namespace::from(HTML_NS), LocalName::from(tag))
}

fn attr_name(name: &str) -> QualName {
    QualName::new(None, Namespace::from(""), LocalName::from(name))
}

/// Handle to a node in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub enum NodeKind {
    Root,
    Element {
        name: QualName,
        attrs: Vec<(QualName, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Mutable document tree
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document holding only the root node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Parse a full HTML document (the parser adds `html`, `head` and `body`
    /// when they are missing)
    pub fn parse(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        let mut doc = Self::new();
        let root = doc.root();
        doc.import(root, parsed.root_element());
        doc
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.node_mut(parent).children.push(id);
        id
    }

    fn import(&mut self, parent: NodeId, el: ElementRef<'_>) {
        let value = el.value();
        let attrs = value
            .attrs
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect();
        let id = self.push(
            parent,
            NodeKind::Element {
                name: value.name.clone(),
                attrs,
            },
        );
        self.import_children(id, el);
    }

    fn import_children(&mut self, parent: NodeId, el: ElementRef<'_>) {
        for child in el.children() {
            if let Some(child_el) = ElementRef::wrap(child) {
                self.import(parent, child_el);
            } else if let scraper::Node::Text(text) = child.value() {
                self.push(parent, NodeKind::Text(text.to_string()));
            }
        }
    }

    // --- structure ---

    /// Whether the handle belongs to this document's arena
    pub fn exists(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Whether `node` is `ancestor` or one of its descendants
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.parent(id);
        }
        false
    }

    /// Whether the node is reachable from the root
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.contains(self.root(), id)
    }

    /// Descendants of `scope` in document order, excluding `scope` itself
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Remove a node from its parent
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node_mut(id).parent.take() {
            self.node_mut(parent).children.retain(|c| *c != id);
        }
    }

    pub fn clear_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.node_mut(child).parent = None;
        }
    }

    /// Insert a render tree as the last child of `parent`
    pub fn append_view(&mut self, parent: NodeId, view: View) -> NodeId {
        match view {
            View::Text(text) => self.push(parent, NodeKind::Text(text)),
            View::Element(el) => {
                let attrs = el
                    .attrs
                    .into_iter()
                    .map(|(k, v)| (attr_name(&k), v))
                    .collect();
                let id = self.push(
                    parent,
                    NodeKind::Element {
                        name: element_name(&el.tag),
                        attrs,
                    },
                );
                for child in el.children {
                    self.append_view(id, child);
                }
                id
            }
        }
    }

    /// Replace all children of `id` with the given render trees
    pub fn replace_children<I>(&mut self, id: NodeId, views: I)
    where
        I: IntoIterator<Item = View>,
    {
        self.clear_children(id);
        for view in views {
            self.append_view(id, view);
        }
    }

    /// Replace the children of `id` with parsed HTML
    pub fn set_inner_html(&mut self, id: NodeId, html: &str) {
        self.clear_children(id);
        let fragment = Html::parse_fragment(html);
        self.import_children(id, fragment.root_element());
    }

    // --- element data ---

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { name, .. } => Some(&*name.local),
            _ => None,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| &*k.local == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.node_mut(id).kind {
            match attrs.iter_mut().find(|(k, _)| &*k.local == name) {
                Some((_, v)) => *v = value.to_string(),
                None => attrs.push((attr_name(name), value.to_string())),
            }
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.node_mut(id).kind {
            attrs.retain(|(k, _)| &*k.local != name);
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .map(|c| c.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if self.tag(id).is_none() || self.has_class(id, class) {
            return;
        }
        let next = match self.attr(id, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        self.set_attr(id, "class", &next);
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(existing) = self.attr(id, "class") {
            let next = existing
                .split_whitespace()
                .filter(|c| *c != class)
                .collect::<Vec<_>>()
                .join(" ");
            self.set_attr(id, "class", &next);
        }
    }

    /// Flip a class, returning whether it is present afterwards
    pub fn toggle_class(&mut self, id: NodeId, class: &str) -> bool {
        if self.has_class(id, class) {
            self.remove_class(id, class);
            false
        } else {
            self.add_class(id, class);
            true
        }
    }

    /// Concatenated text of the node and its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let NodeKind::Text(t) = &self.node(id).kind {
            out.push_str(t);
        }
        for d in self.descendants(id) {
            if let NodeKind::Text(t) = &self.node(d).kind {
                out.push_str(t);
            }
        }
        out
    }

    /// Replace the children of `id` with a single text node
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        self.clear_children(id);
        if !text.is_empty() {
            self.push(id, NodeKind::Text(text.to_string()));
        }
    }

    // --- queries ---

    fn element(&self, id: NodeId) -> Option<ArenaElement<'_>> {
        self.tag(id).map(|_| ArenaElement { doc: self, id })
    }

    fn matches_in(&self, id: NodeId, sel: &Selector, scope: Option<NodeId>) -> bool {
        let element = match self.element(id) {
            Some(element) => element,
            None => return false,
        };
        let mut context =
            MatchingContext::new(MatchingMode::Normal, None, None, QuirksMode::NoQuirks);
        context.scope_element = scope
            .and_then(|s| self.element(s))
            .map(|s| selectors::Element::opaque(&s));
        sel.selectors
            .iter()
            .any(|s| matching::matches_selector(s, 0, None, &element, &mut context, &mut |_, _| {}))
    }

    pub fn matches(&self, id: NodeId, sel: &Selector) -> bool {
        self.matches_in(id, sel, None)
    }

    /// All matching descendants of `scope`, in document order
    pub fn select_in(&self, scope: NodeId, sel: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| self.matches_in(*id, sel, Some(scope)))
            .collect()
    }

    /// First matching descendant of `scope`
    pub fn select_first_in(&self, scope: NodeId, sel: &Selector) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|id| self.matches_in(*id, sel, Some(scope)))
    }

    /// Parse `selector` and return the first match in the whole document
    pub fn query(&self, selector: &str) -> Result<Option<NodeId>> {
        let sel = self::selector(selector)?;
        Ok(self.select_first_in(self.root(), &sel))
    }

    /// Parse `selector` and return every match in the whole document
    pub fn query_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let sel = self::selector(selector)?;
        Ok(self.select_in(self.root(), &sel))
    }

    /// Parse `selector` and return the first match below `scope`
    pub fn query_in(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let sel = self::selector(selector)?;
        Ok(self.select_first_in(scope, &sel))
    }

    /// The node itself or its nearest ancestor matching `sel`
    pub fn closest(&self, id: NodeId, sel: &Selector) -> Option<NodeId> {
        let mut cur = Some(id);
        while let Some(n) = cur {
            if self.matches(n, sel) {
                return Some(n);
            }
            cur = self.parent(n);
        }
        None
    }

    pub fn head(&self) -> Option<NodeId> {
        self.query("head").ok().flatten()
    }

    pub fn body(&self) -> Option<NodeId> {
        self.query("body").ok().flatten()
    }

    // --- serialization ---

    fn serialize_node(&self, id: NodeId, traversal_scope: TraversalScope) -> String {
        let opts = SerializeOpts {
            scripting_enabled: false,
            traversal_scope,
            create_missing_parent: false,
        };
        let mut buf = Vec::new();
        if let Err(e) = serialize(&mut buf, &SerializeNode { doc: self, id }, opts) {
            log::warn!("Serializing node failed: {}", e);
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    pub fn inner_html(&self, id: NodeId) -> String {
        self.serialize_node(id, TraversalScope::ChildrenOnly(None))
    }

    pub fn outer_html(&self, id: NodeId) -> String {
        match self.kind(id) {
            NodeKind::Root => self.inner_html(id),
            _ => self.serialize_node(id, TraversalScope::IncludeNode),
        }
    }

    /// Serialize the whole document
    pub fn html(&self) -> String {
        self.inner_html(self.root())
    }
}

struct SerializeNode<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl SerializeNode<'_> {
    fn write<S: Serializer>(&self, serializer: &mut S, id: NodeId) -> io::Result<()> {
        match self.doc.kind(id) {
            NodeKind::Root => {
                for child in self.doc.children(id) {
                    self.write(serializer, *child)?;
                }
            }
            NodeKind::Text(text) => serializer.write_text(text)?,
            NodeKind::Element { name, attrs } => {
                serializer.start_elem(name.clone(), attrs.iter().map(|(k, v)| (k, v.as_str())))?;
                for child in self.doc.children(id) {
                    self.write(serializer, *child)?;
                }
                serializer.end_elem(name.clone())?;
            }
        }
        Ok(())
    }
}

impl Serialize for SerializeNode<'_> {
    fn serialize<S: Serializer>(
        &self,
        serializer: &mut S,
        traversal_scope: TraversalScope,
    ) -> io::Result<()> {
        match traversal_scope {
            TraversalScope::IncludeNode => self.write(serializer, self.id),
            TraversalScope::ChildrenOnly(_) => {
                for child in self.doc.children(self.id) {
                    self.write(serializer, *child)?;
                }
                Ok(())
            }
        }
    }
}

/// Element view of an arena node for `selectors` matching
#[derive(Debug, Clone, Copy)]
struct ArenaElement<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> ArenaElement<'a> {
    fn name(&self) -> Option<&'a QualName> {
        match self.doc.kind(self.id) {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    fn siblings(&self) -> (&'a [NodeId], usize) {
        let doc: &'a Document = self.doc;
        match doc.parent(self.id) {
            Some(parent) => {
                let children = doc.children(parent);
                let pos = children.iter().position(|c| *c == self.id).unwrap_or(0);
                (children, pos)
            }
            None => (&[], 0),
        }
    }
}

impl<'a> selectors::Element for ArenaElement<'a> {
    type Impl = Simple;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self.doc.node(self.id))
    }

    fn parent_element(&self) -> Option<Self> {
        self.doc.parent(self.id).and_then(|p| self.doc.element(p))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let (siblings, pos) = self.siblings();
        siblings[..pos]
            .iter()
            .rev()
            .find_map(|s| self.doc.element(*s))
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let (siblings, pos) = self.siblings();
        siblings
            .iter()
            .skip(pos + 1)
            .find_map(|s| self.doc.element(*s))
    }

    fn is_html_element_in_html_document(&self) -> bool {
        self.name().map_or(false, |n| &*n.ns == HTML_NS)
    }

    fn has_local_name(&self, local_name: &LocalName) -> bool {
        self.name().map_or(false, |n| n.local == *local_name)
    }

    fn has_namespace(&self, ns: &Namespace) -> bool {
        self.name().map_or(false, |n| n.ns == *ns)
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.name() == other.name()
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&Namespace>,
        local_name: &LocalName,
        operation: &AttrSelectorOperation<&String>,
    ) -> bool {
        match self.doc.kind(self.id) {
            NodeKind::Element { attrs, .. } => attrs.iter().any(|(key, value)| {
                !matches!(*ns, NamespaceConstraint::Specific(url) if *url != key.ns)
                    && *local_name == key.local
                    && operation.eval_str(value)
            }),
            _ => false,
        }
    }

    fn match_non_ts_pseudo_class<F>(
        &self,
        _pc: &NonTSPseudoClass,
        _context: &mut MatchingContext<Self::Impl>,
        _flags_setter: &mut F,
    ) -> bool
    where
        F: FnMut(&Self, ElementSelectorFlags),
    {
        false
    }

    fn match_pseudo_element(
        &self,
        _pe: &PseudoElement,
        _context: &mut MatchingContext<Self::Impl>,
    ) -> bool {
        false
    }

    fn is_link(&self) -> bool {
        matches!(self.doc.tag(self.id), Some("a") | Some("area") | Some("link"))
            && self.doc.attr(self.id, "href").is_some()
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &LocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.doc
            .attr(self.id, "id")
            .map_or(false, |v| case_sensitivity.eq(id.as_bytes(), v.as_bytes()))
    }

    fn has_class(&self, name: &LocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.doc.attr(self.id, "class").map_or(false, |classes| {
            classes
                .split_whitespace()
                .any(|c| case_sensitivity.eq(name.as_bytes(), c.as_bytes()))
        })
    }

    fn exported_part(&self, _name: &LocalName) -> Option<LocalName> {
        None
    }

    fn imported_part(&self, _name: &LocalName) -> Option<LocalName> {
        None
    }

    fn is_part(&self, _name: &LocalName) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        !self
            .doc
            .children(self.id)
            .iter()
            .any(|c| match self.doc.kind(*c) {
                NodeKind::Element { .. } => true,
                NodeKind::Text(t) => !t.is_empty(),
                NodeKind::Root => false,
            })
    }

    fn is_root(&self) -> bool {
        self.doc
            .parent(self.id)
            .map_or(false, |p| matches!(self.doc.kind(p), NodeKind::Root))
    }
}
