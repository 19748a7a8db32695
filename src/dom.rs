//! Host Tree Adapter
//!
//! Bindings are scanned from an HTML5 tree built by html5ever into
//! `markup5ever_rcdom`. Element references are rcdom `Handle`s, so binder
//! callbacks can mutate attributes and children in place.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom};
use std::rc::Rc;
use tendril::StrTendril;

use crate::error::DomError;

// ═══════════════════════════════════════════════════════════════════════════════
// DOCUMENT
// ═══════════════════════════════════════════════════════════════════════════════

pub struct Document {
    dom: RcDom,
}

impl Document {
    /// Parse an HTML string. html5ever recovers from malformed markup, so the
    /// only failure is a read error from the underlying sink.
    pub fn parse(html: &str) -> Result<Self, DomError> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;
        Ok(Self { dom })
    }

    /// The document node.
    pub fn document(&self) -> &Handle {
        &self.dom.document
    }

    pub fn body(&self) -> Option<Handle> {
        find_first(&self.dom.document, |h| tag_name(h).as_deref() == Some("body"))
    }

    /// Default scan root: `<body>`, or the document node when there is none.
    pub fn root(&self) -> Handle {
        self.body().unwrap_or_else(|| self.dom.document.clone())
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<Handle> {
        find_first(&self.dom.document, |h| {
            get_attribute(h, "id").as_deref() == Some(id)
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ELEMENT ACCESS
// ═══════════════════════════════════════════════════════════════════════════════

pub fn is_element(handle: &Handle) -> bool {
    matches!(handle.data, NodeData::Element { .. })
}

pub fn tag_name(handle: &Handle) -> Option<String> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

pub fn get_attribute(handle: &Handle, name: &str) -> Option<String> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

pub fn has_attribute(handle: &Handle, name: &str) -> bool {
    get_attribute(handle, name).is_some()
}

/// First non-empty value among `names`, in order. An empty canonical
/// attribute falls through to its alias.
pub fn first_attribute(handle: &Handle, names: &[&str]) -> Option<(String, String)> {
    names.iter().find_map(|name| {
        get_attribute(handle, name)
            .filter(|value| !value.is_empty())
            .map(|value| (name.to_string(), value))
    })
}

/// Set or replace an attribute value. Not an element: no-op.
pub fn set_attribute(handle: &Handle, name: &str, value: &str) {
    if let NodeData::Element { attrs, .. } = &handle.data {
        let mut attrs = attrs.borrow_mut();
        if let Some(attr) = attrs.iter_mut().find(|attr| &*attr.name.local == name) {
            attr.value = StrTendril::from(value);
            return;
        }
        attrs.push(Attribute {
            name: QualName::new(None, Namespace::from(""), LocalName::from(name)),
            value: StrTendril::from(value),
        });
    }
}

pub fn text_content(handle: &Handle) -> String {
    let mut out = String::new();
    collect_text(handle, &mut out);
    out
}

fn collect_text(handle: &Handle, out: &mut String) {
    if let NodeData::Text { contents } = &handle.data {
        out.push_str(&contents.borrow());
    }
    for child in handle.children.borrow().iter() {
        collect_text(child, out);
    }
}

/// Replace all children with a single text node.
pub fn set_text_content(handle: &Handle, text: &str) {
    let node = Node::new(NodeData::Text {
        contents: std::cell::RefCell::new(StrTendril::from(text)),
    });
    node.parent.set(Some(Rc::downgrade(handle)));

    let mut children = handle.children.borrow_mut();
    for child in children.iter() {
        child.parent.set(None);
    }
    children.clear();
    children.push(node);
}

/// Element identity.
pub fn same_element(a: &Handle, b: &Handle) -> bool {
    Rc::ptr_eq(a, b)
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRAVERSAL
// ═══════════════════════════════════════════════════════════════════════════════

/// What a walk callback wants to happen next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Continue,
    /// Do not visit this element's descendants.
    SkipChildren,
}

/// Visit every descendant element of `root` in document order, excluding
/// `root` itself. Uses an explicit stack, so tree depth is not bounded by
/// the call stack.
pub fn walk_descendants<F>(root: &Handle, visit: &mut F)
where
    F: FnMut(&Handle) -> Walk,
{
    let mut stack = child_elements(root);
    while let Some(node) = stack.pop() {
        if visit(&node) == Walk::Continue {
            stack.extend(child_elements(&node));
        }
    }
}

/// Element children, last first, ready to be popped in document order.
fn child_elements(handle: &Handle) -> Vec<Handle> {
    handle
        .children
        .borrow()
        .iter()
        .rev()
        .filter(|child| is_element(child))
        .cloned()
        .collect()
}

/// All descendant elements of `root`, in document order.
pub fn descendants(root: &Handle) -> Vec<Handle> {
    let mut out = Vec::new();
    walk_descendants(root, &mut |h| {
        out.push(h.clone());
        Walk::Continue
    });
    out
}

fn find_first<P>(root: &Handle, predicate: P) -> Option<Handle>
where
    P: Fn(&Handle) -> bool,
{
    descendants(root).into_iter().find(|h| predicate(h))
}
