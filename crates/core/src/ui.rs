//! Framework-agnostic UI node tree.
//!
//! Renderers build a [`Node`] from a backend response; the tree can then be
//! serialized as escaped HTML for a browser shell or flattened to plain text
//! for terminals and tests.

use std::fmt::Write as _;

use serde::Serialize;

use crate::badge::Badge;

/// Tags rendered without a closing tag.
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input"];

/// Tags that start a new line when flattened to text.
const BLOCK_TAGS: &[&str] = &[
    "div", "section", "header", "footer", "p", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol",
    "li", "table", "thead", "tbody", "tr", "form", "nav",
];

/// A node in the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with a tag, CSS classes, attributes and children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub tag: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attrs: Vec<(&'static str, String)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    /// Start building an element.
    pub fn el(tag: &'static str) -> Element {
        Element::new(tag)
    }

    /// A text node.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Return the element if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            Self::Text(_) => None,
        }
    }

    /// All text under this node, inline pieces separated by a single space.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        inline_text(self, &mut out);
        out
    }

    /// First element (depth first, self included) carrying `class`.
    pub fn find_class(&self, class: &str) -> Option<&Element> {
        match self {
            Self::Element(el) => el.find_class(class),
            Self::Text(_) => None,
        }
    }

    /// Every element (depth first, self included) carrying `class`.
    pub fn find_all_class<'a>(&'a self, class: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        if let Self::Element(el) = self {
            el.collect_class(class, &mut found);
        }
        found
    }

    /// Every element (depth first, self included) with the given tag.
    pub fn find_all_tag(&self, tag: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        if let Self::Element(el) = self {
            el.collect_tag(tag, &mut found);
        }
        found
    }

    /// Serialize as HTML. Text and attribute values are escaped.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_html(self, &mut out);
        out
    }

    /// Flatten to terminal-friendly text.
    ///
    /// Block elements start on their own line and table rows are printed as
    /// cells joined by `" | "`.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        write_text(self, &mut out);
        out.trim_end().to_owned()
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Self::Element(el)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            classes: Vec::new(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add one or more space-separated classes.
    #[must_use]
    pub fn class(mut self, class: impl AsRef<str>) -> Self {
        self.classes
            .extend(class.as_ref().split_whitespace().map(str::to_owned));
        self
    }

    #[must_use]
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    #[must_use]
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    #[must_use]
    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Append a text child.
    #[must_use]
    pub fn text(self, value: impl Into<String>) -> Self {
        self.child(Node::Text(value.into()))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All text under this element, inline pieces separated by a space.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            inline_text(child, &mut out);
        }
        out
    }

    pub fn find_class(&self, class: &str) -> Option<&Element> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children
            .iter()
            .filter_map(Node::as_element)
            .find_map(|el| el.find_class(class))
    }

    fn collect_class<'a>(&'a self, class: &str, found: &mut Vec<&'a Element>) {
        if self.has_class(class) {
            found.push(self);
        }
        for el in self.children.iter().filter_map(Node::as_element) {
            el.collect_class(class, found);
        }
    }

    fn collect_tag<'a>(&'a self, tag: &str, found: &mut Vec<&'a Element>) {
        if self.tag == tag {
            found.push(self);
        }
        for el in self.children.iter().filter_map(Node::as_element) {
            el.collect_tag(tag, found);
        }
    }
}

/// Escape text for inclusion in HTML content or a quoted attribute.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn write_html(node: &Node, out: &mut String) {
    match node {
        Node::Text(t) => out.push_str(&html_escape(t)),
        Node::Element(el) => {
            out.push('<');
            out.push_str(el.tag);
            if !el.classes.is_empty() {
                let _ = write!(out, " class=\"{}\"", html_escape(&el.classes.join(" ")));
            }
            for (name, value) in &el.attrs {
                let _ = write!(out, " {name}=\"{}\"", html_escape(value));
            }
            out.push('>');
            if VOID_TAGS.contains(&el.tag) {
                return;
            }
            for child in &el.children {
                write_html(child, out);
            }
            let _ = write!(out, "</{}>", el.tag);
        }
    }
}

fn push_inline(out: &mut String, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    if !out.is_empty() && !out.ends_with([' ', '\n']) {
        out.push(' ');
    }
    out.push_str(text);
}

fn inline_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(t) => push_inline(out, t),
        Node::Element(el) => {
            for child in &el.children {
                inline_text(child, out);
            }
        }
    }
}

fn ensure_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

fn write_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(t) => push_inline(out, t),
        Node::Element(el) if el.tag == "tr" => {
            ensure_line(out);
            let cells: Vec<String> = el.children.iter().map(Node::text_content).collect();
            out.push_str(&cells.join(" | "));
            out.push('\n');
        }
        Node::Element(el) if BLOCK_TAGS.contains(&el.tag) => {
            ensure_line(out);
            for child in &el.children {
                write_text(child, out);
            }
            ensure_line(out);
        }
        Node::Element(el) => {
            for child in &el.children {
                write_text(child, out);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Shared widgets
// ---------------------------------------------------------------------------

/// `<span class="badge badge-{kind}">label</span>`
pub fn badge(kind: Badge, label: impl Into<String>) -> Element {
    Node::el("span")
        .class("badge")
        .class(format!("badge-{}", kind.css_class()))
        .text(label)
}

/// A table with a header row and the given body rows.
pub fn table<I>(headers: &[&str], rows: I) -> Element
where
    I: IntoIterator<Item = Node>,
{
    let head = Node::el("thead").child(
        Node::el("tr").children(headers.iter().map(|h| Node::el("th").text(*h))),
    );
    Node::el("table")
        .class("table")
        .child(head)
        .child(Node::el("tbody").children(rows))
}

/// A body row of cells.
pub fn row<I>(cells: I) -> Node
where
    I: IntoIterator<Item = Node>,
{
    Node::el("tr")
        .children(cells.into_iter().map(|c| Node::el("td").child(c)))
        .into()
}

/// A single full-width row carrying a placeholder message.
pub fn placeholder_row(colspan: usize, message: &str) -> Node {
    Node::el("tr")
        .class("placeholder")
        .child(
            Node::el("td")
                .attr("colspan", colspan.to_string())
                .class("text-center text-muted")
                .text(message),
        )
        .into()
}

/// Table whose body is either `rows` or, when there are none, a placeholder.
pub fn table_or_placeholder(headers: &[&str], rows: Vec<Node>, empty_message: &str) -> Node {
    if rows.is_empty() {
        table(headers, [placeholder_row(headers.len(), empty_message)]).into()
    } else {
        table(headers, rows).into()
    }
}

pub fn empty_state(message: &str) -> Node {
    Node::el("div")
        .class("empty-state text-muted")
        .child(Node::el("p").text(message))
        .into()
}

pub fn error_state(message: &str) -> Node {
    Node::el("div")
        .class("error-state text-danger")
        .child(Node::el("p").text(message))
        .into()
}

/// A labelled figure used by the stats cards.
pub fn stat_card(label: &str, value: impl Into<String>) -> Node {
    Node::el("div")
        .class("stat-card")
        .child(Node::el("span").class("stat-label").text(label))
        .child(Node::el("span").class("stat-value").text(value))
        .into()
}

/// `label: value` line for detail panes.
pub fn field(label: &str, value: impl Into<Node>) -> Node {
    Node::el("div")
        .class("detail-field")
        .child(Node::el("span").class("detail-label").text(format!("{label}:")))
        .child(Node::el("span").class("detail-value").child(value))
        .into()
}
