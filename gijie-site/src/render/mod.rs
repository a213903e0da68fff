//! Render pipeline
//!
//! Pages are built as an owned element tree and serialized once. Containers
//! are filled with `render`, which replaces their children wholesale (no
//! diffing) with one node per item in the supplied order.

pub mod detail;
pub mod listing;
pub mod pickup;
pub mod reference;

use gijie_common::models::PLACEHOLDER_IMAGE;

/// Site name appended to page titles
pub const SITE_NAME: &str = "ぎじえプロジェクト";

/// Elements serialized without a closing tag
const VOID_ELEMENTS: [&str; 6] = ["br", "img", "input", "link", "meta", "hr"];

/// A node of the page tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    fn write_html(&self, out: &mut String) {
        match self {
            Node::Element(el) => el.write_html(out),
            Node::Text(text) => out.push_str(&html_escape(text)),
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

/// HTML element with ordered attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Append a child only when present
    pub fn maybe(mut self, node: Option<impl Into<Node>>) -> Self {
        if let Some(node) = node {
            self.children.push(node.into());
        }
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }

    /// Drop all children and append `nodes`
    pub fn replace_children<I, N>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.clear();
        self.children.extend(nodes.into_iter().map(Into::into));
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&html_escape(value));
            out.push('"');
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&self.tag) {
            return;
        }

        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

/// Replace the container's contents with one node per item, in order
pub fn render<T>(container: &mut Element, items: &[T], build: impl Fn(&T) -> Element) {
    container.replace_children(items.iter().map(build));
}

/// Short failure notice left in a container whose data failed to load
pub fn load_failure(message: &str) -> Element {
    Element::new("p").class("load-error").text(message)
}

/// How a character image is emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageState {
    /// Artwork verified present
    Available,
    /// Artwork verified missing: use the placeholder directly
    Missing,
    /// Not checked: the browser swaps to the placeholder on error
    Unchecked,
}

/// `<img>` for character artwork following the image state
pub fn character_image(src: &str, alt: &str, class: &str, state: ImageState) -> Element {
    let img = Element::new("img").class(class).attr("alt", alt);
    match state {
        ImageState::Available => img.attr("src", src),
        ImageState::Missing => img.attr("src", PLACEHOLDER_IMAGE),
        ImageState::Unchecked => img.attr("src", src).attr(
            "onerror",
            format!("this.onerror=null;this.src='{}'", PLACEHOLDER_IMAGE),
        ),
    }
}

/// Full HTML document around one `<main>` element
#[derive(Debug, Clone)]
pub struct Document {
    pub title: String,
    pub body_class: &'static str,
    /// Inline style on `<html>` (e.g. the main color custom property)
    pub root_style: Option<String>,
    pub main: Element,
}

impl Document {
    pub fn new(title: impl Into<String>, body_class: &'static str, main: Element) -> Self {
        Self {
            title: title.into(),
            body_class,
            root_style: None,
            main,
        }
    }

    pub fn to_html(&self) -> String {
        let mut html = Element::new("html").attr("lang", "ja");
        if let Some(style) = &self.root_style {
            html = html.attr("style", style.clone());
        }

        let head = Element::new("head")
            .child(Element::new("meta").attr("charset", "UTF-8"))
            .child(
                Element::new("meta")
                    .attr("name", "viewport")
                    .attr("content", "width=device-width, initial-scale=1.0"),
            )
            .child(Element::new("title").text(self.title.clone()))
            .child(
                Element::new("link")
                    .attr("rel", "stylesheet")
                    .attr("href", "/css/style.css"),
            );

        let body = Element::new("body")
            .class(self.body_class)
            .child(Element::new("div").id("header-container"))
            .child(self.main.clone());

        format!("<!DOCTYPE html>\n{}", html.child(head).child(body).to_html())
    }
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
