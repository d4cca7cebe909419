//! Minimal XML element tree with indented rendering

use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// `<name>text</name>`
    pub fn text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.children.push(Node::Text(text.into()));
        element
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn comment(&mut self, text: impl Into<String>) {
        self.children.push(Node::Comment(text.into()));
    }

    /// Append `<name>text</name>`
    pub fn push_text(&mut self, name: &str, text: impl Into<String>) {
        self.push(Element::text(name, text));
    }

    /// Render as a document with an XML declaration
    pub fn to_document(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        self.render(&mut out, 0);
        out
    }

    fn render(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        out.push_str(&indent);
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attributes {
            let _ = write!(out, " {}=\"{}\"", name, escape(value, true));
        }

        match self.children.as_slice() {
            [] => out.push_str(" />\n"),
            [Node::Text(text)] => {
                let _ = writeln!(out, ">{}</{}>", escape(text, false), self.name);
            }
            children => {
                out.push_str(">\n");
                for child in children {
                    match child {
                        Node::Element(element) => element.render(out, depth + 1),
                        Node::Text(text) => {
                            let _ = writeln!(out, "{}  {}", indent, escape(text, false));
                        }
                        Node::Comment(text) => {
                            let _ = writeln!(out, "{}  <!--{}-->", indent, text);
                        }
                    }
                }
                let _ = writeln!(out, "{}</{}>", indent, self.name);
            }
        }
    }
}

fn escape(value: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
