//! Markup Builder - Elements as Strings
//!
//! Attribute values and text children are inserted verbatim. Nothing is
//! escaped; callers must only pass values that are already safe markup.

use std::fmt::Display;

/// A child of an element: rendered markup, or a nested list of children
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Group(Vec<Node>),
}

impl Node {
    fn flatten_into<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Node::Text(text) => out.push(text),
            Node::Group(children) => {
                for child in children {
                    child.flatten_into(out);
                }
            }
        }
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl<T: Into<Node>> From<Vec<T>> for Node {
    fn from(children: Vec<T>) -> Self {
        Node::Group(children.into_iter().map(Into::into).collect())
    }
}

/// Ordered `key="value"` attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Display) -> Self {
        self.0.push((key.to_string(), value.to_string()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn render(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Render `<tag attrs>children</tag>`, children flattened and space separated
pub fn element<I>(tag: &str, attributes: &Attributes, children: I) -> String
where
    I: IntoIterator,
    I::Item: Into<Node>,
{
    let nodes: Vec<Node> = children.into_iter().map(Into::into).collect();
    let mut flat = Vec::new();
    for node in &nodes {
        node.flatten_into(&mut flat);
    }

    let open = if attributes.is_empty() {
        format!("<{}>", tag)
    } else {
        format!("<{} {}>", tag, attributes.render())
    };

    format!("{}{}</{}>", open, flat.join(" "), tag)
}
