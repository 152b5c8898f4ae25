//! # Layout Tree
//!
//! Each example describes its page as a tree of `Node`s. The tree is owned by the
//! example and only read by the shell; live values (input text, figures, markdown
//! output) are looked up in the session's `PropStore` at render time.

use serde_json::Value;

use crate::core::callbacks::{Binding, ComponentId, Prop, PropStore};

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Children stacked top to bottom.
    Column(Vec<Node>),
    /// Children side by side, sharing the width equally.
    Row(Vec<Node>),
    Heading(String),
    Markdown(String),
    /// Horizontal separator.
    Rule,
    /// Bordered box with an optional title.
    Card { title: String, body: Box<Node> },
    /// Editable text field, stored under `Prop::Value`.
    Input {
        id: ComponentId,
        label: String,
        value: Value,
    },
    /// Bar chart of the `Figure` stored under `Prop::Figure`.
    Graph { id: ComponentId },
    /// Markdown text stored under `Prop::Children`.
    Output { id: ComponentId },
}

impl Node {
    pub fn column(children: Vec<Node>) -> Self {
        Node::Column(children)
    }

    pub fn row(children: Vec<Node>) -> Self {
        Node::Row(children)
    }

    pub fn heading(text: &str) -> Self {
        Node::Heading(text.to_string())
    }

    pub fn markdown(text: &str) -> Self {
        Node::Markdown(text.to_string())
    }

    pub fn card(title: &str, children: Vec<Node>) -> Self {
        let body = match children.len() {
            1 => children.into_iter().next().unwrap_or(Node::Column(Vec::new())),
            _ => Node::Column(children),
        };
        Node::Card {
            title: title.to_string(),
            body: Box::new(body),
        }
    }

    pub fn input(id: &str, label: &str, value: impl Into<Value>) -> Self {
        Node::Input {
            id: ComponentId::new(id),
            label: label.to_string(),
            value: value.into(),
        }
    }

    pub fn graph(id: &str) -> Self {
        Node::Graph {
            id: ComponentId::new(id),
        }
    }

    pub fn output(id: &str) -> Self {
        Node::Output {
            id: ComponentId::new(id),
        }
    }

    fn children(&self) -> &[Node] {
        match self {
            Node::Column(children) | Node::Row(children) => children,
            Node::Card { body, .. } => std::slice::from_ref(body.as_ref()),
            _ => &[],
        }
    }

    /// Visits this node and every descendant, depth first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Initial property values declared by the layout.
    pub fn defaults(&self) -> Vec<(Binding, Value)> {
        let mut out = Vec::new();
        self.walk(&mut |node| {
            if let Node::Input { id, value, .. } = node {
                out.push((Binding::new(id.clone(), Prop::Value), value.clone()));
            }
        });
        out
    }

    /// Writes the layout defaults into `store`.
    pub fn seed(&self, store: &mut PropStore) {
        for (binding, value) in self.defaults() {
            store.set(binding, value);
        }
    }

    /// Input fields in focus order (document order).
    pub fn inputs(&self) -> Vec<&ComponentId> {
        let mut out = Vec::new();
        self.walk(&mut |node| {
            if let Node::Input { id, .. } = node {
                out.push(id);
            }
        });
        out
    }

    /// Every component identifier in the tree.
    pub fn component_ids(&self) -> Vec<&ComponentId> {
        let mut out = Vec::new();
        self.walk(&mut |node| match node {
            Node::Input { id, .. } | Node::Graph { id } | Node::Output { id } => out.push(id),
            _ => {}
        });
        out
    }
}
