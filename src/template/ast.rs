// ABOUTME: Compiled template representation produced by the parser
// ABOUTME: Defines Template, Node variants, and dot-path References

use std::fmt;

/// Words that may not start a bare variable reference
pub const RESERVED_WORDS: &[&str] = &["if", "endif", "else", "for", "endfor", "sep"];

/// A dot-separated path into a context, e.g. `author.name`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    components: Vec<String>,
}

impl Reference {
    /// Build a reference from its components. Returns `None` when empty.
    pub fn new<I, S>(components: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let components: Vec<String> = components.into_iter().map(Into::into).collect();
        if components.is_empty() {
            None
        } else {
            Some(Self { components })
        }
    }

    /// A one-component reference to a top-level key, taken verbatim even if
    /// it contains dots or is a reserved word
    pub fn key(name: impl Into<String>) -> Self {
        Self {
            components: vec![name.into()],
        }
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn first(&self) -> &str {
        &self.components[0]
    }

    /// All components but the last, paired with the last one
    pub fn split_last(&self) -> (&[String], &str) {
        let (last, parents) = self
            .components
            .split_last()
            .map(|(last, parents)| (last.as_str(), parents))
            .unwrap_or(("", &[]));
        (parents, last)
    }

    pub fn is_reserved(&self) -> bool {
        RESERVED_WORDS.contains(&self.first())
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components.join("."))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Literal(String),
    Variable(Reference),
    Conditional {
        reference: Reference,
        then_branch: Vec<Node>,
        else_branch: Option<Vec<Node>>,
    },
    Loop {
        reference: Reference,
        body: Vec<Node>,
        separator: Option<Vec<Node>>,
    },
}

/// A compiled template. Immutable once built and safe to share between threads.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    pub(crate) fn from_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Deepest Conditional/Loop nesting in the template
    pub fn depth(&self) -> usize {
        nesting_depth(&self.nodes)
    }
}

fn nesting_depth(nodes: &[Node]) -> usize {
    nodes
        .iter()
        .map(|node| match node {
            Node::Literal(_) | Node::Variable(_) => 0,
            Node::Conditional {
                then_branch,
                else_branch,
                ..
            } => {
                1 + nesting_depth(then_branch)
                    .max(else_branch.as_deref().map(nesting_depth).unwrap_or(0))
            }
            Node::Loop {
                body, separator, ..
            } => 1 + nesting_depth(body).max(separator.as_deref().map(nesting_depth).unwrap_or(0)),
        })
        .max()
        .unwrap_or(0)
}
