//! Feeder topology as seen through cross-references.

use crate::glm::{NodeId, Tree, NAME, PARENT};

/// Key naming the upstream end of a link object.
pub const FROM: &str = "from";
/// Key naming the downstream end of a link object.
pub const TO: &str = "to";

/// How two named objects are connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// A line, transformer, switch, ... with `from` and `to`
    Line,
    /// A child object attached to its `parent`
    Parent,
}

/// An edge between two names in the feeder graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link<'a> {
    /// Node the edge was read from
    pub id: NodeId,
    /// Edge type
    pub kind: LinkKind,
    /// Source name
    pub from: &'a str,
    /// Target name
    pub to: &'a str,
}

/// Collect the edges of the feeder graph from the root nodes, in id order.
///
/// Nested blocks are not visited; run
/// [`fully_de_embed`](super::fully_de_embed) first to include them. Names
/// are not resolved, so links to undefined objects are reported as-is.
pub fn links(tree: &Tree) -> Vec<Link<'_>> {
    let mut links = Vec::new();
    for (id, node) in tree.iter() {
        if let (Some(from), Some(to)) = (node.get(FROM), node.get(TO)) {
            links.push(Link {
                id,
                kind: LinkKind::Line,
                from,
                to,
            });
        }
        if let (Some(name), Some(parent)) = (node.get(NAME), node.get(PARENT)) {
            links.push(Link {
                id,
                kind: LinkKind::Parent,
                from: name,
                to: parent,
            });
        }
    }
    links
}

/// Names referenced by links but defined by no root node.
pub fn dangling_names<'a>(tree: &'a Tree) -> Vec<&'a str> {
    let mut dangling: Vec<&str> = links(tree)
        .into_iter()
        .flat_map(|link| [link.from, link.to])
        .filter(|name| tree.find_by_name(name).is_none())
        .collect();
    dangling.sort_unstable();
    dangling.dedup();
    dangling
}
