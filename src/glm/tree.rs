//! Tree types for parsed GLM.
//!
//! A [`Tree`] maps [`NodeId`]s to top-level [`Node`]s. Each node is an ordered
//! list of [`Property`] entries, either scalar `key value` pairs or nested
//! child nodes keyed by their own id. Which statement a node came from is
//! encoded by its reserved keys and exposed as a [`BlockKind`].

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{GlmError, Result};

/// Reserved key holding a directive's name (e.g. `#set`).
pub const OMFTYPE: &str = "omftype";
/// Reserved key holding a directive's argument text.
pub const ARGUMENT: &str = "argument";
/// Reserved key of a module declaration block.
pub const MODULE: &str = "module";
/// Reserved key of the simulation clock block.
pub const CLOCK: &str = "clock";
/// Reserved key holding an object block's type name.
pub const OBJECT: &str = "object";
/// Reserved key holding the full header of an inline sub-block.
pub const EMBEDDED_CONFIG: &str = "omfEmbeddedConfigObject";
/// Cross-reference identity of an object.
pub const NAME: &str = "name";
/// Cross-reference to an enclosing object.
pub const PARENT: &str = "parent";

/// A unique identifier for a node in the tree.
///
/// Ids are handed out in order of first appearance in the source text and
/// are never reused within one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Largest id a tree accepts, leaving the counter room to grow.
    pub const MAX: NodeId = NodeId(usize::MAX / 2);
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The statement form a node was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// `#set name=value;`, `#include "file.glm";` and other top-level one-liners
    Directive,
    /// `module <name> { ... }`
    Module,
    /// `clock { ... }`
    Clock,
    /// `object <type> { ... }`
    Object,
    /// `<key> object <type> { ... }` opened inside another object's body
    EmbeddedConfig,
}

impl BlockKind {
    /// Every kind.
    pub const ALL: [BlockKind; 5] = [
        Self::Directive,
        Self::Module,
        Self::Clock,
        Self::Object,
        Self::EmbeddedConfig,
    ];

    /// The reserved key that marks a node of this kind.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Directive => OMFTYPE,
            Self::Module => MODULE,
            Self::Clock => CLOCK,
            Self::Object => OBJECT,
            Self::EmbeddedConfig => EMBEDDED_CONFIG,
        }
    }

    /// Whether `key` is structural for this kind and so never written as a
    /// plain `key value;` line.
    pub fn is_header_key(&self, key: &str) -> bool {
        match self {
            Self::Directive => key == OMFTYPE || key == ARGUMENT,
            _ => key == self.key(),
        }
    }
}

/// The outcome of classifying the words in front of an opening brace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Header {
    /// A recognised block and the value for its reserved key
    Block(BlockKind, String),
    /// A header that matches no known form; the words are kept verbatim
    Fallback(String),
    /// A brace with nothing in front of it
    Empty,
}

/// Classify a block header.
///
/// | Words | Result |
/// |-------|--------|
/// | `clock` | Clock |
/// | `module <name>` | Module |
/// | `object <type>` | Object |
/// | three or more, e.g. `configuration object transformer_configuration` | EmbeddedConfig |
/// | anything else | Fallback |
pub fn classify<S: AsRef<str>>(words: &[S]) -> Header {
    let words: Vec<&str> = words.iter().map(AsRef::as_ref).collect();
    match words.as_slice() {
        [] => Header::Empty,
        [CLOCK] => Header::Block(BlockKind::Clock, CLOCK.to_string()),
        [MODULE, name] => Header::Block(BlockKind::Module, name.to_string()),
        [OBJECT, ty] => Header::Block(BlockKind::Object, ty.to_string()),
        [_, _, _, ..] => Header::Block(BlockKind::EmbeddedConfig, words.join(" ")),
        _ => Header::Fallback(words.join(" ")),
    }
}

/// One entry of a node.
#[derive(Debug, Clone)]
pub enum Property {
    /// A `key value;` pair
    Scalar { key: String, value: String },
    /// A nested block
    Child { id: NodeId, node: Node },
}

/// A parsed block or directive.
///
/// Scalar keys are unique within a node; setting an existing key replaces its
/// value in place. Equality ignores entry order.
#[derive(Debug, Clone, Default)]
pub struct Node {
    properties: Vec<Property>,
}

impl Node {
    /// Create a new empty node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directive node.
    pub fn directive(omftype: impl Into<String>, argument: impl Into<String>) -> Self {
        let mut node = Self::new();
        node.set(OMFTYPE, omftype);
        node.set(ARGUMENT, argument);
        node
    }

    /// Create an object node of the given type.
    pub fn object(object_type: impl Into<String>) -> Self {
        let mut node = Self::new();
        node.set(OBJECT, object_type);
        node
    }

    /// Builder-style [`Node::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// The statement form of this node: the first reserved key among its
    /// scalars decides, so an ordinary property that happens to share a
    /// reserved name (e.g. a `module` field inside an object) is not mistaken
    /// for the header.
    pub fn kind(&self) -> Option<BlockKind> {
        self.scalars().find_map(|(key, _)| {
            BlockKind::ALL.into_iter().find(|kind| kind.key() == key)
        })
    }

    /// Look up a scalar property.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.iter().find_map(|p| match p {
            Property::Scalar { key: k, value } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// Whether a scalar property is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Set a scalar property, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        for property in &mut self.properties {
            if let Property::Scalar { key: k, value: v } = property {
                if *k == key {
                    *v = value;
                    return;
                }
            }
        }
        self.properties.push(Property::Scalar { key, value });
    }

    /// Remove a scalar property, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self
            .properties
            .iter()
            .position(|p| matches!(p, Property::Scalar { key: k, .. } if k == key))?;
        match self.properties.remove(index) {
            Property::Scalar { value, .. } => Some(value),
            Property::Child { .. } => None,
        }
    }

    /// The `name` property.
    pub fn name(&self) -> Option<&str> {
        self.get(NAME)
    }

    /// The `object` type name.
    pub fn object_type(&self) -> Option<&str> {
        self.get(OBJECT)
    }

    /// All entries in insertion order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Scalar properties in insertion order.
    pub fn scalars(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().filter_map(|p| match p {
            Property::Scalar { key, value } => Some((key.as_str(), value.as_str())),
            Property::Child { .. } => None,
        })
    }

    /// Child nodes in insertion order.
    pub fn children(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.properties.iter().filter_map(|p| match p {
            Property::Child { id, node } => Some((*id, node)),
            Property::Scalar { .. } => None,
        })
    }

    /// Ids of the direct children.
    pub fn child_ids(&self) -> Vec<NodeId> {
        self.children().map(|(id, _)| id).collect()
    }

    /// Look up a direct child.
    pub fn child(&self, id: NodeId) -> Option<&Node> {
        self.children().find(|(child_id, _)| *child_id == id).map(|(_, node)| node)
    }

    /// Look up a direct child mutably.
    pub fn child_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.properties.iter_mut().find_map(|p| match p {
            Property::Child { id: child_id, node } if *child_id == id => Some(node),
            _ => None,
        })
    }

    /// Attach a child node, replacing any child with the same id.
    pub fn insert_child(&mut self, id: NodeId, node: Node) {
        match self.child_mut(id) {
            Some(existing) => *existing = node,
            None => self.properties.push(Property::Child { id, node }),
        }
    }

    /// Detach a direct child.
    pub fn remove_child(&mut self, id: NodeId) -> Option<Node> {
        let index = self
            .properties
            .iter()
            .position(|p| matches!(p, Property::Child { id: child_id, .. } if *child_id == id))?;
        match self.properties.remove(index) {
            Property::Child { node, .. } => Some(node),
            Property::Scalar { .. } => None,
        }
    }

    /// Number of entries, scalars and children together.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the node has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Number of nodes in this subtree, including this one.
    pub fn count_nodes(&self) -> usize {
        1 + self.children().map(|(_, child)| child.count_nodes()).sum::<usize>()
    }

    /// Structural equality ignoring ids: the same scalars, and children that
    /// are pairwise isomorphic in order.
    pub fn is_isomorphic(&self, other: &Node) -> bool {
        let scalars = self.scalars().count();
        scalars == other.scalars().count()
            && self.scalars().all(|(key, value)| other.get(key) == Some(value))
            && self.children().count() == other.children().count()
            && self
                .children()
                .zip(other.children())
                .all(|((_, a), (_, b))| a.is_isomorphic(b))
    }

    /// Largest id used in this subtree's children.
    pub(crate) fn max_child_id(&self) -> Option<NodeId> {
        self.children()
            .flat_map(|(id, child)| std::iter::once(id).chain(child.max_child_id()))
            .max()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.properties.iter().all(|p| match p {
                Property::Scalar { key, value } => other.get(key) == Some(value.as_str()),
                Property::Child { id, node } => other.child(*id) == Some(node),
            })
    }
}

impl Eq for Node {}

/// A parsed GLM document: top-level nodes ordered by id.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: BTreeMap<NodeId, Node>,
    next_id: usize,
}

impl Tree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next [`Tree::push`] will use.
    ///
    /// Always greater than every id anywhere in the tree, nested ids included.
    pub fn next_id(&self) -> NodeId {
        NodeId(self.next_id)
    }

    /// Reserve an id without inserting anything.
    pub fn allocate_id(&mut self) -> Result<NodeId> {
        let id = NodeId(self.next_id);
        if id > NodeId::MAX {
            return Err(GlmError::IdOutOfRange { id: id.0 });
        }
        self.next_id += 1;
        Ok(id)
    }

    /// Insert a top-level node under a fresh id.
    pub fn push(&mut self, node: Node) -> Result<NodeId> {
        let id = self.allocate_id()?;
        self.insert(id, node)?;
        Ok(id)
    }

    /// Insert a top-level node under `id`, returning the node it replaced.
    ///
    /// Fails without touching the tree if `id` or any nested id is above
    /// [`NodeId::MAX`].
    pub fn insert(&mut self, id: NodeId, node: Node) -> Result<Option<Node>> {
        let highest = node.max_child_id().map_or(id, |child| child.max(id));
        if highest > NodeId::MAX {
            return Err(GlmError::IdOutOfRange { id: highest.0 });
        }
        self.next_id = self.next_id.max(highest.0 + 1);
        Ok(self.nodes.insert(id, node))
    }

    /// Remove a top-level node.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        self.nodes.remove(&id)
    }

    /// Look up a top-level node.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Look up a top-level node mutably.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Look up a top-level node that must exist.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(&id).ok_or(GlmError::NodeNotFound { id: id.0 })
    }

    /// Mutable variant of [`Tree::node`].
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(&id)
            .ok_or(GlmError::NodeNotFound { id: id.0 })
    }

    /// Whether a top-level node with this id exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Resolve a path of ids from the root downwards.
    pub fn node_at_mut(&mut self, path: &[NodeId]) -> Option<&mut Node> {
        let (first, rest) = path.split_first()?;
        let mut current = self.nodes.get_mut(first)?;
        for id in rest {
            current = current.child_mut(*id)?;
        }
        Some(current)
    }

    /// Top-level nodes in id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    /// Top-level nodes in id order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (NodeId, &mut Node)> {
        self.nodes.iter_mut().map(|(id, node)| (*id, node))
    }

    /// Top-level ids in order.
    pub fn ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    /// Number of top-level nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no top-level nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes at any depth.
    pub fn count_nodes(&self) -> usize {
        self.nodes.values().map(Node::count_nodes).sum()
    }

    /// Structural equality ignoring ids; see [`Node::is_isomorphic`].
    pub fn is_isomorphic(&self, other: &Tree) -> bool {
        self.len() == other.len()
            && self
                .nodes
                .values()
                .zip(other.nodes.values())
                .all(|(a, b)| a.is_isomorphic(b))
    }

    /// First top-level node with the given `name`.
    pub fn find_by_name(&self, name: &str) -> Option<(NodeId, &Node)> {
        self.iter().find(|(_, node)| node.name() == Some(name))
    }

    /// Top-level objects of the given type.
    pub fn objects_of_type<'a>(&'a self, object_type: &'a str) -> impl Iterator<Item = (NodeId, &'a Node)> {
        self.iter()
            .filter(move |(_, node)| node.object_type() == Some(object_type))
    }
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
    }
}

impl Eq for Tree {}
