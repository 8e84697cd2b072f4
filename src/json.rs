//! JSON documents for parsed trees.
//!
//! A tree is stored as an object keyed by stringified id. Each node is an
//! object whose string members are scalar properties and whose object members
//! are child nodes, again keyed by stringified id:
//!
//! ```text
//! {
//!   "0": {"omftype": "#set", "argument": "minimum_timestep=60"},
//!   "1": {"object": "house", "name": "h1", "2": {"object": "ZIPload"}}
//! }
//! ```

use std::fmt;
use std::path::Path;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{GlmError, Result};
use crate::glm::{Node, NodeId, Property, Tree};

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for property in self.properties() {
            match property {
                Property::Scalar { key, value } => map.serialize_entry(key, value)?,
                Property::Child { id, node } => map.serialize_entry(id, node)?,
            }
        }
        map.end()
    }
}

impl Serialize for Tree {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (id, node) in self.iter() {
            map.serialize_entry(&id, node)?;
        }
        map.end()
    }
}

/// A member of a node object: either a scalar or a nested node.
#[derive(Deserialize)]
#[serde(untagged)]
enum Member {
    Scalar(String),
    Child(Node),
}

fn parse_id<E: de::Error>(key: &str) -> std::result::Result<NodeId, E> {
    key.parse()
        .map(NodeId)
        .map_err(|_| E::custom(format!("node key '{key}' is not an integer id")))
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a GLM node object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Node, A::Error> {
        let mut node = Node::new();
        while let Some(key) = map.next_key::<String>()? {
            match map.next_value::<Member>()? {
                Member::Scalar(value) => node.set(key, value),
                Member::Child(child) => node.insert_child(parse_id(&key)?, child),
            }
        }
        Ok(node)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(NodeVisitor)
    }
}

struct TreeVisitor;

impl<'de> Visitor<'de> for TreeVisitor {
    type Value = Tree;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a GLM tree object keyed by node id")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Tree, A::Error> {
        let mut tree = Tree::new();
        while let Some(key) = map.next_key::<String>()? {
            let id = parse_id(&key)?;
            let node = map.next_value::<Node>()?;
            if tree.insert(id, node).map_err(de::Error::custom)?.is_some() {
                return Err(de::Error::custom(format!("duplicate node id {id}")));
            }
        }
        Ok(tree)
    }
}

impl<'de> Deserialize<'de> for Tree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(TreeVisitor)
    }
}

/// Serialize a tree to a compact JSON string.
pub fn to_string(tree: &Tree) -> Result<String> {
    Ok(serde_json::to_string(tree)?)
}

/// Serialize a tree to an indented JSON string.
pub fn to_string_pretty(tree: &Tree) -> Result<String> {
    Ok(serde_json::to_string_pretty(tree)?)
}

/// Load a tree from a JSON string.
pub fn from_str(input: &str) -> Result<Tree> {
    Ok(serde_json::from_str(input)?)
}

/// Load a tree from a JSON file.
pub fn read_file(path: &Path) -> Result<Tree> {
    let content = std::fs::read_to_string(path).map_err(|e| GlmError::file_read(path, e))?;
    from_str(&content)
}

/// Store a tree as an indented JSON file.
pub fn write_file(path: &Path, tree: &Tree) -> Result<()> {
    std::fs::write(path, to_string_pretty(tree)?).map_err(|e| GlmError::file_write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glm;

    #[test]
    fn test_dump_shape() {
        let tree = glm::parse("#set x=1;\nobject house { name h1; object ZIPload { base_power 1.2; }; }")
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&to_string(&tree).unwrap()).unwrap();
        assert_eq!(value["0"]["omftype"], "#set");
        assert_eq!(value["0"]["argument"], "x=1");
        assert_eq!(value["1"]["name"], "h1");
        assert_eq!(value["1"]["2"]["object"], "ZIPload");
        assert_eq!(value["1"]["2"]["base_power"], "1.2");
    }

    #[test]
    fn test_load_keeps_ids_and_order() {
        let tree = from_str(r#"{"5": {"object": "node", "name": "n1", "9": {"object": "load"}}, "2": {"clock": "clock"}}"#)
            .unwrap();
        assert_eq!(tree.ids(), vec![NodeId(2), NodeId(5)]);
        assert_eq!(tree.next_id(), NodeId(10));

        let node = tree.get(NodeId(5)).unwrap();
        let keys: Vec<&str> = node.scalars().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["object", "name"]);
        assert_eq!(node.child(NodeId(9)).and_then(Node::object_type), Some("load"));
    }

    #[test]
    fn test_dump_then_load() {
        let tree = glm::parse(
            "module powerflow { solver_method NR; }; object transformer { name t1; configuration object transformer_configuration { connect_type WYE_WYE; }; };",
        )
        .unwrap();
        let loaded = from_str(&to_string_pretty(&tree).unwrap()).unwrap();
        assert_eq!(loaded, tree);
    }

    #[test]
    fn test_invalid_documents() {
        assert!(matches!(from_str("[1, 2]"), Err(GlmError::JsonError { .. })));
        assert!(from_str(r#"{"root": {"object": "node"}}"#).is_err());
        assert!(from_str(r#"{"0": {"object": "node", "child": {"a": "b"}}}"#).is_err());
        assert!(from_str(r#"{"0": {"length": 100}}"#).is_err());
        assert!(from_str(r#"{"18446744073709551615": {"object": "node"}}"#).is_err());
        assert!(from_str(r#"{"0": {"object": "house", "18446744073709551615": {"object": "ZIPload"}}}"#).is_err());
    }
}
