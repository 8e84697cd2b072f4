//! Lifting nested objects and embedded configurations to the top level.
//!
//! Graph builders and the solver's loader both prefer a flat tree where every
//! object sits at the root and refers to its relatives by name. Nested
//! `object` blocks become root objects with a `parent` reference; embedded
//! `<key> object <type> { ... }` blocks become named root objects of `<type>`
//! and the enclosing object gets `<key> <generated name>` in their place.

use tracing::debug;

use crate::error::{GlmError, Result};
use crate::glm::{is_schedule, BlockKind, NodeId, Tree, EMBEDDED_CONFIG, NAME, OBJECT, PARENT};

/// Lift every nested object and embedded configuration to the root.
///
/// Repeats until no nested block is left, so arbitrarily deep nesting is
/// flattened. Returns the number of nodes lifted.
pub fn fully_de_embed(tree: &mut Tree) -> Result<usize> {
    let mut total = 0;
    loop {
        let lifted = de_embed_once(tree)?;
        if lifted == 0 {
            return Ok(total);
        }
        total += lifted;
    }
}

/// Lift the direct children of every root node by one level.
///
/// Nested `schedule` blocks are left in place.
pub fn de_embed_once(tree: &mut Tree) -> Result<usize> {
    let mut lifted = Vec::new();

    for (_, parent) in tree.iter_mut() {
        let parent_name = parent.name().unwrap_or_default().to_string();

        for child_id in parent.child_ids() {
            let Some(child) = parent.child(child_id) else {
                continue;
            };
            // Schedules are written from name and cron only, so they stay nested.
            if is_schedule(child) {
                continue;
            }
            let Some(kind) = child.kind() else {
                continue;
            };
            match kind {
                BlockKind::Object => {
                    let Some(mut child) = parent.remove_child(child_id) else {
                        continue;
                    };
                    child.set(PARENT, parent_name.as_str());
                    if child.name().is_none() {
                        let object_type = child.object_type().unwrap_or_default();
                        let name = generated_name(&parent_name, object_type, child_id);
                        child.set(NAME, name);
                    }
                    lifted.push((child_id, child));
                }
                BlockKind::EmbeddedConfig => {
                    let Some((key, object_type)) = parent
                        .child(child_id)
                        .and_then(|child| child.get(EMBEDDED_CONFIG))
                        .and_then(embedded_target)
                    else {
                        continue;
                    };
                    let Some(mut child) = parent.remove_child(child_id) else {
                        continue;
                    };
                    let name = generated_name(&parent_name, &object_type, child_id);
                    child.remove(EMBEDDED_CONFIG);
                    child.set(NAME, name.as_str());
                    child.set(OBJECT, object_type);
                    parent.set(key, name);
                    lifted.push((child_id, child));
                }
                _ => {}
            }
        }
    }

    let count = lifted.len();
    for (id, node) in lifted {
        if tree.contains(id) {
            return Err(GlmError::DuplicateId { id: id.0 });
        }
        debug!(%id, name = node.name().unwrap_or_default(), "lifted nested block to root");
        tree.insert(id, node)?;
    }
    Ok(count)
}

/// Split an embedded header `<key> object <type> ...` into key and type.
fn embedded_target(header: &str) -> Option<(String, String)> {
    let mut words = header.split_whitespace();
    let key = words.next()?;
    let object = words.next()?;
    let object_type = words.next()?;
    (object == OBJECT).then(|| (key.to_string(), object_type.to_string()))
}

fn generated_name(parent_name: &str, object_type: &str, id: NodeId) -> String {
    format!("{parent_name}{object_type}{id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glm;

    #[test]
    fn test_lift_nested_object() {
        let mut tree = glm::parse(
            "object house { name h1; object ZIPload { base_power 1.2; }; object waterheater { name wh1; }; }",
        )
        .unwrap();
        assert_eq!(fully_de_embed(&mut tree).unwrap(), 2);
        assert_eq!(tree.ids(), vec![NodeId(0), NodeId(1), NodeId(2)]);

        let house = tree.get(NodeId(0)).unwrap();
        assert_eq!(house.children().count(), 0);

        let zip = tree.get(NodeId(1)).unwrap();
        assert_eq!(zip.get(PARENT), Some("h1"));
        assert_eq!(zip.name(), Some("h1ZIPload1"));

        // Named children keep their names so references stay valid.
        let heater = tree.get(NodeId(2)).unwrap();
        assert_eq!(heater.name(), Some("wh1"));
        assert_eq!(heater.get(PARENT), Some("h1"));
    }

    #[test]
    fn test_lift_embedded_config() {
        let mut tree = glm::parse(
            "object transformer { name t1; configuration object transformer_configuration { connect_type WYE_WYE; }; }",
        )
        .unwrap();
        fully_de_embed(&mut tree).unwrap();

        let transformer = tree.get(NodeId(0)).unwrap();
        assert_eq!(
            transformer.get("configuration"),
            Some("t1transformer_configuration1")
        );

        let config = tree.get(NodeId(1)).unwrap();
        assert_eq!(config.kind(), Some(BlockKind::Object));
        assert_eq!(config.object_type(), Some("transformer_configuration"));
        assert_eq!(config.name(), Some("t1transformer_configuration1"));
        assert_eq!(config.get("connect_type"), Some("WYE_WYE"));
        assert!(!config.contains_key(EMBEDDED_CONFIG));
    }

    #[test]
    fn test_lift_deep_nesting() {
        let mut tree = glm::parse(
            "object a { name a; object b { name b; object c { name c; }; }; }",
        )
        .unwrap();
        assert_eq!(fully_de_embed(&mut tree).unwrap(), 2);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.get(NodeId(2)).unwrap().get(PARENT), Some("b"));
        assert_eq!(tree.count_nodes(), 3);
    }

    #[test]
    fn test_unrecognized_embedded_header_stays() {
        let mut tree = glm::parse("object meter { name m1; class player { double value; }; }").unwrap();
        assert_eq!(fully_de_embed(&mut tree).unwrap(), 0);
        assert!(tree.get(NodeId(0)).unwrap().child(NodeId(1)).is_some());
    }

    #[test]
    fn test_nested_schedule_stays() {
        let mut tree = glm::parse(
            "object house { name h1; schedule s { * * * * * 1.0; }; object ZIPload { base_power 1; }; }",
        )
        .unwrap();
        assert_eq!(fully_de_embed(&mut tree).unwrap(), 1);

        let house = tree.get(NodeId(0)).unwrap();
        let schedule = house.child(NodeId(1)).unwrap();
        assert!(is_schedule(schedule));
        assert!(!schedule.contains_key(PARENT));

        let reparsed = glm::parse(&glm::write(&tree)).unwrap();
        assert!(reparsed.is_isomorphic(&tree));
    }

    #[test]
    fn test_embedded_target() {
        assert_eq!(
            embedded_target("configuration object line_configuration"),
            Some(("configuration".to_string(), "line_configuration".to_string()))
        );
        assert_eq!(embedded_target("class player"), None);
        assert_eq!(embedded_target("a b c"), None);
    }
}
