//! Property-based tests for parse/write round trips.
//!
//! Random feeders are rendered as GLM text in two layouts, a compact one and
//! one padded with tabs, blank lines and comments, and both are fed through
//! the parser and writer.

use glm_core::glm::{self, WriterConfig};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Block {
    object_type: String,
    properties: Vec<(String, String)>,
    children: Vec<Block>,
}

#[derive(Debug, Clone)]
enum Statement {
    Directive(String, String),
    Object(Block),
}

fn object_type() -> impl Strategy<Value = String> {
    "[a-z][a-z_]{0,12}(:[0-9]{1,3})?".prop_filter("schedules are read verbatim", |t| t != "schedule")
}

fn property() -> impl Strategy<Value = (String, String)> {
    (
        "k_[a-z0-9_]{0,8}",
        "[A-Za-z0-9_.+-]{1,8}( [A-Za-z0-9_.+'-]{1,8})?",
    )
}

fn block() -> impl Strategy<Value = Block> {
    let leaf = (object_type(), prop::collection::vec(property(), 0..5)).prop_map(
        |(object_type, properties)| Block {
            object_type,
            properties,
            children: Vec::new(),
        },
    );
    leaf.prop_recursive(3, 24, 3, |inner| {
        (
            object_type(),
            prop::collection::vec(property(), 0..5),
            prop::collection::vec(inner, 0..3),
        )
            .prop_map(|(object_type, properties, children)| Block {
                object_type,
                properties,
                children,
            })
    })
}

fn statement() -> impl Strategy<Value = Statement> {
    prop_oneof![
        1 => ("#(set|define)", "[a-z_]{1,10}=[0-9]{1,5}")
            .prop_map(|(omftype, argument)| Statement::Directive(omftype, argument)),
        4 => block().prop_map(Statement::Object),
    ]
}

fn feeder() -> impl Strategy<Value = Vec<Statement>> {
    prop::collection::vec(statement(), 0..8)
}

fn render_block(block: &Block, loose: bool, out: &mut String) {
    if loose {
        out.push_str(&format!("\n// {}\nobject\t{}\n{{\n", block.object_type, block.object_type));
    } else {
        out.push_str(&format!("object {}{{", block.object_type));
    }
    for (key, value) in &block.properties {
        if loose {
            out.push_str(&format!("\t{key}   {value} ; // set {key}\n"));
        } else {
            out.push_str(&format!("{key} {value};"));
        }
    }
    for child in &block.children {
        render_block(child, loose, out);
        out.push(';');
    }
    out.push('}');
    if loose {
        out.push_str("\n\n");
    }
}

fn render(feeder: &[Statement], loose: bool) -> String {
    let mut out = String::new();
    for statement in feeder {
        match statement {
            Statement::Directive(omftype, argument) => {
                if loose {
                    out.push_str(&format!("{omftype}  {argument}\t;\r\n"));
                } else {
                    out.push_str(&format!("{omftype} {argument};"));
                }
            }
            Statement::Object(block) => render_block(block, loose, &mut out),
        }
    }
    out
}

fn count_blocks(block: &Block) -> usize {
    1 + block.children.iter().map(count_blocks).sum::<usize>()
}

proptest! {
    #[test]
    fn parse_write_parse_is_identity(feeder in feeder()) {
        let tree = glm::parse(&render(&feeder, false)).unwrap();
        let reparsed = glm::parse(&glm::write(&tree)).unwrap();
        prop_assert_eq!(&reparsed, &tree);
        prop_assert_eq!(reparsed.ids(), tree.ids());
    }

    #[test]
    fn indentation_does_not_change_the_tree(feeder in feeder(), indent in 0usize..8) {
        let tree = glm::parse(&render(&feeder, false)).unwrap();
        let text = glm::write_with(&tree, WriterConfig::new().with_indent(indent));
        prop_assert_eq!(glm::parse(&text).unwrap(), tree);
    }

    #[test]
    fn layout_and_comments_are_ignored(feeder in feeder()) {
        let compact = glm::parse(&render(&feeder, false)).unwrap();
        let loose = glm::parse(&render(&feeder, true)).unwrap();
        prop_assert_eq!(loose, compact);
    }

    #[test]
    fn every_block_gets_one_id(feeder in feeder()) {
        let tree = glm::parse(&render(&feeder, false)).unwrap();
        let blocks: usize = feeder
            .iter()
            .map(|statement| match statement {
                Statement::Directive(..) => 1,
                Statement::Object(block) => count_blocks(block),
            })
            .sum();
        prop_assert_eq!(tree.count_nodes(), blocks);
        prop_assert_eq!(tree.len(), feeder.len());
        prop_assert_eq!(tree.next_id().0, blocks);
    }

    #[test]
    fn writing_is_deterministic(feeder in feeder()) {
        let text = render(&feeder, true);
        let first = glm::write(&glm::parse(&text).unwrap());
        let second = glm::write(&glm::parse(&text).unwrap());
        prop_assert_eq!(first, second);
    }
}
