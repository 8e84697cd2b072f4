//! Serializer turning a [`Tree`] back into GLM text.
//!
//! Output is semantically equivalent to the parsed input, not byte-identical:
//! comments and original layout are gone, and every property is written as a
//! single `key value;` line.

use super::parser::{is_schedule, CRON};
use super::tree::{
    BlockKind, Node, Property, Tree, ARGUMENT, CLOCK, EMBEDDED_CONFIG, MODULE, OBJECT, OMFTYPE,
};

/// Configuration for the writer.
#[derive(Debug, Clone, Default)]
pub struct WriterConfig {
    /// Spaces of indentation per nesting level (0 writes everything flush left).
    pub indent: usize,
}

impl WriterConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of spaces per nesting level.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

/// Writer for GLM text.
pub struct Writer {
    config: WriterConfig,
}

impl Writer {
    /// Create a writer with default configuration.
    pub fn new() -> Self {
        Self::with_config(WriterConfig::default())
    }

    /// Create a writer with custom configuration.
    pub fn with_config(config: WriterConfig) -> Self {
        Self { config }
    }

    /// Write a whole tree, one top-level statement after another in id order.
    pub fn write(&self, tree: &Tree) -> String {
        let mut out = String::new();
        for (_, node) in tree.iter() {
            self.write_node(node, 0, &mut out);
            out.push('\n');
        }
        out
    }

    /// Write a single node at the given nesting depth.
    ///
    /// Directives are written without a trailing newline; blocks end with `};\n`.
    /// Schedules are written from their `name` and `cron` alone.
    pub fn write_node(&self, node: &Node, depth: usize, out: &mut String) {
        let pad = self.pad(depth);
        let kind = node.kind();

        let header = match kind {
            Some(BlockKind::Directive) => {
                let omftype = node.get(OMFTYPE).unwrap_or_default();
                let argument = node.get(ARGUMENT).unwrap_or_default();
                out.push_str(&pad);
                out.push_str(omftype);
                if !argument.is_empty() {
                    out.push(' ');
                    out.push_str(argument);
                }
                out.push(';');
                return;
            }
            Some(BlockKind::Object) if is_schedule(node) => {
                let name = node.name().unwrap_or_default();
                let cron = node.get(CRON).unwrap_or_default();
                out.push_str(&format!("{pad}schedule {name} {{\n{cron}\n{pad}}};\n"));
                return;
            }
            Some(BlockKind::Module) => format!("module {}", node.get(MODULE).unwrap_or_default()),
            Some(BlockKind::Clock) => "clock".to_string(),
            Some(BlockKind::Object) => format!("object {}", node.get(OBJECT).unwrap_or_default()),
            Some(BlockKind::EmbeddedConfig) => node.get(EMBEDDED_CONFIG).unwrap_or_default().to_string(),
            None => String::new(),
        };

        out.push_str(&pad);
        if !header.is_empty() {
            out.push_str(&header);
            out.push(' ');
        }
        out.push_str("{\n");
        self.write_body(node, kind, depth + 1, out);
        out.push_str(&pad);
        out.push_str("};\n");
    }

    fn write_body(&self, node: &Node, kind: Option<BlockKind>, depth: usize, out: &mut String) {
        let pad = self.pad(depth);
        for property in node.properties() {
            match property {
                Property::Scalar { key, value } if written_in_header(kind, key, value) => {}
                Property::Scalar { key, value } => {
                    out.push_str(&format!("{pad}{key} {value};\n"));
                }
                Property::Child { node: child, .. } => {
                    self.write_node(child, depth, out);
                    if child.kind() == Some(BlockKind::Directive) {
                        out.push('\n');
                    }
                }
            }
        }
    }

    fn pad(&self, depth: usize) -> String {
        " ".repeat(self.config.indent * depth)
    }
}

/// Whether a scalar is already carried by the block header.
///
/// A clock header always reads `clock`, so any other value stored under the
/// `clock` key is written as an ordinary property.
fn written_in_header(kind: Option<BlockKind>, key: &str, value: &str) -> bool {
    match kind {
        Some(BlockKind::Clock) => key == CLOCK && value == CLOCK,
        Some(kind) => kind.is_header_key(key),
        None => false,
    }
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}
