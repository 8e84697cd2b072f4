//! GLM parser, tree model and writer.
//!
//! GLM is the brace-structured text format that describes a distribution
//! feeder for a power-flow solver. Statements are terminated by `;`, blocks
//! nest with `{ ... }` and `//` starts a line comment.
//!
//! # Grammar Overview
//!
//! ```text
//! document    = { statement }
//! statement   = directive | block | ';'
//! directive   = word { word } ';'                  (top level only)
//! block       = header '{' { property | block } '}' [';']
//! property    = key value { value } ';'
//! header      = "clock"
//!             | "module" name
//!             | "object" type
//!             | key "object" type { word }         (embedded configuration)
//!             | "schedule" name                    (body kept verbatim)
//! ```
//!
//! # Tree Shape
//!
//! | Statement | Node |
//! |-----------|------|
//! | `#set minimum_timestep=60;` | `{omftype: "#set", argument: "minimum_timestep=60"}` |
//! | `module powerflow { ... }` | `{module: "powerflow", ...}` |
//! | `clock { ... }` | `{clock: "clock", ...}` |
//! | `object node { ... }` | `{object: "node", ...}` |
//! | `configuration object line_configuration { ... }` | `{omfEmbeddedConfigObject: "configuration object line_configuration", ...}` |
//!
//! Every directive and every opening brace takes the next id from a single
//! counter, so the same input always yields the same ids.
//!
//! # Example
//!
//! ```text
//! #set double_format=%+.12lg;
//! module powerflow {
//!     solver_method NR;
//! };
//! object overhead_line {
//!     name l1;
//!     from n1;
//!     to n2;
//!     length 100;
//! };
//! ```

mod lexer;
mod parser;
mod tree;
mod writer;

pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use parser::{is_schedule, Parser, ParserConfig, CRON, SCHEDULE};
pub use tree::*;
pub use writer::{Writer, WriterConfig};

use std::path::Path;

use crate::error::{GlmError, Result};

/// Parse GLM text into a tree.
pub fn parse(input: &str) -> Result<Tree> {
    parse_with(input, ParserConfig::default())
}

/// Parse GLM text with custom parser configuration.
pub fn parse_with(input: &str, config: ParserConfig) -> Result<Tree> {
    let lexer = Lexer::new(input);
    Parser::with_config(lexer, config).parse()
}

/// Parse a GLM file.
pub fn parse_file(path: &Path) -> Result<Tree> {
    let content = std::fs::read_to_string(path).map_err(|e| GlmError::file_read(path, e))?;
    parse(&content)
}

/// Write a tree as GLM text.
pub fn write(tree: &Tree) -> String {
    Writer::new().write(tree)
}

/// Write a tree as GLM text with custom writer configuration.
pub fn write_with(tree: &Tree, config: WriterConfig) -> String {
    Writer::with_config(config).write(tree)
}

/// Write a tree to a GLM file.
pub fn write_file(path: &Path, tree: &Tree, config: WriterConfig) -> Result<()> {
    std::fs::write(path, write_with(tree, config)).map_err(|e| GlmError::file_write(path, e))
}
