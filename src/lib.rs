//! # GLM Core
//!
//! A parser, tree model and writer for GLM feeder descriptions.
//!
//! This library provides:
//! - A tokenizer and stack-based tree builder for GLM text
//! - An id-keyed tree of nested property records
//! - A writer that turns a (possibly edited) tree back into GLM
//! - JSON dump and load of trees
//! - Feeder edits: de-embedding, time window adjustment, recorder attachment
//!
//! ## Architecture
//!
//! - [`glm`] - Lexer, parser, tree types and writer
//! - [`json`] - JSON document format for trees
//! - [`feeder`] - Tree transformations and topology extraction
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! glm parse feeder.glm -o feeder.json
//! glm write feeder.json --indent 4 -o feeder.glm
//! ```
//!
//! ### Library
//!
//! ```text
//! let mut tree = glm_core::parse(&text)?;
//! glm_core::feeder::fully_de_embed(&mut tree)?;
//! let text = glm_core::write(&tree);
//! ```
//!
//! ## Round Trip
//!
//! Writing a parsed tree and parsing the result again yields the same tree:
//! the same ids, block kinds and properties. Comments and layout are not kept.

pub mod error;
pub mod feeder;
pub mod glm;
pub mod json;

// Re-export main types for convenience
pub use error::{GlmError, Result};
pub use glm::{parse, parse_file, write, BlockKind, Node, NodeId, Tree};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmGlmTree;
