//! WASM bindings for GLM Core.
//!
//! This module provides JavaScript-friendly bindings so a browser front-end
//! can edit feeders without a server round trip.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmGlmTree } from 'glm_core';
//!
//! await init();
//!
//! const tree = new WasmGlmTree(glmText);
//! tree.de_embed();
//! const json = tree.to_json();
//! const text = tree.write(4);
//! ```

use wasm_bindgen::prelude::*;

use crate::feeder;
use crate::glm::{self, NodeId, Tree, WriterConfig};
use crate::json;

fn to_js(err: crate::error::GlmError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// A parsed feeder held on the WASM side.
#[wasm_bindgen]
pub struct WasmGlmTree {
    tree: Tree,
}

#[wasm_bindgen]
impl WasmGlmTree {
    /// Parse GLM text.
    ///
    /// # Returns
    /// A new `WasmGlmTree` or an error string if the braces do not balance.
    #[wasm_bindgen(constructor)]
    pub fn new(glm_text: &str) -> Result<WasmGlmTree, JsValue> {
        let tree = glm::parse(glm_text).map_err(to_js)?;
        Ok(WasmGlmTree { tree })
    }

    /// Load a tree from its JSON document form.
    #[wasm_bindgen]
    pub fn from_json(json_text: &str) -> Result<WasmGlmTree, JsValue> {
        let tree = json::from_str(json_text).map_err(to_js)?;
        Ok(WasmGlmTree { tree })
    }

    /// The tree as a JSON document.
    #[wasm_bindgen]
    pub fn to_json(&self) -> Result<String, JsValue> {
        json::to_string(&self.tree).map_err(to_js)
    }

    /// The tree as GLM text, indented by `indent` spaces per level.
    #[wasm_bindgen]
    pub fn write(&self, indent: usize) -> String {
        glm::write_with(&self.tree, WriterConfig::new().with_indent(indent))
    }

    /// Lift nested blocks to the top level, returning how many moved.
    #[wasm_bindgen]
    pub fn de_embed(&mut self) -> Result<usize, JsValue> {
        feeder::fully_de_embed(&mut self.tree).map_err(to_js)
    }

    /// A scalar property of a top-level node, if set.
    #[wasm_bindgen]
    pub fn property(&self, id: usize, key: &str) -> Result<Option<String>, JsValue> {
        let node = self.tree.node(NodeId(id)).map_err(to_js)?;
        Ok(node.get(key).map(str::to_string))
    }

    /// Number of top-level statements.
    #[wasm_bindgen(getter)]
    pub fn len(&self) -> usize {
        self.tree.len()
    }
}

/// Parse GLM text straight to its JSON document.
#[wasm_bindgen(js_name = parseGlm)]
pub fn parse_glm(glm_text: &str) -> Result<String, JsValue> {
    let tree = glm::parse(glm_text).map_err(to_js)?;
    json::to_string(&tree).map_err(to_js)
}

/// Write a JSON document back out as GLM text.
#[wasm_bindgen(js_name = writeGlm)]
pub fn write_glm(json_text: &str) -> Result<String, JsValue> {
    let tree = json::from_str(json_text).map_err(to_js)?;
    Ok(glm::write(&tree))
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
