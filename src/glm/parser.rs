//! Tree builder for GLM.
//!
//! A stack machine over the token stream: words accumulate into a pending
//! statement until a `;`, `{` or `}` decides what the statement was.

use tracing::{debug, trace};

use super::lexer::{Lexer, Token, TokenKind};
use super::tree::{classify, Header, Node, NodeId, Tree, EMBEDDED_CONFIG, NAME, OBJECT};
use crate::error::{GlmError, Result};

/// Header keyword of a schedule block.
pub const SCHEDULE: &str = "schedule";
/// Key holding the verbatim body of a schedule block.
pub const CRON: &str = "cron";

/// Configuration for the parser.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Read `schedule <name> { ... }` bodies verbatim instead of as nested blocks.
    pub recognize_schedules: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            recognize_schedules: true,
        }
    }
}

impl ParserConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable verbatim schedule bodies.
    pub fn with_schedules(mut self, recognize_schedules: bool) -> Self {
        self.recognize_schedules = recognize_schedules;
        self
    }
}

/// Parser for GLM text.
///
/// All parse state lives here, so independent parsers share nothing.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    config: ParserConfig,
    tree: Tree,
    open_stack: Vec<NodeId>,
    pending: Vec<String>,
    token_index: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self::with_config(lexer, ParserConfig::default())
    }

    /// Create a new parser with custom configuration.
    pub fn with_config(lexer: Lexer<'a>, config: ParserConfig) -> Self {
        Self {
            lexer,
            config,
            tree: Tree::new(),
            open_stack: Vec::new(),
            pending: Vec::new(),
            token_index: 0,
        }
    }

    /// Parse the entire input into a tree.
    pub fn parse(mut self) -> Result<Tree> {
        while let Some(token) = self.next_token() {
            match token.kind {
                TokenKind::Word => self.pending.push(token.text),
                TokenKind::Semicolon => self.end_statement()?,
                TokenKind::CloseBrace => self.close_block(&token)?,
                TokenKind::OpenBrace => {
                    if self.at_schedule() {
                        self.read_schedule()?;
                    } else {
                        self.open_block()?;
                    }
                }
            }
        }

        if !self.pending.is_empty() {
            debug!(words = ?self.pending, "dropping unterminated statement at end of input");
        }
        if !self.open_stack.is_empty() {
            debug!(depth = self.open_stack.len(), "input ended inside open blocks");
        }

        Ok(self.tree)
    }

    fn next_token(&mut self) -> Option<Token> {
        let token = self.lexer.next_token()?;
        self.token_index += 1;
        Some(token)
    }

    /// The node at the top of the open stack.
    fn current_mut(&mut self) -> Option<&mut Node> {
        self.tree.node_at_mut(&self.open_stack)
    }

    /// Handle `;`.
    fn end_statement(&mut self) -> Result<()> {
        let words = std::mem::take(&mut self.pending);
        if !self.open_stack.is_empty() {
            self.add_property(words);
            return Ok(());
        }
        let Some((omftype, argument)) = words.split_first() else {
            return Ok(());
        };
        let node = Node::directive(omftype.as_str(), argument.join(" "));
        trace!(%omftype, "directive");
        self.tree.push(node)?;
        Ok(())
    }

    /// Handle `}`.
    fn close_block(&mut self, token: &Token) -> Result<()> {
        if self.open_stack.is_empty() {
            return Err(GlmError::structural(
                token.line,
                token.column,
                token.offset,
                self.token_index - 1,
            ));
        }
        let words = std::mem::take(&mut self.pending);
        if !words.is_empty() {
            self.add_property(words);
        }
        self.open_stack.pop();
        Ok(())
    }

    /// Handle `{`.
    fn open_block(&mut self) -> Result<()> {
        let words = std::mem::take(&mut self.pending);
        let id = self.tree.allocate_id()?;

        let mut node = Node::new();
        match classify(&words) {
            Header::Block(kind, value) => node.set(kind.key(), value),
            Header::Fallback(header) => {
                debug!(%header, %id, "unrecognized block header, keeping it verbatim");
                node.set(EMBEDDED_CONFIG, header);
            }
            Header::Empty => debug!(%id, "block opened without a header"),
        }

        self.attach(id, node)?;
        self.open_stack.push(id);
        Ok(())
    }

    fn attach(&mut self, id: NodeId, node: Node) -> Result<()> {
        match self.current_mut() {
            Some(parent) => parent.insert_child(id, node),
            None => {
                self.tree.insert(id, node)?;
            }
        }
        Ok(())
    }

    fn add_property(&mut self, words: Vec<String>) {
        let [key, rest @ ..] = words.as_slice() else {
            return;
        };
        if rest.is_empty() {
            trace!(%key, "dropping property without a value");
            return;
        }
        let value = rest.join(" ");
        if let Some(node) = self.current_mut() {
            node.set(key.as_str(), value);
        }
    }

    fn at_schedule(&self) -> bool {
        self.config.recognize_schedules
            && self.pending.len() == 2
            && self.pending[0] == SCHEDULE
    }

    /// Consume a schedule body up to its matching `}` and store it verbatim.
    fn read_schedule(&mut self) -> Result<()> {
        let words = std::mem::take(&mut self.pending);
        let id = self.tree.allocate_id()?;

        let mut body = String::new();
        let mut depth = 0usize;
        let mut closed = false;
        while let Some(token) = self.next_token() {
            match token.kind {
                TokenKind::CloseBrace if depth == 0 => {
                    closed = true;
                    break;
                }
                TokenKind::CloseBrace => depth -= 1,
                TokenKind::OpenBrace => depth += 1,
                _ => {}
            }
            if !body.is_empty() && token.kind != TokenKind::Semicolon {
                body.push(' ');
            }
            body.push_str(&token.text);
        }
        if !closed {
            debug!(name = %words[1], "schedule body not closed before end of input");
        }

        let node = Node::object(SCHEDULE)
            .with(NAME, words[1].as_str())
            .with(CRON, body);
        self.attach(id, node)
    }
}

/// Check whether a node is a verbatim schedule block.
pub fn is_schedule(node: &Node) -> bool {
    node.get(OBJECT) == Some(SCHEDULE) && node.contains_key(CRON)
}
