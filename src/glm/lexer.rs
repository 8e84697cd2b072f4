//! Lexer (tokenizer) for GLM text.
//!
//! The lexer never fails: anything that is not whitespace, a comment or one of
//! the structural characters `;`, `{`, `}` ends up inside a word, and grammar
//! problems are left to the parser.

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text
    pub text: String,
    /// Byte offset into the original input
    pub offset: usize,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed, in characters)
    pub column: usize,
}

/// Token types in GLM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Any run of non-structural, non-whitespace characters
    Word,
    /// Statement terminator ';'
    Semicolon,
    /// Block opener '{'
    OpenBrace,
    /// Block closer '}'
    CloseBrace,
}

impl TokenKind {
    /// Whether this token ends a pending statement.
    pub fn is_structural(&self) -> bool {
        !matches!(self, Self::Word)
    }
}

/// Lexer for tokenizing GLM input.
pub struct Lexer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    line: usize,
    column: usize,
    prev: Option<char>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            line: 1,
            column: 1,
            prev: None,
        }
    }

    /// Get the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace_and_comments();

        let (offset, ch) = self.chars.peek().copied()?;
        let line = self.line;
        let column = self.column;

        let kind = match ch {
            ';' => Some(TokenKind::Semicolon),
            '{' => Some(TokenKind::OpenBrace),
            '}' => Some(TokenKind::CloseBrace),
            _ => None,
        };

        let (kind, text) = match kind {
            Some(kind) => {
                self.advance();
                (kind, ch.to_string())
            }
            None => (TokenKind::Word, self.read_word()),
        };

        Some(Token {
            kind,
            text,
            offset,
            line,
            column,
        })
    }

    fn advance(&mut self) -> Option<char> {
        let (_, ch) = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.prev = Some(ch);
        Some(ch)
    }

    /// A `//` starts a comment unless it is the separator of a URL scheme
    /// such as `http://`.
    fn at_comment(&mut self) -> bool {
        match self.chars.peek() {
            Some(&(pos, '/')) => self.input[pos..].starts_with("//") && self.prev != Some(':'),
            _ => false,
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some((_, ch)) = self.chars.peek().copied() {
            if ch.is_whitespace() {
                self.advance();
            } else if self.at_comment() {
                self.skip_comment();
            } else {
                break;
            }
        }
    }

    fn skip_comment(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn read_word(&mut self) -> String {
        let mut text = String::new();
        while let Some((_, ch)) = self.chars.peek().copied() {
            if ch.is_whitespace() || matches!(ch, ';' | '{' | '}') || self.at_comment() {
                break;
            }
            text.push(ch);
            self.advance();
        }
        text
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// Tokenize a whole buffer.
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).collect()
}
