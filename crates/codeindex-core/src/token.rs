//! Tokens produced by the profile-driven lexer.
//!
//! Tokens are ephemeral: they flow from the lexer into declaration discovery
//! and occurrence collection and are never serialised. Lines and columns are
//! 1-based, byte offsets are 0-based UTF-8 offsets, and `col_end` is one past
//! the last column. Columns count Unicode scalar values, not bytes.

/// The kind of a lexed token.
///
/// The lexer yields only tokens the downstream passes observe: identifiers,
/// and the `.` / `::` punctuation that the qualified-identifier rule scans
/// for. Everything else advances the cursor without producing a token, and
/// end of input is iterator exhaustion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Punct,
}

/// One token with its full source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
    pub col_start: u32,
    pub col_end: u32,
    pub byte_start: usize,
    pub byte_end: usize,
}

impl Token {
    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }
}
