//! Profile-driven lexer: a comment/literal-aware state machine.
//!
//! The lexer walks UTF-8 text with three independent counters (line, column,
//! byte). Columns advance by one per Unicode scalar value; bytes advance by
//! UTF-8 length; CR, LF, and CRLF each count as exactly one logical newline.
//! Lexing never fails: unterminated comments and literals consume to end of
//! input, and any byte sequence that made it through decoding is accepted.

use regex::Regex;
use std::collections::BTreeSet;

use codeindex_core::{
    CaseSensitivity, CodeIndexError, IdentifierMode, LanguageProfile, NormalizationMode, Token,
    TokenKind,
};

/// A profile with its derived machinery: the anchored identifier regex, an
/// unanchored variant for scanning embedded text (include paths), and the
/// normalized stop-word set. Built once per run; immutable and shareable.
pub struct CompiledProfile {
    profile: LanguageProfile,
    ident_anchored: Regex,
    ident_scan: Regex,
    stop: BTreeSet<String>,
}

impl CompiledProfile {
    /// Compile a profile. Malformed profiles fail here, before any input is
    /// read: unsupported identifier or normalization modes, missing or
    /// uncompilable patterns.
    pub fn new(profile: &LanguageProfile) -> Result<Self, CodeIndexError> {
        profile.validate()?;

        if profile.identifier_rule.mode != IdentifierMode::Regex {
            return Err(CodeIndexError::Config(
                "identifier_rule.mode: only \"regex\" is supported".into(),
            ));
        }
        if profile.normalization.mode == NormalizationMode::Nfkc {
            return Err(CodeIndexError::Config(
                "normalization.mode \"nfkc\" is not supported".into(),
            ));
        }

        let pattern = profile.identifier_rule.pattern.as_deref().ok_or_else(|| {
            CodeIndexError::Config("identifier_rule.pattern is required".into())
        })?;

        // The pattern must match strictly at the cursor. A non-anchored
        // search would skip across non-identifier characters and corrupt
        // token spans, so the anchor is baked into the compiled regex.
        let ident_anchored = Regex::new(&format!(r"\A(?:{pattern})")).map_err(|e| {
            CodeIndexError::Config(format!("uncompilable identifier pattern: {e}"))
        })?;
        let ident_scan = Regex::new(pattern).map_err(|e| {
            CodeIndexError::Config(format!("uncompilable identifier pattern: {e}"))
        })?;

        let stop = profile
            .stop_words
            .effective_words()
            .iter()
            .map(|w| normalize_key(profile, w))
            .collect();

        Ok(Self {
            profile: profile.clone(),
            ident_anchored,
            ident_scan,
            stop,
        })
    }

    pub fn profile(&self) -> &LanguageProfile {
        &self.profile
    }

    /// Fold an identifier spelling into its symbol key.
    pub fn normalize(&self, text: &str) -> String {
        normalize_key(&self.profile, text)
    }

    /// Whether a spelling is a stop word (compared on normalized keys).
    pub fn is_stop_word(&self, text: &str) -> bool {
        self.stop.contains(&self.normalize(text))
    }

    /// Whether an already-normalized key is a stop word.
    pub fn is_stop_key(&self, key: &str) -> bool {
        self.stop.contains(key)
    }

    /// Whether emitted identifiers keep their first-seen spelling rather
    /// than the folded key.
    pub fn preserve_spelling(&self) -> bool {
        self.profile.normalization.preserve_original_spelling
    }

    /// Unanchored identifier regex, for scanning text fragments such as
    /// include paths.
    pub fn identifier_scan(&self) -> &Regex {
        &self.ident_scan
    }

    /// A lexer over `text` driven by this profile.
    pub fn lexer<'a>(&'a self, text: &'a str) -> Lexer<'a> {
        Lexer::new(self, text)
    }

    fn line_comment_at(&self, rest: &str) -> Option<&str> {
        self.profile
            .comment_syntax
            .line_comment_starts
            .iter()
            .find(|m| rest.starts_with(m.as_str()))
            .map(String::as_str)
    }

    fn block_comment_at(&self, rest: &str) -> Option<usize> {
        self.profile
            .comment_syntax
            .block_comment_starts
            .iter()
            .position(|m| rest.starts_with(m.as_str()))
    }

    fn block_end(&self, idx: usize) -> &str {
        &self.profile.comment_syntax.block_comment_ends[idx]
    }
}

fn normalize_key(profile: &LanguageProfile, text: &str) -> String {
    let mut key = text.to_string();
    if profile.normalization.mode == NormalizationMode::LowercaseAscii {
        key = key.to_ascii_lowercase();
    }
    if profile.case_sensitivity == CaseSensitivity::Insensitive {
        key = key.to_lowercase();
    }
    key
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Default,
    LineComment,
    BlockComment(usize),
    Str(char),
    CharLit(char),
}

/// A lazy, finite, non-restartable token stream over one text.
///
/// Yields `Identifier` tokens for anchored matches of the profile's
/// identifier regex, and `Punct` tokens for `.` and `::`. Everything else
/// advances the cursor silently.
pub struct Lexer<'a> {
    compiled: &'a CompiledProfile,
    text: &'a str,
    pos: usize,
    line: u32,
    col: u32,
    state: State,
}

impl<'a> Lexer<'a> {
    pub fn new(compiled: &'a CompiledProfile, text: &'a str) -> Self {
        Self {
            compiled,
            text,
            pos: 0,
            line: 1,
            col: 1,
            state: State::Default,
        }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consume one scalar. CR, LF, and CRLF advance the line counter by
    /// exactly one and reset the column.
    fn bump(&mut self) {
        match self.peek() {
            None => {}
            Some('\r') => {
                self.pos += 1;
                if self.rest().starts_with('\n') {
                    self.pos += 1;
                }
                self.line += 1;
                self.col = 1;
            }
            Some('\n') => {
                self.pos += 1;
                self.line += 1;
                self.col = 1;
            }
            Some(c) => {
                self.pos += c.len_utf8();
                self.col += 1;
            }
        }
    }

    /// Consume a multi-character marker that contains no newlines.
    fn bump_marker(&mut self, marker: &str) {
        self.pos += marker.len();
        self.col += marker.chars().count() as u32;
    }

    fn at_newline(&self) -> bool {
        matches!(self.peek(), Some('\n') | Some('\r'))
    }

    fn token(&self, kind: TokenKind, text: &str) -> Token {
        Token {
            kind,
            text: text.to_string(),
            line: self.line,
            col_start: self.col,
            col_end: self.col + text.chars().count() as u32,
            byte_start: self.pos,
            byte_end: self.pos + text.len(),
        }
    }

    fn next_in_default(&mut self) -> Option<Token> {
        let cp = self.compiled;
        let rest = self.rest();

        if let Some(marker) = cp.line_comment_at(rest) {
            self.bump_marker(marker);
            self.state = State::LineComment;
            return None;
        }
        if let Some(idx) = cp.block_comment_at(rest) {
            let marker = &cp.profile.comment_syntax.block_comment_starts[idx];
            self.bump_marker(marker);
            self.state = State::BlockComment(idx);
            return None;
        }

        let literals = &cp.profile.literal_syntax;
        if literals.exclude_literals {
            if let Some(c) = self.peek() {
                if literals.string_delims.contains(&c) {
                    self.bump();
                    self.state = State::Str(c);
                    return None;
                }
                if literals.char_delims.contains(&c) {
                    self.bump();
                    self.state = State::CharLit(c);
                    return None;
                }
            }
        }

        if let Some(m) = cp.ident_anchored.find(rest) {
            if !m.as_str().is_empty() {
                let tok = self.token(TokenKind::Identifier, m.as_str());
                self.bump_marker(m.as_str());
                return Some(tok);
            }
        }

        if rest.starts_with("::") {
            let tok = self.token(TokenKind::Punct, "::");
            self.bump_marker("::");
            return Some(tok);
        }
        if rest.starts_with('.') {
            let tok = self.token(TokenKind::Punct, ".");
            self.bump_marker(".");
            return Some(tok);
        }

        self.bump();
        None
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if self.pos >= self.text.len() {
                return None;
            }
            match self.state {
                State::Default => {
                    if let Some(tok) = self.next_in_default() {
                        return Some(tok);
                    }
                }
                State::LineComment => {
                    if self.at_newline() {
                        self.state = State::Default;
                    }
                    self.bump();
                }
                State::BlockComment(idx) => {
                    let end = self.compiled.block_end(idx);
                    if self.rest().starts_with(end) {
                        let end = end.to_string();
                        self.bump_marker(&end);
                        self.state = State::Default;
                    } else {
                        self.bump();
                    }
                }
                State::Str(delim) => {
                    let escape = self.compiled.profile.literal_syntax.escape_char;
                    let multiline = self.compiled.profile.literal_syntax.allow_multiline_strings;
                    match self.peek() {
                        None => return None,
                        Some(c) if c == escape => {
                            self.bump();
                            if self.peek().is_some() {
                                self.bump();
                            }
                        }
                        Some(c) if c == delim => {
                            self.bump();
                            self.state = State::Default;
                        }
                        Some('\n') | Some('\r') if !multiline => {
                            self.bump();
                            self.state = State::Default;
                        }
                        Some(_) => self.bump(),
                    }
                }
                State::CharLit(delim) => {
                    let escape = self.compiled.profile.literal_syntax.escape_char;
                    match self.peek() {
                        None => return None,
                        Some(c) if c == escape => {
                            self.bump();
                            if self.peek().is_some() {
                                self.bump();
                            }
                        }
                        Some(c) if c == delim => {
                            self.bump();
                            self.state = State::Default;
                        }
                        Some('\n') | Some('\r') => {
                            self.bump();
                            self.state = State::Default;
                        }
                        Some(_) => self.bump(),
                    }
                }
            }
        }
    }
}
