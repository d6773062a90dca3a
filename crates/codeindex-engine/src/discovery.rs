//! Declaration discovery: a purely lexical pass that decides which
//! identifiers a file "declares" (or otherwise admits by policy).
//!
//! This is deliberately a heuristic over the token stream, not a parser.
//! Classification mistakes (a `return foo` admitting `foo`, say) are part of
//! the contract and regression-tested against the corpus; do not add
//! parser-like context here.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

use codeindex_core::{Token, TokenKind};

use crate::indexer::ResolvedPolicy;
use crate::lexer::CompiledProfile;

/// Modifier-like tokens that never act as the type in a typed-declaration
/// pair.
const DECLARATION_MODIFIERS: [&str; 5] = ["public", "private", "protected", "static", "final"];

fn include_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^[ \t]*#[ \t]*include[ \t]*(?:<([^>\r\n]*)>|"([^"\r\n]*)")"#).unwrap()
    })
}

/// Compute the set of identifiers admitted for one file.
///
/// Keys in the returned set are normalized per the profile; the union across
/// all files of a run forms the allowed set consulted in declared-only mode.
pub fn discover_declared(
    text: &str,
    tokens: &[Token],
    compiled: &CompiledProfile,
    policy: &ResolvedPolicy,
) -> BTreeSet<String> {
    let mut admitted = BTreeSet::new();

    let idents: Vec<&Token> = tokens.iter().filter(|t| t.is_identifier()).collect();

    for pair in idents.windows(2) {
        let (t, n) = (pair[0], pair[1]);
        if compiled.is_stop_word(&n.text) {
            continue;
        }

        // package/namespace and class/struct introducers admit the next
        // identifier unconditionally.
        if t.text == "package" || t.text == "class" {
            admitted.insert(compiled.normalize(&n.text));
            continue;
        }

        // Typed-declaration heuristic: any adjacent pair (T, N) admits N
        // unless T is a reserved modifier. T may be a stop word (a keyword
        // acting as a type, e.g. `int x`) or a user-defined type name.
        if DECLARATION_MODIFIERS.contains(&t.text.as_str()) {
            continue;
        }
        if policy.exclude_single_letter && n.text.chars().count() == 1 {
            continue;
        }
        admitted.insert(compiled.normalize(&n.text));
    }

    if policy.include_qualified.admits_dot() || policy.include_qualified.admits_scope() {
        for triple in tokens.windows(3) {
            let (left, punct, right) = (&triple[0], &triple[1], &triple[2]);
            if left.kind != TokenKind::Identifier
                || punct.kind != TokenKind::Punct
                || right.kind != TokenKind::Identifier
            {
                continue;
            }
            let enabled = (punct.text == "." && policy.include_qualified.admits_dot())
                || (punct.text == "::" && policy.include_qualified.admits_scope());
            if !enabled {
                continue;
            }
            if !compiled.is_stop_word(&left.text) {
                admitted.insert(compiled.normalize(&left.text));
            }
            if !compiled.is_stop_word(&right.text) {
                admitted.insert(compiled.normalize(&right.text));
            }
        }
    }

    if policy.include_headers {
        for caps in include_line_regex().captures_iter(text) {
            let path = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or("");
            for m in compiled.identifier_scan().find_iter(path) {
                admitted.insert(compiled.normalize(m.as_str()));
            }
        }
    }

    admitted
}
