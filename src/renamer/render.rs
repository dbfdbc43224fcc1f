//! Output Reassembly

use crate::renamer::lexer::Token;
use crate::renamer::scope::{DeclId, ScopeTree};

/// Reassembles the function text from its tokens, substituting the canonical
/// name for every token resolved to an eligible declaration. Everything
/// else, trivia included, is copied verbatim.
#[must_use]
pub fn render(tokens: &[Token<'_>], resolved: &[Option<DeclId>], tree: &ScopeTree) -> String {
    let len = tokens.iter().map(|t| t.trivia.len() + t.text.len()).sum();
    let mut out = String::with_capacity(len);

    for (token, id) in tokens.iter().zip(resolved) {
        out.push_str(token.trivia);

        match id.and_then(|id| tree.decl(id).canonical.as_deref()) {
            Some(canonical) => out.push_str(canonical),
            None => out.push_str(token.text),
        }
    }

    out
}
