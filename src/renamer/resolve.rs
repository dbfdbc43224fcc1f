//! Reference Resolution
//!
//! Second walk over the tokens of a function. Replays the scope extents
//! recorded by the scanner and binds each identifier use to the innermost
//! visible declaration of that spelling.

use rustc_hash::FxHashMap;

use crate::renamer::lexer::{Punct, Token, TokenKind};
use crate::renamer::scan::{Role, Scan};
use crate::renamer::scope::{BindingKey, DeclId, ScopeId, ScopeStack};
use crate::renamer::types;

/// Binds identifier tokens to declarations. Returns one entry per token:
/// the declaration a declaration site or reference denotes, `None` for
/// everything else (members, labels, calls, globals, suppressed statements,
/// and names hidden by a declaration the scanner could not classify).
#[must_use]
pub fn resolve(tokens: &[Token<'_>], scan: &Scan) -> Vec<Option<DeclId>> {
    let tree = &scan.tree;
    // `None` binds a name to a declaration that must never be renamed.
    let mut bindings: FxHashMap<BindingKey, Option<DeclId>> = FxHashMap::default();
    let mut stack = ScopeStack::new();
    let mut next_scope = 1;
    let mut resolved = vec![None; tokens.len()];

    for (i, token) in tokens.iter().enumerate() {
        while !stack.at_root() && tree.scope(stack.current()).end <= i {
            stack.exit();
        }

        while next_scope < tree.scopes().len() && tree.scope(ScopeId(next_scope)).start <= i {
            stack.enter(ScopeId(next_scope));
            next_scope += 1;
        }

        match scan.roles[i] {
            Role::Decl(id) => {
                let decl = tree.decl(id);

                bindings.insert(
                    BindingKey {
                        ident: decl.name.clone(),
                        scope: decl.scope,
                    },
                    Some(id),
                );
                resolved[i] = Some(id);
            }
            Role::Opaque => {
                bindings.insert(
                    BindingKey {
                        ident: token.text.to_string(),
                        scope: stack.current(),
                    },
                    None,
                );
            }
            Role::Plain if token.is_ident() && is_reference(tokens, i) => {
                resolved[i] = lookup(&bindings, &stack, token.text);

                if let Some(id) = resolved[i] {
                    tracing::trace!(
                        name = token.text,
                        line = token.loc.line,
                        scope = %tree.decl(id).scope,
                        "resolved reference"
                    );
                }
            }
            _ => {}
        }
    }

    resolved
}

/// Returns the declaration of `name` in the innermost active scope that
/// binds it.
fn lookup(
    bindings: &FxHashMap<BindingKey, Option<DeclId>>,
    stack: &ScopeStack,
    name: &str,
) -> Option<DeclId> {
    let mut key = BindingKey {
        ident: name.to_string(),
        scope: ScopeId::ROOT,
    };

    for scope in stack.innermost_first() {
        key.scope = scope;

        if let Some(id) = bindings.get(&key) {
            return *id;
        }
    }

    None
}

/// Returns `false` for identifiers in a position that never names an object:
/// after `.`/`->`, after a record keyword, or before a call's `(`.
fn is_reference(tokens: &[Token<'_>], i: usize) -> bool {
    if let Some(prev) = i.checked_sub(1).map(|j| &tokens[j]) {
        if prev.is_punct(Punct::Dot) || prev.is_punct(Punct::Arrow) {
            return false;
        }

        if prev.kind == TokenKind::Keyword && types::RECORD_KEYWORDS.contains(&prev.text) {
            return false;
        }
    }

    !tokens
        .get(i + 1)
        .is_some_and(|next| next.is_punct(Punct::ParenOpen))
}
