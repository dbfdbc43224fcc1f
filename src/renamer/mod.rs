//! Multi-stage pipeline for renaming the pointer-typed locals of a _C_
//! function to canonical `buffer1`, `buffer2`, ... names.
//!
//! Stages: [`lexer`] (trivia-preserving tokens), [`scan`] (scope tree and
//! canonical-name assignment), [`resolve`] (binding uses to declarations),
//! and [`render`] (reassembling the text).

pub mod lexer;
pub mod render;
pub mod resolve;
pub mod scan;
pub mod scope;
pub mod types;

use serde::Serialize;

use crate::error::{LexError, Warning};

pub use lexer::{Lexer, Token, TokenKind, tokenize};
pub use render::render;
pub use resolve::resolve;
pub use scan::{Numbering, Role, Scan, scan};
pub use scope::{DeclId, Declaration, ScopeId, ScopeTree};
pub use types::KnownTypes;

/// Knobs for which declarations are renamed and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOptions {
    /// Canonical name stem (`buffer` yields `buffer1`, `buffer2`, ...).
    pub prefix: String,
    /// Index of the first canonical name.
    pub first_index: usize,
    /// Also rename array declarators (`char buf[16]`).
    pub arrays: bool,
    /// Also rename eligible parameters of the function header.
    pub parameters: bool,
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self {
            prefix: "buffer".into(),
            first_index: 1,
            arrays: false,
            parameters: false,
        }
    }
}

/// One renamed declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingEntry {
    /// Spelling in the source.
    pub original: String,
    pub scope: ScopeId,
    /// Byte offset of the declaration site.
    pub offset: usize,
    pub line: usize,
    pub col: usize,
    pub canonical: String,
}

/// Result of renaming one function.
#[derive(Debug, Clone, Serialize)]
pub struct Renamed {
    /// Function text with every eligible name replaced.
    pub output: String,
    /// Renamed declarations, in numbering order.
    pub mapping: Vec<MappingEntry>,
    pub warnings: Vec<Warning>,
    /// Counter following the last canonical name assigned.
    pub next_index: usize,
}

/// Renames the pointer-typed locals of the function in `source` with default
/// [`RenameOptions`].
///
/// # Errors
///
/// Returns an error if `source` contains an unterminated string literal,
/// character literal, or block comment.
pub fn rename(source: &str, known: &KnownTypes) -> Result<Renamed, LexError> {
    rename_with(source, known, &RenameOptions::default())
}

/// Renames the eligible locals of the function in `source`.
///
/// # Errors
///
/// Returns an error if `source` contains an unterminated string literal,
/// character literal, or block comment.
pub fn rename_with(
    source: &str,
    known: &KnownTypes,
    options: &RenameOptions,
) -> Result<Renamed, LexError> {
    let tokens = tokenize(source)?;
    tracing::trace!(tokens = tokens.len(), bytes = source.len(), "lexed function");

    let scan = scan(
        &tokens,
        known,
        options,
        Numbering::starting_at(options.first_index),
    );
    let resolved = resolve(&tokens, &scan);
    let output = render(&tokens, &resolved, &scan.tree);

    let mapping = scan
        .tree
        .declarations()
        .iter()
        .filter_map(|decl| {
            let canonical = decl.canonical.clone()?;
            let loc = tokens[decl.token].loc;

            Some(MappingEntry {
                original: decl.name.clone(),
                scope: decl.scope,
                offset: decl.offset,
                line: loc.line,
                col: loc.col,
                canonical,
            })
        })
        .collect();

    Ok(Renamed {
        output,
        mapping,
        warnings: scan.warnings,
        next_index: scan.numbering.peek(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_reports_mapping_in_numbering_order() {
        let src = "void f(void) {\n  char *a;\n  int n;\n  void **b;\n}\n";
        let renamed = rename(src, &KnownTypes::new()).expect("source should lex");

        let names: Vec<_> = renamed
            .mapping
            .iter()
            .map(|m| (m.original.as_str(), m.canonical.as_str(), m.line))
            .collect();

        assert_eq!(names, [("a", "buffer1", 2), ("b", "buffer2", 4)]);
        assert_eq!(renamed.next_index, 3);
        assert_eq!(
            renamed.output,
            "void f(void) {\n  char *buffer1;\n  int n;\n  void **buffer2;\n}\n"
        );
    }

    #[test]
    fn rename_with_custom_prefix_and_start() {
        let options = RenameOptions {
            prefix: "ptr".into(),
            first_index: 7,
            ..RenameOptions::default()
        };
        let renamed = rename_with("void f(void) { char *s; s = 0; }", &KnownTypes::new(), &options)
            .expect("source should lex");

        assert_eq!(renamed.output, "void f(void) { char *ptr7; ptr7 = 0; }");
        assert_eq!(renamed.next_index, 8);
    }

    #[test]
    fn shared_inputs_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}

        assert_send_sync::<KnownTypes>();
        assert_send_sync::<RenameOptions>();
        assert_send_sync::<Renamed>();
    }

    #[test]
    fn rename_propagates_lex_errors() {
        let err = rename("void f(void) { char *s = \"open; }", &KnownTypes::new())
            .expect_err("unterminated string should fail");

        assert_eq!(err.kind, crate::error::LexErrorKind::UnterminatedString);
    }
}
