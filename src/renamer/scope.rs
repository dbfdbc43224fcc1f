//! Scope Tree
//!
//! Arena of lexical scopes and the declarations introduced in them, addressed
//! by index with explicit parent links.

use std::fmt;

use serde::Serialize;

/// Index of a scope in a [`ScopeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ScopeId(pub usize);

impl ScopeId {
    /// Function-body scope (parameters live here as well).
    pub const ROOT: ScopeId = ScopeId(0);
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index of a declaration in a [`ScopeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DeclId(pub usize);

/// A lexical block.
#[derive(Debug, Clone)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    /// Token index of the opening token (`{` or `for`).
    pub start: usize,
    /// Token index one past the last token of the scope.
    pub end: usize,
    /// Declarations introduced directly in this scope, in textual order.
    pub decls: Vec<DeclId>,
}

/// A local variable (or parameter) declaration site.
#[derive(Debug, Clone)]
pub struct Declaration {
    /// Spelling as it appears in source.
    pub name: String,
    /// Raw declarator text (pointer markers, name, array suffixes).
    pub declarator: String,
    pub scope: ScopeId,
    /// Token index of the declared identifier.
    pub token: usize,
    /// Byte offset of the declared identifier.
    pub offset: usize,
    /// Number of `*` markers in the declarator.
    pub pointer_depth: usize,
    pub is_array: bool,
    pub is_param: bool,
    /// Assigned only to eligible declarations.
    pub canonical: Option<String>,
}

/// Scopes and declarations of one function.
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    decls: Vec<Declaration>,
}

impl ScopeTree {
    /// Returns a tree holding only the root scope, spanning `len` tokens.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            scopes: vec![Scope {
                parent: None,
                start: 0,
                end: len,
                decls: Vec::new(),
            }],
            decls: Vec::new(),
        }
    }

    /// Opens a child of `parent` starting at token `start`. The end is
    /// provisional until [`ScopeTree::close_scope`].
    pub fn push_scope(&mut self, parent: ScopeId, start: usize) -> ScopeId {
        let end = self.scopes[parent.0].end;
        self.scopes.push(Scope {
            parent: Some(parent),
            start,
            end,
            decls: Vec::new(),
        });

        ScopeId(self.scopes.len() - 1)
    }

    pub fn close_scope(&mut self, id: ScopeId, end: usize) {
        self.scopes[id.0].end = end;
    }

    /// Records a declaration in its scope.
    pub fn declare(&mut self, decl: Declaration) -> DeclId {
        let id = DeclId(self.decls.len());
        self.scopes[decl.scope.0].decls.push(id);
        self.decls.push(decl);
        id
    }

    #[inline]
    #[must_use]
    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    #[inline]
    #[must_use]
    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.decls[id.0]
    }

    /// All scopes, in order of their opening token.
    #[must_use]
    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// All declarations, in textual order.
    #[must_use]
    pub fn declarations(&self) -> &[Declaration] {
        &self.decls
    }

    /// Direct children of `id`, in textual order.
    pub fn children(&self, id: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        self.scopes
            .iter()
            .enumerate()
            .filter(move |(_, scope)| scope.parent == Some(id))
            .map(|(i, _)| ScopeId(i))
    }

    fn fmt_scope(&self, f: &mut fmt::Formatter<'_>, id: ScopeId, depth: usize) -> fmt::Result {
        let scope = self.scope(id);
        let indent = "  ".repeat(depth);

        writeln!(f, "{indent}scope {id} [{}..{})", scope.start, scope.end)?;

        for decl in &scope.decls {
            let decl = self.decl(*decl);

            match &decl.canonical {
                Some(canonical) => writeln!(
                    f,
                    "{indent}  {} -> {canonical}\t({})",
                    decl.name, decl.declarator
                )?,
                None => writeln!(f, "{indent}  {}\t({})", decl.name, decl.declarator)?,
            }
        }

        for child in self.children(id) {
            self.fmt_scope(f, child, depth + 1)?;
        }

        Ok(())
    }
}

impl fmt::Display for ScopeTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_scope(f, ScopeId::ROOT, 0)
    }
}

/// Symbol binding within a scope.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct BindingKey {
    /// Symbol as appears in source.
    pub ident: String,
    pub scope: ScopeId,
}

/// Helper to track the chain of open scopes during a token walk.
#[derive(Debug, Clone)]
pub struct ScopeStack {
    /// Currently active scope IDs, innermost last.
    pub active: Vec<ScopeId>,
}

impl ScopeStack {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        ScopeStack {
            active: vec![ScopeId::ROOT],
        }
    }

    /// # Panics
    ///
    /// Panics if there are no active scopes.
    #[inline]
    #[must_use]
    pub fn current(&self) -> ScopeId {
        *self
            .active
            .last()
            .expect("root scope should always be on the stack")
    }

    #[inline]
    pub fn enter(&mut self, id: ScopeId) {
        self.active.push(id);
    }

    #[inline]
    pub fn exit(&mut self) {
        debug_assert!(!self.at_root(), "attempting to exit root scope");

        if !self.at_root() {
            self.active.pop();
        }
    }

    #[inline]
    #[must_use]
    pub fn at_root(&self) -> bool {
        self.active.len() == 1
    }

    /// Active scopes from innermost to outermost.
    pub fn innermost_first(&self) -> impl Iterator<Item = ScopeId> + '_ {
        self.active.iter().rev().copied()
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(name: &str, scope: ScopeId, canonical: Option<&str>) -> Declaration {
        Declaration {
            name: name.into(),
            declarator: format!("*{name}"),
            scope,
            token: 0,
            offset: 0,
            pointer_depth: 1,
            is_array: false,
            is_param: false,
            canonical: canonical.map(Into::into),
        }
    }

    #[test]
    fn scopes_link_to_parents() {
        let mut tree = ScopeTree::new(20);
        let block = tree.push_scope(ScopeId::ROOT, 3);
        let inner = tree.push_scope(block, 5);
        tree.close_scope(inner, 8);
        tree.close_scope(block, 10);

        assert_eq!(tree.scope(inner).parent, Some(block));
        assert_eq!(tree.scope(block).end, 10);
        assert_eq!(tree.children(ScopeId::ROOT).collect::<Vec<_>>(), [block]);
    }

    #[test]
    fn declarations_are_recorded_per_scope() {
        let mut tree = ScopeTree::new(10);
        let block = tree.push_scope(ScopeId::ROOT, 2);
        let outer = tree.declare(decl("p", ScopeId::ROOT, Some("buffer1")));
        let inner = tree.declare(decl("p", block, None));

        assert_eq!(tree.scope(ScopeId::ROOT).decls, [outer]);
        assert_eq!(tree.scope(block).decls, [inner]);
        assert_eq!(tree.declarations().len(), 2);
        assert_eq!(tree.decl(inner).scope, block);
    }

    #[test]
    fn display_lists_nested_scopes() {
        let mut tree = ScopeTree::new(10);
        let block = tree.push_scope(ScopeId::ROOT, 2);
        tree.close_scope(block, 6);
        tree.declare(decl("p", block, Some("buffer1")));

        let listing = tree.to_string();
        assert!(listing.starts_with("scope #0 [0..10)\n"));
        assert!(listing.contains("  scope #1 [2..6)\n    p -> buffer1\t(*p)\n"));
    }

    #[test]
    fn stack_tracks_innermost() {
        let mut stack = ScopeStack::new();
        stack.enter(ScopeId(1));
        stack.enter(ScopeId(2));

        assert_eq!(stack.current(), ScopeId(2));
        assert_eq!(
            stack.innermost_first().collect::<Vec<_>>(),
            [ScopeId(2), ScopeId(1), ScopeId::ROOT]
        );

        stack.exit();
        stack.exit();
        assert!(stack.at_root());
    }
}
