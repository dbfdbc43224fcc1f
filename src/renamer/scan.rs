//! Declaration Scanning
//!
//! Pass that walks the tokens of one function statement by statement, builds
//! the [`ScopeTree`] of local declarations, and assigns canonical names to the
//! eligible ones in first-seen order. Statements that cannot be classified
//! with confidence are recorded as warnings and marked so that nothing inside
//! them is renamed.

use rustc_hash::FxHashMap;

use crate::error::{Warning, WarningKind};
use crate::renamer::RenameOptions;
use crate::renamer::lexer::{Punct, Token, TokenKind};
use crate::renamer::scope::{BindingKey, DeclId, Declaration, ScopeId, ScopeStack, ScopeTree};
use crate::renamer::types::{self, KnownTypes};

/// Canonical-name counter, passed into and returned from a scan by value so
/// independent functions never share mutable numbering state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Numbering {
    next: usize,
}

impl Numbering {
    #[must_use]
    pub const fn starting_at(first: usize) -> Self {
        Self { next: first }
    }

    /// Index the next eligible declaration would receive.
    #[must_use]
    pub const fn peek(self) -> usize {
        self.next
    }

    /// Returns the index to assign and the counter that follows it.
    #[must_use]
    pub const fn advance(self) -> (usize, Self) {
        (self.next, Self { next: self.next + 1 })
    }
}

impl Default for Numbering {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

/// What a token is, as far as the scanner can tell. Only identifiers carry
/// anything but [`Role::Plain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Candidate reference; left for the resolver to decide.
    Plain,
    /// Declared name at its declaration site.
    Decl(DeclId),
    /// Type name in a specifier, record tag, or local typedef name.
    TypeName,
    /// Record member or enumerator spelled in a specifier body, or an
    /// attribute argument.
    Field,
    /// Label definition or `goto` target.
    Label,
    /// Part of a statement the scanner gave up on.
    Suppressed,
    /// Would-be declarator name of a declaration the scanner gave up on.
    /// Hides outer declarations of the same spelling but is never renamed.
    Opaque,
}

/// Output of [`scan`].
#[derive(Debug, Clone)]
pub struct Scan {
    pub tree: ScopeTree,
    /// One entry per token.
    pub roles: Vec<Role>,
    pub warnings: Vec<Warning>,
    /// Counter after the last assigned canonical name.
    pub numbering: Numbering,
}

/// What a name in scope denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
    Var,
    Type,
}

/// Reason a statement is left untouched.
#[derive(Debug, Clone)]
struct Skip {
    kind: WarningKind,
    message: String,
}

impl Skip {
    fn ambiguity(message: impl Into<String>) -> Self {
        Skip {
            kind: WarningKind::ParseAmbiguity,
            message: message.into(),
        }
    }

    fn unsupported(message: impl Into<String>) -> Self {
        Skip {
            kind: WarningKind::UnsupportedConstruct,
            message: message.into(),
        }
    }
}

type Parse<T> = Result<T, Skip>;

/// Declarator collected before its statement is known to be well-formed.
#[derive(Debug)]
struct PendingDecl {
    token: usize,
    declarator: String,
    pointer_depth: usize,
    is_array: bool,
}

/// How a statement begins.
#[derive(Debug)]
enum StatementStart {
    Declaration,
    Expression,
    Ambiguous(Skip),
}

/// Helper to walk the token stream while tracking open scopes.
struct Scanner<'t, 'a> {
    tokens: &'t [Token<'a>],
    known: &'t KnownTypes,
    options: &'t RenameOptions,
    cur: usize,
    tree: ScopeTree,
    stack: ScopeStack,
    bindings: FxHashMap<BindingKey, Binding>,
    roles: Vec<Role>,
    warnings: Vec<Warning>,
    numbering: Numbering,
    // Set once a missing `}` has been reported, so enclosing blocks stay quiet.
    reported_eof: bool,
}

/// Scans one function, returning its scope tree, per-token roles, warnings,
/// and the counter following the last canonical name assigned.
#[must_use]
pub fn scan(
    tokens: &[Token<'_>],
    known: &KnownTypes,
    options: &RenameOptions,
    numbering: Numbering,
) -> Scan {
    let mut scanner = Scanner {
        tokens,
        known,
        options,
        cur: 0,
        tree: ScopeTree::new(tokens.len()),
        stack: ScopeStack::new(),
        bindings: FxHashMap::default(),
        roles: vec![Role::Plain; tokens.len()],
        warnings: Vec::new(),
        numbering,
        reported_eof: false,
    };

    if !tokens.is_empty() {
        scanner.scan_function();
    }

    tracing::debug!(
        scopes = scanner.tree.scopes().len(),
        declarations = scanner.tree.declarations().len(),
        warnings = scanner.warnings.len(),
        "scanned function"
    );

    Scan {
        tree: scanner.tree,
        roles: scanner.roles,
        warnings: scanner.warnings,
        numbering: scanner.numbering,
    }
}

impl<'t, 'a> Scanner<'t, 'a> {
    /// Returns the token at `idx`, clamped to the trailing end-of-input token.
    #[inline]
    fn token(&self, idx: usize) -> &'t Token<'a> {
        let tokens = self.tokens;
        &tokens[idx.min(tokens.len() - 1)]
    }

    #[inline]
    fn peek(&self, n: usize) -> &'t Token<'a> {
        self.token(self.cur + n)
    }

    #[inline]
    fn at(&self, punct: Punct) -> bool {
        self.peek(0).is_punct(punct)
    }

    #[inline]
    fn at_eof(&self) -> bool {
        self.peek(0).kind == TokenKind::Eof
    }

    #[inline]
    fn bump(&mut self) {
        if !self.at_eof() {
            self.cur += 1;
        }
    }

    fn warn(&mut self, kind: WarningKind, at: usize, message: impl Into<String>) {
        let loc = self.token(at).loc;
        let message = message.into();

        tracing::debug!(%kind, line = loc.line, col = loc.col, %message, "statement left unrenamed");

        self.warnings.push(Warning {
            kind,
            offset: loc.offset,
            line: loc.line,
            col: loc.col,
            message,
        });
    }

    fn suppress(&mut self, from: usize, to: usize) {
        let to = to.min(self.roles.len());

        for role in &mut self.roles[from.min(to)..to] {
            *role = Role::Suppressed;
        }
    }

    /// Source text of tokens `from..to`, including the trivia between them.
    fn span_text(&self, from: usize, to: usize) -> String {
        let mut text = String::new();

        for (i, token) in self.tokens[from..to].iter().enumerate() {
            if i > 0 {
                text.push_str(token.trivia);
            }

            text.push_str(token.text);
        }

        text
    }

    /// Returns what `name` denotes in the innermost active scope declaring it.
    fn binding(&self, name: &str) -> Option<Binding> {
        let mut key = BindingKey {
            ident: name.to_string(),
            scope: ScopeId::ROOT,
        };

        for scope in self.stack.innermost_first() {
            key.scope = scope;

            if let Some(binding) = self.bindings.get(&key) {
                return Some(*binding);
            }
        }

        None
    }

    /// Returns `true` if `name` denotes a type here: a local typedef, or a
    /// known type not shadowed by a local variable.
    fn is_type_name(&self, name: &str) -> bool {
        match self.binding(name) {
            Some(Binding::Type) => true,
            Some(Binding::Var) => false,
            None => self.known.contains(name),
        }
    }

    fn scan_function(&mut self) {
        let Some(body) = self.find_body() else {
            self.warn(WarningKind::ParseAmbiguity, 0, "no function body found");
            self.suppress(0, self.tokens.len());
            return;
        };

        self.scan_header(body);

        self.cur = body + 1;
        self.scan_block(ScopeId::ROOT);

        if !self.at_eof() {
            let start = self.cur;

            self.warn(
                WarningKind::UnsupportedConstruct,
                start,
                "tokens after the end of the function body",
            );
            self.suppress(start, self.tokens.len());
            self.cur = self.tokens.len() - 1;
        }
    }

    /// Returns the index of the `{` opening the function body.
    fn find_body(&self) -> Option<usize> {
        let mut depth = 0usize;

        for (i, token) in self.tokens.iter().enumerate() {
            match token.kind {
                TokenKind::Punct(Punct::ParenOpen | Punct::BracketOpen) => depth += 1,
                TokenKind::Punct(Punct::ParenClose | Punct::BracketClose) => {
                    depth = depth.saturating_sub(1);
                }
                TokenKind::Punct(Punct::BraceOpen) if depth == 0 => return Some(i),
                _ => {}
            }
        }

        None
    }

    /// Declares the parameters found in the function header (tokens before
    /// `body`).
    fn scan_header(&mut self, body: usize) {
        // Parameter list is the last top-level group that follows a name, so
        // trailing `__attribute__((...))` groups are passed over.
        let mut depth = 0usize;
        let mut open = 0;
        let mut group = None;

        for i in 0..body {
            match self.tokens[i].kind {
                TokenKind::Punct(Punct::ParenOpen) => {
                    if depth == 0 {
                        open = i;
                    }

                    depth += 1;
                }
                TokenKind::Punct(Punct::ParenClose) => {
                    depth = depth.saturating_sub(1);

                    if depth == 0 && open > 0 && self.tokens[open - 1].is_ident() {
                        group = Some((open, i));
                    }
                }
                _ => {}
            }
        }

        let Some((open, close)) = group else {
            return;
        };

        if self.tokens[close + 1..body]
            .iter()
            .any(|t| t.is_punct(Punct::Semicolon))
        {
            self.warn(
                WarningKind::UnsupportedConstruct,
                close + 1,
                "K&R-style parameter declarations",
            );
            self.suppress(0, body);
            return;
        }

        let mut start = open + 1;
        let mut depth = 0usize;

        for i in open + 1..=close {
            let token = &self.tokens[i];

            if i == close || (depth == 0 && token.is_punct(Punct::Comma)) {
                self.scan_parameter(start, i);
                start = i + 1;
                continue;
            }

            match token.kind {
                TokenKind::Punct(p) if p.is_opener() => depth += 1,
                TokenKind::Punct(p) if p.is_closer() => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
    }

    /// Declares a single parameter spanning tokens `start..end`.
    fn scan_parameter(&mut self, start: usize, end: usize) {
        let tokens = &self.tokens[start..end];

        let has_function_declarator = tokens.iter().enumerate().any(|(i, t)| {
            t.is_punct(Punct::ParenOpen)
                && !(i > 0
                    && tokens[i - 1].kind == TokenKind::Keyword
                    && types::ATTRIBUTE_KEYWORDS.contains(&tokens[i - 1].text))
        });

        if has_function_declarator {
            self.warn(
                WarningKind::UnsupportedConstruct,
                start,
                "function declarator in parameter list",
            );
            self.suppress(start, end);
            return;
        }

        // Declared name is the last identifier outside of array brackets.
        let mut depth = 0usize;
        let mut name = None;

        for (i, token) in tokens.iter().enumerate() {
            match token.kind {
                TokenKind::Punct(Punct::BracketOpen) => depth += 1,
                TokenKind::Punct(Punct::BracketClose) => depth = depth.saturating_sub(1),
                TokenKind::Ident if depth == 0 => name = Some(start + i),
                _ => {}
            }
        }

        // Unnamed parameters, `void`, and `...` declare nothing.
        let Some(name) = name else {
            return;
        };

        // A lone identifier (macro argument, K&R name list) or a record tag
        // is not a parameter name.
        let has_base = self.tokens[start..name].iter().any(|t| {
            t.is_ident()
                || (t.kind == TokenKind::Keyword
                    && (types::is_primitive(t.text) || types::RECORD_KEYWORDS.contains(&t.text)))
        });
        let after_record = name > start
            && self.tokens[name - 1].kind == TokenKind::Keyword
            && types::RECORD_KEYWORDS.contains(&self.tokens[name - 1].text);

        if !has_base || after_record {
            return;
        }

        for i in start..name {
            if self.tokens[i].is_ident() {
                self.roles[i] = Role::TypeName;
            }
        }

        let pointer_depth = self.tokens[start..name]
            .iter()
            .filter(|t| t.is_punct(Punct::Asterisk))
            .count();
        let is_array = self.tokens[name + 1..end]
            .iter()
            .any(|t| t.is_punct(Punct::BracketOpen));
        let declarator_start = (start..name)
            .find(|i| self.tokens[*i].is_punct(Punct::Asterisk))
            .unwrap_or(name);

        let pending = PendingDecl {
            token: name,
            declarator: self.span_text(declarator_start, end),
            pointer_depth,
            is_array,
        };

        if let Err(skip) = self.commit(vec![pending], true, false) {
            self.warn(skip.kind, start, skip.message);
            self.suppress(start, end);
        }
    }

    /// Scans block items until the `}` closing `scope`, leaving the cursor
    /// past it.
    fn scan_block(&mut self, scope: ScopeId) {
        let open = self.cur.saturating_sub(1);

        loop {
            match self.peek(0).kind {
                TokenKind::Eof => {
                    if !self.reported_eof {
                        self.reported_eof = true;
                        self.warn(
                            WarningKind::ParseAmbiguity,
                            open,
                            "unbalanced braces: missing '}' before end of input",
                        );
                    }

                    break;
                }
                TokenKind::Punct(Punct::BraceClose) => {
                    self.bump();
                    break;
                }
                _ => self.scan_statement(),
            }
        }

        if scope != ScopeId::ROOT {
            self.tree.close_scope(scope, self.cur);
            self.stack.exit();
        }
    }

    /// Opens a scope for the `{` at the cursor and scans its contents.
    fn scan_compound(&mut self) {
        let scope = self.tree.push_scope(self.stack.current(), self.cur);
        self.stack.enter(scope);
        self.bump();
        self.scan_block(scope);
    }

    /// Scans one statement. Does nothing at `}` or end of input, otherwise
    /// consumes at least one token.
    fn scan_statement(&mut self) {
        let start = self.cur;
        let token = self.peek(0);

        match token.kind {
            TokenKind::Eof | TokenKind::Punct(Punct::BraceClose) => {}
            TokenKind::Punct(Punct::BraceOpen) => self.scan_compound(),
            TokenKind::Punct(Punct::Semicolon) => self.bump(),
            TokenKind::Keyword => match token.text {
                "if" | "while" | "switch" => {
                    self.bump();

                    if let Err(skip) = self.skip_condition() {
                        self.recover(start, skip);
                        return;
                    }

                    self.scan_statement();

                    if token.text == "if" && self.peek(0).is_keyword("else") {
                        self.bump();
                        self.scan_statement();
                    }
                }
                "else" => {
                    self.bump();
                    self.scan_statement();
                }
                "do" => {
                    self.bump();
                    self.scan_statement();

                    if self.peek(0).is_keyword("while") {
                        let tail = self.cur;
                        self.bump();

                        if let Err(skip) = self.skip_condition() {
                            self.recover(tail, skip);
                            return;
                        }

                        if self.at(Punct::Semicolon) {
                            self.bump();
                        }
                    }
                }
                "for" => self.scan_for(),
                "case" => {
                    self.bump();

                    if let Err(skip) = self.skip_expression(|p| p == Punct::Colon) {
                        self.recover(start, skip);
                        return;
                    }

                    if self.at(Punct::Colon) {
                        self.bump();
                    }

                    self.scan_statement();
                }
                "default" => {
                    self.bump();

                    if self.at(Punct::Colon) {
                        self.bump();
                    }

                    self.scan_statement();
                }
                "goto" => {
                    self.bump();

                    if self.peek(0).is_ident() {
                        self.roles[self.cur] = Role::Label;
                    }

                    self.scan_expression_statement(start);
                }
                "return" | "break" | "continue" => {
                    self.bump();
                    self.scan_expression_statement(start);
                }
                _ => self.scan_simple_statement(start),
            },
            TokenKind::Ident if self.peek(1).is_punct(Punct::Colon) => {
                self.roles[self.cur] = Role::Label;
                self.bump();
                self.bump();
                self.scan_statement();
            }
            _ => self.scan_simple_statement(start),
        }
    }

    /// Scans a declaration or expression statement.
    fn scan_simple_statement(&mut self, start: usize) {
        match self.statement_start() {
            StatementStart::Declaration => {
                if let Err(skip) = self.scan_declaration() {
                    self.recover_declaration(start, skip);
                }
            }
            StatementStart::Expression => self.scan_expression_statement(start),
            StatementStart::Ambiguous(skip) => self.recover_declaration(start, skip),
        }
    }

    fn scan_expression_statement(&mut self, start: usize) {
        match self.skip_expression(|p| p == Punct::Semicolon) {
            Ok(()) => {
                if self.at(Punct::Semicolon) {
                    self.bump();
                }
            }
            Err(skip) => self.recover(start, skip),
        }

        if self.cur == start {
            self.bump();
        }
    }

    /// Scans a `for` statement. A declaration in its header opens a scope
    /// spanning the header and the body.
    fn scan_for(&mut self) {
        let start = self.cur;
        self.bump();

        if !self.at(Punct::ParenOpen) {
            self.recover(start, Skip::ambiguity("expected '(' after 'for'"));
            return;
        }

        let paren = self.cur;
        self.cur += 1;
        let header = self.statement_start();
        self.cur = paren;

        let ambiguity = match header {
            StatementStart::Expression => {
                if let Err(skip) = self.skip_group() {
                    self.recover(start, skip);
                    return;
                }

                self.scan_statement();
                return;
            }
            StatementStart::Declaration => None,
            StatementStart::Ambiguous(skip) => Some(skip),
        };

        let scope = self.tree.push_scope(self.stack.current(), start);
        self.stack.enter(scope);
        self.bump();

        let init = self.cur;
        let parsed = match ambiguity {
            Some(skip) => Err(skip),
            None => self.scan_declaration(),
        };

        if let Err(skip) = parsed {
            self.warn(skip.kind, init, skip.message);
            self.cur = paren;

            if self.skip_group().is_err() {
                self.skip_to_boundary();
            }

            self.suppress(paren, self.cur);

            let init_end = self.clause_end(init, self.cur);
            self.hide_declarators(init, init_end);
        } else {
            let rest = self.cur;

            if let Err(skip) = self.skip_for_tail() {
                self.warn(skip.kind, rest, skip.message);
                self.skip_to_header_end();
                self.suppress(rest, self.cur);
            }
        }

        self.scan_statement();

        self.tree.close_scope(scope, self.cur);
        self.stack.exit();
    }

    /// Skips the condition and step of a `for` header, through the `)`.
    fn skip_for_tail(&mut self) -> Parse<()> {
        self.skip_expression(|p| p == Punct::Semicolon)?;

        if !self.at(Punct::Semicolon) {
            return Err(Skip::ambiguity("expected ';' in 'for' header"));
        }

        self.bump();
        self.skip_expression(|p| p == Punct::ParenClose)?;

        if !self.at(Punct::ParenClose) {
            return Err(Skip::ambiguity("expected ')' closing 'for' header"));
        }

        self.bump();
        Ok(())
    }

    /// Tolerantly skips to just past the `)` closing a `for` header, starting
    /// inside it.
    fn skip_to_header_end(&mut self) {
        let mut depth = 1usize;

        loop {
            match self.peek(0).kind {
                TokenKind::Eof | TokenKind::Punct(Punct::BraceClose) => return,
                TokenKind::Punct(Punct::ParenOpen) => depth += 1,
                TokenKind::Punct(Punct::ParenClose) => {
                    depth -= 1;

                    if depth == 0 {
                        self.bump();
                        return;
                    }
                }
                _ => {}
            }

            self.bump();
        }
    }

    /// Classifies the statement at the cursor.
    fn statement_start(&self) -> StatementStart {
        let first = self.peek(0);

        match first.kind {
            TokenKind::Keyword if types::starts_declaration(first.text) => {
                StatementStart::Declaration
            }
            TokenKind::Ident => {
                match self.binding(first.text) {
                    Some(Binding::Var) => return StatementStart::Expression,
                    Some(Binding::Type) => return self.after_type_name(first.text),
                    None if self.known.contains(first.text) => {
                        return self.after_type_name(first.text);
                    }
                    None => {}
                }

                let next = self.peek(1);

                // Two adjacent identifiers can only be a declaration with a
                // type name nobody told us about.
                if next.is_ident() {
                    return StatementStart::Declaration;
                }

                if next.is_punct(Punct::Asterisk) {
                    let mut i = 1;

                    while self.peek(i).is_punct(Punct::Asterisk) {
                        i += 1;
                    }

                    if self.peek(i).is_ident()
                        && matches!(
                            self.peek(i + 1).kind,
                            TokenKind::Punct(
                                Punct::Semicolon
                                    | Punct::Assign
                                    | Punct::Comma
                                    | Punct::BracketOpen
                            )
                        )
                    {
                        return StatementStart::Ambiguous(Skip::ambiguity(format!(
                            "'{}' is not a known type: declaration or multiplication",
                            first.text
                        )));
                    }
                }

                StatementStart::Expression
            }
            _ => StatementStart::Expression,
        }
    }

    fn after_type_name(&self, name: &str) -> StatementStart {
        if self.peek(1).is_punct(Punct::ParenOpen) {
            StatementStart::Ambiguous(Skip::ambiguity(format!(
                "type name '{name}' followed by '(': function-style declarator or call"
            )))
        } else {
            StatementStart::Declaration
        }
    }

    /// Scans a declaration through its terminating `;`, committing its
    /// declarators only once the whole statement parsed.
    fn scan_declaration(&mut self) -> Parse<()> {
        let mut is_typedef = false;
        let mut has_base = false;
        // Any specifier keyword seen, so a following unknown name can only
        // be a type.
        let mut has_specifier = false;

        loop {
            let token = self.peek(0);

            match token.kind {
                TokenKind::Keyword => match token.text {
                    "typedef" => {
                        is_typedef = true;
                        has_specifier = true;
                        self.bump();
                    }
                    kw if types::is_primitive(kw) => {
                        has_base = true;
                        self.bump();
                    }
                    kw if types::RECORD_KEYWORDS.contains(&kw) => {
                        has_base = true;
                        self.scan_record_specifier()?;
                    }
                    kw if types::TYPEOF_KEYWORDS.contains(&kw)
                        || (kw == "_Atomic" && self.peek(1).is_punct(Punct::ParenOpen)) =>
                    {
                        has_base = true;
                        self.bump();

                        if self.at(Punct::ParenOpen) {
                            self.skip_group()?;
                        }
                    }
                    kw if types::ATTRIBUTE_KEYWORDS.contains(&kw) => {
                        has_specifier = true;
                        self.skip_attribute()?;
                    }
                    kw if types::is_qualifier(kw)
                        || types::STORAGE_CLASSES.contains(&kw)
                        || kw == "__extension__" =>
                    {
                        has_specifier = true;
                        self.bump();
                    }
                    _ => break,
                },
                TokenKind::Ident
                    if !has_base
                        && (self.is_type_name(token.text)
                            || (self.peek(1).is_ident() && self.binding(token.text).is_none())
                            || (has_specifier
                                && self.binding(token.text) != Some(Binding::Var))) =>
                {
                    self.roles[self.cur] = Role::TypeName;
                    has_base = true;
                    self.bump();
                }
                _ => break,
            }
        }

        if !has_base {
            return Err(Skip::ambiguity("declaration without a type specifier"));
        }

        // Tag-only declaration, e.g. `struct node { ... };`.
        if self.at(Punct::Semicolon) {
            self.bump();
            return Ok(());
        }

        let mut pending = Vec::new();

        loop {
            pending.push(self.scan_declarator()?);

            if self.at(Punct::Assign) {
                self.bump();
                self.skip_initializer()?;
            }

            match self.peek(0).kind {
                TokenKind::Punct(Punct::Comma) => self.bump(),
                TokenKind::Punct(Punct::Semicolon) => break,
                TokenKind::Eof => {
                    return Err(Skip::ambiguity("unexpected end of input in declaration"));
                }
                _ => {
                    return Err(Skip::ambiguity(format!(
                        "unexpected '{}' in declaration",
                        self.peek(0).text
                    )));
                }
            }
        }

        // Commit before consuming the `;` so a rejected statement recovers
        // in place.
        self.commit(pending, false, is_typedef)?;
        self.bump();

        Ok(())
    }

    /// Scans one declarator: pointer markers, name, and array suffixes.
    fn scan_declarator(&mut self) -> Parse<PendingDecl> {
        let start = self.cur;
        let mut pointer_depth = 0;

        loop {
            let token = self.peek(0);

            if token.is_punct(Punct::Asterisk) {
                pointer_depth += 1;
                self.bump();
            } else if token.kind == TokenKind::Keyword && types::is_qualifier(token.text) {
                self.bump();
            } else if Self::is_attribute(token) {
                self.skip_attribute()?;
            } else {
                break;
            }
        }

        if self.at(Punct::ParenOpen) {
            return Err(Skip::unsupported(
                "parenthesized declarator (function or array pointer)",
            ));
        }

        let token = self.peek(0);

        if !token.is_ident() {
            return Err(Skip::ambiguity("expected an identifier in declarator"));
        }

        let name = self.cur;
        self.bump();

        if self.at(Punct::ParenOpen) {
            return Err(Skip::ambiguity(format!(
                "'{}' followed by '(': function declarator or call",
                token.text
            )));
        }

        if self.at(Punct::Colon) {
            return Err(Skip::unsupported("bit-field declarator"));
        }

        let mut is_array = false;

        while self.at(Punct::BracketOpen) {
            is_array = true;
            self.skip_group()?;
        }

        let end = self.cur;

        while Self::is_attribute(self.peek(0)) {
            self.skip_attribute()?;
        }

        Ok(PendingDecl {
            token: name,
            declarator: self.span_text(start, end),
            pointer_depth,
            is_array,
        })
    }

    /// Scans `struct`/`union`/`enum`, an optional tag, and an optional body.
    /// Names inside the body are members, never locals.
    fn scan_record_specifier(&mut self) -> Parse<()> {
        self.bump();

        while Self::is_attribute(self.peek(0)) {
            self.skip_attribute()?;
        }

        if self.peek(0).is_ident() {
            self.roles[self.cur] = Role::TypeName;
            self.bump();
        }

        if self.at(Punct::BraceOpen) {
            let open = self.cur;
            self.skip_group()?;
            self.mark_idents(open, self.cur, Role::Field);
        }

        Ok(())
    }

    #[inline]
    fn is_attribute(token: &Token<'_>) -> bool {
        token.kind == TokenKind::Keyword
            && (types::ATTRIBUTE_KEYWORDS.contains(&token.text)
                || matches!(token.text, "asm" | "__asm__"))
    }

    /// Skips an attribute keyword and its parenthesized argument.
    fn skip_attribute(&mut self) -> Parse<()> {
        self.bump();

        if self.at(Punct::ParenOpen) {
            let open = self.cur;
            self.skip_group()?;
            self.mark_idents(open, self.cur, Role::Field);
        }

        Ok(())
    }

    fn mark_idents(&mut self, from: usize, to: usize, role: Role) {
        for i in from..to {
            if self.tokens[i].is_ident() {
                self.roles[i] = role;
            }
        }
    }

    /// Records the declarators of a completed statement in the current scope.
    fn commit(
        &mut self,
        pending: Vec<PendingDecl>,
        is_param: bool,
        is_typedef: bool,
    ) -> Parse<()> {
        let scope = self.stack.current();

        for (i, decl) in pending.iter().enumerate() {
            let name = self.tokens[decl.token].text;
            let key = BindingKey {
                ident: name.to_string(),
                scope,
            };

            if self.bindings.contains_key(&key)
                || pending[..i]
                    .iter()
                    .any(|other| self.tokens[other.token].text == name)
            {
                return Err(Skip {
                    kind: WarningKind::Redeclaration,
                    message: format!("redeclaration of '{name}' in the same scope"),
                });
            }
        }

        for decl in pending {
            let token = &self.tokens[decl.token];
            let key = BindingKey {
                ident: token.text.to_string(),
                scope,
            };

            if is_typedef {
                self.roles[decl.token] = Role::TypeName;
                self.bindings.insert(key, Binding::Type);
                continue;
            }

            let eligible = (decl.pointer_depth > 0 || (self.options.arrays && decl.is_array))
                && (!is_param || self.options.parameters);

            let canonical = if eligible {
                let (index, next) = self.numbering.advance();
                self.numbering = next;
                Some(format!("{}{index}", self.options.prefix))
            } else {
                None
            };

            tracing::debug!(
                name = token.text,
                canonical = canonical.as_deref().unwrap_or("-"),
                scope = %scope,
                "declared local"
            );

            let id = self.tree.declare(Declaration {
                name: token.text.to_string(),
                declarator: decl.declarator,
                scope,
                token: decl.token,
                offset: token.loc.offset,
                pointer_depth: decl.pointer_depth,
                is_array: decl.is_array,
                is_param,
                canonical,
            });

            self.roles[decl.token] = Role::Decl(id);
            self.bindings.insert(key, Binding::Var);
        }

        Ok(())
    }

    /// Skips the parenthesized condition of `if`/`while`/`switch`.
    fn skip_condition(&mut self) -> Parse<()> {
        if self.at(Punct::ParenOpen) {
            self.skip_group()
        } else {
            Err(Skip::ambiguity("expected '(' after keyword"))
        }
    }

    /// Skips a balanced group starting at the opener under the cursor.
    fn skip_group(&mut self) -> Parse<()> {
        let mut nest: Vec<Punct> = Vec::new();

        loop {
            let token = self.peek(0);

            match token.kind {
                TokenKind::Eof => {
                    return Err(Skip::ambiguity(
                        "unbalanced nesting: missing closing delimiter",
                    ));
                }
                TokenKind::Punct(Punct::ParenOpen) if self.peek(1).is_punct(Punct::BraceOpen) => {
                    return Err(Skip::unsupported("statement expression"));
                }
                TokenKind::Punct(p) if p.is_opener() => nest.extend(p.closer()),
                TokenKind::Punct(p) if p.is_closer() => {
                    if nest.last() != Some(&p) {
                        return Err(Skip::ambiguity(format!(
                            "unbalanced nesting: unexpected '{}'",
                            p.as_str()
                        )));
                    }

                    nest.pop();
                    self.bump();

                    if nest.is_empty() {
                        return Ok(());
                    }

                    continue;
                }
                _ => {}
            }

            self.bump();
        }
    }

    /// Skips expression tokens up to a `stop` punctuator at nesting depth
    /// zero, a `}` ending the statement, or a `{` opening a block (as after
    /// a loop macro).
    fn skip_expression(&mut self, stop: impl Fn(Punct) -> bool) -> Parse<()> {
        loop {
            let token = self.peek(0);

            match token.kind {
                TokenKind::Eof => return Err(Skip::ambiguity("unexpected end of input")),
                TokenKind::Punct(p) if stop(p) => return Ok(()),
                TokenKind::Punct(Punct::BraceClose) => return Ok(()),
                TokenKind::Punct(Punct::BraceOpen) => {
                    if self.is_initializer_brace(self.cur) {
                        self.skip_group()?;
                    } else {
                        return Ok(());
                    }
                }
                TokenKind::Punct(p) if p.is_opener() => self.skip_group()?,
                TokenKind::Punct(p) if p.is_closer() => {
                    self.bump();
                    return Err(Skip::ambiguity(format!(
                        "unbalanced nesting: unexpected '{}'",
                        p.as_str()
                    )));
                }
                _ => self.bump(),
            }
        }
    }

    /// Skips an initializer up to the `,` or `;` ending its declarator.
    fn skip_initializer(&mut self) -> Parse<()> {
        loop {
            let token = self.peek(0);

            match token.kind {
                TokenKind::Eof => {
                    return Err(Skip::ambiguity("unexpected end of input in initializer"));
                }
                TokenKind::Punct(Punct::Comma | Punct::Semicolon) => return Ok(()),
                TokenKind::Punct(p) if p.is_opener() => self.skip_group()?,
                TokenKind::Punct(p) if p.is_closer() => {
                    return Err(Skip::ambiguity(format!(
                        "unbalanced '{}' in initializer",
                        p.as_str()
                    )));
                }
                _ => self.bump(),
            }
        }
    }

    /// Returns `true` if the `{` at `idx` opens an initializer list or a
    /// compound literal rather than a block.
    fn is_initializer_brace(&self, idx: usize) -> bool {
        let Some(prev) = idx.checked_sub(1).map(|i| &self.tokens[i]) else {
            return false;
        };

        if prev.is_punct(Punct::Assign) {
            return true;
        }

        if !prev.is_punct(Punct::ParenClose) {
            return false;
        }

        // Find the matching `(` and check it is a cast: not preceded by a
        // name (call or macro) and enclosing a type.
        let mut depth = 0usize;
        let mut i = idx - 1;

        loop {
            match self.tokens[i].kind {
                TokenKind::Punct(Punct::ParenClose) => depth += 1,
                TokenKind::Punct(Punct::ParenOpen) => {
                    depth -= 1;

                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }

            if i == 0 {
                return false;
            }

            i -= 1;
        }

        let called = i > 0
            && matches!(
                self.tokens[i - 1].kind,
                TokenKind::Ident
                    | TokenKind::Keyword
                    | TokenKind::Punct(Punct::ParenClose | Punct::BracketClose)
            );
        let inner = self.token(i + 1);
        let is_type = match inner.kind {
            TokenKind::Keyword => types::starts_declaration(inner.text),
            TokenKind::Ident => self.is_type_name(inner.text),
            _ => false,
        };

        !called && is_type
    }

    /// Records `skip`, then skips to the end of the statement begun at
    /// `start` and suppresses everything in it.
    fn recover(&mut self, start: usize, skip: Skip) {
        self.warn(skip.kind, start, skip.message);
        self.skip_to_boundary();

        if self.cur == start {
            self.bump();
        }

        self.suppress(start, self.cur);
    }

    /// Like [`Scanner::recover`] for a statement that looked like a
    /// declaration: its would-be declarator names still hide outer
    /// declarations for the rest of the scope.
    fn recover_declaration(&mut self, start: usize, skip: Skip) {
        self.recover(start, skip);
        self.hide_declarators(start, self.cur);
    }

    /// Marks each identifier in `from..to` that sits where a declarator name
    /// would (followed by `;`, `,`, `=`, `[`, `)` or `:`, outside brackets
    /// and initializers) as [`Role::Opaque`], and binds it in the current
    /// scope. Names already declared in this scope keep their binding.
    fn hide_declarators(&mut self, from: usize, to: usize) {
        let scope = self.stack.current();
        let mut parens = 0usize;
        let mut brackets = 0usize;
        let mut in_initializer = false;

        for i in from..to.min(self.tokens.len()) {
            let token = &self.tokens[i];

            match token.kind {
                TokenKind::Punct(Punct::ParenOpen) => parens += 1,
                TokenKind::Punct(Punct::ParenClose) => parens = parens.saturating_sub(1),
                TokenKind::Punct(Punct::BracketOpen | Punct::BraceOpen) => brackets += 1,
                TokenKind::Punct(Punct::BracketClose | Punct::BraceClose) => {
                    brackets = brackets.saturating_sub(1);
                }
                TokenKind::Punct(Punct::Assign) if brackets == 0 && parens == 0 => {
                    in_initializer = true;
                }
                TokenKind::Punct(Punct::Comma) if brackets == 0 && parens == 0 => {
                    in_initializer = false;
                }
                TokenKind::Ident if i > from && brackets == 0 && !in_initializer => {
                    let ends_declarator = matches!(
                        self.token(i + 1).kind,
                        TokenKind::Punct(
                            Punct::Semicolon
                                | Punct::Comma
                                | Punct::Assign
                                | Punct::BracketOpen
                                | Punct::ParenClose
                                | Punct::Colon
                        )
                    );
                    let key = BindingKey {
                        ident: token.text.to_string(),
                        scope,
                    };

                    if ends_declarator && !self.bindings.contains_key(&key) {
                        tracing::debug!(
                            name = token.text,
                            scope = %scope,
                            "hid unclassified local"
                        );

                        self.roles[i] = Role::Opaque;
                        self.bindings.insert(key, Binding::Var);
                    }
                }
                _ => {}
            }
        }
    }

    /// Returns the index of the first `;` outside nesting in `from..to`, or
    /// `to` if there is none.
    fn clause_end(&self, from: usize, to: usize) -> usize {
        let mut depth = 0usize;

        for i in from..to.min(self.tokens.len()) {
            match self.tokens[i].kind {
                TokenKind::Punct(Punct::Semicolon) if depth == 0 => return i,
                TokenKind::Punct(p) if p.is_opener() => depth += 1,
                TokenKind::Punct(p) if p.is_closer() => depth = depth.saturating_sub(1),
                _ => {}
            }
        }

        to
    }

    /// Skips to just past a `;` at depth zero, or up to a `{`/`}` ending the
    /// statement. Never fails.
    fn skip_to_boundary(&mut self) {
        let mut nest: Vec<Punct> = Vec::new();

        loop {
            let token = self.peek(0);

            match token.kind {
                TokenKind::Eof => return,
                TokenKind::Punct(Punct::Semicolon) if nest.is_empty() => {
                    self.bump();
                    return;
                }
                TokenKind::Punct(Punct::BraceOpen)
                    if nest.is_empty() && !self.is_initializer_brace(self.cur) =>
                {
                    return;
                }
                TokenKind::Punct(Punct::BraceClose) if nest.is_empty() => return,
                TokenKind::Punct(p) if p.is_opener() => nest.extend(p.closer()),
                TokenKind::Punct(p) if p.is_closer() => {
                    if let Some(pos) = nest.iter().rposition(|c| *c == p) {
                        nest.truncate(pos);
                    } else if p == Punct::BraceClose {
                        return;
                    }
                }
                _ => {}
            }

            self.bump();
        }
    }
}
