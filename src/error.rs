//! Error types, renaming warnings, and macros for reporting diagnostics.

use std::fmt;
use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Reasons the lexer can refuse a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LexErrorKind {
    /// `"` without a closing quote on the same logical line.
    UnterminatedString,
    /// `'` without a closing quote on the same logical line.
    UnterminatedChar,
    /// `/*` without a matching `*/`.
    UnterminatedComment,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexErrorKind::UnterminatedString => write!(f, "missing terminating '\"' character"),
            LexErrorKind::UnterminatedChar => write!(f, "missing terminating ' character"),
            LexErrorKind::UnterminatedComment => write!(f, "unterminated comment"),
        }
    }
}

/// Fatal lexical error. No output can be produced for the function since its
/// text cannot be reassembled safely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[error("{kind} at {line}:{col} (byte {offset})")]
pub struct LexError {
    pub kind: LexErrorKind,
    /// Byte offset where the offending literal or comment starts.
    pub offset: usize,
    pub line: usize,
    pub col: usize,
}

/// Categories of non-fatal conditions recorded while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Statement could not be classified as declaration or expression, or its
    /// nesting is unbalanced.
    ParseAmbiguity,
    /// Declarator shape outside the modeled grammar (function pointers, K&R
    /// parameters, bit-fields, statement expressions).
    UnsupportedConstruct,
    /// Same spelling declared twice in one scope.
    Redeclaration,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::ParseAmbiguity => write!(f, "parse ambiguity"),
            WarningKind::UnsupportedConstruct => write!(f, "unsupported construct"),
            WarningKind::Redeclaration => write!(f, "redeclaration"),
        }
    }
}

/// A statement the scanner left untouched, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    /// Byte offset of the first token of the affected statement.
    pub offset: usize,
    pub line: usize,
    pub col: usize,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}: {}", self.line, self.col, self.kind, self.message)
    }
}

/// Errors surfaced by the command-line driver.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("{}: {source}", path.display())]
    Lex { path: PathBuf, source: LexError },
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Report a generic error message, printing to `stderr`.
#[macro_export]
macro_rules! report_err {
    ($program:expr, $($arg:tt)+) => {{
        eprintln!("\x1b[1;1m{}\x1b[0m: \x1b[1;31merror:\x1b[0m {}", $program, format!($($arg)+));
    }};
}

/// Format an error located at a token (with line content and a marker under
/// the token) into a `String`.
#[macro_export]
macro_rules! fmt_token_err {
    ($file:expr, $line:expr, $col:expr, $marker_len:expr, $line_content:expr, $($arg:tt)+) => {{
        format!(
            "\x1b[1;1m{}:{line}:{col}:\x1b[0m \x1b[1;31merror:\x1b[0m {}\n{:>5} | {:<10}\n{:>5} | \x1b[1;31m{:>col$}{}\x1b[0m",
            $file,
            format!($($arg)+),
            $line,
            $line_content,
            "",
            "^",
            "~".repeat($marker_len),
            line = $line,
            col = $col
        )
    }};
}

/// Format a warning located at a token into a `String`. Same layout as
/// [`fmt_token_err`].
#[macro_export]
macro_rules! fmt_token_warn {
    ($file:expr, $line:expr, $col:expr, $marker_len:expr, $line_content:expr, $($arg:tt)+) => {{
        format!(
            "\x1b[1;1m{}:{line}:{col}:\x1b[0m \x1b[1;35mwarning:\x1b[0m {}\n{:>5} | {:<10}\n{:>5} | \x1b[1;35m{:>col$}{}\x1b[0m",
            $file,
            format!($($arg)+),
            $line,
            $line_content,
            "",
            "^",
            "~".repeat($marker_len),
            line = $line,
            col = $col
        )
    }};
}
