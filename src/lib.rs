//! Scope-aware renaming of pointer-typed locals in _C_ functions.
//!
//! Every local whose declarator carries a pointer marker is renamed to a
//! canonical `buffer1`, `buffer2`, ... name in order of first declaration,
//! together with every reference that resolves to it. All other bytes
//! (comments, whitespace, directives, unrelated identifiers) are reproduced
//! exactly.

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::use_self)]
#![allow(clippy::redundant_else)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::module_name_repetitions)]
#![warn(rust_2018_idioms)]
#![warn(missing_debug_implementations)]

pub mod args;
pub mod driver;
pub mod error;
pub mod renamer;

pub use renamer::{
    KnownTypes, MappingEntry, RenameOptions, Renamed, ScopeId, rename, rename_with,
};

pub type Result<T> = std::result::Result<T, error::Error>;
