//! Module for parsing command-line arguments passed to the renamer.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::renamer::{KnownTypes, RenameOptions};

/// Pipeline phase to terminate at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Stage {
    /// Print the token listing.
    Lex,
    /// Print the scope tree and warnings.
    Scan,
    /// Produce the renamed source.
    #[default]
    Rename,
}

/// Renamer command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "rename-buffers")]
#[command(version)]
#[command(about = "Rename pointer locals of C functions to canonical buffer names")]
pub struct Args {
    /// C source files, each holding one function definition.
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Overwrite each input file instead of printing to stdout.
    #[arg(short, long, conflicts_with = "json")]
    pub in_place: bool,

    /// Identifier known to name a type (repeatable).
    #[arg(short = 't', long = "type", value_name = "NAME")]
    pub types: Vec<String>,

    /// File listing known type names, one per line (`#` starts a comment).
    #[arg(long, value_name = "PATH")]
    pub types_file: Option<PathBuf>,

    /// Do not preload standard library typedefs (`size_t`, `FILE`, ...).
    #[arg(long)]
    pub no_std_types: bool,

    /// Also rename array locals.
    #[arg(long)]
    pub arrays: bool,

    /// Also rename pointer (and, with `--arrays`, array) parameters.
    #[arg(long)]
    pub params: bool,

    /// Stem of canonical names.
    #[arg(long, default_value = "buffer", value_parser = parse_prefix)]
    pub prefix: String,

    /// Index of the first canonical name.
    #[arg(long, default_value_t = 1)]
    pub start: usize,

    /// Continue numbering across files in argument order.
    #[arg(long)]
    pub shared_counter: bool,

    /// Phase to stop after.
    #[arg(short, long, value_enum, default_value_t = Stage::Rename)]
    pub stage: Stage,

    /// Emit a JSON report per file instead of the renamed source.
    #[arg(long)]
    pub json: bool,

    /// Log engine decisions to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Returns the renaming options selected by the flags.
    #[must_use]
    pub fn options(&self) -> RenameOptions {
        RenameOptions {
            prefix: self.prefix.clone(),
            first_index: self.start,
            arrays: self.arrays,
            parameters: self.params,
        }
    }

    /// Returns the known types selected by the flags, not including any
    /// `--types-file` (read by the driver).
    #[must_use]
    pub fn known_types(&self) -> KnownTypes {
        let mut known = if self.no_std_types {
            KnownTypes::new()
        } else {
            KnownTypes::standard()
        };

        known.extend(self.types.iter().cloned());
        known
    }
}

/// Accepts a prefix only if it forms a valid _C_ identifier.
fn parse_prefix(s: &str) -> Result<String, String> {
    let mut chars = s.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return Err(format!("'{s}' does not start a C identifier")),
    }

    if chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(s.to_string())
    } else {
        Err(format!("'{s}' is not a C identifier"))
    }
}
