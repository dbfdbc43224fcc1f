//! Driver that runs the renaming pipeline over each input file and reports
//! diagnostics in compiler style.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::Result;
use crate::args::{Args, Stage};
use crate::error::{Error, Warning};
use crate::renamer::{
    self, KnownTypes, Lexer, MappingEntry, Numbering, RenameOptions, scan, tokenize,
};
use crate::{fmt_token_err, fmt_token_warn};

/// Outcome of a driver run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Files processed to completion.
    pub processed: usize,
    /// Files rejected by the lexer.
    pub failed: usize,
}

/// Per-file report emitted with `--json`.
#[derive(Debug, Serialize)]
struct FileReport<'a> {
    file: &'a Path,
    mapping: &'a [MappingEntry],
    warnings: &'a [Warning],
    output: &'a str,
}

/// Runs the pipeline over every input file, writing results to `stdout`.
///
/// # Errors
///
/// Returns an error if an input, output, or types file cannot be read or
/// written, or a report cannot be serialized.
pub fn run(args: &Args) -> Result<Summary> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    run_to(args, &mut out)
}

/// Runs the pipeline over every input file, writing results to `out`.
/// Lexical errors are reported to `stderr` and counted; the remaining files
/// are still processed.
///
/// # Errors
///
/// Returns an error if an input, output, or types file cannot be read or
/// written, or a report cannot be serialized.
pub fn run_to(args: &Args, out: &mut impl Write) -> Result<Summary> {
    let known = load_known_types(args)?;
    let mut options = args.options();
    let mut summary = Summary::default();

    tracing::debug!(types = known.len(), files = args.files.len(), "starting run");

    for path in &args.files {
        let src = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.clone(),
            source,
        })?;

        match process_file(args, path, &src, &known, &options, out) {
            Ok(next_index) => {
                summary.processed += 1;

                if args.shared_counter {
                    options.first_index = next_index;
                }
            }
            Err(Error::Lex { path, source }) => {
                summary.failed += 1;

                eprintln!(
                    "{}",
                    fmt_token_err!(
                        path.display(),
                        source.line,
                        source.col,
                        0,
                        line_content(&src, source.line),
                        "{}",
                        source.kind
                    )
                );
            }
            Err(err) => return Err(err),
        }
    }

    Ok(summary)
}

/// Runs the selected stage on one file, returning the counter following the
/// last canonical name assigned.
fn process_file(
    args: &Args,
    path: &Path,
    src: &str,
    known: &KnownTypes,
    options: &RenameOptions,
    out: &mut impl Write,
) -> Result<usize> {
    let lex_err = |source| Error::Lex {
        path: path.to_path_buf(),
        source,
    };

    tracing::info!(file = %path.display(), stage = ?args.stage, "processing");

    match args.stage {
        Stage::Lex => {
            tokenize(src).map_err(lex_err)?;
            write!(out, "{}", Lexer::new(src))?;

            Ok(options.first_index)
        }
        Stage::Scan => {
            let tokens = tokenize(src).map_err(lex_err)?;
            let scan = scan(
                &tokens,
                known,
                options,
                Numbering::starting_at(options.first_index),
            );
            report_warnings(path, src, &scan.warnings);
            write!(out, "{}", scan.tree)?;

            Ok(scan.numbering.peek())
        }
        Stage::Rename => {
            let renamed = renamer::rename_with(src, known, options).map_err(lex_err)?;

            report_warnings(path, src, &renamed.warnings);

            for entry in &renamed.mapping {
                tracing::debug!(
                    original = %entry.original,
                    canonical = %entry.canonical,
                    scope = %entry.scope,
                    "renamed"
                );
            }

            if args.json {
                let report = FileReport {
                    file: path,
                    mapping: &renamed.mapping,
                    warnings: &renamed.warnings,
                    output: &renamed.output,
                };

                serde_json::to_writer_pretty(&mut *out, &report)?;
                writeln!(out)?;
            } else if args.in_place {
                fs::write(path, &renamed.output).map_err(|source| Error::Write {
                    path: path.to_path_buf(),
                    source,
                })?;
            } else {
                out.write_all(renamed.output.as_bytes())?;
            }

            Ok(renamed.next_index)
        }
    }
}

/// Returns the known types selected on the command line, including those
/// listed in `--types-file`.
fn load_known_types(args: &Args) -> Result<KnownTypes> {
    let mut known = args.known_types();

    if let Some(path) = &args.types_file {
        let text = fs::read_to_string(path).map_err(|source| Error::Read {
            path: PathBuf::from(path),
            source,
        })?;

        known.extend(KnownTypes::parse_list(&text).iter());
    }

    Ok(known)
}

fn report_warnings(path: &Path, src: &str, warnings: &[Warning]) {
    for warning in warnings {
        let word = src
            .get(warning.offset..)
            .and_then(|rest| rest.split(|c: char| c.is_whitespace()).next())
            .map_or(1, str::len);

        eprintln!(
            "{}",
            fmt_token_warn!(
                path.display(),
                warning.line,
                warning.col,
                word.saturating_sub(1),
                line_content(src, warning.line),
                "{}: {}",
                warning.kind,
                warning.message
            )
        );
    }
}

/// Returns the text of 1-based `line`, or an empty string past the end.
fn line_content(src: &str, line: usize) -> &str {
    src.lines()
        .nth(line.saturating_sub(1))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_content_is_one_based() {
        let src = "a\nbb\nccc";

        assert_eq!(line_content(src, 1), "a");
        assert_eq!(line_content(src, 3), "ccc");
        assert_eq!(line_content(src, 9), "");
    }
}
