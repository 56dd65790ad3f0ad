//! Command-line front end for the n3reason engine (spec.md §6.3).
//!
//! Grounded on `Brahmastra-Labs/logicaffeine`'s `clap`-derive `cli` binary
//! (`apps/logicaffeine_cli/src/cli.rs`): a top-level `Parser` struct holding
//! every flag plus a positional input path, dispatched from a thin `main.rs`
//! that converts the library's typed errors into a process exit code.
//! Unlike `largo`, `n3reason` has no subcommands — every flag from spec.md
//! §6.3 toggles a single run, so this is a flat `Args` struct rather than a
//! `Subcommand` enum.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use n3_model::DerivedFact;
use n3_parse::ParseError;
use n3_reason::{reason_stream, EngineConfig, ReasonError, ReasonOptions};

use crate::ast::document_to_json;
use crate::output::{order_output_strings, render_derivation, render_stream_header};

/// `n3reason` — an N3 rule-language reasoner: saturates a document's
/// forward-chaining closure and prints the derived triples back out in N3.
#[derive(Parser, Debug)]
#[command(name = "n3reason")]
#[command(about = "An N3 / Turtle-superset rule-language reasoner", long_about = None)]
#[command(version)]
pub struct Args {
    /// N3 source file to reason over. Reads from stdin when omitted.
    pub input: Option<PathBuf>,

    /// Print the parse result as a JSON structure and exit, without
    /// reasoning over it.
    #[arg(short = 'a', long = "ast")]
    pub ast: bool,

    /// Skip the per-run Skolem salt: Skolem IDs depend only on the subject
    /// term, stable across runs.
    #[arg(short = 'd', long = "deterministic-skolem")]
    pub deterministic_skolem: bool,

    /// Rewrite `http://` dereference targets to `https://` before fetching.
    #[arg(short = 'e', long = "enforce-https")]
    pub enforce_https: bool,

    /// Emit a human-readable explanation block before each derived triple.
    #[arg(short = 'p', long = "proof-comments")]
    pub proof_comments: bool,

    /// After saturation, print the ordered concatenation of
    /// `log:outputString` objects instead of N3 output.
    #[arg(short = 'r', long = "strings")]
    pub strings: bool,

    /// Disable every builtin except `log:implies`/`log:impliedBy`.
    #[arg(short = 's', long = "super-restricted")]
    pub super_restricted: bool,

    /// Print a compact, input-only prefix header first, then stream derived
    /// triples as they are produced instead of collecting them all first.
    #[arg(short = 't', long = "stream")]
    pub stream: bool,
}

/// Process exit codes (spec.md §6.3): 0 success, 1 usage/I/O/syntax error,
/// 2 inference fuse triggered.
pub enum ExitCode {
    /// Ran to completion.
    Success = 0,
    /// Usage, I/O, or syntax error.
    UsageOrIoError = 1,
    /// A `=> false` rule fired (spec.md §4.5 "Inference fuse").
    Fuse = 2,
}

/// Parse arguments, run the reasoner, print its output, and report the exit
/// code the process should use.
pub fn run() -> Result<ExitCode> {
    let args = Args::parse();
    let source = read_input(args.input.as_deref())?;
    let base_iri = args.input.as_deref().and_then(path_to_base_iri);

    let interner = n3_model::Interner::new();
    let doc = match n3_parse::parse(&source, &interner) {
        Ok(doc) => doc,
        Err(err) => {
            report_parse_error(&source, &err);
            return Ok(ExitCode::UsageOrIoError);
        }
    };

    if args.ast {
        let json = document_to_json(&doc);
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(ExitCode::Success);
    }

    let config = EngineConfig {
        deterministic_skolem: args.deterministic_skolem,
        enforce_https: args.enforce_https,
        super_restricted: args.super_restricted,
        proof_comments: args.proof_comments,
        ..EngineConfig::default()
    };

    let mut stdout = io::stdout();
    if args.stream {
        write!(stdout, "{}", render_stream_header(&doc.prefixes))?;
        stdout.flush()?;
    }

    let prefixes = doc.prefixes.clone();
    let proof_comments = args.proof_comments;
    let stream = args.stream;
    let mut print_err: Option<io::Error> = None;
    let mut on_derived = |df: &DerivedFact| {
        if stream && print_err.is_none() {
            if let Err(e) = writeln!(stdout, "{}", render_derivation(df, &prefixes, proof_comments)) {
                print_err = Some(e);
            }
        }
    };
    let options = ReasonOptions {
        on_derived: Some(&mut on_derived),
        include_input_facts_in_closure: false,
    };

    match reason_stream(&source, base_iri.as_deref(), &config, options) {
        Ok(output) => {
            if let Some(e) = print_err {
                return Err(e).context("writing to stdout");
            }
            if args.strings {
                print!("{}", order_output_strings(&output.output_strings));
            } else if !args.stream {
                for df in &output.derived {
                    println!("{}", render_derivation(df, &output.prefixes, args.proof_comments));
                }
            }
            Ok(ExitCode::Success)
        }
        Err(ReasonError::Fuse { premise }) => {
            eprintln!("n3reason: inference fuse: {premise}");
            Ok(ExitCode::Fuse)
        }
        Err(ReasonError::Parse(err)) => {
            report_parse_error(&source, &err);
            Ok(ExitCode::UsageOrIoError)
        }
        Err(ReasonError::ResourceLimit(message)) => {
            eprintln!("n3reason: {message}");
            Ok(ExitCode::UsageOrIoError)
        }
    }
}

fn report_parse_error(source: &str, err: &ParseError) {
    match err.offset() {
        Some(offset) => {
            let (line, col) = ParseError::line_col(source, offset);
            eprintln!("n3reason: syntax error at {line}:{col}: {err}");
        }
        None => eprintln!("n3reason: {err}"),
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn path_to_base_iri(path: &Path) -> Option<String> {
    let absolute = path.canonicalize().ok()?;
    Some(format!("file://{}", absolute.display()))
}
