//! Entry point for `n3reason`.
//!
//! Grounded on `Brahmastra-Labs/logicaffeine`'s `apps/logicaffeine_cli/src/main.rs`:
//! a thin wrapper that brings up logging, delegates to the library-shaped
//! CLI module for all real work, and turns the outcome into a process exit
//! code. All argument parsing and dispatch logic lives in [`cli`].
//!
//! # Exit codes (spec.md §6.3)
//!
//! - `0` — success
//! - `1` — usage, I/O, or syntax error
//! - `2` — inference fuse triggered (a `=> false` rule fired)

mod ast;
mod cli;
mod output;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match cli::run() {
        Ok(code) => std::process::exit(code as i32),
        Err(err) => {
            eprintln!("n3reason: {err:#}");
            std::process::exit(cli::ExitCode::UsageOrIoError as i32);
        }
    }
}
