//! Command-line argument handling.
//!
//! Grounded on `icydb-cli`'s pairing of `clap` (derive) with `rustyline`
//! and on the teacher's `main.rs` shape (usage banner via a generated
//! `--help`, explicit process exit codes).

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "bdc", about = "Arbitrary-precision decimal calculator")]
pub struct Args {
    /// Script to read; omit to read from stdin.
    pub file: Option<PathBuf>,

    /// Accepted but ignored, with a warning (spec.md §6: a second
    /// positional argument is tolerated, not rejected).
    pub extra: Option<String>,
}

impl Args {
    pub fn warn_extra_argument(&self) {
        if let Some(extra) = &self.extra {
            eprintln!("Warning: extra argument '{extra}' ignored");
        }
    }
}
