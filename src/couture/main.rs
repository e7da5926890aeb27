//! # Couture CLI
//!
//! The binary is intentionally thin: the CLI lives in `cli/`, while this file
//! only invokes `cli::run()` and turns its outcome into an exit status.
//!
//! ```text
//! cli/setup.rs     clap argument definitions
//! cli/commands.rs  configuration, logging, dispatch to VaultApi
//! cli/print.rs     terminal rendering (colored, unicode-width, timeago)
//! ```
//!
//! Everything from `api.rs` inward is UI agnostic; see the library docs.

mod cli;

fn main() {
    match cli::run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
