//! # Propz CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this file
//! only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/propzapp/`: library with the UI-agnostic logic (model, filter, store,
//!   remote tables, identity, config, API facade)
//! - `crates/propz/`: this CLI, a client of the `propzapp` API
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/propz/src/cli/)                          │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - context wiring, tracing setup, dispatch (commands.rs)    │
//! │  - colored terminal output and JSON (render.rs)             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/propzapp/src/api.rs)                     │
//! │  - Resolves short ids, applies UI rules                     │
//! │  - Returns structured `CmdResult` values                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Environment
//!
//! - `PROPZ_CONFIG`: config file path (default: OS config dir `propz.toml`)
//! - `PROPZ_DATA_DIR`: data directory for the local table and anonymous id
//! - `PROPZ_ENDPOINT`, `PROPZ_API_KEY`, `PROPZ_TABLE`, `PROPZ_USER_ID`,
//!   `PROPZ_TIMEOUT_SECS`: config overrides
//! - `RUST_LOG`: log filter (default `warn`; `-v` forces `debug`)

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
