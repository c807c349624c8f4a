//! # CLI Module
//!
//! Command-line interface for the `rexroute` binary, which serves template
//! routes declared in a TOML file (see [`crate::config`]).
//!
//! ## Commands
//!
//! ### `serve`
//!
//! Build the route tables and serve them:
//!
//! ```bash
//! rexroute serve --config routes.toml --addr 0.0.0.0:8080
//! ```
//!
//! Without `--config` the built-in greeting routes are served
//! (`/users/{userid}` and `/sites/{sitename}`).
//!
//! ### `routes`
//!
//! Print every prefix and its patterns in the order they are tried:
//!
//! ```bash
//! rexroute routes --config routes.toml
//! ```
//!
//! ### `check`
//!
//! Compile every pattern and exit non-zero on the first invalid one:
//!
//! ```bash
//! rexroute check --config routes.toml
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use rexroute::cli::{run_cli, Cli};
//! use clap::Parser;
//!
//! run_cli(Cli::parse())?;
//! ```

mod commands;


pub use commands::{run_cli, Cli, Commands};
