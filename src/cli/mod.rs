//! # CLI Module
//!
//! Command-line access to the resolution engine, mostly for checking a route
//! configuration before deploying it.
//!
//! ## Commands
//!
//! ### `check`
//!
//! Load and validate a route configuration, printing every problem found:
//!
//! ```bash
//! svcrouter check --config routes.yaml
//! ```
//!
//! ### `resolve`
//!
//! Build a dispatcher from the configuration (declared handlers answer through the
//! echo handler) and show how a request resolves and what it returns:
//!
//! ```bash
//! svcrouter resolve --config routes.yaml --method POST /user-profile/edit-name/42
//! ```
//!
//! ### `routes`
//!
//! Dump the compiled alias table and regex routes:
//!
//! ```bash
//! svcrouter routes --config routes.yaml
//! ```
//!
//! Settings from the file can be overridden with `SVCR_*` environment variables,
//! see [`runtime_config`](crate::runtime_config).
//!
//! ## Hooks
//!
//! Post-bind hooks named by `methodFilter` only exist in application code. The CLI
//! registers a no-op for each referenced name that logs the call at `info` level and
//! leaves the arguments alone. `check` lists those names so they can be matched
//! against what the application registers.

mod commands;


pub use commands::{execute, run_cli, Cli, Commands};
