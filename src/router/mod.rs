//! # Router Module
//!
//! The router turns the first path segment of a request into a candidate handler.
//!
//! ## Overview
//!
//! Candidate selection follows a fixed priority, and exactly one strategy wins:
//!
//! 1. **Main** - an empty first segment (`/`) selects the configured main handler
//! 2. **Alias** - a case-insensitive exact match in the alias table
//! 3. **Regex** - the first regex route, in declaration order, matching the full path
//! 4. **Direct** - the first segment transformed into a handler name
//!    (`user-profile` becomes `UserProfileService`)
//!
//! Aliases and regex routes may also supply a fixed method, a method remapping table,
//! captured arguments and a post-bind hook. Existence checks, method derivation and
//! argument binding happen later, in the dispatcher.
//!
//! ## Example
//!
//! ```rust
//! use svcrouter::config::{AliasSpec, RouteConfig};
//! use svcrouter::registry::HookRegistry;
//! use svcrouter::request::RouteRequest;
//! use svcrouter::router::{CandidateSource, RouteTable};
//!
//! let mut config = RouteConfig::default();
//! config.aliases.insert("news".into(), AliasSpec::Target("article".into()));
//! let table = RouteTable::build(&config, &HookRegistry::new()).unwrap();
//!
//! let candidate = table.route(&RouteRequest::get("/NEWS/latest")).unwrap();
//! assert_eq!(candidate.handler, "ArticleService");
//! assert_eq!(candidate.source, CandidateSource::Alias);
//! ```

mod core;

pub use core::{
    AliasEntry, CandidateSource, NamedHook, RegexMatch, RegexRoute, RouteCandidate, RouteTable,
};
