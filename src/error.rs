//! Error types for route configuration and dispatch.
//!
//! Routing misses (unknown handler, unknown method) are *not* errors: they are
//! recovered by escalating to the fail handler and surface as a
//! [`DispatchFailure`](crate::dispatcher::DispatchFailure) on the resolution.
//! Only faults the dispatcher cannot meaningfully recover from are represented here.

use std::fmt;

/// Route configuration error
///
/// Produced while building the route table or when a regex route entry that is
/// missing a mandatory field is reached during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Regex route entry without a `pattern`
    MissingPattern {
        /// Position of the entry in declaration order
        index: usize,
    },
    /// Regex route entry without a `method`
    MissingMethod {
        /// Position of the entry in declaration order
        index: usize,
    },
    /// Regex route pattern failed to compile
    InvalidPattern {
        /// Position of the entry in declaration order
        index: usize,
        /// The offending pattern
        pattern: String,
        /// Compiler message from the regex engine
        message: String,
    },
    /// Alias entry whose target is empty
    EmptyAliasTarget {
        /// The alias key
        key: String,
    },
    /// Two alias keys that differ only by case
    DuplicateAliasKey {
        /// The later of the two keys, as written
        key: String,
    },
    /// Two method map keys of one alias that differ only by case
    DuplicateMethodKey {
        /// The alias key
        alias: String,
        /// The later of the two method keys, as written
        key: String,
    },
    /// A `methodFilter` names a hook that was never registered
    UnknownHook {
        /// The hook name from configuration
        name: String,
    },
    /// A declared handler uses an unknown protocol name
    UnknownProtocol {
        /// Handler the declaration belongs to
        handler: String,
        /// The protocol string from configuration
        protocol: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingPattern { index } => {
                write!(f, "regex route #{index} is missing a pattern")
            }
            ConfigError::MissingMethod { index } => {
                write!(f, "regex route #{index} is missing a method")
            }
            ConfigError::InvalidPattern {
                index,
                pattern,
                message,
            } => write!(
                f,
                "regex route #{index} has an invalid pattern '{pattern}': {message}"
            ),
            ConfigError::EmptyAliasTarget { key } => {
                write!(f, "alias '{key}' has an empty target")
            }
            ConfigError::DuplicateAliasKey { key } => {
                write!(f, "alias '{key}' collides with another key differing only by case")
            }
            ConfigError::DuplicateMethodKey { alias, key } => write!(
                f,
                "alias '{alias}' maps method key '{key}' twice (keys are case-insensitive)"
            ),
            ConfigError::UnknownHook { name } => {
                write!(f, "hook '{name}' is referenced but not registered")
            }
            ConfigError::UnknownProtocol { handler, protocol } => write!(
                f,
                "handler '{handler}' declares unknown protocol '{protocol}' (expected 'site' or 'rest')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Error returned by [`Dispatcher`](crate::dispatcher::Dispatcher) operations
///
/// Each variant aborts processing of the current request. Handler and method misses
/// never show up here.
#[derive(Debug)]
pub enum DispatchError {
    /// The route table is misconfigured
    Configuration(ConfigError),
    /// A handler factory failed while constructing the handler
    Instantiation {
        /// Canonical name of the handler being constructed
        handler: String,
        /// Error raised by the factory
        source: anyhow::Error,
    },
    /// A post-bind hook rejected the bound arguments
    Hook {
        /// Hook name
        hook: String,
        /// Error raised by the hook
        source: anyhow::Error,
    },
    /// The resolved handler method returned an error
    Invocation {
        /// Canonical handler name
        handler: String,
        /// Canonical method name
        method: String,
        /// Error raised by the handler
        source: anyhow::Error,
    },
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::Configuration(err) => write!(f, "route configuration error: {err}"),
            DispatchError::Instantiation { handler, source } => {
                write!(f, "failed to instantiate handler '{handler}': {source}")
            }
            DispatchError::Hook { hook, source } => {
                write!(f, "post-bind hook '{hook}' failed: {source}")
            }
            DispatchError::Invocation {
                handler,
                method,
                source,
            } => write!(f, "handler '{handler}::{method}' failed: {source}"),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::Configuration(err) => Some(err),
            DispatchError::Instantiation { source, .. }
            | DispatchError::Hook { source, .. }
            | DispatchError::Invocation { source, .. } => Some(&**source),
        }
    }
}

impl From<ConfigError> for DispatchError {
    fn from(err: ConfigError) -> Self {
        DispatchError::Configuration(err)
    }
}
