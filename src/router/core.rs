//! Route table core - alias lookup, ordered regex routes and candidate selection.

use crate::config::{DispatchSettings, RouteConfig};
use crate::error::ConfigError;
use crate::handlers::PostBindHook;
use crate::naming::NameTransformer;
use crate::registry::HookRegistry;
use crate::request::RouteRequest;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{debug, error, info};

/// A post-bind hook together with the name it was registered under
#[derive(Clone)]
pub struct NamedHook {
    /// Registered hook name
    pub name: Arc<str>,
    /// The hook itself
    pub hook: PostBindHook,
}

impl fmt::Debug for NamedHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedHook").field("name", &self.name).finish()
    }
}

/// Resolved alias table entry
#[derive(Debug, Clone)]
pub struct AliasEntry {
    /// Canonical handler name
    pub target: String,
    /// Canonical method that bypasses method derivation
    pub fixed_method: Option<String>,
    /// Lowercase public method key to canonical method name
    pub method_map: HashMap<String, String>,
    /// Hook applied after argument binding
    pub post_bind_hook: Option<NamedHook>,
}

/// One regex route, kept in declaration order.
///
/// `pattern` and `method` stay optional so an incomplete entry is reported when
/// resolution reaches it.
#[derive(Debug, Clone)]
pub struct RegexRoute {
    /// Position in declaration order
    pub index: usize,
    /// Compiled pattern
    pub pattern: Option<Regex>,
    /// Canonical handler name; derived from the first segment when absent
    pub target: Option<String>,
    /// Canonical method name
    pub method: Option<String>,
    /// Hook applied after argument binding
    pub method_hook: Option<NamedHook>,
}

/// Successful regex route match
#[derive(Debug, Clone)]
pub struct RegexMatch<'t> {
    /// Index of the matching route
    pub index: usize,
    /// Canonical handler name, if the route declares one
    pub target: Option<&'t str>,
    /// Canonical method name
    pub method: &'t str,
    /// Capture groups 1..n, percent-decoded like path segments; `None` for groups
    /// that did not participate
    pub arguments: Vec<Option<String>>,
    /// Hook applied after argument binding
    pub hook: Option<&'t NamedHook>,
}

/// Which strategy produced the handler candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    /// Empty first segment, routed to the main handler
    Main,
    /// Alias table hit
    Alias,
    /// Regex route hit (index in declaration order)
    Regex(usize),
    /// First segment transformed into a handler name
    Direct,
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateSource::Main => write!(f, "main"),
            CandidateSource::Alias => write!(f, "alias"),
            CandidateSource::Regex(index) => write!(f, "regex#{index}"),
            CandidateSource::Direct => write!(f, "direct"),
        }
    }
}

/// Candidate handler computed from the request, before any existence check
#[derive(Debug, Clone)]
pub struct RouteCandidate<'t> {
    /// Canonical handler name
    pub handler: String,
    /// Strategy that produced the candidate
    pub source: CandidateSource,
    /// Method supplied by the alias or regex route
    pub method: Option<String>,
    /// Alias method remapping table
    pub method_map: Option<&'t HashMap<String, String>>,
    /// Arguments supplied by a regex route
    pub arguments: Option<Vec<Option<String>>>,
    /// Hook to run after binding
    pub hook: Option<&'t NamedHook>,
}

impl RouteCandidate<'_> {
    fn plain(handler: String, source: CandidateSource) -> Self {
        Self {
            handler,
            source,
            method: None,
            method_map: None,
            arguments: None,
            hook: None,
        }
    }
}

/// Static routing configuration: alias table plus ordered regex routes.
///
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct RouteTable {
    names: NameTransformer,
    main_handler: String,
    aliases: HashMap<String, AliasEntry>,
    regex_routes: Vec<RegexRoute>,
}

fn lookup_hook(hooks: &HookRegistry, name: Option<&str>) -> Result<Option<NamedHook>, ConfigError> {
    match name {
        None => Ok(None),
        Some(name) => hooks
            .get(name)
            .map(|hook| {
                Some(NamedHook {
                    name: Arc::from(name),
                    hook,
                })
            })
            .ok_or_else(|| ConfigError::UnknownHook {
                name: name.to_string(),
            }),
    }
}

/// Percent-decode a capture; one that does not decode to UTF-8 is kept raw
fn decode_capture(raw: &str) -> String {
    urlencoding::decode(raw).map_or_else(|_| raw.to_string(), |decoded| decoded.into_owned())
}

impl RouteTable {
    /// Build the table from configuration.
    ///
    /// Targets are normalized through the name transformer, alias keys and method map
    /// keys are lowercased (a case-only collision is an error), patterns are compiled
    /// and hook names are resolved. Regex entries missing `pattern` or `method` are
    /// kept and reported when reached.
    pub fn build(config: &RouteConfig, hooks: &HookRegistry) -> Result<Self, ConfigError> {
        let settings = &config.settings;
        let names = NameTransformer::new(&settings.handler_suffix, &settings.method_prefix);

        let mut aliases = HashMap::with_capacity(config.aliases.len());
        for (key, spec) in &config.aliases {
            let alias = spec.clone().into_config();
            if alias.target.trim().is_empty() {
                return Err(ConfigError::EmptyAliasTarget { key: key.clone() });
            }
            let mut method_map = HashMap::with_capacity(alias.methods.len());
            for (method_key, method) in alias.methods {
                let lowered = method_key.to_lowercase();
                if method_map.contains_key(&lowered) {
                    return Err(ConfigError::DuplicateMethodKey {
                        alias: key.clone(),
                        key: method_key,
                    });
                }
                method_map.insert(lowered, method);
            }
            let entry = AliasEntry {
                target: names.to_handler_name(alias.target.trim()),
                fixed_method: alias.method.filter(|m| !m.is_empty()),
                method_map,
                post_bind_hook: lookup_hook(hooks, alias.method_filter.as_deref())?,
            };
            if aliases.insert(key.to_lowercase(), entry).is_some() {
                return Err(ConfigError::DuplicateAliasKey { key: key.clone() });
            }
        }

        let mut regex_routes = Vec::with_capacity(config.regex_routes.len());
        for (index, route) in config.regex_routes.iter().enumerate() {
            let pattern = match route.pattern.as_deref().filter(|p| !p.is_empty()) {
                Some(p) => Some(Regex::new(p).map_err(|e| {
                    error!(index, pattern = %p, error = %e, "Invalid regex route pattern");
                    ConfigError::InvalidPattern {
                        index,
                        pattern: p.to_string(),
                        message: e.to_string(),
                    }
                })?),
                None => None,
            };
            regex_routes.push(RegexRoute {
                index,
                pattern,
                target: route
                    .target
                    .as_deref()
                    .filter(|t| !t.trim().is_empty())
                    .map(|t| names.to_handler_name(t.trim())),
                method: route.method.clone().filter(|m| !m.is_empty()),
                method_hook: lookup_hook(hooks, route.method_filter.as_deref())?,
            });
        }

        let main_handler = names.to_handler_name(&settings.main_handler);

        info!(
            aliases_count = aliases.len(),
            regex_routes_count = regex_routes.len(),
            main_handler = %main_handler,
            "Route table loaded"
        );

        Ok(Self {
            names,
            main_handler,
            aliases,
            regex_routes,
        })
    }

    /// Empty table using default settings
    #[must_use]
    pub fn empty(settings: &DispatchSettings) -> Self {
        let names = NameTransformer::new(&settings.handler_suffix, &settings.method_prefix);
        Self {
            main_handler: names.to_handler_name(&settings.main_handler),
            names,
            aliases: HashMap::new(),
            regex_routes: Vec::new(),
        }
    }

    /// Name transformer the table was built with
    #[must_use]
    pub fn names(&self) -> &NameTransformer {
        &self.names
    }

    /// Canonical name of the main handler
    #[must_use]
    pub fn main_handler(&self) -> &str {
        &self.main_handler
    }

    /// Case-insensitive exact alias lookup
    #[must_use]
    pub fn resolve_alias(&self, raw_segment: &str) -> Option<&AliasEntry> {
        self.aliases.get(&raw_segment.to_lowercase())
    }

    /// Scan regex routes in declaration order and return the first match.
    ///
    /// Patterns see the raw (still percent-encoded) path; captures are decoded.
    /// Reaching an entry without `pattern` or `method` is a configuration error.
    pub fn resolve_regex(&self, path: &str) -> Result<Option<RegexMatch<'_>>, ConfigError> {
        for route in &self.regex_routes {
            let pattern = route.pattern.as_ref().ok_or(ConfigError::MissingPattern {
                index: route.index,
            })?;
            let method = route.method.as_deref().ok_or(ConfigError::MissingMethod {
                index: route.index,
            })?;

            if let Some(captures) = pattern.captures(path) {
                let arguments = captures
                    .iter()
                    .skip(1)
                    .map(|group| group.map(|m| decode_capture(m.as_str())))
                    .collect();
                return Ok(Some(RegexMatch {
                    index: route.index,
                    target: route.target.as_deref(),
                    method,
                    arguments,
                    hook: route.method_hook.as_ref(),
                }));
            }
        }
        Ok(None)
    }

    /// Compute the handler candidate for a request.
    ///
    /// Priority: empty first segment selects the main handler; otherwise an alias,
    /// then a matching regex route, then the transformed first segment. Exactly one
    /// strategy supplies the candidate.
    pub fn route(&self, request: &RouteRequest) -> Result<RouteCandidate<'_>, ConfigError> {
        let first = request.segment(0);

        if first.is_empty() {
            return Ok(RouteCandidate::plain(
                self.main_handler.clone(),
                CandidateSource::Main,
            ));
        }

        if let Some(alias) = self.resolve_alias(first) {
            debug!(segment = %first, target = %alias.target, "Alias matched");
            return Ok(RouteCandidate {
                handler: alias.target.clone(),
                source: CandidateSource::Alias,
                method: alias.fixed_method.clone(),
                method_map: Some(&alias.method_map).filter(|m| !m.is_empty()),
                arguments: None,
                hook: alias.post_bind_hook.as_ref(),
            });
        }

        if !self.regex_routes.is_empty() {
            if let Some(matched) = self.resolve_regex(request.path())? {
                let handler = matched
                    .target
                    .map_or_else(|| self.names.to_handler_name(first), str::to_string);
                debug!(
                    path = %request.path(),
                    route_index = matched.index,
                    target = %handler,
                    method = %matched.method,
                    "Regex route matched"
                );
                return Ok(RouteCandidate {
                    handler,
                    source: CandidateSource::Regex(matched.index),
                    method: Some(matched.method.to_string()),
                    method_map: None,
                    arguments: Some(matched.arguments),
                    hook: matched.hook,
                });
            }
        }

        Ok(RouteCandidate::plain(
            self.names.to_handler_name(first),
            CandidateSource::Direct,
        ))
    }

    /// Write aliases and regex routes, one per line
    pub fn dump_routes<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "[routes] main={} aliases={} regex_routes={}",
            self.main_handler,
            self.aliases.len(),
            self.regex_routes.len()
        )?;
        let mut keys: Vec<_> = self.aliases.keys().collect();
        keys.sort();
        for key in keys {
            let alias = &self.aliases[key];
            writeln!(
                out,
                "[alias] {key} -> {}{}",
                alias.target,
                alias
                    .fixed_method
                    .as_deref()
                    .map(|m| format!("::{m}"))
                    .unwrap_or_default()
            )?;
        }
        for route in &self.regex_routes {
            writeln!(
                out,
                "[regex] #{} {} -> {}::{}",
                route.index,
                route.pattern.as_ref().map_or("<missing>", Regex::as_str),
                route.target.as_deref().unwrap_or("<first segment>"),
                route.method.as_deref().unwrap_or("<missing>")
            )?;
        }
        Ok(())
    }
}
