use crate::handlers::HandlerDecl;
use crate::naming::{DEFAULT_HANDLER_SUFFIX, DEFAULT_METHOD_PREFIX};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// How regex-route captures are turned into method arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RegexArgumentPolicy {
    /// Captured groups are the argument list, nothing more
    #[default]
    Verbatim,
    /// Captured groups are bound like path segments, missing tail parameters get defaults
    FillDefaults,
}

impl FromStr for RegexArgumentPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "verbatim" => Ok(RegexArgumentPolicy::Verbatim),
            "fill-defaults" => Ok(RegexArgumentPolicy::FillDefaults),
            other => Err(format!("unknown regex argument policy '{other}'")),
        }
    }
}

/// Naming conventions, reserved names and resolution policies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
    /// Suffix of canonical handler names
    pub handler_suffix: String,
    /// Prefix of canonical method names
    pub method_prefix: String,
    /// Raw name of the handler serving the empty path
    pub main_handler: String,
    /// Raw name of the terminal handler for routing misses
    pub fail_handler: String,
    /// Second segment value that selects the main method of a site handler
    pub main_keyword: String,
    /// Main method of site handlers
    pub site_main_method: String,
    /// Main method of rest handlers
    pub rest_main_method: String,
    /// Reserved catch-all method name
    pub fallback_method: String,
    /// Treatment of regex-route captures
    pub regex_arguments: RegexArgumentPolicy,
    /// Resolutions slower than this are logged at warn level
    pub slow_resolution_us: u64,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            handler_suffix: DEFAULT_HANDLER_SUFFIX.to_string(),
            method_prefix: DEFAULT_METHOD_PREFIX.to_string(),
            main_handler: "main".to_string(),
            fail_handler: "fail".to_string(),
            main_keyword: "main".to_string(),
            site_main_method: "doMain".to_string(),
            rest_main_method: "handle".to_string(),
            fallback_method: "doFallback".to_string(),
            regex_arguments: RegexArgumentPolicy::Verbatim,
            slow_resolution_us: 1_000,
        }
    }
}

/// Full alias entry
///
/// The target may be given under `target` or under the key `0`, which is how
/// positional alias arrays serialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasConfig {
    /// Handler the alias points to
    #[serde(alias = "0")]
    pub target: String,
    /// Fixed canonical method, bypassing method derivation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Name of a registered post-bind hook
    #[serde(
        default,
        rename = "methodFilter",
        alias = "method_filter",
        skip_serializing_if = "Option::is_none"
    )]
    pub method_filter: Option<String>,
    /// Public method key to canonical method name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub methods: BTreeMap<String, String>,
}

/// Alias value: either just a target name or a full entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AliasSpec {
    /// `blog: BlogService`
    Target(String),
    /// `blog: { target: BlogService, method: doList }`
    Full(AliasConfig),
}

impl AliasSpec {
    /// Normalize into a full entry
    #[must_use]
    pub fn into_config(self) -> AliasConfig {
        match self {
            AliasSpec::Target(target) => AliasConfig {
                target,
                method: None,
                method_filter: None,
                methods: BTreeMap::new(),
            },
            AliasSpec::Full(config) => config,
        }
    }

    /// Target handler as written in configuration
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            AliasSpec::Target(target) => target,
            AliasSpec::Full(config) => &config.target,
        }
    }
}

/// Regex route entry as written in configuration.
///
/// `pattern` and `method` are optional here so that an incomplete entry loads and is
/// reported as a configuration error instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RegexRouteConfig {
    /// Regular expression matched against the request path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Canonical method to call on match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Target handler; derived from the first path segment when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Name of a registered post-bind hook
    #[serde(
        default,
        rename = "methodFilter",
        alias = "method_filter",
        skip_serializing_if = "Option::is_none"
    )]
    pub method_filter: Option<String>,
}

/// Complete route configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RouteConfig {
    /// Naming and policy settings
    pub settings: DispatchSettings,
    /// Public route key to alias entry
    pub aliases: BTreeMap<String, AliasSpec>,
    /// Ordered regex routes
    #[serde(alias = "routes")]
    pub regex_routes: Vec<RegexRouteConfig>,
    /// Handlers served by the echo handler
    pub handlers: Vec<HandlerDecl>,
}
