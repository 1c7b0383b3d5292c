use crate::dispatcher::{DispatchFailure, HeaderVec};
use crate::error::ConfigError;
use crate::request::RouteRequest;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::str::FromStr;
use std::sync::Arc;

/// How a handler maps requests onto its methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Multi-method handler: the second path segment names the method
    #[default]
    Site,
    /// Verb handler: the lowercase HTTP verb names the method
    Rest,
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "site" => Ok(Protocol::Site),
            "rest" => Ok(Protocol::Rest),
            other => Err(other.to_string()),
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Site => write!(f, "site"),
            Protocol::Rest => write!(f, "rest"),
        }
    }
}

/// One declared method parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name (informational, binding is positional)
    pub name: String,
    /// Declared default; `Some(Value::Null)` is an explicit `null` default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ParamSpec {
    /// Parameter without a default
    #[must_use]
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    /// Parameter with a default value
    #[must_use]
    pub fn optional(name: impl Into<String>, default: Value) -> Self {
        Self {
            name: name.into(),
            default: Some(default),
        }
    }
}

/// A method a handler exposes, with its ordered parameter list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodSpec {
    /// Canonical method name, e.g. `doEditName` or `get`
    pub name: String,
    /// Parameters in declaration order
    #[serde(default)]
    pub params: Vec<ParamSpec>,
}

impl MethodSpec {
    /// Method without parameters
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Append a parameter without a default
    #[must_use]
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.params.push(ParamSpec::required(name));
        self
    }

    /// Append a parameter with a default value
    #[must_use]
    pub fn param_or(mut self, name: impl Into<String>, default: Value) -> Self {
        self.params.push(ParamSpec::optional(name, default));
        self
    }
}

/// Explicit registration record for a handler.
///
/// Stands in for runtime reflection: the protocol, the main-only restriction and the
/// full method table are declared up front, so method existence and parameter
/// metadata are plain lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerDescriptor {
    /// Canonical handler name, e.g. `UserProfileService`
    pub name: String,
    /// Method derivation protocol
    pub protocol: Protocol,
    /// Restrict every request to the protocol's main method
    pub main_only: bool,
    /// Declared methods
    pub methods: Vec<MethodSpec>,
}

impl HandlerDescriptor {
    /// Descriptor for a multi-method handler
    #[must_use]
    pub fn site(name: impl Into<String>) -> Self {
        Self::new(name, Protocol::Site)
    }

    /// Descriptor for a verb handler
    #[must_use]
    pub fn rest(name: impl Into<String>) -> Self {
        Self::new(name, Protocol::Rest)
    }

    /// Descriptor with an explicit protocol and no methods
    #[must_use]
    pub fn new(name: impl Into<String>, protocol: Protocol) -> Self {
        Self {
            name: name.into(),
            protocol,
            main_only: false,
            methods: Vec::new(),
        }
    }

    /// Mark the handler as main-only
    #[must_use]
    pub fn main_only(mut self) -> Self {
        self.main_only = true;
        self
    }

    /// Declare a method
    #[must_use]
    pub fn with_method(mut self, method: MethodSpec) -> Self {
        self.methods.push(method);
        self
    }

    /// Look up a declared method by exact name
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&MethodSpec> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Whether a method of that exact name is declared
    #[inline]
    #[must_use]
    pub fn has_method(&self, name: &str) -> bool {
        self.method(name).is_some()
    }
}

/// Declarative handler entry as it appears in a route configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlerDecl {
    /// Handler name, `article` or `ArticleService`; normalized like alias targets
    pub name: String,
    /// `site` or `rest`
    #[serde(default = "default_protocol")]
    pub protocol: String,
    /// Restrict to the main method
    #[serde(default, rename = "mainOnly", alias = "main_only")]
    pub main_only: bool,
    /// Declared methods
    #[serde(default)]
    pub methods: Vec<MethodSpec>,
}

fn default_protocol() -> String {
    "site".to_string()
}

impl HandlerDecl {
    /// Convert into a descriptor, rejecting unknown protocol names
    pub fn to_descriptor(&self) -> Result<HandlerDescriptor, ConfigError> {
        let protocol =
            Protocol::from_str(&self.protocol).map_err(|protocol| ConfigError::UnknownProtocol {
                handler: self.name.clone(),
                protocol,
            })?;
        Ok(HandlerDescriptor {
            name: self.name.clone(),
            protocol,
            main_only: self.main_only,
            methods: self.methods.clone(),
        })
    }
}

/// Per-call data handed to a handler method.
///
/// Carries the request, the routing failure that led here (only ever set for the
/// fail handler) and the response status/headers the handler may adjust.
#[derive(Debug)]
pub struct CallContext<'a> {
    /// The request being served
    pub request: &'a RouteRequest,
    /// Routing failure that escalated to the fail handler
    pub failure: Option<&'a DispatchFailure>,
    /// Response status, 200 unless the handler changes it
    pub status: u16,
    /// Response headers
    pub headers: HeaderVec,
}

impl<'a> CallContext<'a> {
    /// Fresh context with status 200 and no headers
    #[must_use]
    pub fn new(request: &'a RouteRequest, failure: Option<&'a DispatchFailure>) -> Self {
        Self {
            request,
            failure,
            status: 200,
            headers: HeaderVec::new(),
        }
    }

    /// Add or replace a response header (case-insensitive name match)
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value.into()));
    }
}

/// A handler instance, constructed per request by its registered factory.
///
/// The dispatcher only calls methods the handler's [`HandlerDescriptor`] declares,
/// with exactly one argument per declared parameter.
pub trait Handler: Send {
    /// Run `method` with bound `args`; the returned value becomes the response body
    fn call(
        &mut self,
        method: &str,
        args: &[Value],
        ctx: &mut CallContext<'_>,
    ) -> anyhow::Result<Value>;

    /// Concrete handler for post-bind hooks to downcast; `None` keeps it opaque.
    ///
    /// Implement as `Some(self)` to let hooks read or prepare handler state.
    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        None
    }
}

/// Constructs a fresh handler instance
pub type HandlerFactory = Arc<dyn Fn() -> anyhow::Result<Box<dyn Handler>> + Send + Sync>;

/// Runs after argument binding with the handler instance as context.
///
/// May rewrite the bound arguments; an error aborts the request.
pub type PostBindHook =
    Arc<dyn Fn(&mut dyn Handler, &mut Vec<Value>) -> anyhow::Result<()> + Send + Sync>;
