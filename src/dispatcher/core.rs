//! Dispatcher core - the per-request resolution state machine.
//!
//! Resolution is synchronous and bounded: one route table lookup, at most two
//! handler instantiations (the routed handler and, on a miss, the fail handler),
//! one method check and one binding pass.

use crate::config::{DispatchSettings, RouteConfig};
use crate::echo::EchoHandler;
use crate::error::{ConfigError, DispatchError};
use crate::handlers::{CallContext, Handler, HandlerDescriptor};
use crate::naming::NameTransformer;
use crate::registry::{HandlerInstance, HandlerRegistry, HookRegistry};
use crate::request::RouteRequest;
use crate::resolver::{ArgumentBinder, MethodChoice, MethodResolver, MethodState};
use crate::router::{CandidateSource, RouteCandidate, RouteTable};
use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Maximum inline response headers before heap allocation
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage; names are `Arc<str>` since they repeat across responses
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Status code recorded for routing misses
pub const NOT_FOUND: u16 = 404;

/// Response produced by invoking a resolved target
#[derive(Debug, Clone, Serialize)]
pub struct HandlerResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    #[serde(skip_serializing)]
    pub headers: HeaderVec,
    /// Response body as JSON
    pub body: Value,
}

impl HandlerResponse {
    /// Create a response with the given status, headers and body
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// JSON response with a `content-type` header
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self {
            status,
            headers,
            body,
        }
    }

    /// Error response with an `{"error": message}` body
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }

    /// Get a header by name (case-insensitive)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }
}

/// Kind of routing miss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No handler registered under the candidate name
    HandlerNotFound,
    /// Neither the derived method nor the fallback method exists
    MethodNotFound,
}

/// Diagnostic record of a routing miss, carried on the resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchFailure {
    /// Status code to answer with
    pub code: u16,
    /// Human readable description
    pub text: String,
    /// Kind of miss
    pub kind: FailureKind,
    /// Handler that was requested
    pub handler: String,
    /// Method that was requested, for method misses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl DispatchFailure {
    /// Record for an unknown handler
    #[must_use]
    pub fn handler_not_found(handler: &str) -> Self {
        Self {
            code: NOT_FOUND,
            text: format!("Handler {handler} not found"),
            kind: FailureKind::HandlerNotFound,
            handler: handler.to_string(),
            method: None,
        }
    }

    /// Record for an unknown method on an existing handler
    #[must_use]
    pub fn method_not_found(handler: &str, method: &str) -> Self {
        Self {
            code: NOT_FOUND,
            text: format!("Method {method} not found on handler {handler}"),
            kind: FailureKind::MethodNotFound,
            handler: handler.to_string(),
            method: Some(method.to_string()),
        }
    }
}

impl fmt::Display for DispatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.text, self.code)
    }
}

/// Fully resolved, argument-bound invocation target.
///
/// Owned by the caller once [`Dispatcher::resolve`] returns; consumed by
/// [`Dispatcher::invoke`].
pub struct ResolvedTarget {
    /// Canonical name of the handler that will run
    pub handler_name: String,
    /// The instantiated handler
    pub handler: Box<dyn Handler>,
    /// Its descriptor
    pub descriptor: Arc<HandlerDescriptor>,
    /// Canonical method name
    pub method: String,
    /// One bound value per declared parameter (or the regex captures, verbatim)
    pub arguments: Vec<Value>,
    /// Routed to the fail handler
    pub is_failure: bool,
    /// Miss that caused the escalation, if any
    pub failure: Option<DispatchFailure>,
    /// Response status to signal; 404 after a miss
    pub status: u16,
    /// Strategy that produced the original candidate
    pub source: CandidateSource,
    /// The request being served
    pub request: RouteRequest,
}

impl fmt::Debug for ResolvedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedTarget")
            .field("handler_name", &self.handler_name)
            .field("method", &self.method)
            .field("arguments", &self.arguments)
            .field("is_failure", &self.is_failure)
            .field("failure", &self.failure)
            .field("status", &self.status)
            .field("source", &self.source)
            .field("path", &self.request.path())
            .finish_non_exhaustive()
    }
}

/// Resolution stages, walked in order. A miss re-enters at `Instantiated` with the
/// fail handler; that jump happens at most once.
enum Stage {
    NameResolved(String),
    ExistsChecked {
        name: String,
        exists: bool,
    },
    Instantiated(HandlerInstance),
    MethodResolved {
        instance: HandlerInstance,
        choice: MethodChoice,
    },
    MethodExistsChecked {
        instance: HandlerInstance,
        choice: MethodChoice,
        method: String,
    },
    ArgumentsBound {
        instance: HandlerInstance,
        method: String,
        arguments: Vec<Value>,
    },
}

impl Stage {
    fn name(&self) -> &'static str {
        match self {
            Stage::NameResolved(_) => "handler_name_resolved",
            Stage::ExistsChecked { .. } => "handler_exists_checked",
            Stage::Instantiated(_) => "handler_instantiated",
            Stage::MethodResolved { .. } => "method_resolved",
            Stage::MethodExistsChecked { .. } => "method_exists_checked",
            Stage::ArgumentsBound { .. } => "arguments_bound",
        }
    }
}

/// Request-to-handler resolution engine.
///
/// Holds the immutable route table and handler registry; cheap to clone and safe
/// to share across threads.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    settings: Arc<DispatchSettings>,
    names: NameTransformer,
    routes: Arc<RouteTable>,
    registry: Arc<HandlerRegistry>,
}

/// Builder collecting handlers and hooks before the route table is compiled
pub struct DispatcherBuilder {
    config: RouteConfig,
    handlers: Vec<(HandlerDescriptor, crate::handlers::HandlerFactory)>,
    hooks: HookRegistry,
}

impl fmt::Debug for DispatcherBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatcherBuilder")
            .field("settings", &self.config.settings)
            .field("handlers", &self.handlers.len())
            .field("hooks", &self.hooks)
            .finish()
    }
}

impl DispatcherBuilder {
    /// Override the settings section of the route configuration
    #[must_use]
    pub fn settings(mut self, settings: DispatchSettings) -> Self {
        self.config.settings = settings;
        self
    }

    /// Register an application handler
    #[must_use]
    pub fn handler<F>(mut self, descriptor: HandlerDescriptor, factory: F) -> Self
    where
        F: Fn() -> anyhow::Result<Box<dyn Handler>> + Send + Sync + 'static,
    {
        self.handlers.push((descriptor, Arc::new(factory)));
        self
    }

    /// Register a post-bind hook that configuration can reference via `methodFilter`
    #[must_use]
    pub fn hook<F>(mut self, name: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&mut dyn Handler, &mut Vec<Value>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.hooks.register(name, hook);
        self
    }

    /// Merge a prepared hook registry; entries replace hooks of the same name
    #[must_use]
    pub fn hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks.extend(hooks);
        self
    }

    /// Compile the route table and assemble the registry.
    ///
    /// Handlers declared in configuration are registered under their canonical name
    /// (`article` becomes `ArticleService`) and served by [`EchoHandler`] unless code
    /// registered a handler under that name.
    pub fn build(self) -> Result<Dispatcher, ConfigError> {
        let settings = self.config.settings.clone();
        let names = NameTransformer::new(&settings.handler_suffix, &settings.method_prefix);
        let mut registry = HandlerRegistry::new(
            names.to_handler_name(&settings.main_handler),
            names.to_handler_name(&settings.fail_handler),
        );
        registry.register_builtin_defaults(&settings.site_main_method);

        let coded: Vec<&str> = self.handlers.iter().map(|(d, _)| d.name.as_str()).collect();
        for decl in &self.config.handlers {
            let mut descriptor = decl.to_descriptor()?;
            descriptor.name = names.to_handler_name(descriptor.name.trim());
            if coded.contains(&descriptor.name.as_str()) {
                continue;
            }
            register_declared(&mut registry, descriptor);
        }
        for (descriptor, factory) in self.handlers {
            registry.register(descriptor, move || factory());
        }

        let routes = RouteTable::build(&self.config, &self.hooks)?;

        Ok(Dispatcher {
            settings: Arc::new(settings),
            names,
            routes: Arc::new(routes),
            registry: Arc::new(registry),
        })
    }
}

fn register_declared(registry: &mut HandlerRegistry, descriptor: HandlerDescriptor) {
    let name = descriptor.name.clone();
    registry.register(descriptor, move || Ok(Box::new(EchoHandler::new(name.clone()))));
}

impl Dispatcher {
    /// Start building a dispatcher from a route configuration
    #[must_use]
    pub fn builder(config: RouteConfig) -> DispatcherBuilder {
        DispatcherBuilder {
            config,
            handlers: Vec::new(),
            hooks: HookRegistry::new(),
        }
    }

    /// Dispatcher serving only the configuration's declared handlers
    pub fn from_config(config: RouteConfig) -> Result<Self, ConfigError> {
        Self::builder(config).build()
    }

    /// Active settings
    #[must_use]
    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    /// The compiled route table
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// The handler registry
    #[must_use]
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    fn instantiate(&self, name: &str) -> Result<Option<HandlerInstance>, DispatchError> {
        self.registry
            .instantiate(name)
            .map_err(|source| DispatchError::Instantiation {
                handler: name.to_string(),
                source,
            })
    }

    fn instantiate_fail(&self) -> Result<HandlerInstance, DispatchError> {
        let name = self.registry.fail_handler();
        self.instantiate(name)?
            .ok_or_else(|| DispatchError::Instantiation {
                handler: name.to_string(),
                source: anyhow::anyhow!("fail handler is not registered"),
            })
    }

    /// Resolve a request to a handler instance, method and bound arguments.
    ///
    /// Routing misses never error: they escalate to the fail handler and are
    /// reported through [`ResolvedTarget::failure`]. Errors are configuration
    /// faults, handler constructor failures and post-bind hook failures.
    pub fn resolve(&self, request: &RouteRequest) -> Result<ResolvedTarget, DispatchError> {
        let start = Instant::now();
        let candidate: RouteCandidate<'_> = self.routes.route(request)?;
        let resolver = MethodResolver::new(&self.names, &self.settings);
        let binder = ArgumentBinder::new(self.settings.regex_arguments);
        let fail_name = self.registry.fail_handler();

        let mut failure: Option<DispatchFailure> = None;
        let mut fail_tier = false;
        let mut stage = Stage::NameResolved(candidate.handler.clone());

        loop {
            debug!(
                stage = stage.name(),
                path = %request.path(),
                fail_tier,
                "Resolution transition"
            );
            stage = match stage {
                Stage::NameResolved(name) => {
                    let exists = self.registry.exists(&name);
                    Stage::ExistsChecked { name, exists }
                }

                Stage::ExistsChecked { name, exists } => {
                    let instance = if exists { self.instantiate(&name)? } else { None };
                    match instance {
                        Some(instance) => {
                            fail_tier = name == fail_name;
                            Stage::Instantiated(instance)
                        }
                        None => {
                            let miss = DispatchFailure::handler_not_found(&name);
                            warn!(
                                handler_name = %name,
                                path = %request.path(),
                                source = %candidate.source,
                                "Handler not found, escalating to fail handler"
                            );
                            failure = Some(miss);
                            fail_tier = true;
                            Stage::Instantiated(self.instantiate_fail()?)
                        }
                    }
                }

                Stage::Instantiated(instance) => {
                    let choice = if fail_tier {
                        resolver.fail_choice(&instance.descriptor)
                    } else {
                        resolver.choose(
                            &instance.descriptor,
                            request,
                            candidate.method.as_deref(),
                            candidate.method_map,
                        )
                    };
                    Stage::MethodResolved { instance, choice }
                }

                Stage::MethodResolved { instance, choice } => {
                    let state = if fail_tier {
                        MethodState::Resolved {
                            method: choice.method.clone(),
                            via_fallback: false,
                        }
                    } else {
                        resolver.check(&instance.descriptor, &choice)
                    };
                    debug!(
                        handler_name = %instance.descriptor.name,
                        method_source = ?choice.source,
                        state = %state,
                        "Method checked"
                    );
                    match state {
                        MethodState::Resolved { method, .. } => Stage::MethodExistsChecked {
                            instance,
                            choice,
                            method,
                        },
                        MethodState::Failed { requested } => {
                            warn!(
                                handler_name = %instance.descriptor.name,
                                method = %requested,
                                path = %request.path(),
                                "Method not found, escalating to fail handler"
                            );
                            failure = Some(DispatchFailure::method_not_found(
                                &instance.descriptor.name,
                                &requested,
                            ));
                            fail_tier = true;
                            drop(instance);
                            Stage::Instantiated(self.instantiate_fail()?)
                        }
                    }
                }

                Stage::MethodExistsChecked {
                    instance,
                    choice,
                    method,
                } => {
                    let spec = instance.descriptor.method(&method);
                    let arguments = match &candidate.arguments {
                        Some(captured) if !fail_tier => binder.bind_supplied(spec, captured),
                        _ => ArgumentBinder::bind(spec, request.segments_from(choice.arg_offset)),
                    };
                    Stage::ArgumentsBound {
                        instance,
                        method,
                        arguments,
                    }
                }

                Stage::ArgumentsBound {
                    mut instance,
                    method,
                    mut arguments,
                } => {
                    if !fail_tier {
                        if let Some(named) = candidate.hook {
                            (named.hook)(&mut *instance.handler, &mut arguments).map_err(
                                |source| DispatchError::Hook {
                                    hook: named.name.to_string(),
                                    source,
                                },
                            )?;
                        }
                    }

                    let elapsed_us = start.elapsed().as_micros() as u64;
                    let status = failure.as_ref().map_or(200, |f| f.code);
                    if elapsed_us > self.settings.slow_resolution_us {
                        warn!(
                            path = %request.path(),
                            handler_name = %instance.descriptor.name,
                            duration_us = elapsed_us,
                            threshold_us = self.settings.slow_resolution_us,
                            "Slow resolution"
                        );
                    }
                    info!(
                        path = %request.path(),
                        verb = %request.method(),
                        handler_name = %instance.descriptor.name,
                        method = %method,
                        args_count = arguments.len(),
                        source = %candidate.source,
                        is_failure = fail_tier,
                        status,
                        duration_us = elapsed_us,
                        "Request resolved"
                    );

                    return Ok(ResolvedTarget {
                        handler_name: instance.descriptor.name.clone(),
                        handler: instance.handler,
                        descriptor: instance.descriptor,
                        method,
                        arguments,
                        is_failure: fail_tier,
                        failure,
                        status,
                        source: candidate.source,
                        request: request.clone(),
                    });
                }
            };
        }
    }

    /// Call the resolved method and build the response.
    ///
    /// After a routing miss the failure status is forced onto the response, whatever
    /// the fail handler set.
    pub fn invoke(&self, target: ResolvedTarget) -> Result<HandlerResponse, DispatchError> {
        let ResolvedTarget {
            handler_name,
            mut handler,
            method,
            arguments,
            failure,
            status,
            request,
            ..
        } = target;

        let mut ctx = CallContext::new(&request, failure.as_ref());
        ctx.status = status;
        let body = handler
            .call(&method, &arguments, &mut ctx)
            .map_err(|source| DispatchError::Invocation {
                handler: handler_name.clone(),
                method: method.clone(),
                source,
            })?;

        let status = failure.as_ref().map_or(ctx.status, |f| f.code);
        let mut response = HandlerResponse::new(status, ctx.headers, body);
        if response.get_header("content-type").is_none() {
            response.set_header("content-type", "application/json".to_string());
        }
        debug!(
            handler_name = %handler_name,
            method = %method,
            status = response.status,
            "Handler invoked"
        );
        Ok(response)
    }

    /// Resolve and invoke in one step
    pub fn dispatch(&self, request: &RouteRequest) -> Result<HandlerResponse, DispatchError> {
        let target = self.resolve(request)?;
        self.invoke(target)
    }
}
