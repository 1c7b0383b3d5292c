//! Handler and hook registries.
//!
//! Handlers are looked up by canonical name in two namespaces: the per-handler
//! namespace filled by the application, then (only for the main and fail handler
//! names) the shared defaults namespace holding the built-in handlers.

use crate::handlers::{
    DefaultFailHandler, DefaultMainHandler, Handler, HandlerDescriptor, HandlerFactory,
    PostBindHook,
};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Namespace a handler was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerSource {
    /// Registered by the application under its own name
    Handlers,
    /// Shared built-in defaults (main and fail only)
    Defaults,
}

impl HandlerSource {
    fn dir(self) -> &'static str {
        match self {
            HandlerSource::Handlers => "handlers",
            HandlerSource::Defaults => "defaults",
        }
    }
}

#[derive(Clone)]
struct HandlerEntry {
    descriptor: Arc<HandlerDescriptor>,
    factory: HandlerFactory,
}

/// A freshly constructed handler with its registration data
pub struct HandlerInstance {
    /// The handler
    pub handler: Box<dyn Handler>,
    /// Its descriptor
    pub descriptor: Arc<HandlerDescriptor>,
    /// Namespace it came from
    pub source: HandlerSource,
}

impl fmt::Debug for HandlerInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerInstance")
            .field("descriptor", &self.descriptor)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Maps canonical handler names to descriptors and factories
#[derive(Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<String, HandlerEntry>,
    defaults: HashMap<String, HandlerEntry>,
    main_handler: String,
    fail_handler: String,
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.names())
            .field("main_handler", &self.main_handler)
            .field("fail_handler", &self.fail_handler)
            .finish()
    }
}

impl HandlerRegistry {
    /// Empty registry; `main_handler` and `fail_handler` are canonical names
    #[must_use]
    pub fn new(main_handler: impl Into<String>, fail_handler: impl Into<String>) -> Self {
        Self {
            handlers: HashMap::new(),
            defaults: HashMap::new(),
            main_handler: main_handler.into(),
            fail_handler: fail_handler.into(),
        }
    }

    /// Canonical name of the main handler
    #[must_use]
    pub fn main_handler(&self) -> &str {
        &self.main_handler
    }

    /// Canonical name of the fail handler
    #[must_use]
    pub fn fail_handler(&self) -> &str {
        &self.fail_handler
    }

    /// Register the built-in main and fail handlers in the defaults namespace
    pub fn register_builtin_defaults(&mut self, main_method: &str) {
        let main = DefaultMainHandler::descriptor(&self.main_handler, main_method);
        let fail = DefaultFailHandler::descriptor(&self.fail_handler, main_method);
        self.register_default(main, || Ok(Box::new(DefaultMainHandler)));
        self.register_default(fail, || Ok(Box::new(DefaultFailHandler)));
    }

    /// Register an application handler.
    ///
    /// A handler already registered under the same name is replaced.
    pub fn register<F>(&mut self, descriptor: HandlerDescriptor, factory: F)
    where
        F: Fn() -> anyhow::Result<Box<dyn Handler>> + Send + Sync + 'static,
    {
        let name = descriptor.name.clone();
        let entry = HandlerEntry {
            descriptor: Arc::new(descriptor),
            factory: Arc::new(factory),
        };
        if self.handlers.insert(name.clone(), entry).is_some() {
            warn!(handler_name = %name, "Replaced existing handler registration");
        } else {
            info!(
                handler_name = %name,
                total_handlers = self.handlers.len(),
                "Handler registered"
            );
        }
    }

    /// Register a handler in the shared defaults namespace
    pub fn register_default<F>(&mut self, descriptor: HandlerDescriptor, factory: F)
    where
        F: Fn() -> anyhow::Result<Box<dyn Handler>> + Send + Sync + 'static,
    {
        let name = descriptor.name.clone();
        self.defaults.insert(
            name,
            HandlerEntry {
                descriptor: Arc::new(descriptor),
                factory: Arc::new(factory),
            },
        );
    }

    fn is_builtin_name(&self, name: &str) -> bool {
        name == self.main_handler || name == self.fail_handler
    }

    fn lookup(&self, name: &str) -> Option<(&HandlerEntry, HandlerSource)> {
        if let Some(entry) = self.handlers.get(name) {
            return Some((entry, HandlerSource::Handlers));
        }
        if self.is_builtin_name(name) {
            return self
                .defaults
                .get(name)
                .map(|entry| (entry, HandlerSource::Defaults));
        }
        None
    }

    /// Whether a handler with this canonical name can be instantiated.
    ///
    /// The defaults namespace is only consulted for the main and fail handlers.
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Descriptor of a registered handler
    #[must_use]
    pub fn descriptor(&self, name: &str) -> Option<Arc<HandlerDescriptor>> {
        self.lookup(name)
            .map(|(entry, _)| Arc::clone(&entry.descriptor))
    }

    /// Conventional location of a handler, e.g. `handlers/BlogService`
    #[must_use]
    pub fn source_location(&self, name: &str) -> Option<String> {
        self.lookup(name)
            .map(|(_, source)| format!("{}/{name}", source.dir()))
    }

    /// Construct a handler.
    ///
    /// Returns `Ok(None)` when nothing is registered under `name`; factory errors
    /// are passed through untouched.
    pub fn instantiate(&self, name: &str) -> anyhow::Result<Option<HandlerInstance>> {
        let Some((entry, source)) = self.lookup(name) else {
            return Ok(None);
        };
        let handler = (entry.factory)()?;
        Ok(Some(HandlerInstance {
            handler,
            descriptor: Arc::clone(&entry.descriptor),
            source,
        }))
    }

    /// Whether the handler declares `method`
    #[must_use]
    pub fn method_exists(descriptor: &HandlerDescriptor, method: &str) -> bool {
        descriptor.has_method(method)
    }

    /// Whether the handler declares the reserved fallback method
    #[must_use]
    pub fn fallback_method_exists(descriptor: &HandlerDescriptor, fallback_method: &str) -> bool {
        descriptor.has_method(fallback_method)
    }

    /// Sorted names of application handlers
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Named post-bind hooks referenced from configuration via `methodFilter`
#[derive(Clone, Default)]
pub struct HookRegistry {
    hooks: HashMap<String, PostBindHook>,
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.hooks.keys().collect();
        names.sort();
        f.debug_struct("HookRegistry").field("hooks", &names).finish()
    }
}

impl HookRegistry {
    /// Empty hook registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook under `name`, replacing any previous one
    pub fn register<F>(&mut self, name: impl Into<String>, hook: F)
    where
        F: Fn(&mut dyn Handler, &mut Vec<Value>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.hooks.insert(name.into(), Arc::new(hook));
    }

    /// Look up a hook by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<PostBindHook> {
        self.hooks.get(name).map(Arc::clone)
    }

    /// Whether a hook is registered under `name`
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.hooks.contains_key(name)
    }

    /// Move every hook of `other` into this registry, replacing same-named ones
    pub fn extend(&mut self, other: HookRegistry) {
        self.hooks.extend(other.hooks);
    }
}
