//! # svcrouter
//!
//! **svcrouter** is the request-to-handler resolution engine of a service-style web
//! dispatch layer. Given an inbound request it decides which handler ("service") and
//! which handler method process it, and binds positional URL segments to that
//! method's declared parameters.
//!
//! ## Overview
//!
//! A request such as `GET /user-profile/edit-name/42` resolves to
//! `UserProfileService::doEditName("42", <defaults>)`. Along the way:
//!
//! - the first segment becomes a handler candidate, through the alias table, the
//!   ordered regex routes or a kebab-to-camel name transform
//! - the registry confirms the handler exists and constructs an instance
//! - the method is derived per handler protocol (`site` reads the second segment,
//!   `rest` uses the HTTP verb) and checked, falling back to a reserved fallback
//!   method
//! - the remaining segments (or regex captures) are bound to parameters, with
//!   declared defaults filling the gaps
//!
//! A miss at either tier escalates once to the fail handler, answered with 404.
//!
//! ## Architecture
//!
//! - **[`naming`]** - segment to canonical handler/method name conversion
//! - **[`router`]** - alias table, regex routes and candidate selection
//! - **[`registry`]** - handler descriptors, factories and post-bind hooks
//! - **[`resolver`]** - method derivation and argument binding
//! - **[`dispatcher`]** - the resolution state machine and invocation
//! - **[`handlers`]** - the handler trait, descriptors and built-in handlers
//! - **[`config`]** - route configuration loading and validation
//! - **[`runtime_config`]** - environment overrides
//! - **[`otel`]** - structured logging setup
//! - **[`cli`]** - the `svcrouter` command line
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use svcrouter::config::{AliasSpec, RouteConfig};
//! use svcrouter::handlers::{CallContext, Handler, HandlerDescriptor, MethodSpec};
//! use svcrouter::{Dispatcher, RouteRequest};
//!
//! struct Profiles;
//!
//! impl Handler for Profiles {
//!     fn call(
//!         &mut self,
//!         method: &str,
//!         args: &[serde_json::Value],
//!         _ctx: &mut CallContext<'_>,
//!     ) -> anyhow::Result<serde_json::Value> {
//!         Ok(json!({ "method": method, "args": args }))
//!     }
//! }
//!
//! let mut config = RouteConfig::default();
//! config.aliases.insert("me".into(), AliasSpec::Target("user-profile".into()));
//!
//! let dispatcher = Dispatcher::builder(config)
//!     .handler(
//!         HandlerDescriptor::site("UserProfileService")
//!             .with_method(MethodSpec::new("doEditName").param("id").param_or("field", json!("name"))),
//!         || Ok(Box::new(Profiles)),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let response = dispatcher.dispatch(&RouteRequest::get("/me/edit-name/42")).unwrap();
//! assert_eq!(response.status, 200);
//! assert_eq!(response.body["args"], json!(["42", "name"]));
//!
//! let missing = dispatcher.dispatch(&RouteRequest::get("/nobody")).unwrap();
//! assert_eq!(missing.status, 404);
//! ```

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod echo;
pub mod error;
pub mod handlers;
pub mod naming;
pub mod otel;
pub mod registry;
pub mod request;
pub mod resolver;
pub mod router;
pub mod runtime_config;

pub use config::{load_route_config, DispatchSettings, RegexArgumentPolicy, RouteConfig};
pub use dispatcher::{
    DispatchFailure, Dispatcher, DispatcherBuilder, FailureKind, HandlerResponse, ResolvedTarget,
};
pub use error::{ConfigError, DispatchError};
pub use handlers::{CallContext, Handler, HandlerDescriptor, MethodSpec, ParamSpec, Protocol};
pub use naming::NameTransformer;
pub use registry::{HandlerRegistry, HookRegistry};
pub use request::RouteRequest;
pub use router::RouteTable;
