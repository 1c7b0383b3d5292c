//! # Dispatcher Module
//!
//! The dispatcher turns a [`RouteRequest`](crate::request::RouteRequest) into a
//! [`ResolvedTarget`]: a handler instance, the canonical method to call on it and the
//! bound argument list. It orchestrates the route table, the handler registry, the
//! method resolver and the argument binder.
//!
//! ## Resolution Stages
//!
//! ```text
//! HandlerNameResolved -> HandlerExistsChecked -> HandlerInstantiated
//!     -> MethodResolved -> MethodExistsChecked -> ArgumentsBound -> Done
//! ```
//!
//! Two misses are recovered by jumping back to `HandlerInstantiated` with the fail
//! handler and its main method:
//!
//! - the candidate handler is not registered
//! - neither the derived method nor the fallback method exists on the handler
//!
//! The jump happens at most once, so a request instantiates at most two handlers.
//! The miss is recorded as a [`DispatchFailure`] on the target and the response is
//! answered with its status (404), whatever the fail handler renders.
//!
//! ## Errors
//!
//! Only faults the dispatcher cannot recover from are returned as
//! [`DispatchError`](crate::error::DispatchError): reaching an incomplete regex route,
//! a handler factory failing, a post-bind hook failing or the handler method itself
//! failing during [`Dispatcher::invoke`].
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use svcrouter::config::RouteConfig;
//! use svcrouter::dispatcher::Dispatcher;
//! use svcrouter::echo::EchoHandler;
//! use svcrouter::handlers::{HandlerDescriptor, MethodSpec};
//! use svcrouter::request::RouteRequest;
//!
//! let dispatcher = Dispatcher::builder(RouteConfig::default())
//!     .handler(
//!         HandlerDescriptor::site("UserProfileService")
//!             .with_method(MethodSpec::new("doEditName").param("id").param_or("field", json!("name"))),
//!         || Ok(Box::new(EchoHandler::new("UserProfileService"))),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let target = dispatcher.resolve(&RouteRequest::get("/user-profile/edit-name/42")).unwrap();
//! assert_eq!(target.handler_name, "UserProfileService");
//! assert_eq!(target.method, "doEditName");
//! assert_eq!(target.arguments, vec![json!("42"), json!("name")]);
//! ```

mod core;

pub use core::{
    DispatchFailure, Dispatcher, DispatcherBuilder, FailureKind, HandlerResponse, HeaderVec,
    ResolvedTarget, MAX_INLINE_HEADERS, NOT_FOUND,
};
