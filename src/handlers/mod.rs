//! # Handlers Module
//!
//! Handler-side types of the dispatch layer.
//!
//! A handler is registered with a [`HandlerDescriptor`] (protocol, main-only flag and
//! the full method table with parameter defaults) and a [`HandlerFactory`] that
//! constructs a fresh instance per request. The dispatcher never inspects a handler
//! beyond its descriptor; it only calls [`Handler::call`] with a resolved method and
//! bound arguments.
//!
//! ## Protocols
//!
//! - **site** handlers expose many methods; `/blog/show-post/7` calls `doShowPost("7")`
//! - **rest** handlers expose one method per HTTP verb; `GET /articles/7` calls `get("7")`
//!
//! ## Example
//!
//! ```rust
//! use svcrouter::handlers::{CallContext, Handler, HandlerDescriptor, MethodSpec};
//! use serde_json::{json, Value};
//!
//! struct BlogService;
//!
//! impl Handler for BlogService {
//!     fn call(&mut self, method: &str, args: &[Value], _ctx: &mut CallContext<'_>) -> anyhow::Result<Value> {
//!         Ok(json!({ "method": method, "args": args }))
//!     }
//! }
//!
//! let descriptor = HandlerDescriptor::site("BlogService")
//!     .with_method(MethodSpec::new("doMain"))
//!     .with_method(MethodSpec::new("doShowPost").param("id").param_or("format", json!("html")));
//! assert!(descriptor.has_method("doShowPost"));
//! ```

mod builtin;
mod types;

pub use builtin::{DefaultFailHandler, DefaultMainHandler};
pub use types::{
    CallContext, Handler, HandlerDecl, HandlerDescriptor, HandlerFactory, MethodSpec, ParamSpec,
    PostBindHook, Protocol,
};
