//! Built-in main and fail handlers served from the shared defaults namespace.

use super::types::{CallContext, Handler, HandlerDescriptor, MethodSpec};
use serde_json::{json, Value};

/// Landing handler used when the application registers no main handler of its own
#[derive(Debug, Default)]
pub struct DefaultMainHandler;

impl DefaultMainHandler {
    /// Descriptor for `name` exposing only `main_method`
    #[must_use]
    pub fn descriptor(name: &str, main_method: &str) -> HandlerDescriptor {
        HandlerDescriptor::site(name)
            .main_only()
            .with_method(MethodSpec::new(main_method))
    }
}

impl Handler for DefaultMainHandler {
    fn call(
        &mut self,
        method: &str,
        _args: &[Value],
        ctx: &mut CallContext<'_>,
    ) -> anyhow::Result<Value> {
        Ok(json!({
            "handler": "main",
            "method": method,
            "path": ctx.request.path(),
        }))
    }
}

/// Terminal handler for routing misses.
///
/// Renders the failure record it was escalated with. The dispatcher forces the
/// failure status onto the response regardless of what this body says.
#[derive(Debug, Default)]
pub struct DefaultFailHandler;

impl DefaultFailHandler {
    /// Descriptor for `name` exposing only `main_method`
    #[must_use]
    pub fn descriptor(name: &str, main_method: &str) -> HandlerDescriptor {
        HandlerDescriptor::site(name)
            .main_only()
            .with_method(MethodSpec::new(main_method))
    }
}

impl Handler for DefaultFailHandler {
    fn call(
        &mut self,
        _method: &str,
        _args: &[Value],
        ctx: &mut CallContext<'_>,
    ) -> anyhow::Result<Value> {
        ctx.set_header("content-type", "application/json");
        Ok(match ctx.failure {
            Some(failure) => {
                ctx.status = failure.code;
                json!({ "error": failure.text, "code": failure.code })
            }
            None => {
                ctx.status = 404;
                json!({ "error": "Not Found", "code": 404 })
            }
        })
    }
}
