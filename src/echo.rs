use crate::handlers::{CallContext, Handler};
use serde_json::{json, Value};

/// Stand-in handler for routes declared in configuration only.
///
/// Echoes back what the dispatcher resolved so a route table can be exercised
/// end-to-end without application code.
#[derive(Debug, Clone)]
pub struct EchoHandler {
    name: String,
}

impl EchoHandler {
    /// Echo handler answering as `name`
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Handler for EchoHandler {
    fn call(
        &mut self,
        method: &str,
        args: &[Value],
        ctx: &mut CallContext<'_>,
    ) -> anyhow::Result<Value> {
        Ok(json!({
            "handler": self.name,
            "method": method,
            "verb": ctx.request.method().as_str(),
            "path": ctx.request.path(),
            "args": args,
        }))
    }
}
