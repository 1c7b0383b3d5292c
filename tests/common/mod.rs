#![allow(dead_code)]

use serde_json::{json, Value};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use svcrouter::config::RouteConfig;
use svcrouter::handlers::{CallContext, Handler, HandlerDescriptor, MethodSpec};
use svcrouter::Dispatcher;
use tempfile::NamedTempFile;

/// Handler answering with its name, the method called and the bound arguments
pub struct Recorder {
    pub name: &'static str,
}

impl Handler for Recorder {
    fn call(
        &mut self,
        method: &str,
        args: &[Value],
        ctx: &mut CallContext<'_>,
    ) -> anyhow::Result<Value> {
        Ok(json!({
            "handler": self.name,
            "method": method,
            "args": args,
            "failure": ctx.failure.map(|f| f.text.clone()),
        }))
    }
}

pub fn user_profile() -> HandlerDescriptor {
    HandlerDescriptor::site("UserProfileService")
        .with_method(MethodSpec::new("doMain"))
        .with_method(
            MethodSpec::new("doEditName")
                .param("id")
                .param_or("field", json!("display_name"))
                .param_or("notify", Value::Null),
        )
}

pub fn article() -> HandlerDescriptor {
    HandlerDescriptor::rest("ArticleService")
        .with_method(MethodSpec::new("get").param("id").param_or("lang", json!("en")))
        .with_method(MethodSpec::new("delete").param("id"))
}

pub fn archive() -> HandlerDescriptor {
    HandlerDescriptor::site("ArchiveService")
        .with_method(
            MethodSpec::new("doMonth")
                .param("year")
                .param("month")
                .param_or("page", json!(1)),
        )
        .with_method(MethodSpec::new("doYear").param("year"))
}

/// Dispatcher with the sample handlers registered on top of `config`
pub fn app(config: RouteConfig) -> Dispatcher {
    Dispatcher::builder(config)
        .handler(user_profile(), || {
            Ok(Box::new(Recorder {
                name: "UserProfileService",
            }))
        })
        .handler(article(), || Ok(Box::new(Recorder { name: "ArticleService" })))
        .handler(archive(), || Ok(Box::new(Recorder { name: "ArchiveService" })))
        .build()
        .unwrap()
}

/// Factory counting how many instances it built
pub fn counting_factory(
    name: &'static str,
) -> (
    Arc<AtomicUsize>,
    impl Fn() -> anyhow::Result<Box<dyn Handler>> + Send + Sync + 'static,
) {
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    let factory = move || -> anyhow::Result<Box<dyn Handler>> {
        seen.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(Recorder { name }))
    };
    (count, factory)
}

/// Write `content` to a temporary file with the given extension
pub fn write_config(content: &str, ext: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("svcr_test_")
        .suffix(&format!(".{ext}"))
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
