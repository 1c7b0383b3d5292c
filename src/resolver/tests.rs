use super::{ArgumentBinder, MethodResolver, MethodSource, MethodState};
use crate::config::{DispatchSettings, RegexArgumentPolicy};
use crate::handlers::{HandlerDescriptor, MethodSpec};
use crate::naming::NameTransformer;
use crate::request::RouteRequest;
use http::Method;
use serde_json::{json, Value};
use std::collections::HashMap;

fn site() -> HandlerDescriptor {
    HandlerDescriptor::site("UserProfileService")
        .with_method(MethodSpec::new("doMain"))
        .with_method(MethodSpec::new("doEditName").param("id").param_or("field", json!("name")))
}

fn segments(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_supplied_method_overrides_everything() {
    let names = NameTransformer::default();
    let settings = DispatchSettings::default();
    let resolver = MethodResolver::new(&names, &settings);
    let req = RouteRequest::get("/profile/edit-name/42");

    let choice = resolver.choose(&site().main_only(), &req, Some("doExport"), None);
    assert_eq!(choice.method, "doExport");
    assert_eq!(choice.source, MethodSource::Supplied);
    assert_eq!(choice.arg_offset, 1);
}

#[test]
fn test_main_only_uses_protocol_main() {
    let names = NameTransformer::default();
    let settings = DispatchSettings::default();
    let resolver = MethodResolver::new(&names, &settings);
    let req = RouteRequest::get("/profile/edit-name/42");

    let site_choice = resolver.choose(&site().main_only(), &req, None, None);
    assert_eq!(site_choice.method, "doMain");
    assert_eq!(site_choice.source, MethodSource::MainOnly);

    let rest_choice = resolver.choose(&HandlerDescriptor::rest("R").main_only(), &req, None, None);
    assert_eq!(rest_choice.method, "handle");
}

#[test]
fn test_site_method_from_second_segment() {
    let names = NameTransformer::default();
    let settings = DispatchSettings::default();
    let resolver = MethodResolver::new(&names, &settings);

    let choice = resolver.choose(&site(), &RouteRequest::get("/profile/edit-name/42"), None, None);
    assert_eq!(choice.method, "doEditName");
    assert_eq!(choice.source, MethodSource::Segment);
    assert_eq!(choice.arg_offset, 2);

    for path in ["/profile", "/profile/main", "/profile//7"] {
        let choice = resolver.choose(&site(), &RouteRequest::get(path), None, None);
        assert_eq!(choice.method, "doMain", "path {path}");
        assert_eq!(choice.source, MethodSource::MainKeyword);
    }
}

#[test]
fn test_method_map_takes_precedence_over_keyword_and_transform() {
    let names = NameTransformer::default();
    let settings = DispatchSettings::default();
    let resolver = MethodResolver::new(&names, &settings);
    let mut map = HashMap::new();
    map.insert("main".to_string(), "doDashboard".to_string());
    map.insert("rename".to_string(), "doEditName".to_string());

    let choice = resolver.choose(&site(), &RouteRequest::get("/p/ReName/1"), None, Some(&map));
    assert_eq!(choice.method, "doEditName");
    assert_eq!(choice.source, MethodSource::MethodMap);

    let choice = resolver.choose(&site(), &RouteRequest::get("/p/main"), None, Some(&map));
    assert_eq!(choice.method, "doDashboard");

    let choice = resolver.choose(&site(), &RouteRequest::get("/p/show-all"), None, Some(&map));
    assert_eq!(choice.method, "doShowAll");
}

#[test]
fn test_rest_method_is_lowercase_verb() {
    let names = NameTransformer::default();
    let settings = DispatchSettings::default();
    let resolver = MethodResolver::new(&names, &settings);
    let rest = HandlerDescriptor::rest("ArticleService");

    let choice = resolver.choose(&rest, &RouteRequest::new(Method::DELETE, "/article/9"), None, None);
    assert_eq!(choice.method, "delete");
    assert_eq!(choice.source, MethodSource::Verb);
    assert_eq!(choice.arg_offset, 1);
}

#[test]
fn test_check_falls_back_then_fails() {
    let names = NameTransformer::default();
    let settings = DispatchSettings::default();
    let resolver = MethodResolver::new(&names, &settings);
    let req = RouteRequest::get("/profile/delete-all");

    let choice = resolver.choose(&site(), &req, None, None);
    assert_eq!(
        resolver.check(&site(), &choice),
        MethodState::Failed {
            requested: "doDeleteAll".into()
        }
    );

    let with_fallback = site().with_method(MethodSpec::new("doFallback"));
    assert_eq!(
        resolver.check(&with_fallback, &choice),
        MethodState::Resolved {
            method: "doFallback".into(),
            via_fallback: true
        }
    );

    let existing = resolver.choose(&site(), &RouteRequest::get("/profile/edit-name"), None, None);
    assert_eq!(
        resolver.check(&site(), &existing).to_string(),
        "resolved(doEditName)"
    );
}

#[test]
fn test_bind_fills_defaults_and_nulls() {
    let method = MethodSpec::new("doX")
        .param("a")
        .param_or("b", json!("dflt"))
        .param_or("c", Value::Null);
    let args = ArgumentBinder::bind(Some(&method), &segments(&["x"]));
    assert_eq!(args, vec![json!("x"), json!("dflt"), Value::Null]);

    let required_only = MethodSpec::new("doY").param("a").param("b");
    assert_eq!(
        ArgumentBinder::bind(Some(&required_only), &[]),
        vec![Value::Null, Value::Null]
    );
}

#[test]
fn test_bind_truncates_extra_segments() {
    let method = MethodSpec::new("doX").param("a");
    let args = ArgumentBinder::bind(Some(&method), &segments(&["1", "2", "3"]));
    assert_eq!(args, vec![json!("1")]);
    assert!(ArgumentBinder::bind(None, &segments(&["1"])).is_empty());
}

#[test]
fn test_regex_captures_verbatim_vs_fill_defaults() {
    let method = MethodSpec::new("doArchive")
        .param("year")
        .param("month")
        .param_or("day", json!("01"));
    let captured = vec![Some("2024".to_string()), Some("05".to_string())];

    let verbatim = ArgumentBinder::new(RegexArgumentPolicy::Verbatim);
    assert_eq!(
        verbatim.bind_supplied(Some(&method), &captured),
        vec![json!("2024"), json!("05")]
    );

    let filling = ArgumentBinder::new(RegexArgumentPolicy::FillDefaults);
    assert_eq!(
        filling.bind_supplied(Some(&method), &captured),
        vec![json!("2024"), json!("05"), json!("01")]
    );
}

#[test]
fn test_non_participating_group_is_null() {
    let captured = vec![Some("a".to_string()), None];
    let verbatim = ArgumentBinder::default();
    assert_eq!(
        verbatim.bind_supplied(None, &captured),
        vec![json!("a"), Value::Null]
    );

    let method = MethodSpec::new("doX").param("a").param_or("b", json!(5));
    let filling = ArgumentBinder::new(RegexArgumentPolicy::FillDefaults);
    assert_eq!(
        filling.bind_supplied(Some(&method), &captured),
        vec![json!("a"), json!(5)]
    );
}
