//! Route configuration loading from disk, validation and environment overrides

mod common;

use common::{app, write_config};
use serde_json::json;
use svcrouter::config::{load_route_config, AliasSpec};
use svcrouter::runtime_config::RuntimeConfig;
use svcrouter::{ConfigError, Dispatcher, RegexArgumentPolicy, RouteRequest};

const YAML: &str = r#"
settings:
  regex_arguments: fill-defaults
aliases:
  profile: user-profile
  news:
    0: article
    method: get
routes:
  - pattern: '^/(\d{4})/(\d{2})$'
    target: archive
    method: doMonth
"#;

#[test]
fn test_load_yaml_and_dispatch() {
    let file = write_config(YAML, "yaml");
    let config = load_route_config(file.path()).unwrap();
    assert_eq!(
        config.settings.regex_arguments,
        RegexArgumentPolicy::FillDefaults
    );
    assert_eq!(config.aliases["news"].target(), "article");
    assert!(config.validate().is_ok());

    let d = app(config);
    let target = d.resolve(&RouteRequest::get("/profile/edit-name/9")).unwrap();
    assert_eq!(target.handler_name, "UserProfileService");

    let target = d.resolve(&RouteRequest::get("/news/3")).unwrap();
    assert_eq!(target.handler_name, "ArticleService");
    assert_eq!(target.method, "get");
    assert_eq!(target.arguments, vec![json!("3"), json!("en")]);

    let target = d.resolve(&RouteRequest::get("/1999/12")).unwrap();
    assert_eq!(target.arguments, vec![json!("1999"), json!("12"), json!(1)]);
}

#[test]
fn test_load_toml() {
    let file = write_config(
        r#"
[aliases]
blog = "article"

[[routes]]
pattern = '^/a/(\d+)$'
target = "archive"
method = "doYear"
"#,
        "toml",
    );
    let config = load_route_config(file.path()).unwrap();
    assert!(matches!(config.aliases["blog"], AliasSpec::Target(ref t) if t == "article"));
    assert_eq!(config.regex_routes.len(), 1);
}

#[test]
fn test_load_json_with_declared_handlers() {
    let file = write_config(
        r#"{
  "aliases": { "home": { "0": "landing", "methods": { "about": "doAbout" } } },
  "handlers": [
    { "name": "LandingService", "methods": [ { "name": "doAbout" } ] },
    { "name": "StatusService", "protocol": "rest", "mainOnly": true,
      "methods": [ { "name": "handle" } ] }
  ]
}"#,
        "json",
    );
    let config = load_route_config(file.path()).unwrap();
    let d = Dispatcher::from_config(config).unwrap();

    let response = d.dispatch(&RouteRequest::get("/home/about")).unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body["handler"], "LandingService");
    assert_eq!(response.body["method"], "doAbout");

    let target = d.resolve(&RouteRequest::get("/status/anything")).unwrap();
    assert_eq!(target.method, "handle");
    assert_eq!(target.arguments, Vec::<serde_json::Value>::new());
}

#[test]
fn test_missing_file_has_context() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_route_config(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(format!("{err:#}").contains("absent.yaml"));
}

#[test]
fn test_validate_collects_all_errors() {
    let file = write_config(
        r#"
aliases:
  empty: ""
routes:
  - pattern: '(['
    method: doX
  - target: nothing
handlers:
  - name: OddService
    protocol: soap
"#,
        "yml",
    );
    let config = load_route_config(file.path()).unwrap();
    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 5);
    assert!(errors.contains(&ConfigError::EmptyAliasTarget {
        key: "empty".into()
    }));
    assert!(errors.contains(&ConfigError::MissingPattern { index: 1 }));
    assert!(errors.contains(&ConfigError::MissingMethod { index: 1 }));
    assert!(errors.contains(&ConfigError::UnknownProtocol {
        handler: "OddService".into(),
        protocol: "soap".into(),
    }));
    assert!(matches!(
        errors[1],
        ConfigError::InvalidPattern { index: 0, .. }
    ));
}

#[test]
fn test_unknown_protocol_fails_build() {
    let file = write_config(
        "handlers:\n  - name: OddService\n    protocol: soap\n",
        "yaml",
    );
    let config = load_route_config(file.path()).unwrap();
    assert!(matches!(
        Dispatcher::from_config(config).unwrap_err(),
        ConfigError::UnknownProtocol { .. }
    ));
}

#[test]
fn test_env_overrides_apply_to_loaded_settings() {
    let file = write_config(YAML, "yaml");
    let mut config = load_route_config(file.path()).unwrap();
    let overrides = RuntimeConfig::from_lookup(|key| match key {
        "SVCR_HANDLER_SUFFIX" => Some("Controller".to_string()),
        "SVCR_REGEX_ARGUMENTS" => Some("verbatim".to_string()),
        _ => None,
    });
    overrides.apply(&mut config.settings);
    assert_eq!(config.settings.handler_suffix, "Controller");
    assert_eq!(config.settings.regex_arguments, RegexArgumentPolicy::Verbatim);
    assert_eq!(config.settings.method_prefix, "do");
}
