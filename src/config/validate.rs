use super::types::{AliasSpec, RouteConfig};
use crate::error::ConfigError;
use crate::registry::HookRegistry;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};

impl RouteConfig {
    /// Check the configuration and return every problem found, not just the first.
    ///
    /// Hook names are not checked here since hooks are registered in code; see
    /// [`RouteConfig::validate_hooks`].
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();

        let mut alias_keys = HashSet::with_capacity(self.aliases.len());
        for (key, alias) in &self.aliases {
            if !alias_keys.insert(key.to_lowercase()) {
                errors.push(ConfigError::DuplicateAliasKey { key: key.clone() });
            }
            if alias.target().trim().is_empty() {
                errors.push(ConfigError::EmptyAliasTarget { key: key.clone() });
            }
            if let AliasSpec::Full(full) = alias {
                let mut method_keys = HashSet::with_capacity(full.methods.len());
                for method_key in full.methods.keys() {
                    if !method_keys.insert(method_key.to_lowercase()) {
                        errors.push(ConfigError::DuplicateMethodKey {
                            alias: key.clone(),
                            key: method_key.clone(),
                        });
                    }
                }
            }
        }

        for (index, route) in self.regex_routes.iter().enumerate() {
            match route.pattern.as_deref() {
                None | Some("") => errors.push(ConfigError::MissingPattern { index }),
                Some(pattern) => {
                    if let Err(err) = Regex::new(pattern) {
                        errors.push(ConfigError::InvalidPattern {
                            index,
                            pattern: pattern.to_string(),
                            message: err.to_string(),
                        });
                    }
                }
            }
            if route.method.as_deref().is_none_or(str::is_empty) {
                errors.push(ConfigError::MissingMethod { index });
            }
        }

        for decl in &self.handlers {
            if let Err(err) = decl.to_descriptor() {
                errors.push(err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Every hook name referenced through `methodFilter`, sorted and deduplicated
    #[must_use]
    pub fn hook_names(&self) -> BTreeSet<&str> {
        let from_aliases = self.aliases.values().filter_map(|alias| match alias {
            AliasSpec::Full(full) => full.method_filter.as_deref(),
            AliasSpec::Target(_) => None,
        });
        let from_routes = self
            .regex_routes
            .iter()
            .filter_map(|route| route.method_filter.as_deref());
        from_aliases
            .chain(from_routes)
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Report every referenced hook name that `hooks` does not provide
    pub fn validate_hooks(&self, hooks: &HookRegistry) -> Result<(), Vec<ConfigError>> {
        let errors: Vec<_> = self
            .hook_names()
            .into_iter()
            .filter(|name| !hooks.contains(name))
            .map(|name| ConfigError::UnknownHook {
                name: name.to_string(),
            })
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{AliasConfig, AliasSpec, RegexRouteConfig, RouteConfig};
    use crate::error::ConfigError;
    use crate::handlers::HandlerDecl;
    use crate::registry::HookRegistry;
    use std::collections::BTreeMap;

    fn route(pattern: Option<&str>, method: Option<&str>) -> RegexRouteConfig {
        RegexRouteConfig {
            pattern: pattern.map(str::to_string),
            method: method.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_config_passes() {
        let mut config = RouteConfig::default();
        config
            .aliases
            .insert("news".into(), AliasSpec::Target("ArticleService".into()));
        config.regex_routes.push(route(Some(r"^/a/(\d+)$"), Some("doShow")));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_all_errors_are_reported() {
        let mut config = RouteConfig::default();
        config
            .aliases
            .insert("empty".into(), AliasSpec::Target("  ".into()));
        config.regex_routes.push(route(None, Some("doA")));
        config.regex_routes.push(route(Some("^/b$"), None));
        config.regex_routes.push(route(Some("(unclosed"), Some("")));
        config.handlers.push(HandlerDecl {
            name: "OddService".into(),
            protocol: "soap".into(),
            main_only: false,
            methods: Vec::new(),
        });

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 6);
        assert!(errors.contains(&ConfigError::EmptyAliasTarget {
            key: "empty".into()
        }));
        assert!(errors.contains(&ConfigError::MissingPattern { index: 0 }));
        assert!(errors.contains(&ConfigError::MissingMethod { index: 1 }));
        assert!(errors.contains(&ConfigError::MissingMethod { index: 2 }));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidPattern { index: 2, .. })));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::UnknownProtocol { protocol, .. } if protocol == "soap")));
    }

    #[test]
    fn test_case_colliding_keys_are_reported() {
        let mut methods = BTreeMap::new();
        methods.insert("Latest".to_string(), "doListLatest".to_string());
        methods.insert("latest".to_string(), "doListNewest".to_string());
        let mut config = RouteConfig::default();
        config
            .aliases
            .insert("News".into(), AliasSpec::Target("article".into()));
        config.aliases.insert(
            "news".into(),
            AliasSpec::Full(AliasConfig {
                target: "article".into(),
                method: None,
                method_filter: None,
                methods,
            }),
        );

        let errors = config.validate().unwrap_err();
        assert_eq!(
            errors,
            vec![
                ConfigError::DuplicateAliasKey { key: "news".into() },
                ConfigError::DuplicateMethodKey {
                    alias: "news".into(),
                    key: "latest".into(),
                },
            ]
        );
    }

    #[test]
    fn test_hook_names_and_unregistered_hooks() {
        let mut config = RouteConfig::default();
        config.aliases.insert(
            "news".into(),
            AliasSpec::Full(AliasConfig {
                target: "article".into(),
                method: None,
                method_filter: Some("audit".into()),
                methods: BTreeMap::new(),
            }),
        );
        config.regex_routes.push(RegexRouteConfig {
            method_filter: Some("trim".into()),
            ..route(Some("^/t$"), Some("doT"))
        });
        config.regex_routes.push(RegexRouteConfig {
            method_filter: Some("audit".into()),
            ..route(Some("^/u$"), Some("doU"))
        });

        assert_eq!(
            config.hook_names().into_iter().collect::<Vec<_>>(),
            vec!["audit", "trim"]
        );
        // Hook names are not part of the structural check
        assert!(config.validate().is_ok());

        let mut hooks = HookRegistry::new();
        hooks.register("audit", |_handler, _args| Ok(()));
        assert_eq!(
            config.validate_hooks(&hooks).unwrap_err(),
            vec![ConfigError::UnknownHook {
                name: "trim".into()
            }]
        );
        hooks.register("trim", |_handler, _args| Ok(()));
        assert!(config.validate_hooks(&hooks).is_ok());
    }
}
