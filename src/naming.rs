//! Kebab-case path segment to canonical identifier conversion.
//!
//! Public URLs use dash-cased words (`/user-profile/edit-name`), handlers and their
//! methods use camel-cased identifiers (`UserProfileService::doEditName`). The
//! [`NameTransformer`] performs that mapping using the configured suffix and prefix.

/// Default suffix appended to every canonical handler name
pub const DEFAULT_HANDLER_SUFFIX: &str = "Service";

/// Default prefix prepended to every canonical method name
pub const DEFAULT_METHOD_PREFIX: &str = "do";

/// Converts raw path segments into canonical handler and method names.
///
/// Both conversions are pure and total: every input string, including the empty
/// string, produces a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTransformer {
    handler_suffix: String,
    method_prefix: String,
}

impl Default for NameTransformer {
    fn default() -> Self {
        Self::new(DEFAULT_HANDLER_SUFFIX, DEFAULT_METHOD_PREFIX)
    }
}

impl NameTransformer {
    /// Create a transformer with a custom handler suffix and method prefix
    #[must_use]
    pub fn new(handler_suffix: impl Into<String>, method_prefix: impl Into<String>) -> Self {
        Self {
            handler_suffix: handler_suffix.into(),
            method_prefix: method_prefix.into(),
        }
    }

    /// Suffix appended to handler names
    #[must_use]
    pub fn handler_suffix(&self) -> &str {
        &self.handler_suffix
    }

    /// Prefix prepended to method names
    #[must_use]
    pub fn method_prefix(&self) -> &str {
        &self.method_prefix
    }

    /// Convert a raw segment into a canonical handler name.
    ///
    /// `foo-bar` becomes `FooBarService`. The suffix is not appended twice, so the
    /// conversion is idempotent on its own output.
    #[must_use]
    pub fn to_handler_name(&self, raw: &str) -> String {
        let mut name = camelize(raw);
        if !name.ends_with(self.handler_suffix.as_str()) {
            name.push_str(&self.handler_suffix);
        }
        name
    }

    /// Convert a raw segment into a canonical method name.
    ///
    /// `edit-name` becomes `doEditName`.
    #[must_use]
    pub fn to_method_name(&self, raw: &str) -> String {
        let camel = camelize(raw);
        let mut name = String::with_capacity(self.method_prefix.len() + camel.len());
        name.push_str(&self.method_prefix);
        name.push_str(&camel);
        name
    }
}

/// Upper-case the first character and replace each `-x` pair with `X`.
///
/// A dash with nothing after it is kept as-is.
fn camelize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    if let Some(first) = chars.next() {
        if first == '-' {
            match chars.next() {
                Some(next) => out.extend(next.to_uppercase()),
                None => out.push('-'),
            }
        } else {
            out.extend(first.to_uppercase());
        }
    }

    while let Some(c) = chars.next() {
        if c == '-' {
            match chars.next() {
                Some(next) => out.extend(next.to_uppercase()),
                None => out.push('-'),
            }
        } else {
            out.push(c);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_segment_is_capitalized_and_suffixed() {
        let names = NameTransformer::default();
        for raw in ["user", "a", "blog", "x1"] {
            let mut expected = raw[..1].to_uppercase();
            expected.push_str(&raw[1..]);
            expected.push_str("Service");
            assert_eq!(names.to_handler_name(raw), expected);
        }
    }

    #[test]
    fn test_kebab_segment_becomes_camel_case() {
        let names = NameTransformer::default();
        assert_eq!(names.to_handler_name("foo-bar"), "FooBarService");
        assert_eq!(names.to_handler_name("user-profile"), "UserProfileService");
        assert_eq!(names.to_handler_name("a-b-c"), "ABCService");
    }

    #[test]
    fn test_empty_segment_still_gets_suffix() {
        let names = NameTransformer::default();
        assert_eq!(names.to_handler_name(""), "Service");
        assert_eq!(names.to_method_name(""), "do");
    }

    #[test]
    fn test_suffix_is_not_doubled() {
        let names = NameTransformer::default();
        let once = names.to_handler_name("order-item");
        assert_eq!(names.to_handler_name(&once), once);
        assert_eq!(names.to_handler_name("MainService"), "MainService");
    }

    #[test]
    fn test_method_name_uses_prefix() {
        let names = NameTransformer::default();
        assert_eq!(names.to_method_name("edit-name"), "doEditName");
        assert_eq!(names.to_method_name("list"), "doList");
    }

    #[test]
    fn test_trailing_and_leading_dashes() {
        let names = NameTransformer::default();
        assert_eq!(names.to_handler_name("foo-"), "Foo-Service");
        assert_eq!(names.to_handler_name("-foo"), "FooService");
        assert_eq!(names.to_handler_name("--a"), "-aService");
    }

    #[test]
    fn test_custom_suffix_and_prefix() {
        let names = NameTransformer::new("Controller", "action");
        assert_eq!(names.to_handler_name("news-feed"), "NewsFeedController");
        assert_eq!(names.to_method_name("show-all"), "actionShowAll");
    }
}
