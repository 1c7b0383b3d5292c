use crate::config::RegexArgumentPolicy;
use crate::handlers::MethodSpec;
use serde_json::Value;

/// Binds positional values to a method's declared parameters.
///
/// Binding never fails. Parameters without a value take their declared default, and
/// parameters without either get `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgumentBinder {
    policy: RegexArgumentPolicy,
}

impl ArgumentBinder {
    #[must_use]
    pub fn new(policy: RegexArgumentPolicy) -> Self {
        Self { policy }
    }

    /// Bind raw path segments; the result has exactly one value per parameter
    #[must_use]
    pub fn bind(method: Option<&MethodSpec>, raw_segments: &[String]) -> Vec<Value> {
        let Some(method) = method else {
            return Vec::new();
        };
        method
            .params
            .iter()
            .enumerate()
            .map(|(i, param)| match raw_segments.get(i) {
                Some(raw) => Value::String(raw.clone()),
                None => param.default.clone().unwrap_or(Value::Null),
            })
            .collect()
    }

    /// Bind arguments a regex route captured.
    ///
    /// Under [`RegexArgumentPolicy::Verbatim`] the captures are the argument list as
    /// they are, groups that did not participate becoming `null`. Under
    /// [`RegexArgumentPolicy::FillDefaults`] they are bound like path segments.
    #[must_use]
    pub fn bind_supplied(&self, method: Option<&MethodSpec>, captured: &[Option<String>]) -> Vec<Value> {
        match self.policy {
            RegexArgumentPolicy::Verbatim => captured
                .iter()
                .map(|c| c.clone().map_or(Value::Null, Value::String))
                .collect(),
            RegexArgumentPolicy::FillDefaults => {
                let Some(method) = method else {
                    return Vec::new();
                };
                method
                    .params
                    .iter()
                    .enumerate()
                    .map(|(i, param)| match captured.get(i) {
                        Some(Some(raw)) => Value::String(raw.clone()),
                        _ => param.default.clone().unwrap_or(Value::Null),
                    })
                    .collect()
            }
        }
    }
}
