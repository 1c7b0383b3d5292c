use crate::config::DispatchSettings;
use crate::handlers::{HandlerDescriptor, Protocol};
use crate::naming::NameTransformer;
use crate::registry::HandlerRegistry;
use crate::request::RouteRequest;
use std::collections::HashMap;
use std::fmt;

/// Rule that selected a method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodSource {
    /// Fixed by an alias or regex route
    Supplied,
    /// Handler is main-only
    MainOnly,
    /// Alias method map entry for the second segment
    MethodMap,
    /// Second segment empty or the main keyword
    MainKeyword,
    /// Second segment transformed into a method name
    Segment,
    /// Lowercase HTTP verb
    Verb,
    /// The fail handler's main method
    Fail,
}

/// Outcome of method derivation, before the existence check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodChoice {
    /// Canonical method name
    pub method: String,
    /// Rule that picked it
    pub source: MethodSource,
    /// Index of the first path segment that is an argument
    pub arg_offset: usize,
}

/// Method resolution state for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodState {
    /// A method was chosen and exists (possibly as the fallback)
    Resolved {
        method: String,
        via_fallback: bool,
    },
    /// Neither the method nor the fallback exists; escalate to the fail handler
    Failed { requested: String },
}

impl fmt::Display for MethodState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodState::Resolved {
                method,
                via_fallback: false,
            } => write!(f, "resolved({method})"),
            MethodState::Resolved {
                method,
                via_fallback: true,
            } => write!(f, "resolved({method}, fallback)"),
            MethodState::Failed { requested } => write!(f, "failed({requested})"),
        }
    }
}

/// Derives the method to call on a handler from the request.
#[derive(Debug, Clone, Copy)]
pub struct MethodResolver<'a> {
    names: &'a NameTransformer,
    settings: &'a DispatchSettings,
}

impl<'a> MethodResolver<'a> {
    #[must_use]
    pub fn new(names: &'a NameTransformer, settings: &'a DispatchSettings) -> Self {
        Self { names, settings }
    }

    /// Main method of a protocol
    #[must_use]
    pub fn main_method(&self, protocol: Protocol) -> &'a str {
        match protocol {
            Protocol::Site => &self.settings.site_main_method,
            Protocol::Rest => &self.settings.rest_main_method,
        }
    }

    /// Choose a method for a (non-fail) handler.
    ///
    /// Precedence: a supplied method wins outright; then main-only handlers get the
    /// main method; site handlers read the second segment (method map, main keyword,
    /// then name transform); rest handlers use the lowercase verb.
    #[must_use]
    pub fn choose(
        &self,
        descriptor: &HandlerDescriptor,
        request: &RouteRequest,
        supplied: Option<&str>,
        method_map: Option<&HashMap<String, String>>,
    ) -> MethodChoice {
        if let Some(method) = supplied {
            return MethodChoice {
                method: method.to_string(),
                source: MethodSource::Supplied,
                arg_offset: 1,
            };
        }

        if descriptor.main_only {
            return MethodChoice {
                method: self.main_method(descriptor.protocol).to_string(),
                source: MethodSource::MainOnly,
                arg_offset: 1,
            };
        }

        match descriptor.protocol {
            Protocol::Site => {
                let raw = request.segment(1);
                let mapped = method_map.and_then(|map| map.get(&raw.to_lowercase()));
                let (method, source) = if let Some(mapped) = mapped {
                    (mapped.clone(), MethodSource::MethodMap)
                } else if raw.is_empty() || raw == self.settings.main_keyword {
                    (
                        self.main_method(Protocol::Site).to_string(),
                        MethodSource::MainKeyword,
                    )
                } else {
                    (self.names.to_method_name(raw), MethodSource::Segment)
                };
                MethodChoice {
                    method,
                    source,
                    arg_offset: 2,
                }
            }
            Protocol::Rest => MethodChoice {
                method: request.method().as_str().to_lowercase(),
                source: MethodSource::Verb,
                arg_offset: 1,
            },
        }
    }

    /// Method choice for the fail handler: always its main method, no arguments
    #[must_use]
    pub fn fail_choice(&self, descriptor: &HandlerDescriptor) -> MethodChoice {
        MethodChoice {
            method: self.main_method(descriptor.protocol).to_string(),
            source: MethodSource::Fail,
            arg_offset: usize::MAX,
        }
    }

    /// Check the chosen method against the descriptor, trying the fallback method
    #[must_use]
    pub fn check(&self, descriptor: &HandlerDescriptor, choice: &MethodChoice) -> MethodState {
        if HandlerRegistry::method_exists(descriptor, &choice.method) {
            MethodState::Resolved {
                method: choice.method.clone(),
                via_fallback: false,
            }
        } else if HandlerRegistry::fallback_method_exists(descriptor, &self.settings.fallback_method)
        {
            MethodState::Resolved {
                method: self.settings.fallback_method.clone(),
                via_fallback: true,
            }
        } else {
            MethodState::Failed {
                requested: choice.method.clone(),
            }
        }
    }
}
