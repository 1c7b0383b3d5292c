//! # Resolver Module
//!
//! Per-handler resolution steps run by the dispatcher once a handler instance exists:
//!
//! - [`MethodResolver`] derives the method name from the request and checks it
//!   against the handler's declared methods, falling back to the reserved
//!   fallback method
//! - [`ArgumentBinder`] binds path segments (or regex captures) to the method's
//!   parameters, filling gaps with declared defaults

mod binder;
mod method;
#[cfg(test)]
mod tests;

pub use binder::ArgumentBinder;
pub use method::{MethodChoice, MethodResolver, MethodSource, MethodState};
