//! Custom code method descriptors
//!
//! A custom code method is a plain function plus two pieces of static
//! metadata: the name the gateway routes on and the ordered list of
//! parameters it expects. Descriptors are built in `const` context so a
//! method crate can export one as a constant.
//!
//! # Example
//!
//! ```
//! use custom_code_sdk::prelude::*;
//!
//! fn ping(_req: &Request) -> Response {
//!     Response::ok(Fields::new())
//! }
//!
//! pub const PING: CustomCodeMethod = CustomCodeMethod::new("ping", &[], ping);
//! assert_eq!(PING.name(), "ping");
//! ```

use crate::{Request, Response};
use serde::Serialize;

/// Type alias for the method function signature
pub type MethodFn = fn(&Request) -> Response;

/// A registered custom code method
#[derive(Debug, Clone, Copy)]
pub struct CustomCodeMethod {
    name: &'static str,
    params: &'static [&'static str],
    handler: MethodFn,
}

impl CustomCodeMethod {
    pub const fn new(name: &'static str, params: &'static [&'static str], handler: MethodFn) -> Self {
        Self { name, params, handler }
    }

    /// Name used by the gateway to route matching calls to this method
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Ordered list of parameter names this method expects
    pub fn declared_params(&self) -> &'static [&'static str] {
        self.params
    }

    /// Declared parameters the request does not carry.
    ///
    /// Only used for diagnostics; methods decide for themselves how to treat
    /// an absent parameter.
    pub fn missing_params(&self, req: &Request) -> Vec<&'static str> {
        self.params
            .iter()
            .copied()
            .filter(|p| req.param(p).is_none())
            .collect()
    }

    /// Run the method once
    pub fn execute(&self, req: &Request) -> Response {
        (self.handler)(req)
    }

    /// Registration metadata for this method
    pub fn info(&self) -> MethodInfo {
        MethodInfo {
            name: self.name,
            params: self.params,
        }
    }
}

/// Metadata about a method, as reported by the gateway's listing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodInfo {
    pub name: &'static str,
    pub params: &'static [&'static str],
}
