//! Custom Code SDK - Types and utilities for writing custom code methods
//!
//! A custom code method receives one [`Request`] per inbound API call and
//! returns one [`Response`]. Methods are described by a [`CustomCodeMethod`]
//! and collected in a [`MethodRegistry`], which the gateway consults to route
//! calls by method name.

pub mod request;
pub mod response;
pub mod method;
pub mod registry;
pub mod ipc;
pub mod error;

#[doc(hidden)]
pub use tracing;

pub mod prelude {
    //! Common imports for custom code methods
    pub use crate::request::Request;
    pub use crate::response::{Fields, Response};
    pub use crate::method::CustomCodeMethod;
    pub use crate::registry::MethodRegistry;
    pub use crate::error::HandlerError;
}

// Re-export key types at crate root
pub use request::Request;
pub use response::{Fields, Response};
pub use method::{CustomCodeMethod, MethodFn, MethodInfo};
pub use registry::MethodRegistry;
pub use error::HandlerError;
