//! Lookup table from method name to custom code method
//!
//! Populated once at start-up; afterwards it is only read, so the gateway
//! shares it between concurrent invocations behind an `Arc` without locking.

use std::collections::HashMap;

use crate::error::HandlerError;
use crate::method::{CustomCodeMethod, MethodInfo};
use crate::{Request, Response};

#[derive(Debug, Clone, Default)]
pub struct MethodRegistry {
    methods: HashMap<&'static str, CustomCodeMethod>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a method under its name. Fails if the name is already taken.
    pub fn register(&mut self, method: CustomCodeMethod) -> Result<(), HandlerError> {
        if self.methods.contains_key(method.name()) {
            return Err(HandlerError::DuplicateMethod(method.name().to_string()));
        }

        tracing::debug!(
            method = method.name(),
            params = ?method.declared_params(),
            "Registered custom code method"
        );
        self.methods.insert(method.name(), method);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CustomCodeMethod> {
        self.methods.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Metadata for every registered method, sorted by name
    pub fn list(&self) -> Vec<MethodInfo> {
        let mut infos: Vec<MethodInfo> = self.methods.values().map(CustomCodeMethod::info).collect();
        infos.sort_by(|a, b| a.name.cmp(b.name));
        infos
    }

    /// Execute a registered method
    pub fn execute(&self, name: &str, req: &Request) -> Result<Response, HandlerError> {
        let method = self.get(name)
            .ok_or_else(|| HandlerError::MethodNotFound(name.to_string()))?;

        Ok(method.execute(req))
    }
}
