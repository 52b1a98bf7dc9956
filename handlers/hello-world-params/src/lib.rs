//! `hello_world_params` custom code method
//!
//! Echoes the `param1` and `param2` parameters, plus the request body when
//! one was sent, back to the caller with a 200.
use custom_code_sdk::prelude::*;

pub const METHOD_NAME: &str = "hello_world_params";

pub const PARAMS: &[&str] = &["param1", "param2"];

pub const HELLO_WORLD_PARAMS: CustomCodeMethod = CustomCodeMethod::new(METHOD_NAME, PARAMS, execute);

/// Handle one invocation. Absent parameters are kept in the response as `null`.
pub fn execute(req: &Request) -> Response {
    let param1 = req.param("param1").map(str::to_string);
    let param2 = req.param("param2").map(str::to_string);

    let mut fields = Fields::new();
    if req.has_body() {
        fields.insert("body".to_string(), Some(req.body.clone()));
    }
    fields.insert("param1".to_string(), param1);
    fields.insert("param2".to_string(), param2);

    tracing::debug!(request_id = %req.request_id, fields = fields.len(), "hello_world_params");
    Response::ok(fields)
}

/// Add this method to a registry
pub fn register(registry: &mut MethodRegistry) -> Result<(), HandlerError> {
    registry.register(HELLO_WORLD_PARAMS)
}
