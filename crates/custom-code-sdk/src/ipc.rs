//! IPC protocol for running a custom code method as a worker process.
//!
//! Each frame is a 4-byte big-endian length followed by that many bytes of
//! JSON. The host writes a [`Request`] frame to the worker's stdin and reads a
//! [`Response`] frame back from its stdout; logs go to stderr.
//!
//! ```ignore
//! use custom_code_sdk::method_loop;
//!
//! method_loop!(my_methods::PING);
//! ```

use crate::{HandlerError, Request, Response};
use std::io::{self, Read, Write};

/// Largest frame accepted from the host (16 MiB)
pub const MAX_FRAME_BYTES: usize = 16 * 1024 * 1024;

/// Read a request frame from any reader.
///
/// Returns `Ok(None)` on a clean end of stream before a new frame starts.
pub fn read_request_from<R: Read>(reader: &mut R) -> Result<Option<Request>, HandlerError> {
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(HandlerError::Ipc(format!("Failed to read length prefix: {}", e))),
    }

    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_FRAME_BYTES {
        return Err(HandlerError::Ipc(format!(
            "Frame of {} bytes exceeds limit of {} bytes",
            len, MAX_FRAME_BYTES
        )));
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload)
        .map_err(|e| HandlerError::Ipc(format!("Failed to read payload: {}", e)))?;

    serde_json::from_slice(&payload)
        .map(Some)
        .map_err(|e| HandlerError::Ipc(format!("Failed to parse request: {}", e)))
}

/// Write a response frame to any writer.
pub fn write_response_to<W: Write>(writer: &mut W, response: &Response) -> Result<(), HandlerError> {
    let payload = serde_json::to_vec(response)
        .map_err(|e| HandlerError::Ipc(format!("Failed to serialize response: {}", e)))?;

    let len = u32::try_from(payload.len())
        .map_err(|_| HandlerError::Ipc("Response frame too large".into()))?;

    writer.write_all(&len.to_be_bytes())
        .map_err(|e| HandlerError::Ipc(format!("Failed to write length: {}", e)))?;
    writer.write_all(&payload)
        .map_err(|e| HandlerError::Ipc(format!("Failed to write payload: {}", e)))?;
    writer.flush()
        .map_err(|e| HandlerError::Ipc(format!("Failed to flush: {}", e)))?;

    Ok(())
}

/// Read a request from stdin (sent by the host)
pub fn read_request() -> Result<Option<Request>, HandlerError> {
    let stdin = io::stdin();
    let mut handle = stdin.lock();
    read_request_from(&mut handle)
}

/// Send a response to stdout (received by the host)
pub fn send_response(response: &Response) -> Result<(), HandlerError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_response_to(&mut handle, response)
}

/// Serve one method over stdin/stdout until the host closes stdin.
pub fn serve(method: &crate::CustomCodeMethod) -> Result<(), HandlerError> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    serve_io(method, &mut stdin.lock(), &mut stdout.lock())
}

/// Serve one method over any reader/writer pair.
///
/// Runs the method once per request frame and writes one response frame per
/// request, in order. Returns `Ok` when the reader ends between frames.
pub fn serve_io<R: Read, W: Write>(
    method: &crate::CustomCodeMethod,
    reader: &mut R,
    writer: &mut W,
) -> Result<(), HandlerError> {
    tracing::info!(method = method.name(), "Worker ready");

    while let Some(req) = read_request_from(reader)? {
        tracing::debug!(request_id = %req.request_id, method = method.name(), "Invocation");
        let response = method.execute(&req);
        write_response_to(writer, &response)?;
    }

    tracing::info!(method = method.name(), "Input closed, worker exiting");
    Ok(())
}

/// Convenience macro generating a `main` that serves a method over IPC.
///
/// Logging is initialised to stderr so stdout stays reserved for frames.
#[macro_export]
macro_rules! method_loop {
    ($method:expr) => {
        fn main() {
            $crate::ipc::init_worker_logging();
            if let Err(e) = $crate::ipc::serve(&$method) {
                $crate::tracing::error!("Worker failed: {}", e);
                ::std::process::exit(1);
            }
        }
    };
}

/// Install a stderr `tracing` subscriber for worker processes.
///
/// Honours `RUST_LOG`, defaulting to `info`.
pub fn init_worker_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Fields;
    use std::io::Cursor;

    fn frame(json: &str) -> Vec<u8> {
        let mut buf = (json.len() as u32).to_be_bytes().to_vec();
        buf.extend_from_slice(json.as_bytes());
        buf
    }

    #[test]
    fn test_read_request_frame() {
        let mut input = Cursor::new(frame(
            r#"{"method_name":"hello_world_params","params":{"param1":"foo"},"body":"hi"}"#,
        ));

        let req = read_request_from(&mut input).unwrap().unwrap();
        assert_eq!(req.method_name, "hello_world_params");
        assert_eq!(req.param("param1"), Some("foo"));
        assert_eq!(req.body, "hi");

        assert!(read_request_from(&mut input).unwrap().is_none());
    }

    #[test]
    fn test_truncated_payload_is_an_error() {
        let mut bytes = frame(r#"{"method_name":"m"}"#);
        bytes.truncate(bytes.len() - 3);

        let err = read_request_from(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, HandlerError::Ipc(_)));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let err = read_request_from(&mut Cursor::new(frame("not json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to parse request"));
    }

    #[test]
    fn test_write_response_frame() {
        let mut fields = Fields::new();
        fields.insert("param1".to_string(), None);
        let response = Response::ok(fields);

        let mut out = Vec::new();
        write_response_to(&mut out, &response).unwrap();

        let len = u32::from_be_bytes([out[0], out[1], out[2], out[3]]) as usize;
        assert_eq!(len, out.len() - 4);
        let decoded: Response = serde_json::from_slice(&out[4..]).unwrap();
        assert_eq!(decoded, response);
    }

    #[test]
    fn test_oversized_frame_rejected() {
        let len = (MAX_FRAME_BYTES as u32 + 1).to_be_bytes();

        let err = read_request_from(&mut Cursor::new(len.to_vec())).unwrap_err();
        assert!(err.to_string().contains("exceeds limit"));
    }

    fn echo_body(req: &Request) -> Response {
        let mut fields = Fields::new();
        fields.insert("body".to_string(), Some(req.body.clone()));
        Response::ok(fields)
    }

    const ECHO_BODY: crate::CustomCodeMethod = crate::CustomCodeMethod::new("echo_body", &[], echo_body);

    #[test]
    fn test_serve_io_answers_each_frame_in_order() {
        let mut input = frame(r#"{"method_name":"echo_body","body":"one"}"#);
        input.extend(frame(r#"{"method_name":"echo_body","body":"two"}"#));

        let mut out = Vec::new();
        serve_io(&ECHO_BODY, &mut Cursor::new(input), &mut out).unwrap();

        let mut frames = Vec::new();
        let mut rest = &out[..];
        while !rest.is_empty() {
            let len = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]) as usize;
            let response: Response = serde_json::from_slice(&rest[4..4 + len]).unwrap();
            frames.push(response);
            rest = &rest[4 + len..];
        }

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].field("body"), Some(Some("one")));
        assert_eq!(frames[1].field("body"), Some(Some("two")));
    }

    #[test]
    fn test_serve_io_stops_on_bad_frame() {
        let mut input = frame(r#"{"method_name":"echo_body","body":"one"}"#);
        input.extend(frame("garbage"));

        let mut out = Vec::new();
        let err = serve_io(&ECHO_BODY, &mut Cursor::new(input), &mut out).unwrap_err();

        assert!(matches!(err, HandlerError::Ipc(_)));
        assert!(!out.is_empty());
    }
}
