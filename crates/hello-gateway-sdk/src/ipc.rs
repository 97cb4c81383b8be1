//! IPC protocol for running a handler as a worker process.
//!
//! The host and the worker exchange length-prefixed JSON frames: a 4-byte
//! big-endian length followed by that many bytes of JSON. The host writes an
//! [`Invocation`] to the worker's stdin and reads a [`Reply`] from its stdout.
//! Stdout is reserved for frames, so workers log to stderr.
//!
//! ```ignore
//! use hello_gateway_sdk::prelude::*;
//!
//! fn handle(_ctx: &Context, message: &Message) -> Result<String, HandlerError> {
//!     Ok(format!("{} params", message.attributes().path_params.len()))
//! }
//!
//! handler_loop_result!(handle);
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Write};

use crate::{Context, HandlerError, Message};

/// Largest frame either side will accept (16 MiB)
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Host-to-worker frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invocation {
    pub context: Context,
    pub message: Message,
}

/// Worker-to-host frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// Echo of the invocation's request ID
    pub request_id: String,

    /// HTTP status the host should respond with
    pub status: u16,

    /// The string the handler returned, or the error message
    pub body: String,
}

impl Reply {
    fn from_result(request_id: String, result: Result<String, HandlerError>) -> Self {
        match result {
            Ok(body) => Self { request_id, status: 200, body },
            Err(e) => Self {
                request_id,
                status: e.status_code(),
                body: e.to_string(),
            },
        }
    }
}

/// Read one frame.
///
/// Returns `Ok(None)` when the stream ends cleanly before a length prefix.
/// A stream that ends partway through a frame is an error.
pub fn read_frame<R: Read, T: DeserializeOwned>(reader: &mut R) -> Result<Option<T>, HandlerError> {
    let mut len_buf = [0u8; 4];
    let mut filled = 0;
    while filled < len_buf.len() {
        match reader.read(&mut len_buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => return Err(HandlerError::Ipc("Truncated length prefix".into())),
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_FRAME_LEN {
        return Err(HandlerError::FrameTooLarge { len, max: MAX_FRAME_LEN });
    }

    let mut payload = vec![0u8; len];
    reader
        .read_exact(&mut payload)
        .map_err(|e| HandlerError::Ipc(format!("Failed to read payload: {}", e)))?;

    Ok(Some(serde_json::from_slice(&payload)?))
}

/// Write one frame and flush.
pub fn write_frame<W: Write, T: Serialize>(writer: &mut W, value: &T) -> Result<(), HandlerError> {
    let payload = serde_json::to_vec(value)?;
    if payload.len() > MAX_FRAME_LEN {
        return Err(HandlerError::FrameTooLarge {
            len: payload.len(),
            max: MAX_FRAME_LEN,
        });
    }

    writer
        .write_all(&(payload.len() as u32).to_be_bytes())
        .map_err(|e| HandlerError::Ipc(format!("Failed to write length: {}", e)))?;
    writer
        .write_all(&payload)
        .map_err(|e| HandlerError::Ipc(format!("Failed to write payload: {}", e)))?;
    writer
        .flush()
        .map_err(|e| HandlerError::Ipc(format!("Failed to flush: {}", e)))?;

    Ok(())
}

/// Answer invocations from `reader` on `writer` until the stream ends.
///
/// A handler error becomes a reply with the error's status; only transport
/// failures end the loop early. Returns the number of invocations served.
pub fn serve_io<R, W, F>(reader: &mut R, writer: &mut W, handler: F) -> Result<usize, HandlerError>
where
    R: Read,
    W: Write,
    F: Fn(&Context, &Message) -> Result<String, HandlerError>,
{
    let mut served = 0;
    loop {
        let invocation: Invocation = match read_frame(reader) {
            Ok(Some(invocation)) => invocation,
            Ok(None) => {
                tracing::debug!(served, "Input closed, stopping handler loop");
                return Ok(served);
            }
            Err(e) => {
                tracing::error!("Failed to read invocation: {}", e);
                return Err(e);
            }
        };

        let request_id = invocation.context.request_id.as_str();
        tracing::debug!(request_id, handler = %invocation.context.handler, "Invoking handler");

        let result = handler(&invocation.context, &invocation.message);
        if let Err(e) = &result {
            tracing::warn!(request_id, "Handler rejected invocation: {}", e);
        }
        write_frame(writer, &Reply::from_result(request_id.to_string(), result))?;
        served += 1;
    }
}

/// Answer invocations on stdin/stdout until stdin closes.
pub fn serve<F>(handler: F) -> Result<usize, HandlerError>
where
    F: Fn(&Context, &Message) -> Result<String, HandlerError>,
{
    let stdin = io::stdin();
    let stdout = io::stdout();
    serve_io(&mut stdin.lock(), &mut stdout.lock(), handler)
}
