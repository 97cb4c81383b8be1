//! Handler signatures and the worker entry-point macros
//!
//! A handler is a plain function from a [`Context`] and a [`Message`] to the
//! response body. The same function can be registered in-process with a host
//! or run as a worker process via [`handler_loop!`](crate::handler_loop) or
//! [`handler_loop_result!`](crate::handler_loop_result).

use crate::{Context, HandlerError, Message};

/// Type alias for the handler function signature
pub type HandlerFn = fn(&Context, &Message) -> String;

/// Type alias for handlers that can reject a message
pub type HandlerResultFn = fn(&Context, &Message) -> Result<String, HandlerError>;

/// Macro for running an infallible handler as a worker process.
///
/// Generates `fn main()` which logs to stderr, answers framed invocations on
/// stdin/stdout until stdin closes, and exits with status 1 on a protocol error.
///
/// # Example
///
/// ```ignore
/// use hello_gateway_sdk::prelude::*;
///
/// fn handle(_ctx: &Context, message: &Message) -> String {
///     message.attributes().method.clone()
/// }
///
/// handler_loop!(handle);
/// ```
#[macro_export]
macro_rules! handler_loop {
    ($handler:expr) => {
        $crate::handler_loop_result!(
            |ctx: &$crate::Context, message: &$crate::Message| -> ::std::result::Result<
                ::std::string::String,
                $crate::HandlerError,
            > { Ok($handler(ctx, message)) }
        );
    };
}

/// Macro for running a handler that returns `Result<String, HandlerError>`.
///
/// Errors are sent back as replies carrying `HandlerError::status_code()`.
///
/// # Example
///
/// ```ignore
/// fn handle(_ctx: &Context, message: &Message) -> Result<String, HandlerError> {
///     message.payload.clone().ok_or_else(|| HandlerError::BadRequest("empty body".into()))
/// }
///
/// handler_loop_result!(handle);
/// ```
#[macro_export]
macro_rules! handler_loop_result {
    ($handler:expr) => {
        fn main() {
            $crate::telemetry::init_worker_tracing();
            match $crate::ipc::serve($handler) {
                Ok(served) => {
                    $crate::tracing::info!(served, "Handler loop finished");
                }
                Err(e) => {
                    $crate::tracing::error!("Handler loop failed: {}", e);
                    ::std::process::exit(1);
                }
            }
        }
    };
}
