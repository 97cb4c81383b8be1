//! Hello Gateway SDK - Types and utilities for writing Hello Gateway handlers
//!
//! This crate provides the types handlers are written against and the framed
//! IPC loop that lets a handler run as a worker process.

pub mod context;
pub mod error;
pub mod handler;
pub mod ipc;
pub mod message;
pub mod telemetry;

#[doc(hidden)]
pub use tracing;

pub mod prelude {
    //! Common imports for Hello Gateway handlers
    pub use crate::context::{Context, RequestId};
    pub use crate::error::HandlerError;
    pub use crate::handler::{HandlerFn, HandlerResultFn};
    pub use crate::{handler_loop, handler_loop_result};
    pub use crate::message::{Attributes, Message, PathParams};
}

// Re-export key types at crate root
pub use context::{Context, RequestId};
pub use error::HandlerError;
pub use handler::{HandlerFn, HandlerResultFn};
pub use message::{Attributes, Message, PathParams};
