//! Worker wrapper: serves the greeting handler over stdin/stdout
use hello_gateway_sdk::prelude::*;
use hello_world_handler::hello_world;

handler_loop!(hello_world);
