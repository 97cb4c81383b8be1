//! Worker wrapper: serves CSV writing over stdin/stdout
use csv_handler::csv_write;
use hello_gateway_sdk::prelude::*;

handler_loop_result!(csv_write);
