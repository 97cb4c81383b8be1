//! Worker wrapper: serves CSV reading over stdin/stdout
use csv_handler::csv_read;
use hello_gateway_sdk::prelude::*;

handler_loop_result!(csv_read);
