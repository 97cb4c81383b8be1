//! Hello World handler
use hello_gateway_sdk::prelude::*;

/// Greets the caller, naming them when the route captured a `name` path parameter.
///
/// Returns `"Hello World"`, or `"Hello World "` followed by the `name` value
/// exactly as received.
pub fn hello_world(_ctx: &Context, message: &Message) -> String {
    let path_params = &message.attributes().path_params;

    let mut result = String::from("Hello World");
    if let Some(name) = path_params.get("name") {
        result.push(' ');
        result.push_str(name);
    }

    result
}
