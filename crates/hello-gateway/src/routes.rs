//! Route table mapping path templates to handlers

use hello_gateway_sdk::{Context, HandlerError, HandlerFn, HandlerResultFn, Message, PathParams};
use percent_encoding::percent_decode_str;

/// Content type for handlers that answer with plain strings
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Match a path pattern (e.g., "/hello/{name}") against an actual path (e.g., "/hello/Alice")
/// Returns extracted path parameters if matched. Captured segments are
/// percent-decoded; invalid UTF-8 is replaced rather than rejected.
pub fn match_path_pattern(pattern: &str, path: &str) -> Option<PathParams> {
    let pattern_parts: Vec<&str> = pattern.split('/').collect();
    let path_parts: Vec<&str> = path.split('/').collect();

    if pattern_parts.len() != path_parts.len() {
        return None;
    }

    let mut params = PathParams::new();

    for (pattern_part, path_part) in pattern_parts.iter().zip(path_parts.iter()) {
        match pattern_part
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
        {
            Some(param_name) => {
                params.insert(param_name, percent_decode_str(path_part).decode_utf8_lossy());
            }
            None if pattern_part != path_part => return None,
            None => {}
        }
    }

    Some(params)
}

/// A handler as registered with the gateway
#[derive(Clone, Copy)]
pub enum RouteHandler {
    /// Always answers 200 with the returned string
    Plain(HandlerFn),
    /// May reject the message with a `HandlerError`
    Fallible(HandlerResultFn),
}

impl RouteHandler {
    pub fn call(self, ctx: &Context, message: &Message) -> Result<String, HandlerError> {
        match self {
            RouteHandler::Plain(handler) => Ok(handler(ctx, message)),
            RouteHandler::Fallible(handler) => handler(ctx, message),
        }
    }
}

/// A path template bound to a named handler
#[derive(Clone)]
pub struct Route {
    pub pattern: String,
    pub handler_name: String,
    pub handler: RouteHandler,
    pub content_type: &'static str,
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern)
            .field("handler_name", &self.handler_name)
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// Ordered set of routes; the first registered match wins
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plain-text handler for a path template
    pub fn register(&mut self, pattern: impl Into<String>, handler_name: impl Into<String>, handler: HandlerFn) {
        self.push(pattern.into(), handler_name.into(), RouteHandler::Plain(handler), TEXT_PLAIN);
    }

    /// Register a handler that can fail, answering with `content_type` on success
    pub fn register_fallible(
        &mut self,
        pattern: impl Into<String>,
        handler_name: impl Into<String>,
        handler: HandlerResultFn,
        content_type: &'static str,
    ) {
        self.push(pattern.into(), handler_name.into(), RouteHandler::Fallible(handler), content_type);
    }

    fn push(&mut self, pattern: String, handler_name: String, handler: RouteHandler, content_type: &'static str) {
        self.routes.push(Route {
            pattern,
            handler_name,
            handler,
            content_type,
        });
    }

    /// Find the route for a request path, with path parameter extraction
    pub fn resolve(&self, path: &str) -> Option<(&Route, PathParams)> {
        self.routes
            .iter()
            .find_map(|route| match_path_pattern(&route.pattern, path).map(|params| (route, params)))
    }

    /// Registered routes in match order
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(_ctx: &Context, _message: &Message) -> String {
        "first".to_string()
    }

    fn second(_ctx: &Context, _message: &Message) -> String {
        "second".to_string()
    }

    fn rejects(_ctx: &Context, _message: &Message) -> Result<String, HandlerError> {
        Err(HandlerError::BadRequest("no".into()))
    }

    #[test]
    fn test_static_pattern() {
        let params = match_path_pattern("/hello", "/hello").unwrap();
        assert!(params.is_empty());
        assert!(match_path_pattern("/hello", "/goodbye").is_none());
        assert!(match_path_pattern("/hello", "/hello/Alice").is_none());
    }

    #[test]
    fn test_param_is_percent_decoded() {
        let params = match_path_pattern("/hello/{name}", "/hello/J%C3%B6rg").unwrap();
        assert_eq!(params.get("name"), Some("Jörg"));

        let params = match_path_pattern("/hello/{name}", "/hello/John%20Smith").unwrap();
        assert_eq!(params.get("name"), Some("John Smith"));
    }

    #[test]
    fn test_param_decoding_leaves_plus_and_bad_escapes() {
        let params = match_path_pattern("/hello/{name}", "/hello/a+b%zz").unwrap();
        assert_eq!(params.get("name"), Some("a+b%zz"));

        let params = match_path_pattern("/hello/{name}", "/hello/%FF").unwrap();
        assert_eq!(params.get("name"), Some("\u{FFFD}"));
    }

    #[test]
    fn test_trailing_slash_captures_empty_param() {
        let params = match_path_pattern("/hello/{name}", "/hello/").unwrap();
        assert_eq!(params.get("name"), Some(""));
    }

    #[test]
    fn test_multiple_params() {
        let params = match_path_pattern("/users/{id}/greet/{name}", "/users/7/greet/Bob").unwrap();
        assert_eq!(params.get("id"), Some("7"));
        assert_eq!(params.get("name"), Some("Bob"));
    }

    #[test]
    fn test_first_registered_match_wins() {
        let mut table = RouteTable::new();
        table.register("/hello/{name}", "first", first);
        table.register("/hello/{who}", "second", second);

        let (route, params) = table.resolve("/hello/Alice").unwrap();
        assert_eq!(route.handler_name, "first");
        assert_eq!(params.get("name"), Some("Alice"));
        assert!(table.resolve("/nope").is_none());

        let names: Vec<&str> = table.iter().map(|r| r.handler_name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn test_handler_kinds_and_content_types() {
        let mut table = RouteTable::new();
        table.register("/plain", "plain", first);
        table.register_fallible("/strict", "strict", rejects, "text/csv");

        let ctx = Context::new("test");
        let (plain, _) = table.resolve("/plain").unwrap();
        assert_eq!(plain.content_type, TEXT_PLAIN);
        assert_eq!(plain.handler.call(&ctx, &Message::default()).unwrap(), "first");

        let (strict, _) = table.resolve("/strict").unwrap();
        assert_eq!(strict.content_type, "text/csv");
        assert!(matches!(
            strict.handler.call(&ctx, &Message::default()),
            Err(HandlerError::BadRequest(_))
        ));
    }
}
