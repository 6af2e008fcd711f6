// Sample controllers served by the binary

mod greeting;
mod users;

use dispatcher::dispatch::ControllerRegistry;

/// Every controller this binary ships, in registration order
pub fn registry() -> ControllerRegistry {
    let mut registry = ControllerRegistry::new();
    registry
        .register(greeting::controller())
        .register(users::controller());
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatcher::dispatch::{Dispatcher, RouteTableBuilder};
    use dispatcher::handler::StaticResourceResolver;
    use dispatcher::http::Request;
    use hyper::{Method, StatusCode};

    fn sample_dispatcher() -> Dispatcher {
        let table = RouteTableBuilder::new(&registry())
            .build("route_dispatcher::app")
            .unwrap();
        Dispatcher::new(table, StaticResourceResolver::new("static", "404.html"))
    }

    #[test]
    fn test_registry_covers_sample_routes() {
        let dispatcher = sample_dispatcher();
        assert_eq!(dispatcher.table().len(), 4);

        let resp = dispatcher
            .dispatch(&Request::new(Method::GET, "/hello"))
            .unwrap();
        assert_eq!(resp.content_type(), "text/plain");
        assert_eq!(resp.body().as_ref(), b"Hello, world!\n");

        let resp = dispatcher
            .dispatch(&Request::new(Method::PATCH, "/ping"))
            .unwrap();
        assert_eq!(resp.body().as_ref(), b"pong (PATCH)\n");
    }

    #[test]
    fn test_users_round_trip() {
        let dispatcher = sample_dispatcher();

        let create = Request::new(Method::POST, "/users").with_body(r#"{"name":"ada"}"#);
        let resp = dispatcher.dispatch(&create).unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(resp.body().as_ref(), br#"{"id":1,"name":"ada"}"#);

        let resp = dispatcher
            .dispatch(&Request::new(Method::GET, "/users"))
            .unwrap();
        assert_eq!(resp.content_type(), "application/json");
        assert_eq!(resp.body().as_ref(), br#"[{"id":1,"name":"ada"}]"#);

        let bad = Request::new(Method::POST, "/users").with_body("not json");
        let resp = dispatcher.dispatch(&bad).unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
