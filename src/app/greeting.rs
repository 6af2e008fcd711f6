use dispatcher::dispatch::{Controller, RouteMethod};
use dispatcher::error::HandlerError;
use dispatcher::http::{Request, Response};
use hyper::Method;

#[derive(Default)]
pub struct Greeting;

#[allow(clippy::unused_self, clippy::unnecessary_wraps)]
impl Greeting {
    fn hello(&self, req: &Request) -> Result<Response, HandlerError> {
        let name = req
            .query()
            .and_then(|q| q.split('&').find_map(|pair| pair.strip_prefix("name=")))
            .filter(|name| !name.is_empty())
            .unwrap_or("world");

        Ok(Response::builder()
            .content_type("text/plain")
            .body(format!("Hello, {name}!\n"))
            .build())
    }

    fn ping(&self, req: &Request) -> Result<Response, HandlerError> {
        Ok(Response::builder()
            .content_type("text/plain")
            .body(format!("pong ({})\n", req.method()))
            .build())
    }
}

pub fn controller() -> Controller<Greeting> {
    Controller::new(module_path!())
        .default_constructor()
        .route(Method::GET, "/hello", Greeting::hello)
        .route(RouteMethod::Any, "/ping", Greeting::ping)
}
