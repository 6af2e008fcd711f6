//! Controller discovery
//!
//! Application code registers controller types together with their route
//! declarations and a way to construct them. Discovery then selects the
//! controllers that live under a base package.

use std::sync::Arc;

use super::{Handler, RouteDescriptor, RouteMethod};
use crate::error::{ConfigError, DiscoveryError, DispatchError, HandlerError};
use crate::http::{Request, Response};

type EntryPoint<T> = Arc<dyn Fn(&T, &Request) -> Result<Response, HandlerError> + Send + Sync>;
type Constructor<T> = Box<dyn Fn() -> Result<T, String> + Send + Sync>;

/// Source of candidate controllers for a base package
pub trait HandlerDiscovery {
    /// Candidates under `base_package`, in registration order
    fn discover(
        &self,
        base_package: &str,
    ) -> Result<Vec<Arc<dyn ControllerCandidate>>, ConfigError>;
}

/// A controller type as seen by the route table builder
pub trait ControllerCandidate: Send + Sync {
    fn name(&self) -> &str;

    fn module(&self) -> &str;

    /// Declared route keys, in declaration order
    fn routes(&self) -> Vec<RouteDescriptor>;

    /// Construct one instance and bind every declared entry point to it
    fn bind(&self) -> Result<Vec<(RouteDescriptor, Handler)>, DiscoveryError>;
}

/// Typed controller registration
///
/// ```
/// use dispatcher::dispatch::Controller;
/// use dispatcher::http::Response;
/// use hyper::Method;
///
/// #[derive(Default)]
/// struct Hello;
///
/// let controller = Controller::<Hello>::new("app::hello")
///     .default_constructor()
///     .route(Method::GET, "/hello", |_: &Hello, _| {
///         Ok(Response::builder().body("hi").build())
///     });
/// ```
pub struct Controller<T> {
    name: String,
    module: String,
    routes: Vec<(RouteDescriptor, EntryPoint<T>)>,
    constructor: Option<Constructor<T>>,
}

impl<T: Send + Sync + 'static> Controller<T> {
    /// Declare a controller living in `module` (e.g. `module_path!()`)
    pub fn new(module: impl Into<String>) -> Self {
        let type_name = std::any::type_name::<T>();
        let name = type_name.rsplit("::").next().unwrap_or(type_name);

        Self {
            name: name.to_string(),
            module: module.into(),
            routes: Vec::new(),
            constructor: None,
        }
    }

    /// Fallible no-argument constructor
    #[must_use]
    pub fn constructor<F>(mut self, constructor: F) -> Self
    where
        F: Fn() -> Result<T, String> + Send + Sync + 'static,
    {
        self.constructor = Some(Box::new(constructor));
        self
    }

    #[must_use]
    pub fn default_constructor(self) -> Self
    where
        T: Default,
    {
        self.constructor(|| Ok(T::default()))
    }

    /// Declare an entry point for `method` + `path`
    #[must_use]
    pub fn route<F>(
        mut self,
        method: impl Into<RouteMethod>,
        path: impl Into<String>,
        entry: F,
    ) -> Self
    where
        F: Fn(&T, &Request) -> Result<Response, HandlerError> + Send + Sync + 'static,
    {
        self.routes
            .push((RouteDescriptor::new(method, path), Arc::new(entry)));
        self
    }
}

impl<T: Send + Sync + 'static> ControllerCandidate for Controller<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn module(&self) -> &str {
        &self.module
    }

    fn routes(&self) -> Vec<RouteDescriptor> {
        self.routes.iter().map(|(d, _)| d.clone()).collect()
    }

    fn bind(&self) -> Result<Vec<(RouteDescriptor, Handler)>, DiscoveryError> {
        let constructor =
            self.constructor
                .as_ref()
                .ok_or_else(|| DiscoveryError::MissingConstructor {
                    controller: self.name.clone(),
                })?;
        let instance = Arc::new(constructor().map_err(|reason| {
            DiscoveryError::Construction {
                controller: self.name.clone(),
                reason,
            }
        })?);

        Ok(self
            .routes
            .iter()
            .map(|(descriptor, entry)| {
                let instance = Arc::clone(&instance);
                let entry = Arc::clone(entry);
                let handler: Handler = Arc::new(move |req: &Request| {
                    entry(&*instance, req).map_err(DispatchError::from)
                });
                (descriptor.clone(), handler)
            })
            .collect())
    }
}

/// Explicit controller registry
#[derive(Default)]
pub struct ControllerRegistry {
    candidates: Vec<Arc<dyn ControllerCandidate>>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<C: ControllerCandidate + 'static>(&mut self, controller: C) -> &mut Self {
        self.candidates.push(Arc::new(controller));
        self
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl HandlerDiscovery for ControllerRegistry {
    fn discover(
        &self,
        base_package: &str,
    ) -> Result<Vec<Arc<dyn ControllerCandidate>>, ConfigError> {
        if base_package.trim().is_empty() {
            return Err(ConfigError::EmptyBasePackage);
        }

        let found: Vec<_> = self
            .candidates
            .iter()
            .filter(|c| in_package(c.module(), base_package))
            .cloned()
            .collect();

        if found.is_empty() {
            return Err(ConfigError::UnknownBasePackage(base_package.to_string()));
        }
        Ok(found)
    }
}

/// `module` is `base` itself or nested below it
fn in_package(module: &str, base: &str) -> bool {
    module
        .strip_prefix(base)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::Method;

    #[derive(Default)]
    struct Greeter {
        greeting: &'static str,
    }

    fn greeter(module: &str) -> Controller<Greeter> {
        Controller::<Greeter>::new(module)
            .constructor(|| Ok(Greeter { greeting: "hello" }))
            .route(Method::GET, "/greet", |g: &Greeter, _| {
                Ok(Response::builder().body(g.greeting).build())
            })
    }

    #[test]
    fn test_in_package() {
        assert!(in_package("app", "app"));
        assert!(in_package("app::users", "app"));
        assert!(in_package("app::users::admin", "app::users"));
        assert!(!in_package("application", "app"));
        assert!(!in_package("other::app", "app"));
    }

    #[test]
    fn test_discover_filters_by_base_package() {
        let mut registry = ControllerRegistry::new();
        registry
            .register(greeter("app::a"))
            .register(greeter("lib::b"))
            .register(greeter("app::c"));
        assert_eq!(registry.len(), 3);

        let found = registry.discover("app").unwrap();
        let modules: Vec<_> = found.iter().map(|c| c.module().to_string()).collect();
        assert_eq!(modules, vec!["app::a", "app::c"]);
    }

    #[test]
    fn test_discover_unknown_base_package() {
        let mut registry = ControllerRegistry::new();
        assert!(registry.is_empty());
        registry.register(greeter("app::a"));
        assert!(!registry.is_empty());

        assert!(matches!(
            registry.discover("missing"),
            Err(ConfigError::UnknownBasePackage(p)) if p == "missing"
        ));
        assert!(matches!(
            registry.discover("  "),
            Err(ConfigError::EmptyBasePackage)
        ));
    }

    #[test]
    fn test_bind_shares_one_instance() {
        let controller = greeter("app").route(Method::POST, "/greet", |g: &Greeter, _| {
            Ok(Response::builder().body(g.greeting.to_uppercase()).build())
        });
        assert_eq!(controller.name(), "Greeter");

        let bound = controller.bind().unwrap();
        assert_eq!(bound.len(), 2);
        assert_eq!(bound[0].0, RouteDescriptor::new(Method::GET, "/greet"));

        let req = Request::new(Method::GET, "/greet");
        assert_eq!((bound[0].1)(&req).unwrap().body().as_ref(), b"hello");
        assert_eq!((bound[1].1)(&req).unwrap().body().as_ref(), b"HELLO");
    }

    #[test]
    fn test_bind_without_constructor_fails() {
        let controller = Controller::<Greeter>::new("app")
            .route(Method::GET, "/", |_: &Greeter, _| Ok(Response::builder().build()));

        assert!(matches!(
            controller.bind(),
            Err(DiscoveryError::MissingConstructor { controller }) if controller == "Greeter"
        ));
    }

    #[test]
    fn test_bind_constructor_failure() {
        let controller = Controller::<Greeter>::new("app")
            .constructor(|| Err("database unavailable".to_string()))
            .route(Method::GET, "/", |_: &Greeter, _| Ok(Response::builder().build()));

        match controller.bind() {
            Err(DiscoveryError::Construction { reason, .. }) => {
                assert_eq!(reason, "database unavailable");
            }
            _ => panic!("expected construction error"),
        }
    }

    #[test]
    fn test_handler_error_propagates() {
        let controller = Controller::<Greeter>::new("app")
            .default_constructor()
            .route(Method::GET, "/fail", |_: &Greeter, _| {
                Err(HandlerError::new("boom"))
            });

        let bound = controller.bind().unwrap();
        let err = (bound[0].1)(&Request::new(Method::GET, "/fail")).unwrap_err();
        assert_eq!(err.to_string(), "handler failed: boom");
    }
}
