//! Route identity
//!
//! A `RouteDescriptor` is the (method, path) key of the route table. Paths are
//! literal strings: no templating, no normalisation.

use std::fmt;

use hyper::Method;

use crate::http::Request;

/// Method part of a route key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RouteMethod {
    /// Matches every concrete verb at lookup time
    Any,
    Exact(Method),
}

impl RouteMethod {
    /// Lookup-time comparison against a concrete request verb
    pub fn matches(&self, method: &Method) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(m) => m == method,
        }
    }
}

impl From<Method> for RouteMethod {
    fn from(method: Method) -> Self {
        Self::Exact(method)
    }
}

impl fmt::Display for RouteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Exact(m) => write!(f, "{m}"),
        }
    }
}

/// Immutable (method, path) route key.
///
/// `Eq`/`Hash` are structural, so `Any` and `GET` on the same path are distinct
/// table keys. [`RouteDescriptor::matches`] is the lookup relation instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteDescriptor {
    method: RouteMethod,
    path: String,
}

impl RouteDescriptor {
    pub fn new(method: impl Into<RouteMethod>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }

    /// Marker key for the fallback binding. No request derives it: request
    /// descriptors always carry a concrete verb.
    pub const fn empty() -> Self {
        Self {
            method: RouteMethod::Any,
            path: String::new(),
        }
    }

    /// Descriptor derived from an incoming request
    pub fn from_request(req: &Request) -> Self {
        Self::new(req.method().clone(), req.path())
    }

    pub const fn method(&self) -> &RouteMethod {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }

    /// Whether this table key serves the request descriptor `other`
    pub fn matches(&self, other: &Self) -> bool {
        if self.path != other.path {
            return false;
        }
        match &other.method {
            RouteMethod::Exact(m) => self.method.matches(m),
            RouteMethod::Any => self.method == RouteMethod::Any,
        }
    }
}

impl fmt::Display for RouteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}
