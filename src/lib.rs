//! Route-table request dispatcher with a static-resource fallback.
//!
//! Controllers are registered with a [`dispatch::ControllerRegistry`], turned
//! into a [`dispatch::RouteTable`] at startup and served over HTTP/1.1 by the
//! [`server`] module. Requests with no matching route are answered from the
//! static root, or with the not-found page.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
