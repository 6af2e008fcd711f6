//! HTTP message layer
//!
//! Request/response value objects used by handlers and the dispatcher, plus
//! conversion to and from hyper's types at the transport boundary.

pub mod request;
pub mod response;

// Re-export commonly used types
pub use request::Request;
pub use response::{
    build_400_response, build_413_response, build_500_response, into_hyper_response, Response, ResponseBuilder,
};
