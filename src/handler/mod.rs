//! Request handler module
//!
//! Entry point for hyper requests (`router`) and the static-resource fallback
//! used by the dispatcher (`static_files`).

pub mod router;
pub mod static_files;

// Re-export main entry points
pub use router::handle_request;
pub use static_files::StaticResourceResolver;
