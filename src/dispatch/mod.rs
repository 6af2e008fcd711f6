//! Request dispatch module
//!
//! Route table construction from registered controllers, and per-request
//! selection of either the matching handler or the static-resource fallback.

mod descriptor;
mod discovery;
mod dispatcher;
mod table;

use std::sync::Arc;

use crate::error::DispatchError;
use crate::http::{Request, Response};

pub use descriptor::{RouteDescriptor, RouteMethod};
pub use discovery::{Controller, ControllerCandidate, ControllerRegistry, HandlerDiscovery};
pub use dispatcher::Dispatcher;
pub use table::{RouteEntry, RouteTable, RouteTableBuilder};

/// Bound, invocable route target
pub type Handler = Arc<dyn Fn(&Request) -> Result<Response, DispatchError> + Send + Sync>;
