//! Per-request dispatch
//!
//! Looks the request up in the route table and invokes the matching handler.
//! Unmatched requests go to the static-resource fallback, which is bound under
//! the empty marker key so both outcomes run through the same entry type.

use std::sync::Arc;

use super::{Handler, RouteDescriptor, RouteEntry, RouteTable};
use crate::error::DispatchError;
use crate::handler::StaticResourceResolver;
use crate::http::{Request, Response};
use crate::logger;

const FALLBACK_NAME: &str = "StaticResourceResolver";

pub struct Dispatcher {
    table: RouteTable,
    fallback: RouteEntry,
}

impl Dispatcher {
    pub fn new(table: RouteTable, resolver: StaticResourceResolver) -> Self {
        let resolver = Arc::new(resolver);
        let handler: Handler = Arc::new(move |req: &Request| {
            resolver.resolve(req).map_err(DispatchError::from)
        });

        Self {
            table,
            fallback: RouteEntry::new(RouteDescriptor::empty(), FALLBACK_NAME, handler),
        }
    }

    /// Answer `req` with the matched handler, or with the static fallback.
    ///
    /// Handler and resource errors are returned as-is; turning them into an
    /// error response is up to the transport.
    pub fn dispatch(&self, req: &Request) -> Result<Response, DispatchError> {
        let descriptor = RouteDescriptor::from_request(req);
        let entry = self.table.find(&descriptor).unwrap_or(&self.fallback);

        if entry.descriptor().is_empty() {
            logger::log_fallback(&descriptor);
        } else {
            logger::log_route_matched(&descriptor, entry.controller());
        }

        entry.invoke(req)
    }

    pub const fn table(&self) -> &RouteTable {
        &self.table
    }
}
