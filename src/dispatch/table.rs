//! Route table and its one-shot builder
//!
//! The table is filled once at startup and only read afterwards, so it can be
//! shared between worker threads without locking.

use std::collections::HashMap;
use std::fmt;

use super::{Handler, HandlerDiscovery, RouteDescriptor, RouteMethod};
use crate::error::{BuildError, DispatchError};
use crate::http::{Request, Response};
use crate::logger;

/// A route key together with its bound handler
#[derive(Clone)]
pub struct RouteEntry {
    descriptor: RouteDescriptor,
    controller: String,
    handler: Handler,
}

impl RouteEntry {
    pub fn new(descriptor: RouteDescriptor, controller: impl Into<String>, handler: Handler) -> Self {
        Self {
            descriptor,
            controller: controller.into(),
            handler,
        }
    }

    pub const fn descriptor(&self) -> &RouteDescriptor {
        &self.descriptor
    }

    /// Name of the controller the handler is bound to
    pub fn controller(&self) -> &str {
        &self.controller
    }

    pub fn invoke(&self, req: &Request) -> Result<Response, DispatchError> {
        (self.handler)(req)
    }
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("descriptor", &self.descriptor)
            .field("controller", &self.controller)
            .finish_non_exhaustive()
    }
}

/// Immutable mapping from route key to handler.
///
/// Keys are unique; iteration follows first-insertion order.
#[derive(Debug, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    index: HashMap<RouteDescriptor, usize>,
    has_wildcards: bool,
}

impl RouteTable {
    /// Insert or overwrite. An overwritten key keeps its position and the
    /// replaced entry is returned.
    fn insert(&mut self, entry: RouteEntry) -> Option<RouteEntry> {
        if let Some(&pos) = self.index.get(&entry.descriptor) {
            return Some(std::mem::replace(&mut self.entries[pos], entry));
        }

        if *entry.descriptor.method() == RouteMethod::Any {
            self.has_wildcards = true;
        }
        self.index
            .insert(entry.descriptor.clone(), self.entries.len());
        self.entries.push(entry);
        None
    }

    /// First entry whose key serves `descriptor`, in iteration order
    pub fn find(&self, descriptor: &RouteDescriptor) -> Option<&RouteEntry> {
        if !self.has_wildcards {
            return self.index.get(descriptor).map(|&pos| &self.entries[pos]);
        }
        self.entries
            .iter()
            .find(|entry| entry.descriptor.matches(descriptor))
    }

    pub fn get(&self, descriptor: &RouteDescriptor) -> Option<&RouteEntry> {
        self.index.get(descriptor).map(|&pos| &self.entries[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds a [`RouteTable`] from a discovery source
pub struct RouteTableBuilder<'a, D: ?Sized> {
    discovery: &'a D,
}

impl<'a, D: HandlerDiscovery + ?Sized> RouteTableBuilder<'a, D> {
    pub const fn new(discovery: &'a D) -> Self {
        Self { discovery }
    }

    /// Discover controllers under `base_package`, instantiate each routed
    /// controller once and bind its entry points.
    ///
    /// Duplicate keys are last-write-wins.
    pub fn build(&self, base_package: &str) -> Result<RouteTable, BuildError> {
        let candidates = self.discovery.discover(base_package)?;
        let mut table = RouteTable::default();

        for candidate in candidates.iter().filter(|c| !c.routes().is_empty()) {
            for (descriptor, handler) in candidate.bind()? {
                logger::log_route_registered(&descriptor, candidate.name());
                let entry = RouteEntry::new(descriptor, candidate.name(), handler);
                if let Some(replaced) = table.insert(entry) {
                    logger::log_route_overwritten(
                        replaced.descriptor(),
                        replaced.controller(),
                        candidate.name(),
                    );
                }
            }
        }

        Ok(table)
    }
}
