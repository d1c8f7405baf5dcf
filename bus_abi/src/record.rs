//! Method invocation records and the transactions that produce them.
//!
//! The kernel's method record has three positional fields whose meaning
//! depends on the transaction: during name resolution they select the
//! kind of lookup, during a real call they carry the resolved triple.
//! [`ResolutionRequest`] names each transaction and owns the mapping to
//! the positional record.

use crate::handle::Handle;
use crate::param::ParamRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The raw three-field record handed to a `Method` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodInvocationRecord {
    /// Target process or service (0 addresses the kernel itself)
    pub process_target: i64,
    pub interface_flag: i64,
    pub method_flag: i64,
}

impl MethodInvocationRecord {
    pub const fn new(process_target: i64, interface_flag: i64, method_flag: i64) -> Self {
        Self {
            process_target,
            interface_flag,
            method_flag,
        }
    }
}

impl fmt::Display for MethodInvocationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}, {}, {}}}",
            self.process_target, self.interface_flag, self.method_flag
        )
    }
}

/// A fully resolved method address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodTarget {
    pub service: Handle,
    pub interface: Handle,
    pub method: Handle,
}

impl MethodTarget {
    pub const fn new(service: Handle, interface: Handle, method: Handle) -> Self {
        Self {
            service,
            interface,
            method,
        }
    }

    /// Whether all three handles are valid.
    pub fn is_resolved(&self) -> bool {
        self.service.is_valid() && self.interface.is_valid() && self.method.is_valid()
    }
}

impl fmt::Display for MethodTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.service.raw(),
            self.interface.raw(),
            self.method.raw()
        )
    }
}

/// One `Method` transaction: a lookup or an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionRequest<'a> {
    /// Service lookup by name
    Service { name: &'a str },
    /// Interface lookup by name within a service
    Interface { service: Handle, name: &'a str },
    /// Method lookup by name within a service's interface
    Method {
        service: Handle,
        interface: Handle,
        name: &'a str,
    },
    /// Invocation of a resolved method (arguments are pushed by the caller)
    Invoke(MethodTarget),
}

impl<'a> ResolutionRequest<'a> {
    /// The positional record sent with the `Method` call.
    pub fn record(&self) -> MethodInvocationRecord {
        match *self {
            ResolutionRequest::Service { .. } => MethodInvocationRecord::new(0, 1, 0),
            ResolutionRequest::Interface { service, .. } => {
                MethodInvocationRecord::new(service.raw(), 0, 0)
            }
            ResolutionRequest::Method { service, .. } => {
                MethodInvocationRecord::new(service.raw(), 0, 1)
            }
            ResolutionRequest::Invoke(target) => MethodInvocationRecord::new(
                target.service.raw(),
                target.interface.raw(),
                target.method.raw(),
            ),
        }
    }

    /// Parameters pushed ahead of the `Method` call, in wire order.
    ///
    /// A method lookup pushes the interface handle before the name.
    pub fn parameters(&self) -> Vec<ParamRef<'a>> {
        match *self {
            ResolutionRequest::Service { name } | ResolutionRequest::Interface { name, .. } => {
                vec![ParamRef::Array(name.as_bytes())]
            }
            ResolutionRequest::Method {
                interface, name, ..
            } => vec![
                ParamRef::Primitive(interface.raw()),
                ParamRef::Array(name.as_bytes()),
            ],
            ResolutionRequest::Invoke(_) => Vec::new(),
        }
    }

    /// The name being resolved, if this is a lookup.
    pub fn name(&self) -> Option<&'a str> {
        match *self {
            ResolutionRequest::Service { name }
            | ResolutionRequest::Interface { name, .. }
            | ResolutionRequest::Method { name, .. } => Some(name),
            ResolutionRequest::Invoke(_) => None,
        }
    }
}
