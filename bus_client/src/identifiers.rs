//! Compile-time identifier tables.
//!
//! A program declares the services, interfaces and methods it talks to as
//! statics; the client resolves each declaration to a handle once.
//!
//! ```
//! use bus_client::{InterfaceDecl, MethodDecl, ServiceDecl};
//!
//! static VFS: ServiceDecl = ServiceDecl::new("vfs");
//! static FILE: InterfaceDecl = InterfaceDecl::new(&VFS, "file");
//! static READ: MethodDecl = MethodDecl::new(&FILE, "read");
//!
//! assert_eq!(READ.service().name(), "vfs");
//! assert_eq!(READ.to_string(), "vfs.file.read");
//! ```

use std::fmt;

/// A named service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceDecl {
    name: &'static str,
}

impl ServiceDecl {
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for ServiceDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A named interface of a service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterfaceDecl {
    service: &'static ServiceDecl,
    name: &'static str,
}

impl InterfaceDecl {
    pub const fn new(service: &'static ServiceDecl, name: &'static str) -> Self {
        Self { service, name }
    }

    pub const fn service(&self) -> &'static ServiceDecl {
        self.service
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for InterfaceDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.service, self.name)
    }
}

/// A named method of an interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodDecl {
    interface: &'static InterfaceDecl,
    name: &'static str,
}

impl MethodDecl {
    pub const fn new(interface: &'static InterfaceDecl, name: &'static str) -> Self {
        Self { interface, name }
    }

    pub const fn interface(&self) -> &'static InterfaceDecl {
        self.interface
    }

    pub const fn service(&self) -> &'static ServiceDecl {
        self.interface.service
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for MethodDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.interface, self.name)
    }
}
