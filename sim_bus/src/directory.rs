//! Service directory of the simulated bus.
//!
//! Services and interfaces are numbered from 1 so that no registered
//! handle collides with the reserved values in a lookup record. Methods
//! are numbered from 0 within their interface.

use bus_abi::{Handle, MethodTarget, Parameter, StatusCode, STATUS_FAILURE};
use thiserror::Error;

/// Directory registration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimBusError {
    #[error("Already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Unknown service: {0}")]
    UnknownService(Handle),

    #[error("Unknown interface: {0}")]
    UnknownInterface(Handle),
}

/// What a method handler hands back: its status and any results to queue
/// for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodReply {
    pub status: StatusCode,
    pub results: Vec<Parameter>,
}

impl MethodReply {
    pub fn ok(status: StatusCode) -> Self {
        Self {
            status,
            results: Vec::new(),
        }
    }

    pub fn failed() -> Self {
        Self::ok(STATUS_FAILURE)
    }

    /// Appends a result parameter
    pub fn with_result(mut self, result: impl Into<Parameter>) -> Self {
        self.results.push(result.into());
        self
    }
}

/// Method body: receives the pushed arguments in push order.
pub type MethodHandler = Box<dyn FnMut(Vec<Parameter>) -> MethodReply + Send>;

struct SimMethod {
    name: String,
    handler: MethodHandler,
}

struct SimInterface {
    name: String,
    methods: Vec<SimMethod>,
}

struct SimService {
    name: String,
    interfaces: Vec<SimInterface>,
}

/// Registered services, interfaces and methods.
#[derive(Default)]
pub struct Directory {
    services: Vec<SimService>,
}

impl std::fmt::Debug for Directory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Directory")
            .field(
                "services",
                &self.services.iter().map(|s| &s.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

fn position_handle(index: usize, base: i64) -> Handle {
    Handle::new(index as i64 + base)
}

fn handle_position(handle: Handle, base: i64) -> Option<usize> {
    let index = handle.raw().checked_sub(base)?;
    usize::try_from(index).ok()
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_service(&mut self, name: &str) -> Result<Handle, SimBusError> {
        if self.find_service(name).is_some() {
            return Err(SimBusError::AlreadyRegistered(name.to_string()));
        }
        self.services.push(SimService {
            name: name.to_string(),
            interfaces: Vec::new(),
        });
        Ok(position_handle(self.services.len() - 1, 1))
    }

    pub fn add_interface(&mut self, service: Handle, name: &str) -> Result<Handle, SimBusError> {
        let entry = self
            .service_mut(service)
            .ok_or(SimBusError::UnknownService(service))?;
        if entry.interfaces.iter().any(|i| i.name == name) {
            return Err(SimBusError::AlreadyRegistered(format!(
                "{}.{}",
                entry.name, name
            )));
        }
        entry.interfaces.push(SimInterface {
            name: name.to_string(),
            methods: Vec::new(),
        });
        Ok(position_handle(entry.interfaces.len() - 1, 1))
    }

    pub fn add_method(
        &mut self,
        service: Handle,
        interface: Handle,
        name: &str,
        handler: MethodHandler,
    ) -> Result<Handle, SimBusError> {
        let entry = self.interface_mut(service, interface)?;
        if entry.methods.iter().any(|m| m.name == name) {
            return Err(SimBusError::AlreadyRegistered(format!(
                "{}.{}",
                entry.name, name
            )));
        }
        entry.methods.push(SimMethod {
            name: name.to_string(),
            handler,
        });
        Ok(position_handle(entry.methods.len() - 1, 0))
    }

    pub fn find_service(&self, name: &str) -> Option<Handle> {
        self.services
            .iter()
            .position(|s| s.name == name)
            .map(|index| position_handle(index, 1))
    }

    pub fn find_interface(&self, service: Handle, name: &str) -> Option<Handle> {
        self.service(service)?
            .interfaces
            .iter()
            .position(|i| i.name == name)
            .map(|index| position_handle(index, 1))
    }

    pub fn find_method(&self, service: Handle, interface: Handle, name: &str) -> Option<Handle> {
        let service = self.service(service)?;
        service
            .interfaces
            .get(handle_position(interface, 1)?)?
            .methods
            .iter()
            .position(|m| m.name == name)
            .map(|index| position_handle(index, 0))
    }

    /// Runs the method at `target`, or returns `None` when nothing is
    /// registered there.
    pub fn invoke(&mut self, target: MethodTarget, args: Vec<Parameter>) -> Option<MethodReply> {
        let interface = self.interface_mut(target.service, target.interface).ok()?;
        let method = interface
            .methods
            .get_mut(handle_position(target.method, 0)?)?;
        Some((method.handler)(args))
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    fn service(&self, service: Handle) -> Option<&SimService> {
        self.services.get(handle_position(service, 1)?)
    }

    fn service_mut(&mut self, service: Handle) -> Option<&mut SimService> {
        self.services.get_mut(handle_position(service, 1)?)
    }

    fn interface_mut(
        &mut self,
        service: Handle,
        interface: Handle,
    ) -> Result<&mut SimInterface, SimBusError> {
        self.service_mut(service)
            .ok_or(SimBusError::UnknownService(service))?
            .interfaces
            .get_mut(handle_position(interface, 1).unwrap_or(usize::MAX))
            .ok_or(SimBusError::UnknownInterface(interface))
    }
}
