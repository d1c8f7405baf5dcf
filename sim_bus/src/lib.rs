//! Simulated bus far side
//!
//! This crate implements [`Boundary`] in-process so the client layer can be
//! exercised without a kernel. It keeps a bounded parameter queue, a
//! directory of registered services, an audit log of every boundary call
//! and an optional fault plan.
//!
//! ## Dispatch rules
//!
//! A `Method` record is interpreted like this:
//!
//! - `{0, 1, 0}`: service lookup. Pops the name.
//! - `{svc, 0, 0}`: interface lookup. Pops the name.
//! - `{svc, 0, 1}`: method lookup. Pops the interface handle, then the name.
//! - `{svc, iface, method}`: invocation. Drains the queue as arguments, then
//!   queues the handler's results for the caller to pop.
//!
//! A lookup that finds nothing returns `-1`.
//!
//! ## Example
//!
//! ```
//! use bus_abi::{Boundary, BoundaryRequest, MethodInvocationRecord, Parameter};
//! use sim_bus::SimBus;
//!
//! let mut bus = SimBus::new();
//! let vfs = bus.register_service("vfs").unwrap();
//!
//! let name = Parameter::string("vfs");
//! bus.call(BoundaryRequest::Push(name.view()));
//! let status = bus.call(BoundaryRequest::Method(MethodInvocationRecord::new(0, 1, 0)));
//! assert_eq!(status, vfs.raw());
//! ```

pub mod audit;
pub mod directory;
pub mod fault_injection;
pub mod param_queue;
pub mod test_utils;

pub use audit::{BoundaryAuditLog, BoundaryEvent};
pub use directory::{Directory, MethodHandler, MethodReply, SimBusError};
pub use fault_injection::{BoundaryFault, FaultInjector, FaultPlan};
pub use param_queue::{ParamQueue, QueueError};

use bus_abi::{
    Boundary, BoundaryRequest, Handle, MethodInvocationRecord, MethodTarget, Parameter,
    StatusCode, STATUS_FAILURE,
};
use log::{debug, warn};

/// Default number of parameters the far side will hold.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// In-process bus.
#[derive(Debug)]
pub struct SimBus {
    queue: ParamQueue,
    directory: Directory,
    faults: FaultInjector,
    audit_log: BoundaryAuditLog,
}

impl Default for SimBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SimBus {
    pub fn new() -> Self {
        Self::with_queue_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_queue_capacity(capacity: usize) -> Self {
        Self {
            queue: ParamQueue::with_capacity(capacity),
            directory: Directory::new(),
            faults: FaultInjector::default(),
            audit_log: BoundaryAuditLog::new(),
        }
    }

    /// Replaces the fault plan.
    pub fn with_fault_plan(mut self, plan: FaultPlan) -> Self {
        self.set_fault_plan(plan);
        self
    }

    pub fn set_fault_plan(&mut self, plan: FaultPlan) {
        self.faults = FaultInjector::new(plan);
    }

    pub fn faults(&self) -> &FaultInjector {
        &self.faults
    }

    /// Fails every boundary call from now on.
    pub fn sever(&mut self) {
        self.faults.sever();
    }

    pub fn register_service(&mut self, name: &str) -> Result<Handle, SimBusError> {
        self.directory.add_service(name)
    }

    pub fn register_interface(&mut self, service: Handle, name: &str) -> Result<Handle, SimBusError> {
        self.directory.add_interface(service, name)
    }

    pub fn register_method<F>(
        &mut self,
        service: Handle,
        interface: Handle,
        name: &str,
        handler: F,
    ) -> Result<Handle, SimBusError>
    where
        F: FnMut(Vec<Parameter>) -> MethodReply + Send + 'static,
    {
        self.directory
            .add_method(service, interface, name, Box::new(handler))
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn audit_log(&self) -> &BoundaryAuditLog {
        &self.audit_log
    }

    pub fn clear_audit_log(&mut self) {
        self.audit_log.clear();
    }

    /// Parameters waiting on the far side.
    pub fn queue(&self) -> &ParamQueue {
        &self.queue
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Queues a parameter as if the far side had produced it.
    pub fn inject(&mut self, param: Parameter) -> Result<(), QueueError> {
        self.queue.push(param)
    }

    fn execute(&mut self, request: BoundaryRequest<'_>) -> StatusCode {
        match request {
            BoundaryRequest::Push(param) => match self.queue.push(param.to_parameter()) {
                Ok(()) => 0,
                Err(err) => {
                    warn!("push rejected: {:?}", err);
                    STATUS_FAILURE
                }
            },
            BoundaryRequest::Peek(header) => match self.queue.peek() {
                Some(next) => {
                    *header = next;
                    0
                }
                None => STATUS_FAILURE,
            },
            BoundaryRequest::Pop(slot) => match self.queue.pop_into(slot) {
                Ok(()) => 0,
                Err(err) => {
                    warn!("pop rejected: {:?}", err);
                    STATUS_FAILURE
                }
            },
            BoundaryRequest::Method(record) => self.dispatch(record),
        }
    }

    fn dispatch(&mut self, record: MethodInvocationRecord) -> StatusCode {
        let handle = match record {
            MethodInvocationRecord {
                process_target: 0,
                interface_flag: 1,
                method_flag: 0,
            } => self
                .pop_name()
                .and_then(|name| self.directory.find_service(&name)),
            MethodInvocationRecord {
                process_target: 0, ..
            } => None,
            MethodInvocationRecord {
                process_target,
                interface_flag: 0,
                method_flag: 0,
            } => self
                .pop_name()
                .and_then(|name| self.directory.find_interface(Handle::new(process_target), &name)),
            MethodInvocationRecord {
                process_target,
                interface_flag: 0,
                method_flag: 1,
            } => {
                let interface = self.queue.pop_primitive().map(Handle::new);
                let name = self.pop_name();
                match (interface, name) {
                    (Some(interface), Some(name)) => self.directory.find_method(
                        Handle::new(process_target),
                        interface,
                        &name,
                    ),
                    _ => None,
                }
            }
            MethodInvocationRecord {
                process_target,
                interface_flag,
                method_flag,
            } => {
                let target = MethodTarget::new(
                    Handle::new(process_target),
                    Handle::new(interface_flag),
                    Handle::new(method_flag),
                );
                return self.invoke(target);
            }
        };

        debug!("lookup {} -> {:?}", record, handle);
        handle.map_or(STATUS_FAILURE, Handle::raw)
    }

    fn invoke(&mut self, target: MethodTarget) -> StatusCode {
        let args = self.queue.drain();
        let Some(reply) = self.directory.invoke(target, args) else {
            debug!("no method at {}", target);
            return STATUS_FAILURE;
        };

        debug!(
            "invoked {} -> status {} with {} results",
            target,
            reply.status,
            reply.results.len()
        );
        for result in reply.results {
            if self.queue.push(result).is_err() {
                warn!("result dropped, queue full");
                return STATUS_FAILURE;
            }
        }
        reply.status
    }

    fn pop_name(&mut self) -> Option<String> {
        String::from_utf8(self.queue.pop_array()?).ok()
    }
}

impl Boundary for SimBus {
    fn call(&mut self, request: BoundaryRequest<'_>) -> StatusCode {
        let kind = request.kind();
        let record = match &request {
            BoundaryRequest::Method(record) => Some(*record),
            _ => None,
        };

        let status = if self.faults.should_fail(kind) {
            debug!("injected {} failure", kind);
            STATUS_FAILURE
        } else {
            self.execute(request)
        };

        self.audit_log.record(BoundaryEvent {
            kind,
            status,
            record,
        });
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bus_abi::{ParamHeader, PopSlot, SyscallKind};

    fn push(bus: &mut SimBus, param: Parameter) -> StatusCode {
        bus.call(BoundaryRequest::Push(param.view()))
    }

    fn method(bus: &mut SimBus, a: i64, b: i64, c: i64) -> StatusCode {
        bus.call(BoundaryRequest::Method(MethodInvocationRecord::new(a, b, c)))
    }

    fn registered() -> (SimBus, Handle, Handle, Handle) {
        let mut bus = SimBus::new();
        bus.register_service("decoy").unwrap();
        let svc = bus.register_service("vfs").unwrap();
        let iface = bus.register_interface(svc, "file").unwrap();
        bus.register_method(svc, iface, "stat", |_| MethodReply::ok(0))
            .unwrap();
        let method = bus
            .register_method(svc, iface, "len", |args| {
                let len = match args.first() {
                    Some(Parameter::Array(bytes)) => bytes.len() as i64,
                    _ => return MethodReply::failed(),
                };
                MethodReply::ok(1).with_result(len)
            })
            .unwrap();
        (bus, svc, iface, method)
    }

    #[test]
    fn test_service_lookup() {
        let (mut bus, svc, _, _) = registered();
        push(&mut bus, Parameter::string("vfs"));
        assert_eq!(method(&mut bus, 0, 1, 0), svc.raw());

        push(&mut bus, Parameter::string("gpu"));
        assert_eq!(method(&mut bus, 0, 1, 0), STATUS_FAILURE);
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn test_interface_and_method_lookup() {
        let (mut bus, svc, iface, len) = registered();

        push(&mut bus, Parameter::string("file"));
        assert_eq!(method(&mut bus, svc.raw(), 0, 0), iface.raw());

        push(&mut bus, Parameter::Primitive(iface.raw()));
        push(&mut bus, Parameter::string("len"));
        assert_eq!(method(&mut bus, svc.raw(), 0, 1), len.raw());
        assert_eq!(len, Handle::new(1));
    }

    #[test]
    fn test_invoke_queues_results() {
        let (mut bus, svc, iface, len) = registered();

        push(&mut bus, Parameter::string("hello"));
        assert_eq!(method(&mut bus, svc.raw(), iface.raw(), len.raw()), 1);

        let mut header = ParamHeader::default();
        assert_eq!(bus.call(BoundaryRequest::Peek(&mut header)), 0);
        assert_eq!(header, ParamHeader::primitive());

        let mut value = 0;
        assert_eq!(bus.call(BoundaryRequest::Pop(PopSlot::Primitive(&mut value))), 0);
        assert_eq!(value, 5);
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn test_unknown_target_discards_args() {
        let (mut bus, svc, iface, _) = registered();
        push(&mut bus, Parameter::Primitive(1));
        assert_eq!(method(&mut bus, svc.raw(), iface.raw(), 9), STATUS_FAILURE);
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn test_reserved_record_fails() {
        let (mut bus, _, _, _) = registered();
        assert_eq!(method(&mut bus, 0, 0, 0), STATUS_FAILURE);
    }

    #[test]
    fn test_queue_bounds() {
        let mut bus = SimBus::with_queue_capacity(1);
        assert_eq!(push(&mut bus, Parameter::Primitive(1)), 0);
        assert_eq!(push(&mut bus, Parameter::Primitive(2)), STATUS_FAILURE);

        let mut buffer = [0u8; 4];
        assert_eq!(
            bus.call(BoundaryRequest::Pop(PopSlot::Array(&mut buffer))),
            STATUS_FAILURE
        );
        assert_eq!(bus.pending(), 1);
    }

    #[test]
    fn test_peek_empty_fails() {
        let mut bus = SimBus::new();
        let mut header = ParamHeader::default();
        assert_eq!(bus.call(BoundaryRequest::Peek(&mut header)), STATUS_FAILURE);
    }

    #[test]
    fn test_audit_log_records_every_call() {
        let (mut bus, _, _, _) = registered();
        push(&mut bus, Parameter::string("vfs"));
        method(&mut bus, 0, 1, 0);

        let log = bus.audit_log();
        assert_eq!(log.count_kind(SyscallKind::Push), 1);
        assert_eq!(log.count_kind(SyscallKind::Method), 1);
        assert_eq!(
            log.method_records(),
            vec![MethodInvocationRecord::new(0, 1, 0)]
        );
    }

    #[test]
    fn test_fault_plan_fails_without_side_effects() {
        let mut bus = SimBus::new().with_fault_plan(FaultPlan::new().with_fault(
            BoundaryFault::FailNext {
                kind: SyscallKind::Push,
                count: 1,
            },
        ));

        assert_eq!(push(&mut bus, Parameter::Primitive(1)), STATUS_FAILURE);
        assert_eq!(bus.pending(), 0);
        assert_eq!(push(&mut bus, Parameter::Primitive(1)), 0);
        assert_eq!(bus.pending(), 1);
        assert!(bus.audit_log().has_event(|e| e.is_failure()));
        assert_eq!(bus.faults().injected_count(), 1);
    }

    #[test]
    fn test_sever() {
        let mut bus = SimBus::new();
        bus.sever();
        assert_eq!(push(&mut bus, Parameter::Primitive(1)), STATUS_FAILURE);
    }
}
