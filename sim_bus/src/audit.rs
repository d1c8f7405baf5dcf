//! Audit log of boundary calls seen by the simulated bus.

use bus_abi::{MethodInvocationRecord, StatusCode, SyscallKind};
use serde::{Deserialize, Serialize};

/// One boundary call and the status it returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryEvent {
    pub kind: SyscallKind,
    pub status: StatusCode,
    /// Present for `Method` calls
    pub record: Option<MethodInvocationRecord>,
}

impl BoundaryEvent {
    pub fn is_failure(&self) -> bool {
        self.status < 0
    }
}

/// Audit log for boundary calls, in call order.
#[derive(Debug, Clone, Default)]
pub struct BoundaryAuditLog {
    events: Vec<BoundaryEvent>,
}

impl BoundaryAuditLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn record(&mut self, event: BoundaryEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BoundaryEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn has_event<F>(&self, predicate: F) -> bool
    where
        F: Fn(&BoundaryEvent) -> bool,
    {
        self.events.iter().any(predicate)
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&BoundaryEvent) -> bool,
    {
        self.events.iter().filter(|e| predicate(e)).count()
    }

    pub fn count_kind(&self, kind: SyscallKind) -> usize {
        self.count_events(|e| e.kind == kind)
    }

    /// Records of every `Method` call, in order.
    pub fn method_records(&self) -> Vec<MethodInvocationRecord> {
        self.events.iter().filter_map(|e| e.record).collect()
    }
}
