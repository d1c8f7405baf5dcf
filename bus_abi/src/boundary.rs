//! The single boundary-crossing call.
//!
//! Every interaction with the bus goes through [`Boundary::call`]. The
//! kernel side is the authoritative FIFO of pending parameters for the
//! duration of one transaction; nothing on this side queues.

use crate::param::{ParamHeader, ParamRef, PopSlot};
use crate::record::MethodInvocationRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Signed status returned by the boundary. Negative means failure.
pub type StatusCode = i64;

/// Status a far side returns when it rejects a request.
pub const STATUS_FAILURE: StatusCode = -1;

/// Operation kinds understood by the boundary, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum SyscallKind {
    Exit = 0,
    Method = 1,
    Signal = 2,
    TargetedSignal = 3,
    Push = 4,
    Peek = 5,
    Pop = 6,
}

impl SyscallKind {
    /// Wire value of this kind.
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    /// Decodes a wire value.
    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(SyscallKind::Exit),
            1 => Some(SyscallKind::Method),
            2 => Some(SyscallKind::Signal),
            3 => Some(SyscallKind::TargetedSignal),
            4 => Some(SyscallKind::Push),
            5 => Some(SyscallKind::Peek),
            6 => Some(SyscallKind::Pop),
            _ => None,
        }
    }

    /// Short name used in logs.
    pub const fn name(self) -> &'static str {
        match self {
            SyscallKind::Exit => "exit",
            SyscallKind::Method => "method",
            SyscallKind::Signal => "signal",
            SyscallKind::TargetedSignal => "targeted_signal",
            SyscallKind::Push => "push",
            SyscallKind::Peek => "peek",
            SyscallKind::Pop => "pop",
        }
    }
}

impl fmt::Display for SyscallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An operation kind paired with its payload.
///
/// Peek and pop payloads are outputs: the far side writes the pending
/// header into a peek, and copies the pending value into a pop slot.
#[derive(Debug)]
pub enum BoundaryRequest<'a> {
    /// Resolve a name or invoke a method
    Method(MethodInvocationRecord),
    /// Enqueue one outgoing parameter
    Push(ParamRef<'a>),
    /// Inspect the next pending parameter without consuming it
    Peek(&'a mut ParamHeader),
    /// Consume the next pending parameter
    Pop(PopSlot<'a>),
}

impl<'a> BoundaryRequest<'a> {
    /// Returns the operation kind of this request.
    pub fn kind(&self) -> SyscallKind {
        match self {
            BoundaryRequest::Method(_) => SyscallKind::Method,
            BoundaryRequest::Push(_) => SyscallKind::Push,
            BoundaryRequest::Peek(_) => SyscallKind::Peek,
            BoundaryRequest::Pop(_) => SyscallKind::Pop,
        }
    }
}

/// The boundary primitive.
///
/// Implementations:
/// - [`crate::NativeBoundary`] (feature `native`): the kernel's `_syscall`
/// - the loop-back simulator in `sim_bus` (for testing)
///
/// The call is synchronous and runs to completion. Implementations must
/// never consume a pending parameter on peek, and must reject (with a
/// negative status, consuming nothing) a pop whose slot tag differs from
/// the pending tag or whose array capacity is below the pending size.
pub trait Boundary {
    fn call(&mut self, request: BoundaryRequest<'_>) -> StatusCode;
}

impl<B: Boundary + ?Sized> Boundary for &mut B {
    fn call(&mut self, request: BoundaryRequest<'_>) -> StatusCode {
        (**self).call(request)
    }
}

impl<B: Boundary + ?Sized> Boundary for Box<B> {
    fn call(&mut self, request: BoundaryRequest<'_>) -> StatusCode {
        (**self).call(request)
    }
}
