//! Binding to the kernel's `_syscall` entry point.

use crate::boundary::{Boundary, BoundaryRequest, StatusCode, SyscallKind, STATUS_FAILURE};
use crate::param::PopSlot;
use crate::raw::{RawMethodData, RawParam};
use core::ffi::{c_int, c_void};

extern "C" {
    fn _syscall(kind: c_int, data: *mut c_void) -> i64;
}

/// The real boundary: every request becomes one `_syscall`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeBoundary;

impl NativeBoundary {
    pub const fn new() -> Self {
        NativeBoundary
    }

    fn raw_call<T>(kind: SyscallKind, data: &mut T) -> StatusCode {
        // SAFETY: `data` is one of the `#[repr(C)]` records the kernel
        // expects for `kind`, and any buffer it points at is borrowed for
        // the duration of this synchronous call.
        unsafe { _syscall(kind.as_raw(), data as *mut T as *mut c_void) }
    }
}

impl Boundary for NativeBoundary {
    fn call(&mut self, request: BoundaryRequest<'_>) -> StatusCode {
        let kind = request.kind();
        match request {
            BoundaryRequest::Method(record) => {
                let mut raw = RawMethodData::from(record);
                Self::raw_call(kind, &mut raw)
            }
            BoundaryRequest::Push(param) => {
                let mut raw = RawParam::for_push(param);
                Self::raw_call(kind, &mut raw)
            }
            BoundaryRequest::Peek(header) => {
                let mut raw = RawParam::for_peek();
                let status = Self::raw_call(kind, &mut raw);
                if status < 0 {
                    return status;
                }
                match raw.header() {
                    Some(peeked) => {
                        *header = peeked;
                        status
                    }
                    None => STATUS_FAILURE,
                }
            }
            BoundaryRequest::Pop(mut slot) => {
                let mut raw = RawParam::for_pop(&mut slot);
                let status = Self::raw_call(kind, &mut raw);
                if status >= 0 {
                    if let PopSlot::Primitive(value) = slot {
                        *value = raw.scalar();
                    }
                }
                status
            }
        }
    }
}
