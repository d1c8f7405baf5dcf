//! C-compatible records passed to the kernel's `_syscall` entry point.
//!
//! These mirror the kernel header layout exactly:
//!
//! ```text
//! struct syscall_method_data { uint64_t pid, interface, method; };
//! struct syscall_param {
//!     enum syscall_param_type type;
//!     size_t size;
//!     union { uint64_t value; void *array; };
//! };
//! ```

use crate::param::{ParamHeader, ParamKind, ParamRef, PopSlot};
use crate::record::MethodInvocationRecord;
use core::ffi::{c_int, c_void};

/// `struct syscall_method_data`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct RawMethodData {
    pub pid: u64,
    pub interface: u64,
    pub method: u64,
}

impl From<MethodInvocationRecord> for RawMethodData {
    fn from(record: MethodInvocationRecord) -> Self {
        Self {
            pid: record.process_target as u64,
            interface: record.interface_flag as u64,
            method: record.method_flag as u64,
        }
    }
}

/// Value slot of `struct syscall_param`
#[derive(Clone, Copy)]
#[repr(C)]
pub union RawParamValue {
    pub value: u64,
    pub array: *mut c_void,
}

impl RawParamValue {
    /// A fully initialised slot holding `value`.
    const fn scalar(value: u64) -> Self {
        RawParamValue { value }
    }

    /// A fully initialised slot holding `array`.
    ///
    /// The scalar is written first so every byte of the union is
    /// initialised even where pointers are narrower than 64 bits.
    fn pointer(array: *mut c_void) -> Self {
        let mut slot = RawParamValue { value: 0 };
        slot.array = array;
        slot
    }
}

/// `struct syscall_param`
#[derive(Clone, Copy)]
#[repr(C)]
pub struct RawParam {
    pub kind: c_int,
    pub size: usize,
    pub value: RawParamValue,
}

impl RawParam {
    /// Record for a push. The array pointer borrows `param`; the record
    /// must not outlive it.
    pub fn for_push(param: ParamRef<'_>) -> Self {
        match param {
            ParamRef::Primitive(value) => Self {
                kind: ParamKind::Primitive.as_raw(),
                size: 0,
                value: RawParamValue::scalar(value as u64),
            },
            ParamRef::Array(bytes) => Self {
                kind: ParamKind::Array.as_raw(),
                size: bytes.len(),
                value: RawParamValue::pointer(bytes.as_ptr() as *mut c_void),
            },
        }
    }

    /// Record for a peek; the kernel fills in tag and size.
    pub fn for_peek() -> Self {
        Self {
            kind: ParamKind::Array.as_raw(),
            size: 0,
            value: RawParamValue::scalar(0),
        }
    }

    /// Record for a pop into `slot`. The array pointer borrows the slot's
    /// buffer; the record must not outlive it.
    pub fn for_pop(slot: &mut PopSlot<'_>) -> Self {
        match slot {
            PopSlot::Primitive(_) => Self {
                kind: ParamKind::Primitive.as_raw(),
                size: 0,
                value: RawParamValue::scalar(0),
            },
            PopSlot::Array(buffer) => Self {
                kind: ParamKind::Array.as_raw(),
                size: buffer.len(),
                value: RawParamValue::pointer(buffer.as_mut_ptr() as *mut c_void),
            },
        }
    }

    /// Tag and size as written by the kernel, if the tag is known.
    pub fn header(&self) -> Option<ParamHeader> {
        let kind = ParamKind::from_raw(self.kind)?;
        Some(ParamHeader {
            kind,
            size: match kind {
                ParamKind::Array => self.size,
                ParamKind::Primitive => 0,
            },
        })
    }

    /// The scalar slot, reinterpreted as a signed value.
    pub fn scalar(&self) -> i64 {
        // SAFETY: every constructor initialises all eight bytes of the
        // union through the `value` field before anything else is written,
        // so reading it back is always a read of initialised memory.
        unsafe { self.value.value as i64 }
    }
}

impl core::fmt::Debug for RawParam {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawParam")
            .field("kind", &self.kind)
            .field("size", &self.size)
            .field("value", &self.scalar())
            .finish()
    }
}
