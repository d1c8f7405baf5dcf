//! # Bus ABI
//!
//! This crate defines the values that cross the bus boundary.
//!
//! ## Philosophy
//!
//! The kernel exposes exactly one entry point: a call that takes an
//! operation kind and an operation-specific record and returns a signed
//! 64-bit status. Everything else is built on top of it:
//! - **Parameters** are pushed, peeked and popped one at a time
//! - **Names** are resolved to opaque numeric handles
//! - **Methods** are invoked with a resolved (service, interface, method) triple
//!
//! ## Key Types
//!
//! - [`Boundary`]: the single boundary-crossing call, as a trait
//! - [`BoundaryRequest`]: the operation kind together with its payload
//! - [`Parameter`]: a tagged primitive or array value
//! - [`Handle`]: an opaque service, interface or method identifier
//! - [`ResolutionRequest`]: the lookup/invoke transactions and their wire records
//! - [`BusError`]: what can go wrong at this layer

pub mod boundary;
pub mod error;
pub mod handle;
pub mod param;
pub mod raw;
pub mod record;

#[cfg(feature = "native")]
pub mod native;

pub use boundary::{Boundary, BoundaryRequest, StatusCode, SyscallKind, STATUS_FAILURE};
pub use error::{BusError, EntityKind, Result};
pub use handle::Handle;
pub use param::{ParamHeader, ParamKind, ParamRef, Parameter, PopSlot};
pub use raw::{RawMethodData, RawParam, RawParamValue};
pub use record::{MethodInvocationRecord, MethodTarget, ResolutionRequest};

#[cfg(feature = "native")]
pub use native::NativeBoundary;
