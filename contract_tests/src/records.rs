//! Resolution record contract tests
//!
//! Name lookups reuse the `Method` operation with reserved records. The
//! encodings and the order of the pushed parameters are part of the kernel
//! contract.

use bus_abi::{Handle, MethodTarget, ResolutionRequest};

// ===== Reserved Records =====
pub const SERVICE_LOOKUP: [i64; 3] = [0, 1, 0];

/// Interface lookup record for `service`
pub fn interface_lookup(service: Handle) -> [i64; 3] {
    [service.raw(), 0, 0]
}

/// Method lookup record for `service`
pub fn method_lookup(service: Handle) -> [i64; 3] {
    [service.raw(), 0, 1]
}

/// Invocation record for a resolved target
pub fn invocation(target: MethodTarget) -> [i64; 3] {
    [
        target.service.raw(),
        target.interface.raw(),
        target.method.raw(),
    ]
}

/// Every request shape, for tests that iterate the contract
pub fn sample_requests() -> Vec<ResolutionRequest<'static>> {
    vec![
        ResolutionRequest::Service { name: "vfs" },
        ResolutionRequest::Interface {
            service: Handle::new(3),
            name: "file",
        },
        ResolutionRequest::Method {
            service: Handle::new(3),
            interface: Handle::new(2),
            name: "read",
        },
        ResolutionRequest::Invoke(MethodTarget::new(
            Handle::new(3),
            Handle::new(2),
            Handle::new(5),
        )),
    ]
}

// ===== Contract Tests =====
