//! Test utilities for the simulated bus
//!
//! Provides a small fixture topology and a helper for running code under a
//! fault plan.

use crate::directory::{MethodReply, SimBusError};
use crate::fault_injection::FaultPlan;
use crate::SimBus;
use bus_abi::{MethodTarget, Parameter, StatusCode};

/// Service name of the echo fixture
pub const ECHO_SERVICE: &str = "echo";
/// Interface name of the echo fixture
pub const ECHO_INTERFACE: &str = "echo";
/// Returns its arguments as results, status = argument count
pub const ECHO_METHOD: &str = "echo";
/// Sums primitive arguments into one primitive result, status 0
pub const SUM_METHOD: &str = "sum";
/// Always fails with status -1 and no results
pub const FAIL_METHOD: &str = "fail";

/// Builds a bus with the echo fixture registered.
///
/// An unrelated service is registered first, so fixture handles are never
/// the lowest ones.
pub fn echo_bus() -> SimBus {
    let mut bus = SimBus::new();
    register_echo(&mut bus).expect("Failed to register echo fixture");
    bus
}

/// Registers the echo fixture and returns the address of its echo method.
pub fn register_echo(bus: &mut SimBus) -> Result<MethodTarget, SimBusError> {
    bus.register_service("placeholder")?;
    let service = bus.register_service(ECHO_SERVICE)?;
    let interface = bus.register_interface(service, ECHO_INTERFACE)?;
    let echo = bus.register_method(service, interface, ECHO_METHOD, |args| {
        let mut reply = MethodReply::ok(args.len() as StatusCode);
        reply.results = args;
        reply
    })?;
    bus.register_method(service, interface, SUM_METHOD, |args| {
        let sum: i64 = args
            .iter()
            .filter_map(|arg| match arg {
                Parameter::Primitive(value) => Some(*value),
                Parameter::Array(_) => None,
            })
            .sum();
        MethodReply::ok(0).with_result(sum)
    })?;
    bus.register_method(service, interface, FAIL_METHOD, |_| MethodReply::failed())?;
    Ok(MethodTarget::new(service, interface, echo))
}

/// Runs a test against an echo bus configured with `plan`.
///
/// # Example
///
/// ```
/// use bus_abi::SyscallKind;
/// use sim_bus::fault_injection::{BoundaryFault, FaultPlan};
/// use sim_bus::test_utils::with_fault_plan;
///
/// with_fault_plan(
///     FaultPlan::new().with_fault(BoundaryFault::FailNext { kind: SyscallKind::Pop, count: 1 }),
///     |bus| {
///         assert_eq!(bus.pending(), 0);
///     },
/// );
/// ```
pub fn with_fault_plan<F, R>(plan: FaultPlan, f: F) -> R
where
    F: FnOnce(SimBus) -> R,
{
    f(echo_bus().with_fault_plan(plan))
}
