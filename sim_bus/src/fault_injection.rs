//! Deterministic fault injection for boundary calls
//!
//! Faults are keyed on the boundary call kind and counted, never random, so
//! a test that injects a fault sees it at exactly the same call every run.
//!
//! ## Example
//!
//! ```
//! use bus_abi::SyscallKind;
//! use sim_bus::fault_injection::{BoundaryFault, FaultPlan};
//!
//! let plan = FaultPlan::new()
//!     .with_fault(BoundaryFault::FailNext { kind: SyscallKind::Pop, count: 1 })
//!     .with_fault(BoundaryFault::FailAfter { kind: SyscallKind::Push, successes: 3 });
//! assert_eq!(plan.faults().len(), 2);
//! ```

use bus_abi::SyscallKind;
use std::collections::HashMap;

/// A fault to inject at the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryFault {
    /// Fail the next `count` calls of `kind`
    FailNext { kind: SyscallKind, count: usize },

    /// Let `successes` calls of `kind` through, then fail every later one
    FailAfter { kind: SyscallKind, successes: usize },

    /// Fail every call of every kind
    Sever,
}

/// A plan describing the faults to inject, configured per test.
#[derive(Debug, Clone, Default)]
pub struct FaultPlan {
    faults: Vec<BoundaryFault>,
}

impl FaultPlan {
    /// Creates a new empty fault plan
    pub fn new() -> Self {
        Self { faults: Vec::new() }
    }

    /// Adds a fault to the plan
    pub fn with_fault(mut self, fault: BoundaryFault) -> Self {
        self.faults.push(fault);
        self
    }

    pub fn faults(&self) -> &[BoundaryFault] {
        &self.faults
    }

    pub fn is_empty(&self) -> bool {
        self.faults.is_empty()
    }
}

/// Applies a [`FaultPlan`] call by call.
#[derive(Debug, Default)]
pub struct FaultInjector {
    plan: FaultPlan,
    fail_next: HashMap<SyscallKind, usize>,
    // Remaining successes before a kind starts failing.
    fail_after: HashMap<SyscallKind, usize>,
    severed: bool,
    injected: usize,
}

impl FaultInjector {
    /// Creates a new fault injector with the given plan
    pub fn new(plan: FaultPlan) -> Self {
        let mut injector = Self {
            plan: plan.clone(),
            ..Self::default()
        };

        for fault in plan.faults() {
            match *fault {
                BoundaryFault::FailNext { kind, count } => {
                    *injector.fail_next.entry(kind).or_insert(0) += count;
                }
                BoundaryFault::FailAfter { kind, successes } => {
                    let remaining = injector.fail_after.entry(kind).or_insert(successes);
                    *remaining = (*remaining).min(successes);
                }
                BoundaryFault::Sever => injector.severed = true,
            }
        }

        injector
    }

    pub fn plan(&self) -> &FaultPlan {
        &self.plan
    }

    /// Decides whether the next call of `kind` fails, advancing the
    /// injector's counters.
    pub fn should_fail(&mut self, kind: SyscallKind) -> bool {
        let fail = self.decide(kind);
        if fail {
            self.injected += 1;
        }
        fail
    }

    /// Number of calls failed so far.
    pub fn injected_count(&self) -> usize {
        self.injected
    }

    /// Cuts the boundary from now on.
    pub fn sever(&mut self) {
        self.severed = true;
    }

    fn decide(&mut self, kind: SyscallKind) -> bool {
        if self.severed {
            return true;
        }

        if let Some(count) = self.fail_next.get_mut(&kind) {
            if *count > 0 {
                *count -= 1;
                return true;
            }
        }

        match self.fail_after.get_mut(&kind) {
            Some(0) => true,
            Some(remaining) => {
                *remaining -= 1;
                false
            }
            None => false,
        }
    }
}
