//! Wire numbering contract tests
//!
//! The kernel decodes operation kinds and parameter tags by number. These
//! values are fixed by the kernel ABI.

use bus_abi::{ParamKind, SyscallKind, STATUS_FAILURE};

// ===== Operation Kinds =====
const KIND_EXIT: i32 = 0;
const KIND_METHOD: i32 = 1;
const KIND_SIGNAL: i32 = 2;
const KIND_TARGETED_SIGNAL: i32 = 3;
const KIND_PUSH: i32 = 4;
const KIND_PEEK: i32 = 5;
const KIND_POP: i32 = 6;

// ===== Parameter Tags =====
const TAG_ARRAY: i32 = 0;
const TAG_PRIMITIVE: i32 = 1;

/// Every operation kind paired with its pinned wire value
pub const OPERATION_KINDS: [(SyscallKind, i32); 7] = [
    (SyscallKind::Exit, KIND_EXIT),
    (SyscallKind::Method, KIND_METHOD),
    (SyscallKind::Signal, KIND_SIGNAL),
    (SyscallKind::TargetedSignal, KIND_TARGETED_SIGNAL),
    (SyscallKind::Push, KIND_PUSH),
    (SyscallKind::Peek, KIND_PEEK),
    (SyscallKind::Pop, KIND_POP),
];

// ===== Contract Tests =====
