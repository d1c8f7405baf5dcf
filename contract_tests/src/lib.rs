//! # Bus Contract Tests
//!
//! This crate provides "golden" tests for the bus wire contract to ensure
//! it doesn't drift accidentally over time.
//!
//! ## Structure
//!
//! Each module pins one part of the contract:
//! - `wire`: operation and parameter kind numbering
//! - `records`: the reserved resolution records and their push order
//! - `layout`: the `#[repr(C)]` structures handed to the kernel

pub mod layout;
pub mod records;
pub mod wire;

/// Common test helpers for contract validation
pub mod test_helpers {
    use bus_abi::{
        Boundary, BoundaryRequest, MethodInvocationRecord, Parameter, StatusCode,
        STATUS_FAILURE,
    };
    use serde::Serialize;

    /// Far side that records traffic and answers every `Method` call with
    /// a fixed status. Peeks and pops always fail.
    #[derive(Debug, Default)]
    pub struct RecordingBoundary {
        pub answer: StatusCode,
        pub pushes: Vec<Parameter>,
        pub records: Vec<MethodInvocationRecord>,
    }

    impl RecordingBoundary {
        pub fn answering(answer: StatusCode) -> Self {
            Self {
                answer,
                ..Self::default()
            }
        }
    }

    impl Boundary for RecordingBoundary {
        fn call(&mut self, request: BoundaryRequest<'_>) -> StatusCode {
            match request {
                BoundaryRequest::Push(param) => {
                    self.pushes.push(param.to_parameter());
                    0
                }
                BoundaryRequest::Method(record) => {
                    self.records.push(record);
                    self.answer
                }
                BoundaryRequest::Peek(_) | BoundaryRequest::Pop(_) => STATUS_FAILURE,
            }
        }
    }

    /// Verifies a record matches its pinned encoding
    pub fn verify_record(actual: MethodInvocationRecord, expected: [i64; 3]) {
        let encoded = [
            actual.process_target,
            actual.interface_flag,
            actual.method_flag,
        ];
        assert_eq!(
            encoded, expected,
            "Record encoding changed: expected {:?}, got {:?}",
            expected, encoded
        );
    }

    /// Verifies a value serializes to the pinned JSON document
    pub fn verify_json<T: Serialize>(value: &T, expected: &str) {
        let json = serde_json::to_string(value).expect("Failed to serialize");
        assert_eq!(
            json, expected,
            "Serialized form changed: expected {}, got {}",
            expected, json
        );
    }
}
