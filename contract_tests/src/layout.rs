//! Native layout contract tests
//!
//! The kernel reads these structures directly, so their size and field
//! offsets are fixed on 64-bit targets.

use bus_abi::{RawMethodData, RawParam, RawParamValue};
use std::mem::{align_of, size_of};

pub const METHOD_DATA_SIZE: usize = 24;
pub const PARAM_SIZE: usize = 24;
pub const PARAM_VALUE_SIZE: usize = 8;

/// Size and alignment of each native structure, for diagnostics.
pub fn layout_summary() -> [(&'static str, usize, usize); 3] {
    [
        (
            "RawMethodData",
            size_of::<RawMethodData>(),
            align_of::<RawMethodData>(),
        ),
        ("RawParam", size_of::<RawParam>(), align_of::<RawParam>()),
        (
            "RawParamValue",
            size_of::<RawParamValue>(),
            align_of::<RawParamValue>(),
        ),
    ]
}

// ===== Contract Tests =====

#[cfg(all(test, target_pointer_width = "64"))]
mod tests {
    use super::*;
    use bus_abi::{MethodInvocationRecord, ParamKind, ParamRef};
    use std::mem::offset_of;

    #[test]
    fn test_method_data_layout() {
        assert_eq!(size_of::<RawMethodData>(), METHOD_DATA_SIZE);
        assert_eq!(offset_of!(RawMethodData, pid), 0);
        assert_eq!(offset_of!(RawMethodData, interface), 8);
        assert_eq!(offset_of!(RawMethodData, method), 16);
    }

    #[test]
    fn test_param_layout() {
        assert_eq!(size_of::<RawParamValue>(), PARAM_VALUE_SIZE);
        assert_eq!(size_of::<RawParam>(), PARAM_SIZE);
        assert_eq!(offset_of!(RawParam, kind), 0);
        assert_eq!(offset_of!(RawParam, size), 8);
        assert_eq!(offset_of!(RawParam, value), 16);
    }

    #[test]
    fn test_method_data_field_order() {
        let raw = RawMethodData::from(MethodInvocationRecord::new(7, 8, 9));
        assert_eq!((raw.pid, raw.interface, raw.method), (7, 8, 9));
    }

    #[test]
    fn test_push_descriptor_tags() {
        let primitive = RawParam::for_push(ParamRef::Primitive(5));
        assert_eq!(primitive.kind, ParamKind::Primitive.as_raw());
        assert_eq!(primitive.scalar(), 5);

        let array = RawParam::for_push(ParamRef::Array(b"abc"));
        assert_eq!(array.kind, ParamKind::Array.as_raw());
        assert_eq!(array.size, 3);
    }

    #[test]
    fn test_summary_lists_every_structure() {
        let names: Vec<_> = layout_summary().iter().map(|(name, _, _)| *name).collect();
        assert_eq!(names, ["RawMethodData", "RawParam", "RawParamValue"]);
    }
}
