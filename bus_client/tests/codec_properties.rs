//! Codec Properties
//!
//! Validates push/peek/pop behavior of the codec against the simulated
//! far side: round trips, FIFO order, tag checks and failure handling.

use bus_abi::{BusError, ParamHeader, ParamKind, Parameter, SyscallKind, STATUS_FAILURE};
use bus_client::BusClient;
use sim_bus::fault_injection::{BoundaryFault, FaultPlan};
use sim_bus::SimBus;

/// Test: arbitrary byte strings survive a push/pop round trip
#[test]
fn test_string_round_trip() {
    let client = BusClient::new(SimBus::new());
    let samples = ["", "a", "hello, bus", "ünïcødé ✓", "with\0nul"];

    for sample in samples {
        let mut transaction = client.transaction();
        let mut codec = transaction.codec();
        codec.push_string(sample).expect("Failed to push string");
        assert_eq!(codec.pop_string().expect("Failed to pop string"), sample);
    }
}

/// Test: raw buffers, including non-UTF-8 bytes, round trip byte for byte
#[test]
fn test_bytes_round_trip() {
    let client = BusClient::new(SimBus::new());
    let bytes: Vec<u8> = (0..=255).collect();

    client
        .channel()
        .call(|codec| {
            codec.push_bytes(&bytes)?;
            assert_eq!(codec.peek()?, ParamHeader::array(256));
            assert_eq!(codec.pop_bytes()?, bytes);
            Ok(())
        })
        .expect("Round trip failed");
}

/// Test: scalars round trip exactly, including the extremes
#[test]
fn test_int_round_trip() {
    let client = BusClient::new(SimBus::new());

    for value in [0, 1, -1, 42, i64::MIN, i64::MAX] {
        let mut transaction = client.transaction();
        let mut codec = transaction.codec();
        codec.push_int(value).expect("Failed to push int");
        assert_eq!(codec.pop_int().expect("Failed to pop int"), value);
    }
}

/// Test: popping a string when a primitive is pending consumes nothing
#[test]
fn test_type_mismatch_is_safe() {
    let client = BusClient::new(SimBus::new());
    let mut transaction = client.transaction();
    let mut codec = transaction.codec();

    codec.push_int(77).expect("Failed to push int");
    assert_eq!(
        codec.pop_string(),
        Err(BusError::ProtocolMismatch {
            expected: ParamKind::Array,
            actual: ParamKind::Primitive,
        })
    );
    assert_eq!(codec.pop_int(), Ok(77));
}

/// Test: popping an int when an array is pending consumes nothing
#[test]
fn test_reverse_type_mismatch_is_safe() {
    let client = BusClient::new(SimBus::new());

    let result = client.channel().call(|codec| {
        codec.push_string("keep")?;
        let mismatch = codec.pop_int();
        let text = codec.pop_string()?;
        Ok((mismatch, text))
    });

    let (mismatch, text) = result.expect("Transaction failed");
    assert!(matches!(mismatch, Err(BusError::ProtocolMismatch { .. })));
    assert_eq!(text, "keep");
}

/// Test: a failed destructive pop yields an error, never a partial buffer
///
/// The peek succeeds, the pop is made to fail; the pending parameter must
/// still be intact for the next attempt.
#[test]
fn test_no_partial_buffer_on_pop_failure() {
    let client = BusClient::new(SimBus::new());
    client.with_boundary(|bus| {
        bus.set_fault_plan(FaultPlan::new().with_fault(BoundaryFault::FailNext {
            kind: SyscallKind::Pop,
            count: 1,
        }))
    });

    let mut transaction = client.transaction();
    let mut codec = transaction.codec();
    codec.push_string("payload").expect("Failed to push string");
    assert_eq!(
        codec.pop_string(),
        Err(BusError::transport(SyscallKind::Pop, STATUS_FAILURE))
    );
    assert_eq!(codec.pop_string(), Ok("payload".to_string()));
}

/// Test: a pop with nothing pending fails at the peek
#[test]
fn test_pop_on_empty_queue() {
    let client = BusClient::new(SimBus::new());
    let mut transaction = client.transaction();

    assert_eq!(
        transaction.codec().pop_int(),
        Err(BusError::transport(SyscallKind::Peek, STATUS_FAILURE))
    );
    drop(transaction);

    client.with_boundary(|bus| {
        let log = bus.audit_log();
        assert!(log.count_kind(SyscallKind::Peek) >= 1);
        assert_eq!(
            log.count_events(|e| e.kind == SyscallKind::Peek && !e.is_failure()),
            0
        );
        assert_eq!(log.count_kind(SyscallKind::Pop), 0);
    });
}

/// Test: parameters left unpopped do not outlive their transaction
#[test]
fn test_unpopped_parameters_are_discarded() {
    let client = BusClient::new(SimBus::new());

    let mut transaction = client.transaction();
    let mut codec = transaction.codec();
    codec.push_string("stale").expect("Failed to push string");
    codec.push_int(5).expect("Failed to push int");
    drop(transaction);

    client.with_boundary(|bus| assert_eq!(bus.pending(), 0));

    let mut transaction = client.transaction();
    let mut codec = transaction.codec();
    codec.push_int(6).expect("Failed to push int");
    assert_eq!(codec.pop(), Ok(Parameter::Primitive(6)));
}

/// Test: parameters come back in the order they were pushed
#[test]
fn test_fifo_ordering() {
    let client = BusClient::new(SimBus::new());

    let popped = client
        .channel()
        .call(|codec| {
            codec.push_string("A")?;
            codec.push_int(2)?;
            codec.push_string("B")?;
            Ok(vec![codec.pop()?, codec.pop()?, codec.pop()?])
        })
        .expect("Transaction failed");

    assert_eq!(
        popped,
        vec![
            Parameter::string("A"),
            Parameter::Primitive(2),
            Parameter::string("B"),
        ]
    );
}

/// Test: a push the far side rejects surfaces as a transport error
#[test]
fn test_push_on_full_queue() {
    let client = BusClient::new(SimBus::with_queue_capacity(1));
    let mut transaction = client.transaction();
    let mut codec = transaction.codec();

    codec.push_int(1).expect("Failed to push int");
    assert_eq!(
        codec.push_int(2),
        Err(BusError::transport(SyscallKind::Push, STATUS_FAILURE))
    );
}

/// Test: invalid UTF-8 is reported without panicking
#[test]
fn test_invalid_utf8() {
    let client = BusClient::new(SimBus::new());
    let mut transaction = client.transaction();
    let mut codec = transaction.codec();

    codec.push_bytes(&[0xff, 0xfe]).expect("Failed to push bytes");
    assert_eq!(codec.pop_string(), Err(BusError::InvalidUtf8));
}
