//! Parameter codec: push, peek and pop over a boundary.
//!
//! Every incoming value is consumed in two steps. A peek learns the tag and
//! size of the pending parameter without consuming it; only when the tag
//! matches is the destructive pop issued, into a buffer sized exactly to the
//! peeked length. A failed tag check therefore leaves the pending parameter
//! in place for the next peek or pop.

use bus_abi::{
    Boundary, BoundaryRequest, BusError, MethodInvocationRecord, MethodTarget, ParamHeader,
    ParamKind, ParamRef, Parameter, PopSlot, ResolutionRequest, Result, StatusCode, SyscallKind,
};
use log::{debug, trace, warn};

/// Encoder/decoder for one push…pop sequence.
///
/// The codec holds no queue of its own; the far side is the FIFO.
pub struct ParamCodec<'a, B: Boundary + ?Sized> {
    boundary: &'a mut B,
}

impl<'a, B: Boundary + ?Sized> ParamCodec<'a, B> {
    /// Creates a codec over a boundary.
    pub fn new(boundary: &'a mut B) -> Self {
        Self { boundary }
    }

    fn issue(&mut self, request: BoundaryRequest<'_>) -> Result<StatusCode> {
        let kind = request.kind();
        let status = self.boundary.call(request);
        trace!("bus {} -> {}", kind, status);
        if status < 0 {
            return Err(BusError::transport(kind, status));
        }
        Ok(status)
    }

    /// Enqueues one parameter.
    pub fn push(&mut self, param: ParamRef<'_>) -> Result<StatusCode> {
        self.issue(BoundaryRequest::Push(param))
    }

    /// Enqueues an owned parameter.
    pub fn push_parameter(&mut self, param: &Parameter) -> Result<StatusCode> {
        self.push(param.view())
    }

    /// Enqueues text as an array of its bytes (no terminator).
    pub fn push_string(&mut self, text: &str) -> Result<StatusCode> {
        self.push(ParamRef::Array(text.as_bytes()))
    }

    /// Enqueues a raw buffer as an array.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Result<StatusCode> {
        self.push(ParamRef::Array(bytes))
    }

    /// Enqueues a scalar.
    pub fn push_int(&mut self, value: i64) -> Result<StatusCode> {
        self.push(ParamRef::Primitive(value))
    }

    /// Inspects the next pending parameter without consuming it.
    pub fn peek(&mut self) -> Result<ParamHeader> {
        let mut header = ParamHeader::default();
        self.issue(BoundaryRequest::Peek(&mut header))?;
        Ok(header)
    }

    fn expect(&mut self, expected: ParamKind) -> Result<ParamHeader> {
        let header = self.peek()?;
        if header.kind != expected {
            return Err(BusError::ProtocolMismatch {
                expected,
                actual: header.kind,
            });
        }
        Ok(header)
    }

    /// Consumes the next pending array.
    ///
    /// On any failure after the peek the receive buffer is dropped; the
    /// caller never sees a partially filled result.
    pub fn pop_bytes(&mut self) -> Result<Vec<u8>> {
        let header = self.expect(ParamKind::Array)?;
        self.take_array(header.size)
    }

    /// Consumes the next pending array as UTF-8 text.
    pub fn pop_string(&mut self) -> Result<String> {
        let bytes = self.pop_bytes()?;
        String::from_utf8(bytes).map_err(|_| BusError::InvalidUtf8)
    }

    /// Consumes the next pending scalar.
    pub fn pop_int(&mut self) -> Result<i64> {
        self.expect(ParamKind::Primitive)?;
        self.take_primitive()
    }

    /// Consumes the next pending parameter, whatever its tag.
    pub fn pop(&mut self) -> Result<Parameter> {
        let header = self.peek()?;
        self.take(header)
    }

    /// Pops and drops every parameter still pending, returning how many
    /// were discarded. Stops at the first failed peek or pop.
    pub fn discard_pending(&mut self) -> usize {
        let mut discarded = 0;
        while let Ok(header) = self.peek() {
            match self.take(header) {
                Ok(param) => {
                    debug!("discarding unconsumed {} parameter", param.kind());
                    discarded += 1;
                }
                Err(err) => {
                    warn!("could not discard pending {} parameter: {}", header.kind, err);
                    break;
                }
            }
        }
        discarded
    }

    // Pops a parameter whose header was already peeked.
    fn take(&mut self, header: ParamHeader) -> Result<Parameter> {
        match header.kind {
            ParamKind::Array => self.take_array(header.size).map(Parameter::Array),
            ParamKind::Primitive => self.take_primitive().map(Parameter::Primitive),
        }
    }

    fn take_array(&mut self, size: usize) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(size)
            .map_err(|_| BusError::AllocationFailure { size })?;
        buffer.resize(size, 0);

        self.issue(BoundaryRequest::Pop(PopSlot::Array(&mut buffer)))?;
        Ok(buffer)
    }

    fn take_primitive(&mut self) -> Result<i64> {
        let mut value = 0;
        self.issue(BoundaryRequest::Pop(PopSlot::Primitive(&mut value)))?;
        Ok(value)
    }

    /// Issues a raw `Method` call. The status is returned verbatim: it is
    /// either a handle or the remote method's result, depending on the record.
    pub fn method(&mut self, record: MethodInvocationRecord) -> StatusCode {
        let status = self.boundary.call(BoundaryRequest::Method(record));
        trace!("bus {} {} -> {}", SyscallKind::Method, record, status);
        status
    }

    /// Pushes the parameters of `request` in wire order and issues its
    /// `Method` call.
    ///
    /// Push failures are transport errors; the final status is returned
    /// verbatim.
    pub fn submit(&mut self, request: &ResolutionRequest<'_>) -> Result<StatusCode> {
        for param in request.parameters() {
            self.push(param)?;
        }
        Ok(self.method(request.record()))
    }

    /// Invokes a resolved method with whatever arguments were pushed.
    pub fn invoke(&mut self, target: MethodTarget) -> Result<StatusCode> {
        let status = self.submit(&ResolutionRequest::Invoke(target))?;
        if status < 0 {
            return Err(BusError::transport(SyscallKind::Method, status));
        }
        Ok(status)
    }
}
