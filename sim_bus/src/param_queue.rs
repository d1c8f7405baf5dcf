//! Bounded parameter FIFO held by the simulated far side.
//!
//! Provides deterministic FIFO ordering with explicit capacity limits.

use bus_abi::{ParamHeader, ParamKind, Parameter, PopSlot};
use std::collections::VecDeque;

/// Queue error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    Full,
    Empty,
    KindMismatch {
        expected: ParamKind,
        actual: ParamKind,
    },
    BufferTooSmall {
        needed: usize,
        capacity: usize,
    },
}

/// Bounded FIFO queue for pending parameters.
#[derive(Debug, Clone)]
pub struct ParamQueue {
    capacity: usize,
    params: VecDeque<Parameter>,
}

impl ParamQueue {
    /// Creates a queue with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            params: VecDeque::new(),
        }
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of pending parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns remaining capacity.
    pub fn remaining_capacity(&self) -> usize {
        self.capacity.saturating_sub(self.params.len())
    }

    /// Appends a parameter.
    pub fn push(&mut self, param: Parameter) -> Result<(), QueueError> {
        if self.params.len() >= self.capacity {
            return Err(QueueError::Full);
        }
        self.params.push_back(param);
        Ok(())
    }

    /// Header of the next parameter, without consuming it.
    pub fn peek(&self) -> Option<ParamHeader> {
        self.params.front().map(Parameter::header)
    }

    /// Removes the next parameter.
    pub fn pop(&mut self) -> Option<Parameter> {
        self.params.pop_front()
    }

    /// Copies the next parameter into `slot` and removes it.
    ///
    /// A tag mismatch or an undersized array slot leaves the queue as it was.
    pub fn pop_into(&mut self, slot: PopSlot<'_>) -> Result<(), QueueError> {
        let front = self.params.front().ok_or(QueueError::Empty)?;
        match (slot, front) {
            (PopSlot::Primitive(out), Parameter::Primitive(value)) => *out = *value,
            (PopSlot::Array(buffer), Parameter::Array(bytes)) => {
                if buffer.len() < bytes.len() {
                    return Err(QueueError::BufferTooSmall {
                        needed: bytes.len(),
                        capacity: buffer.len(),
                    });
                }
                buffer[..bytes.len()].copy_from_slice(bytes);
            }
            (slot, front) => {
                return Err(QueueError::KindMismatch {
                    expected: slot.kind(),
                    actual: front.kind(),
                })
            }
        }
        self.params.pop_front();
        Ok(())
    }

    /// Removes the next parameter if it is an array.
    pub fn pop_array(&mut self) -> Option<Vec<u8>> {
        match self.params.front() {
            Some(Parameter::Array(_)) => match self.params.pop_front() {
                Some(Parameter::Array(bytes)) => Some(bytes),
                _ => None,
            },
            _ => None,
        }
    }

    /// Removes the next parameter if it is a primitive.
    pub fn pop_primitive(&mut self) -> Option<i64> {
        match self.params.front() {
            Some(Parameter::Primitive(value)) => {
                let value = *value;
                self.params.pop_front();
                Some(value)
            }
            _ => None,
        }
    }

    /// Removes and returns every pending parameter, oldest first.
    pub fn drain(&mut self) -> Vec<Parameter> {
        self.params.drain(..).collect()
    }

    /// Pending parameters, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }
}
