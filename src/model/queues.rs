// src/model/queues.rs

use std::collections::VecDeque;

/// Fixed-length delay line for orders or shipments travelling between two echelons.
///
/// Every turn exactly one slot leaves at the head and one enters at the tail, so the
/// length set at construction never changes. A zero-length pipeline is instantaneous:
/// whatever enters is released in the same turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    buffer: VecDeque<u32>,
    delay_length: usize,
}

impl Pipeline {
    /// Creates a pipeline of `delay` slots, each pre-filled with `fill`.
    pub fn new(delay: usize, fill: u32) -> Self {
        let mut buffer = VecDeque::with_capacity(delay + 1);
        // Pre-fill so the chain starts in motion instead of empty
        for _ in 0..delay {
            buffer.push_back(fill);
        }

        Self {
            buffer,
            delay_length: delay,
        }
    }

    /// Shifts the pipeline by one turn: pop the head, then push `amount` at the tail.
    ///
    /// Returns the released quantity. For a zero-length pipeline `amount` itself is
    /// released. This is the only way to change the contents.
    pub fn advance(&mut self, amount: u32) -> u32 {
        let Some(released) = self.buffer.pop_front() else {
            return amount;
        };
        self.buffer.push_back(amount);
        debug_assert_eq!(self.buffer.len(), self.delay_length);
        released
    }

    /// Quantity that will be released on the next shift.
    pub fn head(&self) -> Option<u32> {
        self.buffer.front().copied()
    }

    /// Contents in arrival order (head first).
    pub fn contents(&self) -> Vec<u32> {
        self.buffer.iter().copied().collect()
    }

    pub fn total(&self) -> u64 {
        self.buffer.iter().map(|&q| q as u64).sum()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
