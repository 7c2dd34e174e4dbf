//! Two-lane work queue for breadth-first search with delayed edges.
//!
//! The immediate lane is a bounded FIFO holding one-step neighbors. The
//! delayed lane is a min-heap of values that become available only after the
//! queue has been dequeued a number of times, keyed by
//! `release = expansions + delay` with insertion order breaking ties.
//!
//! Every `dequeue` first moves ready delayed values to the back of the
//! immediate lane. If the immediate lane is still empty, the earliest delayed
//! value is released early so that the search never stalls while delayed work
//! remains.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, VecDeque};

use crate::error::{PathError, PathResult};

const INITIAL_LANE: usize = 4096;
const MAX_LANE: usize = 1 << (usize::BITS - 1);

#[derive(Debug)]
struct Delayed<T> {
    value: T,
    release: u64,
    seq: u64,
}

impl<T> PartialEq for Delayed<T> {
    fn eq(&self, other: &Self) -> bool {
        self.release == other.release && self.seq == other.seq
    }
}

impl<T> Eq for Delayed<T> {}

impl<T> PartialOrd for Delayed<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Delayed<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Wrapped in Reverse inside the heap: earliest release, then
        // earliest insertion, pops first.
        self.release
            .cmp(&other.release)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// A bounded FIFO lane plus an unbounded delayed lane. See the module docs.
#[derive(Debug)]
pub struct DelayedReleaseQueue<T> {
    lane: VecDeque<T>,
    capacity: usize,
    delayed: BinaryHeap<Reverse<Delayed<T>>>,
    expansions: u64,
    seq: u64,
}

impl<T> DelayedReleaseQueue<T> {
    /// Create a queue whose immediate lane holds `capacity` values, rounded
    /// up to a power of two and capped at the largest one `usize` can hold.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity
            .max(1)
            .checked_next_power_of_two()
            .unwrap_or(MAX_LANE);
        Self {
            lane: VecDeque::with_capacity(capacity.min(INITIAL_LANE)),
            capacity,
            delayed: BinaryHeap::new(),
            expansions: 0,
            seq: 0,
        }
    }

    /// Append to the immediate lane.
    pub fn enqueue(&mut self, value: T) -> PathResult<()> {
        if self.lane.len() == self.capacity {
            return Err(PathError::QueueFull {
                capacity: self.capacity,
            });
        }
        self.lane.push_back(value);
        Ok(())
    }

    /// Schedule `value` to join the immediate lane once `delay` more
    /// dequeues have happened.
    pub fn enqueue_delayed(&mut self, value: T, delay: u32) {
        let seq = self.seq;
        self.seq += 1;
        self.delayed.push(Reverse(Delayed {
            value,
            release: self.expansions + u64::from(delay),
            seq,
        }));
    }

    /// Pop the next value, or `None` if both lanes are empty.
    ///
    /// Fails only if releasing delayed values overflows the immediate lane.
    pub fn dequeue(&mut self) -> PathResult<Option<T>> {
        self.release_ready()?;

        if self.lane.is_empty() {
            if let Some(Reverse(first)) = self.delayed.pop() {
                self.enqueue(first.value)?;
            }
        }

        let Some(value) = self.lane.pop_front() else {
            return Ok(None);
        };
        self.expansions += 1;

        self.release_ready()?;
        Ok(Some(value))
    }

    fn release_ready(&mut self) -> PathResult<()> {
        while self
            .delayed
            .peek()
            .is_some_and(|Reverse(d)| d.release <= self.expansions)
        {
            if let Some(Reverse(d)) = self.delayed.pop() {
                self.enqueue(d.value)?;
            }
        }
        Ok(())
    }

    /// Number of successful dequeues so far.
    #[inline]
    pub fn expansions(&self) -> u64 {
        self.expansions
    }

    /// Values waiting in the immediate lane.
    #[inline]
    pub fn len(&self) -> usize {
        self.lane.len()
    }

    /// Values waiting in the delayed lane.
    #[inline]
    pub fn delayed_len(&self) -> usize {
        self.delayed.len()
    }

    /// Whether both lanes are empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lane.is_empty() && self.delayed.is_empty()
    }

    /// Maximum size of the immediate lane.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
