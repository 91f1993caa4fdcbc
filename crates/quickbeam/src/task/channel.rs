//! Bounded FIFO channels shared between tasks
//!
//! Blocking operations wait until they can make progress, the channel
//! closes, or the channel's fixed timeout elapses. Senders and receivers
//! park on separate condition variables; each side only ever wakes the
//! other. Capacity 0 is a rendezvous channel: a value is only accepted
//! while a receiver is waiting for it.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use super::ChannelError;
use crate::Value;

#[derive(Debug)]
struct State {
    buffer: VecDeque<Value>,
    closed: bool,
    waiting_receivers: usize,
}

/// A bounded, closable FIFO of values.
#[derive(Debug)]
pub struct Channel {
    state: Mutex<State>,
    /// Receivers park here until a value arrives or the channel closes.
    not_empty: Condvar,
    /// Senders park here until there is room or the channel closes.
    not_full: Condvar,
    capacity: usize,
    timeout: Duration,
}

impl Channel {
    /// Create a channel holding up to `capacity` values whose blocking
    /// operations give up after `timeout`.
    pub fn new(capacity: usize, timeout: Duration) -> Self {
        Self {
            state: Mutex::new(State {
                buffer: VecDeque::with_capacity(capacity),
                closed: false,
                waiting_receivers: 0,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
            timeout,
        }
    }

    fn has_room(&self, state: &State) -> bool {
        let limit = if self.capacity == 0 {
            state.waiting_receivers
        } else {
            self.capacity
        };
        state.buffer.len() < limit
    }

    // ═══════════════════════════════════════════════════════════════════
    // Blocking Operations
    // ═══════════════════════════════════════════════════════════════════

    /// Enqueue `value`, waiting for room up to the channel timeout.
    pub fn send(&self, value: Value) -> Result<(), ChannelError> {
        let deadline = Instant::now() + self.timeout;
        let mut state = self.state.lock();
        let mut expired = false;
        loop {
            if state.closed {
                return Err(ChannelError::Closed);
            }
            if self.has_room(&state) {
                state.buffer.push_back(value);
                drop(state);
                self.not_empty.notify_one();
                return Ok(());
            }
            if expired {
                return Err(ChannelError::Timeout);
            }
            expired = self.not_full.wait_until(&mut state, deadline).timed_out();
        }
    }

    /// Dequeue the oldest value, waiting up to the channel timeout.
    ///
    /// Buffered values stay receivable after `close`; only a closed and
    /// drained channel reports `Closed`.
    pub fn recv(&self) -> Result<Value, ChannelError> {
        let deadline = Instant::now() + self.timeout;
        let mut state = self.state.lock();
        let mut expired = false;
        loop {
            if let Some(value) = state.buffer.pop_front() {
                drop(state);
                self.not_full.notify_one();
                return Ok(value);
            }
            if state.closed {
                return Err(ChannelError::Closed);
            }
            if expired {
                return Err(ChannelError::Timeout);
            }
            state.waiting_receivers += 1;
            if self.capacity == 0 {
                // A rendezvous sender may be waiting for exactly this.
                self.not_full.notify_one();
            }
            expired = self.not_empty.wait_until(&mut state, deadline).timed_out();
            state.waiting_receivers -= 1;
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Non-Blocking Operations
    // ═══════════════════════════════════════════════════════════════════

    /// Enqueue without waiting.
    pub fn try_send(&self, value: Value) -> Result<(), ChannelError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(ChannelError::Closed);
        }
        if !self.has_room(&state) {
            return Err(ChannelError::Full);
        }
        state.buffer.push_back(value);
        drop(state);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Dequeue without waiting.
    pub fn try_recv(&self) -> Result<Value, ChannelError> {
        let mut state = self.state.lock();
        match state.buffer.pop_front() {
            Some(value) => {
                drop(state);
                self.not_full.notify_one();
                Ok(value)
            }
            None if state.closed => Err(ChannelError::Closed),
            None => Err(ChannelError::Empty),
        }
    }

    /// Close the channel. Returns `false` if it was already closed.
    pub fn close(&self) -> bool {
        let mut state = self.state.lock();
        if state.closed {
            return false;
        }
        state.closed = true;
        drop(state);
        self.not_empty.notify_all();
        self.not_full.notify_all();
        true
    }

    // ═══════════════════════════════════════════════════════════════════
    // Inspection
    // ═══════════════════════════════════════════════════════════════════

    /// Number of buffered values.
    pub fn len(&self) -> usize {
        self.state.lock().buffer.len()
    }

    /// Whether nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Declared capacity (0 for rendezvous).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// The blocking timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
