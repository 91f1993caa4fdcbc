//! Multi-way readiness choice over channels

use std::sync::Arc;

use super::{Channel, ChannelError};
use crate::{EvalError, Value};

/// One case of a select, with its channel and payload already evaluated.
#[derive(Debug, Clone)]
pub enum SelectCase {
    /// Ready if the value can be enqueued without waiting
    Send {
        /// Target channel
        channel: Arc<Channel>,
        /// Value to enqueue
        value: Value,
    },
    /// Ready if a value can be dequeued without waiting
    Receive {
        /// Source channel
        channel: Arc<Channel>,
    },
    /// Chosen when nothing else is ready
    Default,
}

/// The case a select settled on.
#[derive(Debug, Clone, PartialEq)]
pub struct Selected {
    /// Position of the chosen case
    pub index: usize,
    /// Received value for a receive case, `Nil` otherwise
    pub value: Value,
}

/// Poll every send/receive case once, in order, without blocking.
///
/// The first ready case wins. If none is ready the default case is chosen
/// wherever it was declared; without one the select fails.
pub fn select(cases: &[SelectCase]) -> Result<Selected, EvalError> {
    for (index, case) in cases.iter().enumerate() {
        let outcome = match case {
            SelectCase::Send { channel, value } => channel.try_send(value.clone()).map(|_| Value::Nil),
            SelectCase::Receive { channel } => channel.try_recv(),
            SelectCase::Default => continue,
        };
        match outcome {
            Ok(value) => return Ok(Selected { index, value }),
            Err(ChannelError::Closed | ChannelError::Full | ChannelError::Empty) => {}
            Err(other) => return Err(other.into()),
        }
    }

    cases
        .iter()
        .position(|case| matches!(case, SelectCase::Default))
        .map(|index| Selected {
            index,
            value: Value::Nil,
        })
        .ok_or(EvalError::SelectBlocked)
}
