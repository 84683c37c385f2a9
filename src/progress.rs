//! Human-readable progress messages from a running job
//!
//! The processing code only ever sees `&dyn ProgressReporter`; whoever
//! displays the messages decides which thread they end up on.

use std::sync::Mutex;
use std::sync::mpsc::{Receiver, SyncSender, sync_channel};

/// Append-only sink for status lines
pub trait ProgressReporter: Send + Sync {
    fn report(&self, message: &str);
}

/// Hands each message to a consumer on another thread
///
/// Built on a zero-capacity channel: `report` blocks until the consumer has
/// received the message, so delivery is synchronous and in emission order.
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    tx: SyncSender<String>,
}

impl ChannelReporter {
    /// Create a reporter and the receiving end for the presentation layer
    pub fn channel() -> (Self, Receiver<String>) {
        let (tx, rx) = sync_channel(0);
        (ChannelReporter { tx }, rx)
    }
}

impl ProgressReporter for ChannelReporter {
    fn report(&self, message: &str) {
        if self.tx.send(message.to_string()).is_err() {
            tracing::debug!(dropped = message, "progress consumer gone");
        }
    }
}

/// Keeps every message in memory
#[derive(Debug, Default)]
pub struct CollectingReporter {
    messages: Mutex<Vec<String>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl ProgressReporter for CollectingReporter {
    fn report(&self, message: &str) {
        let mut messages = self
            .messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        messages.push(message.to_string());
    }
}
