//! Message passing between the roles.

use crate::{Error, Result};
use std::sync::mpsc::{channel, Receiver, Sender};

/// The sending half of a channel to one role.
pub trait MessageSender {
    /// Deliver one serialized message.
    fn send(&self, message: Vec<u8>) -> Result<()>;
}

/// The receiving half of a channel to one role.
pub trait MessageReceiver {
    /// Wait for the next message.
    ///
    /// Returns `Ok(None)` once every sender has hung up and no message is
    /// left.
    fn recv(&mut self) -> Result<Option<Vec<u8>>>;
}

/// In-process sender backed by [`std::sync::mpsc`].
#[derive(Debug, Clone)]
pub struct LocalSender {
    inner: Sender<Vec<u8>>,
}

/// In-process receiver backed by [`std::sync::mpsc`].
#[derive(Debug)]
pub struct LocalReceiver {
    inner: Receiver<Vec<u8>>,
}

/// Create an in-process channel. The sender can be cloned to get several
/// producers.
pub fn local_channel() -> (LocalSender, LocalReceiver) {
    let (tx, rx) = channel();
    (LocalSender { inner: tx }, LocalReceiver { inner: rx })
}

impl MessageSender for LocalSender {
    fn send(&self, message: Vec<u8>) -> Result<()> {
        self.inner
            .send(message)
            .map_err(|_| Error::TransportError("receiver hung up".to_string()))
    }
}

impl MessageReceiver for LocalReceiver {
    fn recv(&mut self) -> Result<Option<Vec<u8>>> {
        Ok(self.inner.recv().ok())
    }
}
