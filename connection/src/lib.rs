use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    /// Bounded queue; `send` fails with `QueueFull` instead of blocking.
    Bounded,
    /// Bounded queue; `send` blocks the producer until the consumer drains.
    Blocking,
}

#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub kind: ConnectionKind,
    pub queue_capacity: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            kind: ConnectionKind::Bounded,
            queue_capacity: 256,
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("send failed: receiver dropped")]
    SendFailed,
    #[error("queue full")]
    QueueFull,
    #[error("receive failed: all senders dropped")]
    RecvFailed,
}

/// Consumer side of a producer hand-off.
pub trait Connection<T> {
    fn try_recv(&self) -> Result<Option<T>, ConnectionError>;
}

/// Producer side; cloneable so several threads can feed one consumer.
pub trait Producer<T>: Send {
    fn send(&self, value: T) -> Result<(), ConnectionError>;
}

#[derive(Debug)]
pub struct QueueReceiver<T> {
    receiver: Receiver<T>,
}

#[derive(Debug)]
pub struct QueueSender<T> {
    sender: SyncSender<T>,
    blocking: bool,
}

impl<T> Clone for QueueSender<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            blocking: self.blocking,
        }
    }
}

impl<T: Send> Producer<T> for QueueSender<T> {
    fn send(&self, value: T) -> Result<(), ConnectionError> {
        if self.blocking {
            return self
                .sender
                .send(value)
                .map_err(|_| ConnectionError::SendFailed);
        }
        match self.sender.try_send(value) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                log::warn!("hand-off queue full, dropping value");
                Err(ConnectionError::QueueFull)
            }
            Err(TrySendError::Disconnected(_)) => Err(ConnectionError::SendFailed),
        }
    }
}

impl<T> Connection<T> for QueueReceiver<T> {
    fn try_recv(&self) -> Result<Option<T>, ConnectionError> {
        match self.receiver.try_recv() {
            Ok(value) => Ok(Some(value)),
            Err(mpsc::TryRecvError::Empty) => Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => Err(ConnectionError::RecvFailed),
        }
    }
}

pub struct ConnectionFactory;

impl ConnectionFactory {
    pub fn create<T: Send + 'static>(config: &ConnectionConfig) -> (QueueSender<T>, QueueReceiver<T>) {
        let capacity = config.queue_capacity.max(1);
        let (sender, receiver) = mpsc::sync_channel(capacity);
        let blocking = matches!(config.kind, ConnectionKind::Blocking);
        (QueueSender { sender, blocking }, QueueReceiver { receiver })
    }
}
