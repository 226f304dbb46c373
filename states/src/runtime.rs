use flume::{Receiver, Sender};

/// Event channel between updaters and the owning [`crate::StateCtx`].
///
/// The channel is unbounded and FIFO: events sent from one task arrive in the
/// order they were sent, and interleavings between tasks follow send order.
#[derive(Debug)]
pub struct StateRuntime<E> {
    send: Sender<E>,
    recv: Receiver<E>,
}

impl<E> Default for StateRuntime<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> StateRuntime<E> {
    pub fn new() -> Self {
        let (send, recv) = flume::unbounded();
        Self { send, recv }
    }

    pub fn sender(&self) -> Sender<E> {
        self.send.clone()
    }

    /// Drain every event currently queued, without blocking.
    pub fn drain(&self) -> impl Iterator<Item = E> + '_ {
        self.recv.try_iter()
    }

    pub fn pending(&self) -> usize {
        self.recv.len()
    }
}
