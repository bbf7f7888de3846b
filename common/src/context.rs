use std::fmt::{Display, Formatter};
use std::sync::Arc;

use tokio::sync::{broadcast, oneshot};
use tokio::time::Instant;

struct RawContext {
    _sender: oneshot::Sender<()>,
    deadline: Option<Instant>,
    cancel_receiver: broadcast::Receiver<()>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CancelReason {
    Deadline,
    Cancel,
}

impl Display for CancelReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deadline => write!(f, "Deadline"),
            Self::Cancel => write!(f, "Cancel"),
        }
    }
}

impl RawContext {
    #[must_use]
    fn new() -> (Self, Handler) {
        let (sender, recv) = oneshot::channel();
        let (cancel_sender, cancel_receiver) = broadcast::channel(1);

        (
            Self {
                _sender: sender,
                deadline: None,
                cancel_receiver,
            },
            Handler {
                recv,
                cancel_sender,
            },
        )
    }

    async fn done(&self) -> CancelReason {
        let mut recv = self.cancel_receiver.resubscribe();

        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = tokio::time::sleep_until(deadline) => CancelReason::Deadline,
                    _ = recv.recv() => CancelReason::Cancel,
                }
            }
            None => {
                let _ = recv.recv().await;
                CancelReason::Cancel
            }
        }
    }
}

/// The other half of a [`Context`]. Dropping or cancelling the handler
/// resolves every `done()` future; `cancel()` additionally waits for all
/// context clones to be dropped.
pub struct Handler {
    recv: oneshot::Receiver<()>,
    cancel_sender: broadcast::Sender<()>,
}

impl Handler {
    pub async fn done(&mut self) {
        let _ = (&mut self.recv).await;
    }

    pub async fn cancel(self) {
        drop(self.cancel_sender);

        let _ = self.recv.await;
    }
}

#[derive(Clone)]
pub struct Context(Arc<RawContext>);

impl From<RawContext> for Context {
    fn from(ctx: RawContext) -> Self {
        Self(Arc::new(ctx))
    }
}

impl Context {
    pub fn new() -> (Self, Handler) {
        let (ctx, handler) = RawContext::new();
        (ctx.into(), handler)
    }

    pub fn with_deadline(deadline: Instant) -> (Self, Handler) {
        let (mut ctx, handler) = RawContext::new();
        ctx.deadline = Some(deadline);
        (ctx.into(), handler)
    }

    pub fn with_timeout(timeout: std::time::Duration) -> (Self, Handler) {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub async fn done(&self) -> CancelReason {
        self.0.done().await
    }
}
