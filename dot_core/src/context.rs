//! Cooperative cancellation for keyring calls.

use futures::{
    channel::oneshot,
    future::{self, Either, FutureExt, Shared},
};
use std::{
    future::Future,
    pin::pin,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

/// Something a long-running protocol call can watch for a stop request.
pub trait Cancellation {
    /// Resolves once cancellation is requested. May never resolve.
    fn cancelled(&self) -> impl Future<Output = ()>;

    /// Non-blocking check.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Never fires.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NeverCancel;

impl Cancellation for NeverCancel {
    fn cancelled(&self) -> impl Future<Output = ()> {
        future::pending()
    }
}

/// Cloneable watcher side of a cancellation pair.
#[derive(Clone)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    signal: Shared<oneshot::Receiver<()>>,
}

/// Trigger side of a cancellation pair. Dropping it without calling
/// [`cancel`][CancelHandle::cancel] leaves the token pending forever.
#[derive(Debug)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
    sender: Option<oneshot::Sender<()>>,
}

impl CancelToken {
    pub fn new() -> (CancelToken, CancelHandle) {
        let flag = Arc::new(AtomicBool::new(false));
        let (sender, receiver) = oneshot::channel();

        let token = CancelToken {
            flag: flag.clone(),
            signal: receiver.shared(),
        };
        let handle = CancelHandle {
            flag,
            sender: Some(sender),
        };

        (token, handle)
    }
}

impl std::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl Cancellation for CancelToken {
    fn cancelled(&self) -> impl Future<Output = ()> {
        let signal = self.signal.clone();
        async move {
            if signal.await.is_err() {
                future::pending::<()>().await
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

impl CancelHandle {
    pub fn cancel(mut self) {
        self.flag.store(true, Ordering::Release);
        if let Some(sender) = self.sender.take() {
            // The token side may already be gone
            let _ = sender.send(());
        }
    }
}

/// Run `fut` unless `cancel` fires first. `None` means cancelled.
pub(crate) async fn guarded<C: Cancellation, F: Future>(cancel: &C, fut: F) -> Option<F::Output> {
    if cancel.is_cancelled() {
        return None;
    }

    match future::select(pin!(fut), pin!(cancel.cancelled())).await {
        Either::Left((output, _)) => Some(output),
        Either::Right(_) => None,
    }
}
