use std::future::Future;

use anyhow::Result;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Running node tasks plus the shutdown signal they watch.
pub struct ServiceHandle {
    shutdown_tx: watch::Sender<bool>,
    join_handles: Vec<JoinHandle<Result<()>>>,
}

impl ServiceHandle {
    /// Create a handle and the receiver tasks clone to observe shutdown.
    pub fn new() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        (Self { shutdown_tx: tx, join_handles: vec![] }, rx)
    }

    /// Spawn a task and track it for shutdown.
    pub fn spawn<F>(&mut self, fut: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        self.join_handles.push(tokio::spawn(fut));
    }

    /// Signal shutdown and wait for every task in spawn order.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown_tx.send(true);
        for h in self.join_handles {
            match h.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::error!("service task returned error: {:?}", e),
                Err(e) => tracing::error!("task join error: {:?}", e),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn shutdown_waits_for_tasks() {
        let (mut svc, mut rx) = ServiceHandle::new();
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();
        svc.spawn(async move {
            while !*rx.borrow() {
                rx.changed().await?;
            }
            flag.store(true, Ordering::SeqCst);
            Ok::<(), anyhow::Error>(())
        });
        svc.shutdown().await.unwrap();
        assert!(finished.load(Ordering::SeqCst));
    }
}
