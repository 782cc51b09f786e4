//! Rendezvous hand-off of dispatch tokens from the metronome to workers.
//!
//! The channel holds at most one token. [`TokenSender::emit`] returns only
//! after some worker has taken the token it sent, so a saturated pool stalls
//! the metronome instead of queueing work.

use crate::domain::DispatchToken;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, mpsc};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("dispatch channel closed")]
pub struct DispatchClosed;

/// Creates the single-slot dispatch channel.
pub fn dispatch_channel() -> (TokenSender, TokenReceiver) {
    let (tx, rx) = mpsc::channel(1);
    (
        TokenSender { tx },
        TokenReceiver {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

/// Producer side, owned by the metronome.
pub struct TokenSender {
    tx: mpsc::Sender<DispatchToken>,
}

impl TokenSender {
    /// Hands `token` to exactly one worker, waiting until it has been taken.
    pub async fn emit(&self, token: DispatchToken) -> Result<(), DispatchClosed> {
        self.tx.send(token).await.map_err(|_| DispatchClosed)?;
        // With a single slot, a permit is only available again once the
        // token above has been received.
        let permit = self.tx.reserve().await.map_err(|_| DispatchClosed)?;
        drop(permit);
        Ok(())
    }
}

/// Consumer side, shared by every worker. Only one worker waits on the
/// channel at a time; the rest queue on the lock.
#[derive(Clone)]
pub struct TokenReceiver {
    rx: Arc<Mutex<mpsc::Receiver<DispatchToken>>>,
}

impl TokenReceiver {
    /// Waits for the next token. Cancel safe: dropping the future never loses a token.
    pub async fn recv(&self) -> Option<DispatchToken> {
        self.rx.lock().await.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio_test::{assert_pending, assert_ready_eq, task};

    #[tokio::test]
    async fn test_emit_waits_for_a_receiver() {
        let (tx, rx) = dispatch_channel();

        let mut emit = task::spawn(tx.emit(DispatchToken::new(0)));
        assert_pending!(emit.poll());

        assert_eq!(rx.recv().await, Some(DispatchToken::new(0)));
        assert!(emit.is_woken());
        assert_ready_eq!(emit.poll(), Ok(()));
    }

    #[tokio::test]
    async fn test_each_token_goes_to_one_receiver() {
        let (tx, rx) = dispatch_channel();
        let other = rx.clone();

        let producer = tokio::spawn(async move {
            for seq in 0..10 {
                tx.emit(DispatchToken::new(seq)).await.unwrap();
            }
        });

        let mut seen = Vec::new();
        for i in 0..10 {
            let receiver = if i % 2 == 0 { &rx } else { &other };
            seen.push(receiver.recv().await.unwrap().seq);
        }
        producer.await.unwrap();

        assert_eq!(seen, (0..10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_emit_fails_once_receivers_are_gone() {
        let (tx, rx) = dispatch_channel();
        drop(rx);
        assert_eq!(tx.emit(DispatchToken::new(1)).await, Err(DispatchClosed));
    }

    #[tokio::test]
    async fn test_cancelled_recv_does_not_lose_tokens() {
        let (tx, rx) = dispatch_channel();

        // A receiver that gives up before anything is sent
        let _ = tokio::time::timeout(Duration::from_millis(10), rx.recv()).await;

        let producer = tokio::spawn(async move { tx.emit(DispatchToken::new(7)).await });
        assert_eq!(rx.recv().await, Some(DispatchToken::new(7)));
        producer.await.unwrap().unwrap();
    }
}
