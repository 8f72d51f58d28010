//! Serialized slow-hash gate: at most one slow-hash call in flight across every holder of a clone.

use crossbeam_channel::{Receiver, Sender, after, bounded, never, select};
use log::trace;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::cancel::CancelToken;
use super::hashing::HashProvider;
use crate::error::PipelineError;

/// Single-permit gate around a slow [`HashProvider`].
///
/// The permit is a token in a one-slot channel; acquiring it is a receive, so waiting can be
/// raced against cancellation and a deadline in one `select!`. Clones share the permit.
#[derive(Clone)]
pub struct SlowHashGate {
    provider: Arc<dyn HashProvider>,
    permit_tx: Sender<()>,
    permit_rx: Receiver<()>,
    timeout: Option<Duration>,
}

/// Held for the duration of one slow call; returns the permit on drop (including unwind).
struct Permit<'a> {
    permit_tx: &'a Sender<()>,
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        let _ = self.permit_tx.send(());
    }
}

impl SlowHashGate {
    pub fn new(provider: Arc<dyn HashProvider>) -> Self {
        let (permit_tx, permit_rx) = bounded::<()>(1);
        let _ = permit_tx.send(());
        Self {
            provider,
            permit_tx,
            permit_rx,
            timeout: None,
        }
    }

    /// Fail acquisition with a provider failure after waiting `timeout`. Shares the permit with `self`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// True while some caller holds the permit.
    pub fn in_flight(&self) -> bool {
        self.permit_rx.is_empty()
    }

    fn acquire(&self, cancel: &CancelToken) -> Result<Permit<'_>, PipelineError> {
        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }
        let deadline = self.timeout.map(after).unwrap_or_else(never);
        select! {
            recv(self.permit_rx) -> permit => match permit {
                Ok(()) => Ok(Permit { permit_tx: &self.permit_tx }),
                Err(_) => Err(PipelineError::provider(self.provider.name(), "gate closed")),
            },
            recv(cancel.signal()) -> _ => Err(PipelineError::Cancelled),
            recv(deadline) -> _ => Err(PipelineError::provider(self.provider.name(), "gate timeout")),
        }
    }

    /// Run the slow hash on `data` while holding the permit. The permit covers this call only.
    pub fn sign(&self, data: &str, cancel: &CancelToken) -> Result<String, PipelineError> {
        let waited = Instant::now();
        let permit = self.acquire(cancel)?;
        trace!("gate acquired after {:?}", waited.elapsed());
        let result = self.provider.hash(data);
        drop(permit);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::hashing::Blake3Hasher;
    use std::thread;

    struct Stuck;

    impl HashProvider for Stuck {
        fn name(&self) -> &str {
            "stuck"
        }
        fn hash(&self, data: &str) -> Result<String, PipelineError> {
            thread::sleep(Duration::from_millis(300));
            Ok(data.to_string())
        }
    }

    #[test]
    fn test_permit_released_after_sign() {
        let gate = SlowHashGate::new(Arc::new(Blake3Hasher::new()));
        let cancel = CancelToken::new();
        assert!(!gate.in_flight());
        gate.sign("a", &cancel).unwrap();
        gate.sign("b", &cancel).unwrap();
        assert!(!gate.in_flight());
    }

    #[test]
    fn test_timeout_while_permit_held() {
        let gate = SlowHashGate::new(Arc::new(Stuck)).with_timeout(Some(Duration::from_millis(20)));
        let holder = gate.clone();
        let cancel = CancelToken::new();
        let c = cancel.clone();
        let h = thread::spawn(move || holder.sign("slow", &c));
        while !gate.in_flight() {
            thread::yield_now();
        }
        assert_eq!(
            gate.sign("x", &cancel),
            Err(PipelineError::provider("stuck", "gate timeout"))
        );
        assert_eq!(h.join().unwrap(), Ok("slow".to_string()));
    }

    #[test]
    fn test_cancel_aborts_waiter() {
        let gate = SlowHashGate::new(Arc::new(Stuck));
        let holder = gate.clone();
        let cancel = CancelToken::new();
        let c = cancel.clone();
        let h = thread::spawn(move || holder.sign("slow", &c));
        while !gate.in_flight() {
            thread::yield_now();
        }
        let waiter_gate = gate.clone();
        let waiter_cancel = cancel.clone();
        let waiter = thread::spawn(move || waiter_gate.sign("x", &waiter_cancel));
        thread::sleep(Duration::from_millis(20));
        cancel.cancel();
        assert_eq!(waiter.join().unwrap(), Err(PipelineError::Cancelled));
        let _ = h.join();
    }
}
