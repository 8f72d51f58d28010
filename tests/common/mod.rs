//! Instrumented hash providers shared by the integration tests.

#![allow(dead_code)]

use sigchain::PipelineError;
use sigchain::engine::HashProvider;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Identity hash: `hash(s) == s`. Records peak concurrent calls.
pub struct Counting {
    name: &'static str,
    delay: Option<Duration>,
    current: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
    fail_on: Option<&'static str>,
    panic_on: Option<&'static str>,
    delay_on: Vec<(&'static str, Duration)>,
}

impl Counting {
    pub fn identity(name: &'static str) -> Self {
        Self {
            name,
            delay: None,
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
            fail_on: None,
            panic_on: None,
            delay_on: Vec::new(),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Sleep `delay` only when hashing exactly `input`.
    pub fn delayed_on(mut self, input: &'static str, delay: Duration) -> Self {
        self.delay_on.push((input, delay));
        self
    }

    pub fn failing_on(mut self, input: &'static str) -> Self {
        self.fail_on = Some(input);
        self
    }

    pub fn panicking_on(mut self, input: &'static str) -> Self {
        self.panic_on = Some(input);
        self
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Calls currently inside `hash`.
    pub fn in_flight(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HashProvider for Counting {
    fn name(&self) -> &str {
        self.name
    }

    fn hash(&self, data: &str) -> Result<String, PipelineError> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(d) = self.delay {
            std::thread::sleep(d);
        }
        if let Some((_, d)) = self.delay_on.iter().find(|(on, _)| *on == data) {
            std::thread::sleep(*d);
        }
        self.current.fetch_sub(1, Ordering::SeqCst);
        if self.panic_on == Some(data) {
            panic!("{} exploded on {data}", self.name);
        }
        if self.fail_on == Some(data) {
            return Err(PipelineError::provider(self.name, format!("refused {data}")));
        }
        Ok(data.to_string())
    }
}

/// Expected multi-fingerprint for identity providers: `"0"+s + "1"+s + ... + "5"+s`.
pub fn identity_multi(s: &str) -> String {
    (0..6).map(|i| format!("{i}{s}")).collect()
}
