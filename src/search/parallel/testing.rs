//! Scripted verifiers for exercising workers and the coordinator without a
//! real archive.

use crate::archive::{ArchiveError, Outcome, Verifier, VerifierFactory};
use crate::search::parallel::channel::CancellationToken;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct ScriptedVerifier {
    password: Option<String>,
    corrupt_on: Option<String>,
    panic_on: Option<String>,
    stall_on: Option<(String, Duration)>,
    delay: Duration,
    record: bool,
    tried: Vec<String>,
    stop_on_match: Option<CancellationToken>,
    materialized: Arc<AtomicUsize>,
}

impl ScriptedVerifier {
    pub fn with_password(password: &str) -> Self {
        Self {
            password: Some(password.to_string()),
            ..Self::default()
        }
    }

    /// Never matches; remembers every candidate it was shown.
    pub fn recording() -> Self {
        Self {
            record: true,
            ..Self::default()
        }
    }

    pub fn corrupt_on(mut self, candidate: &str) -> Self {
        self.corrupt_on = Some(candidate.to_string());
        self
    }

    /// Raise `cancel` from inside `verify` just before reporting the match,
    /// as if an interrupt landed while the password was being checked.
    pub fn stop_on_match(mut self, cancel: &CancellationToken) -> Self {
        self.stop_on_match = Some(cancel.clone());
        self
    }

    pub fn tried(&self) -> &[String] {
        &self.tried
    }

    /// How many times the plaintext was written out.
    pub fn materialized(&self) -> usize {
        self.materialized.load(Ordering::SeqCst)
    }
}

impl Verifier for ScriptedVerifier {
    fn verify(&mut self, candidate: &str) -> Outcome {
        if self.record {
            self.tried.push(candidate.to_string());
        }
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        if let Some((stall, duration)) = &self.stall_on {
            if stall == candidate {
                thread::sleep(*duration);
            }
        }
        if self.panic_on.as_deref() == Some(candidate) {
            panic!("verifier blew up on {}", candidate);
        }
        if self.corrupt_on.as_deref() == Some(candidate) {
            return Outcome::Corrupt(ArchiveError::EntryCorrupt {
                entry: "password.txt".to_string(),
                reason: "bad local header".to_string(),
            });
        }
        if self.password.as_deref() == Some(candidate) {
            if let Some(cancel) = &self.stop_on_match {
                cancel.cancel();
            }
            return Outcome::Match;
        }
        Outcome::Mismatch
    }

    fn materialize(&self) -> Option<PathBuf> {
        self.materialized.fetch_add(1, Ordering::SeqCst);
        Some(PathBuf::from("scripted.out"))
    }
}

/// Hands every worker a clone of the same script.
#[derive(Debug, Clone, Default)]
pub struct ScriptedFactory {
    script: ScriptedVerifier,
    fail_open: bool,
}

impl ScriptedFactory {
    pub fn with_password(password: &str) -> Self {
        Self {
            script: ScriptedVerifier::with_password(password),
            fail_open: false,
        }
    }

    pub fn corrupt_on(mut self, candidate: &str) -> Self {
        self.script.corrupt_on = Some(candidate.to_string());
        self
    }

    pub fn panic_on(mut self, candidate: &str) -> Self {
        self.script.panic_on = Some(candidate.to_string());
        self
    }

    /// Block inside `verify` for `duration` when shown `candidate`,
    /// ignoring cancellation.
    pub fn stall_on(mut self, candidate: &str, duration: Duration) -> Self {
        self.script.stall_on = Some((candidate.to_string(), duration));
        self
    }

    /// Sleep before every verification.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.script.delay = delay;
        self
    }

    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }
}

impl VerifierFactory for ScriptedFactory {
    type Verifier = ScriptedVerifier;

    fn open(&self) -> Result<ScriptedVerifier, ArchiveError> {
        if self.fail_open {
            return Err(ArchiveError::Unreadable {
                path: "target.zip".into(),
                reason: "permission denied".to_string(),
            });
        }
        Ok(self.script.clone())
    }
}
