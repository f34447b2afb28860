//! Scan coordination engine.
//!
//! Spawns one tokio task per probe module. A semaphore caps how many modules
//! run their `check` at once; every task hands its outcome to a single
//! aggregator over a channel, so the session is only ever written from one
//! place. The aggregator stops at the deadline and returns what it has.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;

use handlewatch_core::events::{EventPayload, ScanEvent};
use handlewatch_core::{Finding, ModuleFailure, ScanSession, SessionId};
use handlewatch_probe::{deadline_after, ProbeContext, ProbeError, ProbeModule};

use crate::error::{Result, ScanError};

/// What one module task reports back to the aggregator.
struct ProbeOutcome {
    module: String,
    kind: OutcomeKind,
}

enum OutcomeKind {
    Findings(Vec<Finding>),
    Failed(ProbeError),
    Panicked(String),
}

/// Runs every registered probe module against a target.
pub struct ScanCoordinator {
    modules: Vec<Arc<dyn ProbeModule>>,
    events: Option<mpsc::UnboundedSender<ScanEvent>>,
}

impl ScanCoordinator {
    pub fn new(modules: Vec<Arc<dyn ProbeModule>>) -> Self {
        Self {
            modules,
            events: None,
        }
    }

    /// Publish lifecycle events to `sender`. A dropped receiver is ignored.
    pub fn with_events(mut self, sender: mpsc::UnboundedSender<ScanEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    pub fn modules(&self) -> &[Arc<dyn ProbeModule>] {
        &self.modules
    }

    /// Scan `target` with every module, at most `max_concurrency` at a time.
    ///
    /// Module errors are recorded on the session and never abort the scan.
    /// If `deadline` elapses first, the modules still running are cancelled
    /// and abandoned, and the findings merged so far come back inside
    /// [`ScanError::DeadlineExceeded`]. A scan with no findings and at least
    /// one failed module returns [`ScanError::NoFindings`].
    pub async fn run(
        &self,
        target: &str,
        deadline: Duration,
        max_concurrency: usize,
    ) -> Result<ScanSession> {
        if max_concurrency == 0 {
            return Err(ScanError::InvalidConcurrency);
        }
        let target = target.trim();
        if target.is_empty() {
            return Err(ScanError::EmptyTarget);
        }

        let mut session = ScanSession::start(target);
        let expires_at = deadline_after(deadline);

        // Cancels the modules on every exit path, including the caller
        // dropping this future.
        let cancel = CancellationToken::new();
        let _cancel_on_exit = cancel.clone().drop_guard();

        let ctx = ProbeContext::new(cancel.clone(), expires_at);
        let gate = Arc::new(Semaphore::new(max_concurrency));
        let (tx, mut rx) = mpsc::channel::<ProbeOutcome>(self.modules.len().max(1));

        tracing::info!(
            session_id = %session.id,
            target = %target,
            modules = self.modules.len(),
            max_concurrency,
            deadline_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
            "Starting scan"
        );
        self.emit(
            session.id,
            EventPayload::ScanStarted {
                target: target.to_string(),
                module_count: self.modules.len() as u32,
            },
        );

        for module in &self.modules {
            tokio::spawn(probe_task(
                module.clone(),
                target.to_string(),
                ctx.clone(),
                gate.clone(),
                tx.clone(),
            ));
        }
        drop(tx);

        let mut pending = self.modules.len();
        let mut deadline_exceeded = false;
        let timer = tokio::time::sleep_until(expires_at);
        tokio::pin!(timer);

        while pending > 0 {
            tokio::select! {
                // Drain outcomes that are already queued before honouring the timer.
                biased;
                outcome = rx.recv() => match outcome {
                    Some(outcome) => {
                        pending -= 1;
                        self.absorb(&mut session, outcome);
                    }
                    None => break,
                },
                _ = &mut timer => {
                    deadline_exceeded = true;
                    break;
                }
            }
        }

        // Late senders now fail and drop their results.
        cancel.cancel();
        drop(rx);
        session.finish();

        let failed = session.module_failures.len();
        let duration_ms = u64::try_from(session.duration().num_milliseconds()).unwrap_or(0);
        self.emit(
            session.id,
            EventPayload::ScanCompleted {
                findings: session.findings.len() as u32,
                failures: failed as u32,
                duration_ms,
                deadline_exceeded,
            },
        );

        if deadline_exceeded {
            tracing::warn!(
                session_id = %session.id,
                target = %target,
                pending,
                findings = session.findings.len(),
                "Scan deadline exceeded, abandoning outstanding modules"
            );
            return Err(ScanError::DeadlineExceeded {
                target: target.to_string(),
                deadline,
                pending,
                session: Box::new(session),
            });
        }

        tracing::info!(
            session_id = %session.id,
            target = %target,
            findings = session.findings.len(),
            failed,
            duration_ms,
            "Scan complete"
        );

        if session.findings.is_empty() && failed > 0 {
            return Err(ScanError::NoFindings {
                target: target.to_string(),
                failed,
                session: Box::new(session),
            });
        }

        Ok(session)
    }

    /// Merge one module's outcome into the session.
    fn absorb(&self, session: &mut ScanSession, outcome: ProbeOutcome) {
        let ProbeOutcome { module, kind } = outcome;
        match kind {
            OutcomeKind::Findings(findings) => {
                tracing::debug!(
                    session_id = %session.id,
                    module = %module,
                    findings = findings.len(),
                    "Probe module reported"
                );
                self.emit(
                    session.id,
                    EventPayload::ModuleCompleted {
                        module,
                        findings: findings.len() as u32,
                    },
                );
                session.record_findings(findings);
            }
            OutcomeKind::Failed(err) => {
                tracing::warn!(
                    session_id = %session.id,
                    module = %module,
                    error = %err,
                    "Probe module failed"
                );
                self.record_failure(session, ModuleFailure::new(&module, &err));
            }
            OutcomeKind::Panicked(message) => {
                tracing::error!(
                    session_id = %session.id,
                    module = %module,
                    panic = %message,
                    "Probe module panicked"
                );
                self.record_failure(
                    session,
                    ModuleFailure::new(&module, format!("module panicked: {message}")),
                );
            }
        }
    }

    fn record_failure(&self, session: &mut ScanSession, failure: ModuleFailure) {
        self.emit(
            session.id,
            EventPayload::ModuleFailed {
                module: failure.module_name.clone(),
                error: failure.error.clone(),
            },
        );
        session.record_failure(failure);
    }

    fn emit(&self, session_id: SessionId, payload: EventPayload) {
        if let Some(events) = &self.events {
            let _ = events.send(ScanEvent::new(session_id, payload));
        }
    }
}

/// One module's unit of work: wait for a slot, probe, hand off the outcome.
async fn probe_task(
    module: Arc<dyn ProbeModule>,
    target: String,
    ctx: ProbeContext,
    gate: Arc<Semaphore>,
    results: mpsc::Sender<ProbeOutcome>,
) {
    let name = module.name().to_string();

    let permit = tokio::select! {
        biased;
        _ = ctx.cancellation().cancelled() => {
            tracing::debug!(module = %name, "Cancelled while waiting for a slot");
            return;
        }
        permit = gate.acquire_owned() => match permit {
            Ok(permit) => permit,
            Err(_) => return,
        },
    };

    // The permit is owned by this task, so it is released even if the
    // module panics and the panic escapes.
    let result = AssertUnwindSafe(module.check(&target, &ctx))
        .catch_unwind()
        .await;
    drop(permit);

    let kind = match result {
        Ok(Ok(findings)) => OutcomeKind::Findings(findings),
        Ok(Err(err)) => OutcomeKind::Failed(err),
        Err(panic) => OutcomeKind::Panicked(panic_message(panic.as_ref())),
    };

    if results
        .send(ProbeOutcome {
            module: name.clone(),
            kind,
        })
        .await
        .is_err()
    {
        tracing::debug!(module = %name, "Scan already returned, discarding late result");
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
