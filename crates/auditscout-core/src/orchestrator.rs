//! Scan Orchestrator: drives the report generator across every timeframe, strictly one
//! at a time with a fixed pause, and publishes each state change to observers.
//!
//! The session is created once and held by the presentation layer. Each scan resets it;
//! observers read [`ScanSession::snapshot`] or follow [`ScanSession::subscribe`].

use crate::error::{ScoutError, ScoutResult};
use crate::generator::{GenerationService, ReportGenerator};
use crate::publisher::PublishResult;
use crate::report::{BoardAction, ReportBoard, ScanStatus};
use crate::timeframe::Timeframe;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSnapshot {
    pub status: ScanStatus,
    pub reports: ReportBoard,
    pub publish: PublishResult,
}

impl Default for ScanSnapshot {
    fn default() -> Self {
        Self {
            status: ScanStatus::idle(),
            reports: ReportBoard::new(),
            publish: PublishResult::default(),
        }
    }
}

pub struct ScanSession {
    state: watch::Sender<ScanSnapshot>,
    running: AtomicBool,
}

impl ScanSession {
    pub fn new() -> Arc<Self> {
        let (state, _) = watch::channel(ScanSnapshot::default());
        Arc::new(Self {
            state,
            running: AtomicBool::new(false),
        })
    }

    pub fn snapshot(&self) -> ScanSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ScanSnapshot> {
        self.state.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Record the outcome of a publish attempt for observers.
    pub fn record_publish(&self, result: PublishResult) {
        self.state.send_modify(|s| s.publish = result);
    }

    /// Claim the session and reset it for a new scan. Fails while another scan runs.
    ///
    /// The credential check happens earlier: a [`ReportGenerator`] cannot be built
    /// without a service, and the service refuses an absent key.
    pub fn try_start(self: &Arc<Self>) -> ScoutResult<ScanRun> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(ScoutError::ScanInProgress);
        }
        self.state.send_modify(|s| {
            s.status = ScanStatus::initializing();
            s.publish = PublishResult::default();
            let _ = s.reports.apply(BoardAction::BeginScan);
        });
        tracing::info!("scan started");
        Ok(ScanRun {
            session: Arc::clone(self),
        })
    }

    /// Start and run a full scan to completion.
    pub async fn run<S: GenerationService>(
        self: &Arc<Self>,
        generator: &ReportGenerator<S>,
        today: NaiveDate,
    ) -> ScoutResult<ScanSnapshot> {
        let run = self.try_start()?;
        Ok(run.execute(generator, today).await)
    }

    fn apply(&self, action: BoardAction) {
        self.state.send_modify(|s| {
            if let Err(e) = s.reports.apply(action) {
                tracing::warn!(error = %e, "report board rejected transition");
            }
        });
    }
}

/// Exclusive claim on a session for one scan. Releasing it (drop) makes the session
/// available for the next scan.
pub struct ScanRun {
    session: Arc<ScanSession>,
}

impl ScanRun {
    /// Generate every timeframe in declaration order. A failed timeframe is recorded as
    /// an `error` item and the loop moves on; there is no cancellation.
    pub async fn execute<S: GenerationService>(
        self,
        generator: &ReportGenerator<S>,
        today: NaiveDate,
    ) -> ScanSnapshot {
        let session = &self.session;
        let pause = generator.profile().pause;
        let total = Timeframe::ALL.len();

        for (i, timeframe) in Timeframe::ALL.into_iter().enumerate() {
            let status = ScanStatus::scanning(i, total, timeframe);
            tracing::info!(timeframe = %timeframe, progress = status.progress, "scanning timeframe");
            session.state.send_modify(|s| s.status = status);
            session.apply(BoardAction::MarkLoading(timeframe));

            tokio::time::sleep(pause).await;

            let item = generator.generate(timeframe, today).await;
            if let Some(err) = &item.error {
                tracing::warn!(timeframe = %timeframe, error = %err, "timeframe recorded as error");
            }
            session.apply(BoardAction::Resolve(item));
        }

        session.state.send_modify(|s| s.status = ScanStatus::complete());
        let snapshot = session.snapshot();
        tracing::info!(
            completed = snapshot.reports.completed_count(),
            total,
            settled = snapshot.reports.is_settled(),
            "scan complete"
        );
        snapshot
    }
}

impl Drop for ScanRun {
    fn drop(&mut self) {
        self.session.running.store(false, Ordering::SeqCst);
    }
}
