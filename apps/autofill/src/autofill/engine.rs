//! Autofill engine: deferred population pass plus one verify-and-retry pass.
//!
//! Host pages often re-render forms right after mount, wiping anything written
//! too early. The engine therefore waits `initial_delay` before the first
//! pass, waits `verify_delay` again, and re-applies the whole plan once if any
//! mapped text field came back empty. A page that clears fields a third time
//! is not detected.
//!
//! The document sits behind an async mutex so the host can keep mutating it
//! while the engine is waiting. The lock is never held across a delay.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::autofill::apply::{attach_resume, needs_refill, populate, PassSummary};
use crate::autofill::document::Document;
use crate::autofill::plan::build_plan;
use crate::models::{Profile, ResumeAttachment};

pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_VERIFY_DELAY: Duration = Duration::from_millis(1000);

/// Where the engine's waits come from. Swap it to run passes back to back or
/// under a virtual clock.
#[async_trait]
pub trait Scheduler: Send + Sync {
    async fn delay(&self, duration: Duration);
}

/// Waits on the tokio timer, so `tokio::time::pause` drives it in tests.
pub struct TokioScheduler;

#[async_trait]
impl Scheduler for TokioScheduler {
    async fn delay(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Skips every wait. Used when both delays are configured as zero.
pub struct ImmediateScheduler;

#[async_trait]
impl Scheduler for ImmediateScheduler {
    async fn delay(&self, _duration: Duration) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutofillTimings {
    pub initial_delay: Duration,
    pub verify_delay: Duration,
}

impl AutofillTimings {
    pub fn is_zero(&self) -> bool {
        self.initial_delay.is_zero() && self.verify_delay.is_zero()
    }
}

impl Default for AutofillTimings {
    fn default() -> Self {
        Self {
            initial_delay: DEFAULT_INITIAL_DELAY,
            verify_delay: DEFAULT_VERIFY_DELAY,
        }
    }
}

/// What the engine attempted. Not a success contract: the page may still
/// discard any of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AutofillReport {
    pub resume_inputs: usize,
    pub first_pass: PassSummary,
    /// Present only when the verify pass found an emptied field and re-applied.
    pub retry_pass: Option<PassSummary>,
}

impl AutofillReport {
    pub fn retried(&self) -> bool {
        self.retry_pass.is_some()
    }
}

#[derive(Clone)]
pub struct AutofillEngine {
    scheduler: Arc<dyn Scheduler>,
    timings: AutofillTimings,
}

impl AutofillEngine {
    pub fn new(scheduler: Arc<dyn Scheduler>, timings: AutofillTimings) -> Self {
        Self { scheduler, timings }
    }

    /// Fills `document` from `profile` (and `resume`, if given).
    ///
    /// Never fails: fields that are not on the page are skipped.
    pub async fn run<D>(
        &self,
        document: &Mutex<D>,
        profile: &Profile,
        resume: Option<&ResumeAttachment>,
    ) -> AutofillReport
    where
        D: Document + Send,
    {
        let plan = build_plan(profile);
        if plan.is_empty() {
            debug!("Profile has no fillable values");
        }
        let mut report = AutofillReport::default();

        self.scheduler.delay(self.timings.initial_delay).await;
        {
            let mut doc = document.lock().await;
            if let Some(resume) = resume {
                report.resume_inputs = attach_resume(&mut *doc, resume);
            }
            report.first_pass = populate(&mut *doc, &plan);
        }
        debug!(
            "First autofill pass: {} field(s), {} resume input(s)",
            report.first_pass.total(),
            report.resume_inputs
        );

        self.scheduler.delay(self.timings.verify_delay).await;
        {
            let mut doc = document.lock().await;
            if needs_refill(&*doc, &plan) {
                let summary = populate(&mut *doc, &plan);
                debug!(
                    "Mapped field emptied after first pass, re-applied {} field(s)",
                    summary.total()
                );
                report.retry_pass = Some(summary);
            }
        }

        info!(
            "Autofill attempted: {} field(s), resume inputs {}, retried {}",
            report.first_pass.total(),
            report.resume_inputs,
            report.retried()
        );
        report
    }
}

impl Default for AutofillEngine {
    fn default() -> Self {
        Self::new(Arc::new(TokioScheduler), AutofillTimings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autofill::document::DomEvent;
    use crate::autofill::memory::{MemoryDocument, Mutation};
    use tokio::time::Instant;

    const FORM: &str = r#"
        <form>
          <input name="firstName">
          <input name="lastName">
          <input id="email" type="email">
          <input type="file" name="resume">
        </form>
    "#;

    fn profile() -> Profile {
        Profile {
            full_name: Some("Ada Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            ..Profile::default()
        }
    }

    fn resume() -> ResumeAttachment {
        ResumeAttachment {
            content: bytes::Bytes::from_static(b"%PDF"),
            filename: "ada.pdf".to_string(),
            content_type: "application/pdf".to_string(),
        }
    }

    fn value_sets(journal: &[Mutation]) -> Vec<(usize, String)> {
        journal
            .iter()
            .filter_map(|m| match m {
                Mutation::ValueSet { control, value } => Some((control.0, value.clone())),
                _ => None,
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_pass_waits_for_initial_delay() {
        let doc = Arc::new(Mutex::new(MemoryDocument::parse(FORM)));
        let engine = AutofillEngine::default();

        let task = {
            let doc = Arc::clone(&doc);
            let engine = engine.clone();
            tokio::spawn(async move { engine.run(&doc, &profile(), None).await })
        };

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(doc.lock().await.journal().is_empty());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(doc.lock().await.value_of("firstName"), Some("Ada"));

        let report = task.await.unwrap();
        assert_eq!(report.first_pass.text_fields, 3);
        assert!(!report.retried());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_takes_both_delays() {
        let doc = Mutex::new(MemoryDocument::parse(FORM));
        let start = Instant::now();
        AutofillEngine::default().run(&doc, &profile(), None).await;
        assert_eq!(start.elapsed(), Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleared_field_triggers_full_reapply() {
        let doc = Arc::new(Mutex::new(MemoryDocument::parse(FORM)));
        let engine = AutofillEngine::default();

        let task = {
            let doc = Arc::clone(&doc);
            let resume = resume();
            tokio::spawn(async move { engine.run(&doc, &profile(), Some(&resume)).await })
        };

        // Host page re-renders between the two passes and wipes the email.
        tokio::time::sleep(Duration::from_millis(700)).await;
        let first_pass = {
            let mut guard = doc.lock().await;
            let email = guard.find("email").unwrap().id;
            guard.clear_value(email);
            guard.take_journal()
        };

        let report = task.await.unwrap();
        assert!(report.retried());
        assert_eq!(report.resume_inputs, 1);

        let guard = doc.lock().await;
        assert_eq!(guard.value_of("email"), Some("ada@example.com"));

        // Every mapped field is written again, not just the cleared one.
        assert_eq!(value_sets(guard.journal()), value_sets(&first_pass));

        // The resume is not re-uploaded on retry.
        assert!(!guard
            .journal()
            .iter()
            .any(|m| matches!(m, Mutation::FilesAttached { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_intact_fields_are_not_reapplied() {
        let doc = Mutex::new(MemoryDocument::parse(FORM));
        let report = AutofillEngine::default().run(&doc, &profile(), None).await;

        assert!(!report.retried());
        let guard = doc.lock().await;
        let email = guard.find("email").unwrap().id;
        let changes = guard
            .journal_for(email)
            .into_iter()
            .filter(|m| {
                matches!(
                    m,
                    Mutation::EventDispatched {
                        event: DomEvent::Change,
                        ..
                    }
                )
            })
            .count();
        assert_eq!(changes, 1);
    }

    #[tokio::test]
    async fn test_resume_is_attached_before_text_fields() {
        let engine = AutofillEngine::new(Arc::new(ImmediateScheduler), AutofillTimings::default());
        let doc = Mutex::new(MemoryDocument::parse(FORM));
        engine.run(&doc, &profile(), Some(&resume())).await;

        let guard = doc.lock().await;
        let journal = guard.journal();
        let attached = journal
            .iter()
            .position(|m| matches!(m, Mutation::FilesAttached { .. }))
            .unwrap();
        let first_value = journal
            .iter()
            .position(|m| matches!(m, Mutation::ValueSet { .. }))
            .unwrap();
        assert_eq!(attached, 0);
        assert!(attached < first_value);
    }

    #[tokio::test]
    async fn test_immediate_scheduler_runs_without_waiting() {
        let engine = AutofillEngine::new(Arc::new(ImmediateScheduler), AutofillTimings::default());
        let doc = Mutex::new(MemoryDocument::parse(FORM));
        let report = engine.run(&doc, &profile(), Some(&resume())).await;

        assert_eq!(report.resume_inputs, 1);
        let guard = doc.lock().await;
        assert_eq!(guard.value_of("lastName"), Some("Lovelace"));
        let file_input = guard.find("resume").unwrap().id;
        assert_eq!(guard.files(file_input)[0].filename, "ada.pdf");
    }

    #[tokio::test]
    async fn test_document_without_matches_is_silent() {
        let engine = AutofillEngine::new(Arc::new(ImmediateScheduler), AutofillTimings::default());
        let doc = Mutex::new(MemoryDocument::parse("<p>No form here</p>"));
        let report = engine.run(&doc, &profile(), Some(&resume())).await;

        assert_eq!(report, AutofillReport::default());
        assert!(doc.lock().await.journal().is_empty());
    }
}
