//! Setup and run phases of one invocation
//!
//! [`ReportJob::execute`] never returns an error: every failure is turned into
//! an admin notification, a `failure` event and a non-zero exit code. The
//! `run_ended` event is emitted by a drop guard on every path.

use super::naming::LogLocation;
use crate::adapters::directory::DirectoryQuery;
use crate::adapters::mail::{Notification, NotificationDispatcher, Priority};
use crate::adapters::spreadsheet::SpreadsheetExporter;
use crate::config::{load_input, ReportConfig, RosterConfig};
use crate::core::report::{build_report_with, render_failure_html, render_html};
use crate::domain::{Result, RosterError, TEXT_FIELDS};
use crate::log_error_with_context;
use crate::logging::{EventLog, Phase, RunEndGuard};
use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_SETUP_FAILURE: i32 = 2;
pub const EXIT_RUN_FAILURE: i32 = 5;

/// Result of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub exit_code: i32,
    pub users: Option<usize>,
    pub subject: Option<String>,
    pub attachment: Option<PathBuf>,
}

impl RunOutcome {
    fn failed(phase: Phase) -> Self {
        let exit_code = match phase {
            Phase::Setup => EXIT_SETUP_FAILURE,
            Phase::Run => EXIT_RUN_FAILURE,
        };
        Self {
            exit_code,
            users: None,
            subject: None,
            attachment: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == EXIT_SUCCESS
    }
}

/// The new-accounts report job
pub struct ReportJob {
    config: RosterConfig,
    directory: Arc<dyn DirectoryQuery>,
    exporter: Arc<dyn SpreadsheetExporter>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    events: EventLog,
    clock: fn() -> NaiveDateTime,
}

impl ReportJob {
    pub fn new(
        config: RosterConfig,
        directory: Arc<dyn DirectoryQuery>,
        exporter: Arc<dyn SpreadsheetExporter>,
        dispatcher: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        let events = EventLog::new(
            config.application.name.clone(),
            config.logging.event_log_path.as_ref().map(PathBuf::from),
        );
        Self {
            config,
            directory,
            exporter,
            dispatcher,
            events,
            clock: local_now,
        }
    }

    /// Replaces the clock used for file names
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Runs both phases for the job input at `input`
    pub async fn execute(&self, input: &Path) -> RunOutcome {
        self.events.run_started(input);
        let mut guard = RunEndGuard::new(&self.events, EXIT_RUN_FAILURE);

        let outcome = self.execute_phases(input).await;

        guard.set_exit_code(outcome.exit_code);
        if let Some(users) = outcome.users {
            guard.set_users(users);
        }
        outcome
    }

    async fn execute_phases(&self, input: &Path) -> RunOutcome {
        let location = match LogLocation::prepare(
            &self.config.output.log_folder,
            &self.config.application.name,
            (self.clock)(),
        ) {
            Ok(location) => location,
            Err(e) => return self.abort(Phase::Setup, None, e).await,
        };

        let job = match load_input(input, &self.config.mail.admins) {
            Ok(job) => job,
            Err(e) => return self.abort(Phase::Setup, Some(&location), e.into()).await,
        };
        tracing::info!(
            recipients = job.mail_to.len(),
            scopes = job.scopes.len(),
            days = job.days,
            "Job input loaded"
        );

        match self.run(&location, &job).await {
            Ok(outcome) => outcome,
            Err(e) => self.abort(Phase::Run, Some(&location), e).await,
        }
    }

    async fn run(&self, location: &LogLocation, job: &ReportConfig) -> Result<RunOutcome> {
        tracing::info!(directory = %self.directory.describe(), "Querying directory");
        let records = self.directory.query(&job.scopes, job.days).await?;

        let report = build_report_with(&records, job.days, self.config.report.tie_break);
        tracing::info!(
            users = report.count,
            countries = report.countries.len(),
            subject = %report.subject,
            "Report built"
        );

        let mut notification = Notification::new(report.subject.clone())
            .with_to(&job.mail_to)
            .with_bcc(&job.admins)
            .with_body_part(render_html(&report))
            .with_save_path(location.mail_copy());

        let attachment = if report.is_empty() {
            None
        } else {
            let path = self
                .exporter
                .export(&records, &location.spreadsheet(), &TEXT_FIELDS)?;
            notification = notification.with_attachment(path.clone());
            Some(path)
        };

        self.dispatcher.send(&notification).await?;

        Ok(RunOutcome {
            exit_code: EXIT_SUCCESS,
            users: Some(report.count),
            subject: Some(report.subject),
            attachment,
        })
    }

    /// Notifies admins of `error`; a failure to notify is only logged
    async fn abort(
        &self,
        phase: Phase,
        location: Option<&LogLocation>,
        error: RosterError,
    ) -> RunOutcome {
        let message = error.to_string();
        log_error_with_context!(&error, phase.to_string());
        self.events.failure(phase, &message);

        let job_name = &self.config.application.name;
        let mut notification = Notification::new(format!("FAILURE - {job_name}"))
            .with_to(&self.config.mail.admins)
            .with_priority(Priority::High)
            .with_body_part(render_failure_html(job_name, &message));
        if let Some(location) = location {
            notification = notification.with_save_path(location.error_copy());
        }

        if let Err(e) = self.dispatcher.send(&notification).await {
            tracing::error!(error = %e, "Failed to send failure notification");
        }

        RunOutcome::failed(phase)
    }
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountRecord, DirectoryError, Field, Scope};
    use crate::logging::EventKind;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct FakeDirectory {
        records: Vec<AccountRecord>,
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DirectoryQuery for FakeDirectory {
        async fn query(&self, _: &[Scope], _: u32) -> Result<Vec<AccountRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(DirectoryError::ConnectionFailed("dc01 unreachable".into()).into());
            }
            Ok(self.records.clone())
        }

        fn describe(&self) -> String {
            "fake".to_string()
        }
    }

    struct TouchExporter;

    impl SpreadsheetExporter for TouchExporter {
        fn export(&self, _: &[AccountRecord], path: &Path, _: &[Field]) -> Result<PathBuf> {
            std::fs::write(path, b"PK")?;
            Ok(path.to_path_buf())
        }
    }

    #[derive(Default)]
    struct RecordingDispatcher {
        sent: Mutex<Vec<Notification>>,
    }

    #[async_trait]
    impl NotificationDispatcher for RecordingDispatcher {
        async fn send(&self, notification: &Notification) -> Result<()> {
            self.sent.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    fn config(log_folder: &Path) -> RosterConfig {
        let toml = format!(
            r#"
[application]
name = "new-users"

[directory]
kind = "json"
snapshot_path = "unused.json"

[mail]
transport = "pickup"
pickup_path = "unused"
from = "roster@contoso.net"
admins = ["admin@contoso.net"]

[output]
log_folder = "{}"
"#,
            log_folder.display()
        );
        toml::from_str(&toml).unwrap()
    }

    fn write_input(dir: &Path, json: &str) -> PathBuf {
        let path = dir.join("input.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    fn job(
        dir: &TempDir,
        directory: Arc<FakeDirectory>,
        dispatcher: Arc<RecordingDispatcher>,
    ) -> ReportJob {
        ReportJob::new(
            config(&dir.path().join("logs")),
            directory,
            Arc::new(TouchExporter),
            dispatcher,
        )
    }

    fn directory(records: Vec<AccountRecord>, fail: bool) -> Arc<FakeDirectory> {
        Arc::new(FakeDirectory {
            records,
            fail,
            calls: AtomicUsize::new(0),
        })
    }

    const INPUT: &str = r#"{"MailTo": ["hr@contoso.net"], "OU": ["OU=BEL,DC=contoso,DC=net"], "Days": 7}"#;

    #[tokio::test]
    async fn test_success_sends_report_to_recipients() {
        let dir = TempDir::new().unwrap();
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let records = vec![AccountRecord::new("Jane", Utc::now()).with_country("Belgium")];
        let job = job(&dir, directory(records, false), dispatcher.clone());

        let outcome = job.execute(&write_input(dir.path(), INPUT)).await;

        assert_eq!(outcome.exit_code, EXIT_SUCCESS);
        assert_eq!(outcome.users, Some(1));
        let sent = dispatcher.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["hr@contoso.net".to_string()]);
        assert_eq!(sent[0].bcc, vec!["admin@contoso.net".to_string()]);
        assert_eq!(sent[0].priority, Priority::Normal);
        assert_eq!(sent[0].attachments.len(), 1);
        assert!(sent[0].attachments[0].exists());
    }

    #[tokio::test]
    async fn test_invalid_input_notifies_admins_without_query() {
        let dir = TempDir::new().unwrap();
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let directory = directory(Vec::new(), false);
        let job = job(&dir, directory.clone(), dispatcher.clone());

        let outcome = job
            .execute(&write_input(dir.path(), r#"{"MailTo": "hr@contoso.net", "OU": "OU=BEL"}"#))
            .await;

        assert_eq!(outcome.exit_code, EXIT_SETUP_FAILURE);
        assert_eq!(directory.calls.load(Ordering::SeqCst), 0);
        let sent = dispatcher.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["admin@contoso.net".to_string()]);
        assert_eq!(sent[0].priority, Priority::High);
        assert!(sent[0].html().contains("Days"));
    }

    #[tokio::test]
    async fn test_directory_failure_is_run_failure() {
        let dir = TempDir::new().unwrap();
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let job = job(&dir, directory(Vec::new(), true), dispatcher.clone());

        let outcome = job.execute(&write_input(dir.path(), INPUT)).await;

        assert_eq!(outcome.exit_code, EXIT_RUN_FAILURE);
        let sent = dispatcher.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].html().contains("dc01 unreachable"));
        assert!(sent[0]
            .save_path
            .as_ref()
            .is_some_and(|p| p.to_string_lossy().ends_with("Error.html")));
    }

    #[tokio::test]
    async fn test_events_bracket_every_run() {
        let dir = TempDir::new().unwrap();
        let job = job(
            &dir,
            directory(Vec::new(), true),
            Arc::new(RecordingDispatcher::default()),
        );

        job.execute(&write_input(dir.path(), INPUT)).await;

        let events = job.events().events();
        let kinds: Vec<EventKind> = events.iter().map(|e| e.event).collect();
        assert_eq!(
            kinds,
            vec![EventKind::RunStarted, EventKind::Failure, EventKind::RunEnded]
        );
        assert_eq!(events[2].exit_code, Some(EXIT_RUN_FAILURE));
    }
}
