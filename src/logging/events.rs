//! Run telemetry events
//!
//! Every run emits `run_started`, then at most one `failure`, then exactly one
//! `run_ended`. Events are logged on the `roster::events` tracing target and,
//! when `[logging] event_log_path` is set, appended to that file as JSON lines.
//! An event that cannot be written to the file is logged and dropped; it never
//! fails the run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;
use uuid::Uuid;

/// Tracing target for telemetry events
pub const EVENT_TARGET: &str = "roster::events";

/// Kind of telemetry event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    RunStarted,
    RunEnded,
    Failure,
}

/// Phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Setup,
    Run,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Setup => write!(f, "setup"),
            Phase::Run => write!(f, "run"),
        }
    }
}

/// One telemetry record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    pub run_id: Uuid,
    pub job: String,
    pub event: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

/// Telemetry sink for one run
#[derive(Debug)]
pub struct EventLog {
    run_id: Uuid,
    job: String,
    path: Option<PathBuf>,
    started: Instant,
    history: Mutex<Vec<Event>>,
}

impl EventLog {
    pub fn new(job: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            job: job.into(),
            path,
            started: Instant::now(),
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Events recorded so far, oldest first
    pub fn events(&self) -> Vec<Event> {
        self.history
            .lock()
            .map(|h| h.clone())
            .unwrap_or_default()
    }

    fn event(&self, kind: EventKind) -> Event {
        Event {
            timestamp: Utc::now(),
            run_id: self.run_id,
            job: self.job.clone(),
            event: kind,
            input: None,
            phase: None,
            error: None,
            users: None,
            exit_code: None,
            duration_ms: None,
        }
    }

    pub fn run_started(&self, input: &Path) {
        let mut event = self.event(EventKind::RunStarted);
        event.input = Some(input.display().to_string());
        tracing::info!(
            target: EVENT_TARGET,
            run_id = %self.run_id,
            job = %self.job,
            input = %input.display(),
            "run_started"
        );
        self.record(event);
    }

    pub fn failure(&self, phase: Phase, error: &str) {
        let mut event = self.event(EventKind::Failure);
        event.phase = Some(phase);
        event.error = Some(error.to_string());
        tracing::error!(
            target: EVENT_TARGET,
            run_id = %self.run_id,
            job = %self.job,
            phase = %phase,
            error,
            "failure"
        );
        self.record(event);
    }

    pub fn run_ended(&self, exit_code: i32, users: Option<usize>) {
        let duration_ms = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let mut event = self.event(EventKind::RunEnded);
        event.exit_code = Some(exit_code);
        event.users = users;
        event.duration_ms = Some(duration_ms);
        tracing::info!(
            target: EVENT_TARGET,
            run_id = %self.run_id,
            job = %self.job,
            exit_code,
            users,
            duration_ms,
            "run_ended"
        );
        self.record(event);
    }

    fn record(&self, event: Event) {
        if let Some(path) = &self.path {
            if let Err(e) = append_line(path, &event) {
                tracing::warn!(path = %path.display(), error = %e, "Failed to write event");
            }
        }
        if let Ok(mut history) = self.history.lock() {
            history.push(event);
        }
    }
}

fn append_line(path: &Path, event: &Event) -> std::io::Result<()> {
    let mut line = serde_json::to_string(event)?;
    line.push('\n');
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())
}

/// Emits `run_ended` when dropped
///
/// The exit code starts as the run-failure code and is overwritten once the
/// outcome is known, so an early return or panic still closes the run.
pub struct RunEndGuard<'a> {
    log: &'a EventLog,
    exit_code: i32,
    users: Option<usize>,
}

impl<'a> RunEndGuard<'a> {
    pub fn new(log: &'a EventLog, pending_exit_code: i32) -> Self {
        Self {
            log,
            exit_code: pending_exit_code,
            users: None,
        }
    }

    pub fn set_exit_code(&mut self, exit_code: i32) {
        self.exit_code = exit_code;
    }

    pub fn set_users(&mut self, users: usize) {
        self.users = Some(users);
    }
}

impl Drop for RunEndGuard<'_> {
    fn drop(&mut self) {
        self.log.run_ended(self.exit_code, self.users);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_events_are_recorded_in_order() {
        let log = EventLog::new("new-users", None);
        log.run_started(Path::new("input.json"));
        log.failure(Phase::Setup, "Property 'Days' not found");
        log.run_ended(2, None);

        let kinds: Vec<EventKind> = log.events().iter().map(|e| e.event).collect();
        assert_eq!(
            kinds,
            vec![EventKind::RunStarted, EventKind::Failure, EventKind::RunEnded]
        );
        assert!(log.events().iter().all(|e| e.run_id == log.run_id()));
    }

    #[test]
    fn test_events_are_appended_as_json_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.jsonl");
        let log = EventLog::new("new-users", Some(path.clone()));
        log.run_started(Path::new("input.json"));
        log.run_ended(0, Some(3));

        let contents = std::fs::read_to_string(&path).unwrap();
        let events: Vec<Event> = contents
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].event, EventKind::RunEnded);
        assert_eq!(events[1].users, Some(3));
        assert_eq!(events[1].exit_code, Some(0));
        assert!(!contents.contains("\"error\""));
    }

    #[test]
    fn test_unwritable_event_file_does_not_panic() {
        let log = EventLog::new("new-users", Some(PathBuf::from("/nonexistent/dir/events.jsonl")));
        log.run_started(Path::new("input.json"));
        assert_eq!(log.events().len(), 1);
    }

    #[test]
    fn test_run_end_guard_emits_on_drop() {
        let log = EventLog::new("new-users", None);
        {
            let mut guard = RunEndGuard::new(&log, 5);
            guard.set_users(0);
            guard.set_exit_code(0);
        }
        let events = log.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].exit_code, Some(0));
        assert_eq!(events[0].users, Some(0));
    }

    #[test]
    fn test_run_end_guard_keeps_pending_code_on_early_exit() {
        let log = EventLog::new("new-users", None);
        drop(RunEndGuard::new(&log, 5));
        assert_eq!(log.events()[0].exit_code, Some(5));
    }
}
