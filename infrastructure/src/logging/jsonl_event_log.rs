//! JSONL file writer for protocol events.
//!
//! Each notifier callback becomes a single JSON line with a `type` field and
//! `timestamp`, appended to the file via a buffered writer.

use deliberation_application::DeliberationNotifier;
use deliberation_domain::{AgentIdentity, ArtifactId, Deliberation, DeliberationId};
use serde_json::{Value, json};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL event log that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`, so every agent task can share
/// one log. Flushes on `Drop`.
pub struct JsonlEventLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlEventLog {
    /// Create a new log writing to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create event log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not create event log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(&self, event_type: &str, payload: Value) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let mut record = match payload {
            Value::Object(map) => map,
            other => {
                let mut map = serde_json::Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        record.insert("type".to_string(), Value::String(event_type.to_string()));
        record.insert("timestamp".to_string(), Value::String(timestamp));

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        // A poisoned lock or a failed write only loses this line
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

fn agent(agent: &AgentIdentity) -> Value {
    json!({ "id": agent.id, "name": agent.name })
}

impl DeliberationNotifier for JsonlEventLog {
    fn on_deliberation_found(&self, who: &AgentIdentity, deliberation: &Deliberation) {
        self.record(
            "deliberation_found",
            json!({ "agent": agent(who), "deliberation_id": deliberation.id, "title": deliberation.title }),
        );
    }

    fn on_deliberation_created(&self, who: &AgentIdentity, deliberation: &Deliberation) {
        self.record(
            "deliberation_created",
            json!({
                "agent": agent(who),
                "deliberation_id": deliberation.id,
                "title": deliberation.title,
                "topology": deliberation.topology,
            }),
        );
    }

    fn on_joined_after_recheck(&self, who: &AgentIdentity, deliberation: &Deliberation) {
        self.record(
            "joined_after_recheck",
            json!({ "agent": agent(who), "deliberation_id": deliberation.id }),
        );
    }

    fn on_proposal(&self, who: &AgentIdentity, deliberation_id: &DeliberationId, body: &str) {
        self.record(
            "proposal",
            json!({ "agent": agent(who), "deliberation_id": deliberation_id, "body": body }),
        );
    }

    fn on_vote(&self, who: &AgentIdentity, deliberation_id: &DeliberationId, body: &str) {
        self.record(
            "vote",
            json!({ "agent": agent(who), "deliberation_id": deliberation_id, "body": body }),
        );
    }

    fn on_contribution_skipped(
        &self,
        who: &AgentIdentity,
        deliberation_id: &DeliberationId,
        reason: &str,
    ) {
        self.record(
            "contribution_skipped",
            json!({ "agent": agent(who), "deliberation_id": deliberation_id, "reason": reason }),
        );
    }

    fn on_participation(&self, deliberation_id: &DeliberationId, participants: usize, expected: usize) {
        self.record(
            "participation",
            json!({
                "deliberation_id": deliberation_id,
                "participants": participants,
                "expected": expected,
            }),
        );
    }

    fn on_converged(&self, deliberation_id: &DeliberationId, selected: &[String]) {
        self.record(
            "converged",
            json!({ "deliberation_id": deliberation_id, "selected": selected }),
        );
    }

    fn on_artifacts_created(&self, deliberation_id: &DeliberationId, created: &[ArtifactId]) {
        self.record(
            "artifacts_created",
            json!({ "deliberation_id": deliberation_id, "created": created }),
        );
    }

    fn on_completed(&self, deliberation_id: &DeliberationId) {
        self.record("completed", json!({ "deliberation_id": deliberation_id }));
    }

    fn on_oracle_retry(&self, who: &AgentIdentity, attempt: u32, max_attempts: u32, error: &str) {
        self.record(
            "oracle_retry",
            json!({
                "agent": agent(who),
                "attempt": attempt,
                "max_attempts": max_attempts,
                "error": error,
            }),
        );
    }

    fn on_placement(&self, who: &AgentIdentity, action: &str, detail: &str) {
        self.record(
            "placement",
            json!({ "agent": agent(who), "action": action, "detail": detail }),
        );
    }

    fn on_stalled(&self, who: &AgentIdentity, reason: &str) {
        self.record("stalled", json!({ "agent": agent(who), "reason": reason }));
    }
}

impl Drop for JsonlEventLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deliberation_domain::TeamId;
    use std::io::Read;

    fn read_lines(path: &Path) -> Vec<Value> {
        let mut content = String::new();
        File::open(path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        content
            .trim()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_event_log_writes_valid_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.events.jsonl");
        let log = JsonlEventLog::new(&path).unwrap();
        let d1 = DeliberationId::new("d-1");

        log.on_proposal(&AgentIdentity::new("a", "Ada"), &d1, "Backend");
        log.on_participation(&d1, 2, 3);
        log.on_artifacts_created(&d1, &[ArtifactId::Team(TeamId::new("team-1"))]);

        // Flush
        drop(log);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 3);
        for line in &lines {
            assert!(line.get("type").is_some());
            assert!(line.get("timestamp").is_some());
        }

        assert_eq!(lines[0]["type"], "proposal");
        assert_eq!(lines[0]["agent"]["name"], "Ada");
        assert_eq!(lines[0]["body"], "Backend");
        assert_eq!(lines[1]["participants"], 2);
        assert_eq!(lines[2]["created"][0]["kind"], "team");
        assert_eq!(lines[2]["created"][0]["id"], "team-1");
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("events.jsonl");
        let log = JsonlEventLog::new(&path).unwrap();
        log.on_completed(&DeliberationId::new("d-1"));
        assert_eq!(log.path(), path.as_path());
        drop(log);

        assert_eq!(read_lines(&path)[0]["type"], "completed");
    }

    #[test]
    fn test_unwritable_path_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a file
        assert!(JsonlEventLog::new(dir.path()).is_none());
    }
}
