//! The runtime command interface (spec.md §6): `start` / `stop` /
//! `reset_circuit` / `drain`, arriving on the event bus's `scraping-tasks`
//! topic or an admin control channel. Acknowledgement is fire-and-forget
//! (spec.md §7): the orchestrator never raises errors back to a command's
//! caller — results and failures surface later as published events.

use crate::orchestrator::Orchestrator;
use scrape_core::{Filters, Task};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Wire shape for a `start` command's payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StartPayload {
    pub sources: Vec<String>,
    #[serde(default)]
    pub filters: Filters,
    /// Defaults to 5 (the middle of the 1-10 range) when the command
    /// doesn't name one explicitly.
    #[serde(default = "default_priority")]
    pub priority: u8,
    /// Only meaningful when `sources` names exactly one backend-native
    /// tag; spec.md §4.7's hybrid execution is opt-in per task.
    #[serde(default)]
    pub hybrid: bool,
    pub url: Option<String>,
}

fn default_priority() -> u8 {
    5
}

/// Recognized commands (spec.md §6's table), tagged on `command` so a
/// single JSON envelope on `scraping-tasks` dispatches unambiguously.
/// `deny_unknown_fields` throughout: an unrecognized payload shape is a
/// parse error, not a silently-ignored command (spec.md §9).
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", content = "payload", rename_all = "snake_case")]
pub enum Command {
    Start(StartPayload),
    Stop { task_id: String },
    ResetCircuit { domain: String },
    Drain,
}

impl Command {
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// One task is created per entry in `sources` (spec.md §2: "C7 creates N
/// tasks"), each carrying a copy of the command's filters and an id
/// derived from a fresh UUID so concurrent `start` commands never collide.
fn tasks_for_start(payload: &StartPayload) -> Vec<Task> {
    payload
        .sources
        .iter()
        .map(|source| {
            let id = Uuid::new_v4().to_string();
            let mut task = Task::new(id, source.clone(), payload.priority).with_filters(payload.filters.clone());
            if let Some(url) = &payload.url {
                task = task.with_url(url.clone());
            }
            if payload.hybrid {
                task = task.hybrid();
            }
            task
        })
        .collect()
}

/// Applies one command to `orchestrator`. Fire-and-forget per spec.md §7:
/// the only observable effect of a bad or unreachable command target is
/// that nothing happens (`stop` on an unknown id, `reset_circuit` on a
/// domain with no breaker yet) — never a propagated error.
pub async fn dispatch(orchestrator: &Arc<Orchestrator>, command: Command) {
    match command {
        Command::Start(payload) => {
            for task in tasks_for_start(&payload) {
                orchestrator.submit(task).await;
            }
        }
        Command::Stop { task_id } => {
            orchestrator.cancel(&task_id).await;
        }
        Command::ResetCircuit { domain } => {
            orchestrator.reset_circuit(&domain).await;
        }
        Command::Drain => {
            orchestrator.drain().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_command_parses_from_the_documented_shape() {
        let json = r#"{"command": "start", "payload": {"sources": ["rss", "government"], "filters": {"keywords": ["rust"]}}}"#;
        let command = Command::from_json(json.as_bytes()).unwrap();
        match command {
            Command::Start(payload) => {
                assert_eq!(payload.sources, vec!["rss".to_string(), "government".to_string()]);
                assert_eq!(payload.priority, 5);
                assert_eq!(payload.filters.keywords, vec!["rust".to_string()]);
            }
            _ => panic!("expected Start"),
        }
    }

    #[test]
    fn stop_command_parses_task_id() {
        let json = r#"{"command": "stop", "payload": {"task_id": "abc"}}"#;
        let command = Command::from_json(json.as_bytes()).unwrap();
        assert!(matches!(command, Command::Stop { task_id } if task_id == "abc"));
    }

    #[test]
    fn drain_command_has_no_payload() {
        let json = r#"{"command": "drain"}"#;
        let command = Command::from_json(json.as_bytes()).unwrap();
        assert!(matches!(command, Command::Drain));
    }

    #[test]
    fn unknown_command_tag_is_rejected() {
        let json = r#"{"command": "bogus"}"#;
        assert!(Command::from_json(json.as_bytes()).is_err());
    }

    #[test]
    fn tasks_for_start_creates_one_task_per_source() {
        let payload = StartPayload {
            sources: vec!["rss".to_string(), "company_page".to_string()],
            filters: Filters::default(),
            priority: 3,
            hybrid: false,
            url: None,
        };
        let tasks = tasks_for_start(&payload);
        assert_eq!(tasks.len(), 2);
        assert_ne!(tasks[0].id, tasks[1].id);
        assert!(tasks.iter().all(|t| t.priority == 3));
    }
}
