//! Task tracker tool: a persistent task list for multi-step work.
//!
//! The list lives in `.agent_tasks.json` inside the workspace, so progress
//! survives across turns of a conversation without any in-process state.
//!
//! Commands:
//! - `plan` - replace the task list with a new plan
//! - `view` - show the current list
//! - `update` - change one task's status

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::Tool;

const TASKS_FILE: &str = ".agent_tasks.json";

/// Status of a tracked task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Todo => write!(f, "todo"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// One tracked task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskEntry {
    pub id: usize,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

/// Track a task list in the workspace.
pub struct TaskTracker;

impl TaskTracker {
    async fn load(workspace: &Path) -> anyhow::Result<Vec<TaskEntry>> {
        let path = workspace.join(TASKS_FILE);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(workspace: &Path, tasks: &[TaskEntry]) -> anyhow::Result<()> {
        let path = workspace.join(TASKS_FILE);
        let content = serde_json::to_string_pretty(tasks)?;
        tokio::fs::write(&path, content).await?;
        Ok(())
    }

    fn render(tasks: &[TaskEntry]) -> String {
        if tasks.is_empty() {
            return "No tasks tracked yet. Use the 'plan' command to create a plan.".to_string();
        }

        tasks
            .iter()
            .map(|task| {
                let marker = match task.status {
                    TaskStatus::Todo => "[ ]",
                    TaskStatus::InProgress => "[~]",
                    TaskStatus::Done => "[x]",
                };
                match &task.notes {
                    Some(notes) => format!("{} #{} {} - {}", marker, task.id, task.title, notes),
                    None => format!("{} #{} {}", marker, task.id, task.title),
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    async fn plan(&self, args: &Value, workspace: &Path) -> anyhow::Result<String> {
        let items = args["tasks"]
            .as_array()
            .ok_or_else(|| anyhow::anyhow!("Missing 'tasks' argument"))?;

        let now = Utc::now();
        let tasks: Vec<TaskEntry> = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let title = item["title"]
                    .as_str()
                    .or_else(|| item.as_str())
                    .ok_or_else(|| anyhow::anyhow!("Task {} has no title", i + 1))?
                    .to_string();
                Ok(TaskEntry {
                    id: i + 1,
                    title,
                    notes: item["notes"].as_str().map(str::to_string),
                    status: TaskStatus::Todo,
                    created_at: now,
                })
            })
            .collect::<anyhow::Result<_>>()?;

        Self::store(workspace, &tasks).await?;
        Ok(format!(
            "Planned {} task(s):\n{}",
            tasks.len(),
            Self::render(&tasks)
        ))
    }

    async fn update(&self, args: &Value, workspace: &Path) -> anyhow::Result<String> {
        let id = args["id"]
            .as_u64()
            .ok_or_else(|| anyhow::anyhow!("Missing 'id' argument"))? as usize;
        let status = match args["status"].as_str() {
            Some("todo") => TaskStatus::Todo,
            Some("in_progress") => TaskStatus::InProgress,
            Some("done") => TaskStatus::Done,
            Some(other) => return Err(anyhow::anyhow!("Unknown status: {}", other)),
            None => return Err(anyhow::anyhow!("Missing 'status' argument")),
        };

        let mut tasks = Self::load(workspace).await?;
        let task = tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| anyhow::anyhow!("No task with id {}", id))?;
        task.status = status;

        Self::store(workspace, &tasks).await?;
        Ok(format!("Task #{} is now {}\n{}", id, status, Self::render(&tasks)))
    }
}

#[async_trait]
impl Tool for TaskTracker {
    fn name(&self) -> &str {
        "task_tracker"
    }

    fn description(&self) -> &str {
        "Track progress on multi-step work. Commands: 'plan' (set the task list), 'view' (show it), 'update' (set a task's status to todo/in_progress/done)."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "enum": ["plan", "view", "update"],
                    "description": "The tracker operation to perform"
                },
                "tasks": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "notes": { "type": "string" }
                        },
                        "required": ["title"]
                    },
                    "description": "For 'plan': the tasks, in order"
                },
                "id": {
                    "type": "integer",
                    "description": "For 'update': the task id"
                },
                "status": {
                    "type": "string",
                    "enum": ["todo", "in_progress", "done"],
                    "description": "For 'update': the new status"
                }
            },
            "required": ["command"]
        })
    }

    async fn execute(&self, args: Value, workspace: &Path) -> anyhow::Result<String> {
        let command = args["command"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'command' argument"))?;

        match command {
            "plan" => self.plan(&args, workspace).await,
            "view" => Ok(Self::render(&Self::load(workspace).await?)),
            "update" => self.update(&args, workspace).await,
            other => Err(anyhow::anyhow!("Unknown task_tracker command: {}", other)),
        }
    }
}
