//! Task data model for the board.
//!
//! Tasks are the cards on a board. Each task tracks its lane, priority,
//! completion progress, assignment, and an ordered checklist of subtasks
//! whose completion drives the derived progress.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::progress;

/// Unique identifier for a task within a board.
///
/// Uses UUID v4 for generation and provides a short form display
/// for human-readable output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub Uuid);

impl TaskId {
    /// Create a new unique task identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Return first 8 characters of the UUID for display.
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Unique identifier for a subtask within its parent task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubtaskId(pub Uuid);

impl SubtaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Return first 8 characters of the UUID for display.
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for SubtaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SubtaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SubtaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Task priority shown as a badge on the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "Low"),
            Priority::Medium => write!(f, "Medium"),
            Priority::High => write!(f, "High"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority: {}", other)),
        }
    }
}

/// The lane (column) a task occupies on the board.
///
/// Lanes double as the task's status: a task sits in exactly one lane,
/// and subtask completion can move it automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Lane {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl Lane {
    /// All lanes in board display order.
    pub const ALL: [Lane; 3] = [Lane::Todo, Lane::InProgress, Lane::Done];

    /// Column title as rendered on the board.
    pub fn title(&self) -> &'static str {
        match self {
            Lane::Todo => "To Do",
            Lane::InProgress => "In Progress",
            Lane::Done => "Done",
        }
    }
}

impl std::fmt::Display for Lane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lane::Todo => write!(f, "todo"),
            Lane::InProgress => write!(f, "in-progress"),
            Lane::Done => write!(f, "done"),
        }
    }
}

impl std::str::FromStr for Lane {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "todo" => Ok(Lane::Todo),
            "in-progress" => Ok(Lane::InProgress),
            "done" => Ok(Lane::Done),
            other => Err(format!("unknown lane: {}", other)),
        }
    }
}

/// A checklist item belonging to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    /// Unique identifier within the parent task.
    pub id: SubtaskId,
    /// Checklist item text.
    pub title: String,
    /// Whether the item has been checked off.
    pub done: bool,
}

impl Subtask {
    /// Create a new unchecked subtask.
    pub fn new(title: &str) -> Self {
        Self {
            id: SubtaskId::new(),
            title: title.to_string(),
            done: false,
        }
    }
}

/// A partial update to a task produced by the pure mutation rules.
///
/// Progress and lane are always present together; the subtask list is
/// carried only when the operation changed it. Handlers return this and
/// the store applies it, so the shape of "what gets written" is fixed by
/// the type instead of by convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    /// Replacement subtask list, when the operation touched it.
    pub subtasks: Option<Vec<Subtask>>,
    /// New completion percentage in [0,100].
    pub progress: u8,
    /// New lane for the task.
    pub lane: Lane,
}

impl TaskPatch {
    /// A patch that only moves progress/lane.
    pub fn new(progress: u8, lane: Lane) -> Self {
        Self {
            subtasks: None,
            progress,
            lane,
        }
    }

    /// A patch that also replaces the subtask list.
    pub fn with_subtasks(subtasks: Vec<Subtask>, progress: u8, lane: Lane) -> Self {
        Self {
            subtasks: Some(subtasks),
            progress,
            lane,
        }
    }
}

/// Input for creating a task: what the new-task form collects.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub lane: Lane,
    pub subtasks: Vec<Subtask>,
}

/// A card on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier for this task.
    pub id: TaskId,
    /// Card title.
    pub title: String,
    /// Longer description, may be empty.
    pub description: String,
    /// Priority badge.
    pub priority: Priority,
    /// Lane the task currently occupies.
    pub lane: Lane,
    /// Completion percentage in [0,100].
    pub progress: u8,
    /// Ordered checklist driving derived progress.
    pub subtasks: Vec<Subtask>,
    /// Identity of the assigned member, if any.
    pub assigned_to: Option<String>,
    /// Display name of the assigned member.
    pub assigned_to_name: Option<String>,
    /// Creation instant, used as the sort key within a lane.
    pub created_at: DateTime<Utc>,
    /// Identity of the user who created the task.
    pub created_by: String,
}

impl Task {
    /// Create a task from a draft with a lane-appropriate initial progress.
    ///
    /// A task created directly in the done lane starts at 100; otherwise
    /// the progress is derived from any initial subtasks, defaulting to 0.
    /// The chosen lane is kept as given.
    pub fn create(draft: TaskDraft, created_by: &str) -> Self {
        let progress = if draft.lane == Lane::Done {
            100
        } else {
            progress::percent_complete(&draft.subtasks).unwrap_or(0)
        };

        Self {
            id: TaskId::new(),
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            lane: draft.lane,
            progress,
            subtasks: draft.subtasks,
            assigned_to: None,
            assigned_to_name: None,
            created_at: Utc::now(),
            created_by: created_by.to_string(),
        }
    }

    pub fn has_subtasks(&self) -> bool {
        !self.subtasks.is_empty()
    }

    /// Number of checked-off subtasks.
    pub fn done_count(&self) -> usize {
        self.subtasks.iter().filter(|s| s.done).count()
    }

    pub fn is_done(&self) -> bool {
        self.lane == Lane::Done
    }

    /// Percentage shown on the card.
    ///
    /// Done tasks always render complete; tasks with subtasks render the
    /// derived ratio; otherwise the stored progress is shown as-is.
    pub fn display_progress(&self) -> u8 {
        if self.is_done() {
            100
        } else {
            progress::percent_complete(&self.subtasks).unwrap_or(self.progress)
        }
    }

    /// Apply a partial update to this task in place.
    pub fn apply_patch(&mut self, patch: &TaskPatch) {
        if let Some(subtasks) = &patch.subtasks {
            self.subtasks = subtasks.clone();
        }
        self.progress = patch.progress;
        self.lane = patch.lane;
    }

    /// Assign the task to a member, or clear the assignment.
    pub fn assign(&mut self, uid: Option<&str>, name: Option<&str>) {
        self.assigned_to = uid.map(|u| u.to_string());
        self.assigned_to_name = name.map(|n| n.to_string());
    }

    /// Look up a subtask by id.
    pub fn subtask(&self, id: SubtaskId) -> Option<&Subtask> {
        self.subtasks.iter().find(|s| s.id == id)
    }
}
