//! Domain types for the task list.
//!
//! A task list is an ordered collection of tasks. Tasks are appended at the
//! end, removed from anywhere, and toggled in place. Order is insertion order
//! and nothing ever re-sorts it.
//!
//! Every task carries a [`TaskId`] handed out from a counter owned by the
//! list. Positions shift when a task is deleted; ids never do, so every
//! mutation is resolved to an id before it is applied.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskflow_macros::Action;

/// Stable identifier of a task within its list
///
/// Ids increase monotonically and are never reused, even after the task
/// holding one is deleted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Creates a `TaskId` from its raw value
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id after this one, `None` once the id space is used up
    #[must_use]
    pub const fn checked_next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single to-do entry
///
/// The title is fixed at creation: trimmed and never empty. Only the
/// completion flag changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Task {
    id: TaskId,
    title: String,
    completed: bool,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl Task {
    const fn new(id: TaskId, title: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title,
            completed: false,
            created_at,
            completed_at: None,
        }
    }

    /// Unique identifier
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Title, already trimmed
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether the task is done
    #[must_use]
    pub const fn completed(&self) -> bool {
        self.completed
    }

    /// When the task was added
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the task was last marked done, `None` while it is open
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }
}

/// Trim a raw title, `None` if nothing is left
#[must_use]
pub fn normalize_title(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// The authoritative ordered collection of tasks
///
/// Mutated only by [`crate::TaskListReducer`]; everything else reads it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TaskList {
    tasks: Vec<Task>,
    next_id: TaskId,
}

impl TaskList {
    /// Creates a new empty list
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: TaskId(0),
        }
    }

    /// Returns the number of tasks
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true when there are no tasks
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Returns the number of completed tasks
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    /// Returns the number of open tasks
    #[must_use]
    pub fn remaining_count(&self) -> usize {
        self.len() - self.completed_count()
    }

    /// The id the next added task will receive
    #[must_use]
    pub const fn next_id(&self) -> TaskId {
        self.next_id
    }

    /// Iterates in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// All tasks, in insertion order
    #[must_use]
    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns a task by ID
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Returns the task at a position
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    /// Current position of a task
    #[must_use]
    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Id of the task currently at `index`
    #[must_use]
    pub fn id_at(&self, index: usize) -> Option<TaskId> {
        self.at(index).map(Task::id)
    }

    /// Checks if a task exists
    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.get(id).is_some()
    }

    /// Titles in order, mostly for display and assertions
    #[must_use]
    pub fn titles(&self) -> Vec<&str> {
        self.tasks.iter().map(Task::title).collect()
    }

    /// Point-in-time copy of every task
    #[must_use]
    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    /// Whether `id` can still be handed to a new task
    ///
    /// Ids below [`TaskList::next_id`] have been used already, and the
    /// largest raw value is reserved so `next_id` can always advance.
    #[must_use]
    pub fn can_assign(&self, id: TaskId) -> bool {
        id >= self.next_id && id.checked_next().is_some()
    }

    /// Appends a task, `false` if `id` cannot be assigned
    pub(crate) fn insert(&mut self, id: TaskId, title: String, created_at: DateTime<Utc>) -> bool {
        let Some(next) = id.checked_next().filter(|_| id >= self.next_id) else {
            return false;
        };
        self.tasks.push(Task::new(id, title, created_at));
        self.next_id = next;
        true
    }

    pub(crate) fn remove(&mut self, id: TaskId) -> Option<Task> {
        let index = self.position(id)?;
        Some(self.tasks.remove(index))
    }

    pub(crate) fn set_completed(
        &mut self,
        id: TaskId,
        completed: bool,
        at: DateTime<Utc>,
    ) -> Option<&Task> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = completed;
        task.completed_at = completed.then_some(at);
        Some(task)
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Actions for the task list
///
/// Commands are requests coming from the outside and may be rejected.
/// Events are what the reducer records once a command is accepted; replaying
/// them onto an empty list rebuilds the same list.
#[derive(Action, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskAction {
    // ========== Commands ==========
    /// Command: Append a task, ignored if the title is blank
    #[command]
    Add {
        /// Untrimmed title as typed
        title: String,
    },

    /// Command: Delete whatever task currently sits at `index`
    #[command]
    DeleteAt {
        /// Position in the full list
        index: usize,
    },

    /// Command: Flip completion of whatever task currently sits at `index`
    #[command]
    ToggleAt {
        /// Position in the full list
        index: usize,
    },

    /// Command: Delete a task by id
    #[command]
    Delete {
        /// Task to delete
        id: TaskId,
    },

    /// Command: Flip completion of a task by id
    #[command]
    Toggle {
        /// Task to toggle
        id: TaskId,
    },

    // ========== Events ==========
    /// Event: Task was appended
    #[event]
    Added {
        /// Assigned identifier
        id: TaskId,
        /// Trimmed title
        title: String,
        /// When the task was created
        created_at: DateTime<Utc>,
    },

    /// Event: Task was removed
    #[event]
    Deleted {
        /// Removed task
        id: TaskId,
    },

    /// Event: Task completion changed
    #[event]
    Toggled {
        /// Toggled task
        id: TaskId,
        /// New completion flag
        completed: bool,
        /// When the change happened
        at: DateTime<Utc>,
    },
}
