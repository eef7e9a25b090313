//! Reducer logic for the task list.
//!
//! Commands are validated against the current list, turned into events, and
//! the events are applied. A command that fails validation is dropped
//! without touching state and without surfacing an error; the rejection is
//! only logged.

use crate::types::{TaskAction, TaskId, TaskList, normalize_title};
use std::sync::Arc;
use taskflow_core::{
    SmallVec,
    effect::Effect,
    environment::{Clock, SystemClock},
    reducer::Reducer,
};

/// Environment dependencies for the task reducers
#[derive(Clone)]
pub struct TaskEnvironment {
    /// Clock for creation and completion timestamps
    pub clock: Arc<dyn Clock>,
}

impl TaskEnvironment {
    /// Creates a new `TaskEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl Default for TaskEnvironment {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for TaskEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for the task list
#[derive(Clone, Copy, Debug, Default)]
pub struct TaskListReducer;

impl TaskListReducer {
    /// Creates a new `TaskListReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Turns a command into the event it implies, `None` if rejected
    fn decide(state: &TaskList, command: TaskAction, env: &TaskEnvironment) -> Option<TaskAction> {
        match command {
            TaskAction::Add { title } => {
                let Some(title) = normalize_title(&title) else {
                    tracing::debug!("Rejected Add: title is blank");
                    return None;
                };
                let id = state.next_id();
                if !state.can_assign(id) {
                    tracing::debug!(%id, "Rejected Add: no task ids left");
                    return None;
                }
                Some(TaskAction::Added {
                    id,
                    title: title.to_string(),
                    created_at: env.clock.now(),
                })
            },
            TaskAction::DeleteAt { index } => {
                let id = Self::resolve_index(state, index, "DeleteAt")?;
                Some(TaskAction::Deleted { id })
            },
            TaskAction::ToggleAt { index } => {
                let id = Self::resolve_index(state, index, "ToggleAt")?;
                Self::decide_toggle(state, id, env)
            },
            TaskAction::Delete { id } => {
                if !state.contains(id) {
                    tracing::debug!(%id, "Rejected Delete: unknown task");
                    return None;
                }
                Some(TaskAction::Deleted { id })
            },
            TaskAction::Toggle { id } => Self::decide_toggle(state, id, env),
            TaskAction::Added {
                id,
                title,
                created_at,
            } => {
                let Some(title) = normalize_title(&title) else {
                    tracing::debug!(%id, "Rejected Added: title is blank");
                    return None;
                };
                if !state.can_assign(id) {
                    tracing::debug!(%id, next_id = %state.next_id(), "Rejected Added: id already used");
                    return None;
                }
                Some(TaskAction::Added {
                    id,
                    title: title.to_string(),
                    created_at,
                })
            },
            // Unknown ids are ignored when applied
            TaskAction::Deleted { .. } | TaskAction::Toggled { .. } => Some(command),
        }
    }

    fn resolve_index(state: &TaskList, index: usize, command: &'static str) -> Option<TaskId> {
        let id = state.id_at(index);
        if id.is_none() {
            tracing::debug!(index, len = state.len(), "Rejected {command}: index out of range");
        }
        id
    }

    fn decide_toggle(state: &TaskList, id: TaskId, env: &TaskEnvironment) -> Option<TaskAction> {
        let Some(task) = state.get(id) else {
            tracing::debug!(%id, "Rejected Toggle: unknown task");
            return None;
        };
        Some(TaskAction::Toggled {
            id,
            completed: !task.completed(),
            at: env.clock.now(),
        })
    }

    /// Applies an event to state
    fn apply_event(state: &mut TaskList, event: TaskAction) {
        match event {
            TaskAction::Added {
                id,
                title,
                created_at,
            } => {
                if state.insert(id, title, created_at) {
                    tracing::trace!(%id, "Task added");
                }
            },
            TaskAction::Deleted { id } => {
                tracing::trace!(%id, "Task deleted");
                state.remove(id);
            },
            TaskAction::Toggled { id, completed, at } => {
                tracing::trace!(%id, completed, "Task toggled");
                state.set_completed(id, completed, at);
            },
            // Commands are not applied to state
            TaskAction::Add { .. }
            | TaskAction::DeleteAt { .. }
            | TaskAction::ToggleAt { .. }
            | TaskAction::Delete { .. }
            | TaskAction::Toggle { .. } => {},
        }
    }
}

impl Reducer for TaskListReducer {
    type State = TaskList;
    type Action = TaskAction;
    type Environment = TaskEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        if let Some(event) = Self::decide(state, action, env) {
            Self::apply_event(state, event);
        }
        SmallVec::new()
    }
}
