//! `TaskStore`: the single owner of the task list.
//!
//! A thin facade over a runtime [`Store`] running [`TaskListReducer`]. Each
//! method dispatches one action and returns once the list has been updated
//! and subscribers have been notified.

use crate::config::TaskStoreConfig;
use crate::reducer::{TaskEnvironment, TaskListReducer};
use crate::types::{Task, TaskAction, TaskId, TaskList};
use taskflow_runtime::{Store, SubscriptionId};

/// Runtime store specialised for the task list
pub type TaskListStore = Store<TaskList, TaskAction, TaskEnvironment, TaskListReducer>;

/// Owner of the authoritative task list
///
/// Invalid input never fails: a blank title or an index that points nowhere
/// leaves the list as it was.
///
/// # Example
///
/// ```
/// use tasks::TaskStore;
///
/// let mut store = TaskStore::default();
/// store.add("  Learn Rust ");
/// store.add("   ");
/// store.toggle_at(0);
///
/// let snapshot = store.snapshot();
/// assert_eq!(snapshot.len(), 1);
/// assert_eq!(snapshot[0].title(), "Learn Rust");
/// assert!(snapshot[0].completed());
/// ```
#[derive(Debug)]
pub struct TaskStore {
    store: TaskListStore,
}

impl TaskStore {
    /// Creates an empty store
    #[must_use]
    pub fn new(env: TaskEnvironment) -> Self {
        Self::from_list(TaskList::new(), env)
    }

    /// Creates a store seeded from configuration
    ///
    /// Seed titles go through [`TaskStore::add`], so blank ones are dropped.
    #[must_use]
    pub fn with_config(config: &TaskStoreConfig, env: TaskEnvironment) -> Self {
        Self::seeded(&config.seed, env)
    }

    /// Creates a store pre-filled with `titles`, in order
    #[must_use]
    pub fn seeded<I>(titles: I, env: TaskEnvironment) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut store = Self::new(env);
        for title in titles {
            store.add(title.as_ref());
        }
        store
    }

    pub(crate) fn from_list(list: TaskList, env: TaskEnvironment) -> Self {
        Self {
            store: Store::new(list, TaskListReducer::new(), env),
        }
    }

    /// Appends a task. Blank titles (after trimming) are ignored.
    pub fn add(&mut self, raw_title: impl Into<String>) {
        self.dispatch(TaskAction::Add {
            title: raw_title.into(),
        });
    }

    /// Removes the task at `index`. Out of range is a no-op.
    pub fn delete_at(&mut self, index: usize) {
        self.dispatch(TaskAction::DeleteAt { index });
    }

    /// Flips completion of the task at `index`. Out of range is a no-op.
    pub fn toggle_at(&mut self, index: usize) {
        self.dispatch(TaskAction::ToggleAt { index });
    }

    /// Removes a task by id. Unknown ids are a no-op.
    pub fn delete(&mut self, id: TaskId) {
        self.dispatch(TaskAction::Delete { id });
    }

    /// Flips completion of a task by id. Unknown ids are a no-op.
    pub fn toggle(&mut self, id: TaskId) {
        self.dispatch(TaskAction::Toggle { id });
    }

    /// Sends any task action
    ///
    /// Events are validated like commands: a blank title or an id that was
    /// already handed out leaves the list untouched.
    pub fn dispatch(&mut self, action: TaskAction) {
        let name = action.name();
        if let Err(error) = self.store.send(action) {
            tracing::error!(%error, action = name, "Task action failed");
        }
    }

    /// Point-in-time copy of every task, in order
    #[must_use]
    pub fn snapshot(&self) -> Vec<Task> {
        self.store.state(TaskList::snapshot)
    }

    /// Borrow the current list
    #[must_use]
    pub fn tasks(&self) -> &TaskList {
        self.store.current()
    }

    /// Calls `listener` with the list after every action
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&TaskList) + 'static,
    {
        self.store.subscribe(listener)
    }

    /// Stops notifying a listener
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    /// Gives up ownership of the list and environment
    #[must_use]
    pub fn into_parts(self) -> (TaskList, TaskEnvironment) {
        self.store.into_parts()
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new(TaskEnvironment::default())
    }
}
