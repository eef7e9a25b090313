//! `TaskView`: what the user currently sees, and the way back to the store.
//!
//! The view keeps two pieces of transient input next to the task list: the
//! search query and the text typed into the "new task" field. Neither is
//! part of the list, and the visible tasks are never stored: they are
//! filtered from the list on every read.
//!
//! Actions that change the list are forwarded to [`TaskListReducer`], which
//! is scoped into the view state. Handlers that work with display indexes
//! (positions in the filtered sequence) resolve them to a [`TaskId`] first,
//! so the right task changes whatever the filter hides.

use crate::reducer::{TaskEnvironment, TaskListReducer};
use crate::store::TaskStore;
use crate::types::{Task, TaskAction, TaskId, TaskList};
use serde::Serialize;
use taskflow_core::{
    SmallVec,
    composition::{CombinedReducer, combine_reducers, scope_reducer},
    effect::Effect,
    reducer::Reducer,
    smallvec,
};
use taskflow_macros::Action;
use taskflow_runtime::{Store, SubscriptionId};

/// Tasks whose title contains `query`, ignoring case, in list order
///
/// An empty query matches every task. The query is used verbatim: no
/// trimming, so `" "` only matches titles containing a space.
#[must_use]
pub fn filter_tasks<'a>(tasks: &'a TaskList, query: &str) -> Vec<&'a Task> {
    if query.is_empty() {
        return tasks.iter().collect();
    }
    let needle = query.to_lowercase();
    tasks
        .iter()
        .filter(|task| task.title().to_lowercase().contains(&needle))
        .collect()
}

/// State behind a [`TaskView`]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TaskViewState {
    /// The task list, owned here while a view is mounted
    pub tasks: TaskList,
    /// Current search text
    pub search_query: String,
    /// Text typed into the new-task field, not yet submitted
    pub pending_input: String,
}

impl TaskViewState {
    /// Wraps a list with empty transient input
    #[must_use]
    pub const fn new(tasks: TaskList) -> Self {
        Self {
            tasks,
            search_query: String::new(),
            pending_input: String::new(),
        }
    }

    /// Tasks matching the current search query
    #[must_use]
    pub fn visible(&self) -> Vec<&Task> {
        filter_tasks(&self.tasks, &self.search_query)
    }

    /// Id of the task shown at `display_index` under the current query
    #[must_use]
    pub fn resolve_display_index(&self, display_index: usize) -> Option<TaskId> {
        self.visible().get(display_index).map(|task| task.id())
    }
}

/// Actions accepted by the view
#[derive(Action, Clone, Debug, PartialEq, Eq)]
pub enum TaskViewAction {
    /// Forwarded to the task list
    Task(TaskAction),

    /// Replace the search query
    SetSearchQuery {
        /// New query, used verbatim
        query: String,
    },

    /// Replace the new-task input
    SetPendingInput {
        /// Current field contents
        text: String,
    },

    /// Submit the new-task input and clear it
    #[command]
    CommitPendingInput,

    /// Delete the task at a position in the visible sequence
    #[command]
    RequestDelete {
        /// Position among visible tasks
        display_index: usize,
    },

    /// Toggle the task at a position in the visible sequence
    #[command]
    RequestToggle {
        /// Position among visible tasks
        display_index: usize,
    },
}

impl TaskViewAction {
    fn into_task(self) -> Option<TaskAction> {
        match self {
            Self::Task(action) => Some(action),
            _ => None,
        }
    }
}

/// Handles the view's own actions: transient input and display-index translation
struct ViewInputReducer;

impl ViewInputReducer {
    fn forward_by_display_index(
        state: &TaskViewState,
        display_index: usize,
        to_action: fn(TaskId) -> TaskAction,
    ) -> SmallVec<[Effect<TaskViewAction>; 4]> {
        match state.resolve_display_index(display_index) {
            Some(id) => smallvec![Effect::Send(TaskViewAction::Task(to_action(id)))],
            None => {
                tracing::debug!(
                    display_index,
                    visible = state.visible().len(),
                    "Ignoring request for a display index outside the visible tasks"
                );
                SmallVec::new()
            },
        }
    }
}

impl Reducer for ViewInputReducer {
    type State = TaskViewState;
    type Action = TaskViewAction;
    type Environment = TaskEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TaskViewAction::SetSearchQuery { query } => {
                state.search_query = query;
                SmallVec::new()
            },
            TaskViewAction::SetPendingInput { text } => {
                state.pending_input = text;
                SmallVec::new()
            },
            TaskViewAction::CommitPendingInput => {
                let title = std::mem::take(&mut state.pending_input);
                smallvec![Effect::Send(TaskViewAction::Task(TaskAction::Add { title }))]
            },
            TaskViewAction::RequestDelete { display_index } => {
                Self::forward_by_display_index(state, display_index, |id| TaskAction::Delete { id })
            },
            TaskViewAction::RequestToggle { display_index } => {
                Self::forward_by_display_index(state, display_index, |id| TaskAction::Toggle { id })
            },
            TaskViewAction::Task(_) => SmallVec::new(),
        }
    }
}

/// Reducer for the whole view: the task list reducer scoped into
/// [`TaskViewState::tasks`], followed by the view's input handling
pub struct TaskViewReducer {
    inner: CombinedReducer<TaskViewState, TaskViewAction, TaskEnvironment>,
}

impl TaskViewReducer {
    /// Creates a new `TaskViewReducer`
    #[must_use]
    pub fn new() -> Self {
        let tasks = scope_reducer(
            TaskListReducer::new(),
            |state: &mut TaskViewState| &mut state.tasks,
            TaskViewAction::into_task,
            TaskViewAction::Task,
        );
        Self {
            inner: combine_reducers(vec![Box::new(tasks), Box::new(ViewInputReducer)]),
        }
    }
}

impl Default for TaskViewReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TaskViewReducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskViewReducer").finish_non_exhaustive()
    }
}

impl Reducer for TaskViewReducer {
    type State = TaskViewState;
    type Action = TaskViewAction;
    type Environment = TaskEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        self.inner.reduce(state, action, env)
    }
}

/// Runtime store specialised for the view
pub type TaskViewStore = Store<TaskViewState, TaskViewAction, TaskEnvironment, TaskViewReducer>;

/// Derivation layer between the task list and a presentation layer
///
/// Takes over the list of a [`TaskStore`] when mounted, so there is still
/// exactly one owner; [`TaskView::into_store`] hands it back.
///
/// # Example
///
/// ```
/// use tasks::{TaskStore, TaskView};
///
/// let store = TaskStore::seeded(["abc", "xyz", "bcd"], Default::default());
/// let mut view = TaskView::new(store);
///
/// view.set_search_query("B");
/// let visible: Vec<String> = view.visible_tasks().iter().map(|t| t.title().to_string()).collect();
/// assert_eq!(visible, ["abc", "bcd"]);
///
/// view.request_delete(1);
/// assert_eq!(view.tasks().titles(), ["abc", "xyz"]);
/// ```
#[derive(Debug)]
pub struct TaskView {
    store: TaskViewStore,
}

impl TaskView {
    /// Mounts a view over the list owned by `store`
    #[must_use]
    pub fn new(store: TaskStore) -> Self {
        let (tasks, env) = store.into_parts();
        Self {
            store: Store::new(TaskViewState::new(tasks), TaskViewReducer::new(), env),
        }
    }

    /// Replaces the search query verbatim
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.dispatch(TaskViewAction::SetSearchQuery {
            query: query.into(),
        });
    }

    /// Current search query
    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.store.current().search_query
    }

    /// Replaces the new-task input
    pub fn set_pending_input(&mut self, text: impl Into<String>) {
        self.dispatch(TaskViewAction::SetPendingInput { text: text.into() });
    }

    /// Current new-task input
    #[must_use]
    pub fn pending_input(&self) -> &str {
        &self.store.current().pending_input
    }

    /// Adds the pending input as a task and clears the input
    ///
    /// The input is cleared even when the add is rejected for being blank.
    pub fn commit_pending_input(&mut self) {
        self.dispatch(TaskViewAction::CommitPendingInput);
    }

    /// Deletes the task at a position in [`TaskView::visible_tasks`]
    pub fn request_delete(&mut self, display_index: usize) {
        self.dispatch(TaskViewAction::RequestDelete { display_index });
    }

    /// Toggles the task at a position in [`TaskView::visible_tasks`]
    pub fn request_toggle(&mut self, display_index: usize) {
        self.dispatch(TaskViewAction::RequestToggle { display_index });
    }

    /// Appends a task to the underlying list
    pub fn add(&mut self, raw_title: impl Into<String>) {
        self.dispatch(TaskViewAction::Task(TaskAction::Add {
            title: raw_title.into(),
        }));
    }

    /// Deletes by position in the full, unfiltered list
    pub fn delete_at(&mut self, index: usize) {
        self.dispatch(TaskViewAction::Task(TaskAction::DeleteAt { index }));
    }

    /// Toggles by position in the full, unfiltered list
    pub fn toggle_at(&mut self, index: usize) {
        self.dispatch(TaskViewAction::Task(TaskAction::ToggleAt { index }));
    }

    /// Sends any view action
    pub fn dispatch(&mut self, action: TaskViewAction) {
        let name = action.name();
        if let Err(error) = self.store.send(action) {
            tracing::error!(%error, action = name, "View action failed");
        }
    }

    /// Tasks matching the search query, recomputed on every call
    #[must_use]
    pub fn visible_tasks(&self) -> Vec<Task> {
        self.store
            .state(|state| state.visible().into_iter().cloned().collect())
    }

    /// Number of tasks matching the search query
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.store.state(|state| state.visible().len())
    }

    /// Point-in-time copy of the full list
    #[must_use]
    pub fn snapshot(&self) -> Vec<Task> {
        self.store.state(|state| state.tasks.snapshot())
    }

    /// Borrow the full list
    #[must_use]
    pub fn tasks(&self) -> &TaskList {
        &self.store.current().tasks
    }

    /// Borrow the whole view state
    #[must_use]
    pub fn state(&self) -> &TaskViewState {
        self.store.current()
    }

    /// Calls `listener` with the view state after every action
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&TaskViewState) + 'static,
    {
        self.store.subscribe(listener)
    }

    /// Stops notifying a listener
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    /// Unmounts the view, returning the list to a [`TaskStore`]
    ///
    /// Search query and pending input are discarded.
    #[must_use]
    pub fn into_store(self) -> TaskStore {
        let (state, env) = self.store.into_parts();
        TaskStore::from_list(state.tasks, env)
    }
}

impl Default for TaskView {
    fn default() -> Self {
        Self::new(TaskStore::default())
    }
}
