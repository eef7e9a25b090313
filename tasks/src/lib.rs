//! # Tasks
//!
//! A to-do list core: an ordered list of tasks with one owner, and a view
//! layer that filters it by a search query and keeps the unsubmitted input.
//!
//! - [`TaskStore`] owns the list. Adding, deleting and toggling go through
//!   [`TaskListReducer`] and can never fail: invalid input is a no-op.
//! - [`TaskView`] mounts over a store and adds a search query and a pending
//!   input. Its `request_*` operations take positions in the *filtered*
//!   sequence and resolve them to a [`TaskId`] before touching the list.
//!
//! ```
//! use tasks::{TaskStore, TaskStoreConfig, TaskView};
//!
//! let store = TaskStore::with_config(&TaskStoreConfig::tutorial(), Default::default());
//! let mut view = TaskView::new(store);
//!
//! view.set_pending_input("Ship it");
//! view.commit_pending_input();
//! view.set_search_query("app");
//!
//! assert_eq!(view.visible_count(), 2);
//! view.request_toggle(1);
//!
//! let store = view.into_store();
//! assert_eq!(store.tasks().completed_count(), 1);
//! assert_eq!(store.tasks().len(), 4);
//! ```

pub mod config;
pub mod reducer;
pub mod store;
pub mod types;
pub mod view;

pub use config::{ConfigError, TaskStoreConfig};
pub use reducer::{TaskEnvironment, TaskListReducer};
pub use store::{TaskListStore, TaskStore};
pub use types::{Task, TaskAction, TaskId, TaskList, normalize_title};
pub use view::{TaskView, TaskViewAction, TaskViewReducer, TaskViewState, TaskViewStore, filter_tasks};
