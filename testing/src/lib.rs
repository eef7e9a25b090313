//! # Taskflow Testing
//!
//! Testing utilities and helpers for the Taskflow state architecture.
//!
//! This crate provides:
//! - Deterministic implementations of Environment traits
//! - A Given-When-Then harness for reducers ([`ReducerTest`])
//! - A recorder capturing what subscribers of a `Store` observe
//! - proptest strategies for text inputs
//!
//! ## Example
//!
//! ```ignore
//! use taskflow_testing::{test_clock, StateRecorder};
//! use taskflow_runtime::Store;
//!
//! #[test]
//! fn renders_after_every_action() {
//!     let mut store = Store::new(TaskList::new(), TaskListReducer::new(), env());
//!     let renders = StateRecorder::attach(&mut store, |list| list.len());
//!
//!     store.send(TaskAction::Add { title: "Ship".into() }).unwrap();
//!
//!     assert_eq!(renders.frames(), vec![1]);
//! }
//! ```

use chrono::{DateTime, Duration, Utc};
use taskflow_core::environment::Clock;

/// Ergonomic reducer testing
pub mod reducer_test;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Duration, Utc};
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use taskflow_testing::mocks::FixedClock;
    /// use taskflow_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that only moves when told to
    ///
    /// Useful when a test needs two distinct timestamps, e.g. creation and
    /// completion of the same task.
    #[derive(Debug)]
    pub struct ManualClock {
        millis: AtomicI64,
    }

    impl ManualClock {
        /// Start the clock at the given time
        #[must_use]
        pub fn starting_at(time: DateTime<Utc>) -> Self {
            Self {
                millis: AtomicI64::new(time.timestamp_millis()),
            }
        }

        /// Move the clock forward
        pub fn advance(&self, by: Duration) {
            self.millis.fetch_add(by.num_milliseconds(), Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded timestamp fails to parse, which cannot happen.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Test helpers and utilities
pub mod helpers {
    use std::cell::RefCell;
    use std::rc::Rc;
    use taskflow_core::reducer::Reducer;
    use taskflow_runtime::Store;
    use tracing_subscriber::EnvFilter;

    /// Install a `tracing` subscriber that writes through the test harness.
    ///
    /// Honors `RUST_LOG`, defaults to `warn`. Safe to call from every test:
    /// only the first call installs anything.
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    }

    /// Records a projection of the state every time a `Store` notifies its subscribers.
    ///
    /// Stands in for a presentation layer: each frame is what a re-render
    /// would have seen.
    #[derive(Debug)]
    pub struct StateRecorder<T> {
        frames: Rc<RefCell<Vec<T>>>,
    }

    impl<T: 'static> StateRecorder<T> {
        /// Subscribe to `store`, keeping `project(state)` after every send
        pub fn attach<S, A, E, R, F>(store: &mut Store<S, A, E, R>, project: F) -> Self
        where
            R: Reducer<State = S, Action = A, Environment = E>,
            F: Fn(&S) -> T + 'static,
        {
            let frames = Rc::new(RefCell::new(Vec::new()));
            let sink = Rc::clone(&frames);
            let _ = store.subscribe(move |state: &S| sink.borrow_mut().push(project(state)));
            Self { frames }
        }

        /// Number of notifications received so far
        #[must_use]
        pub fn len(&self) -> usize {
            self.frames.borrow().len()
        }

        /// True until the first notification
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.frames.borrow().is_empty()
        }

        /// Every frame recorded so far, oldest first
        #[must_use]
        pub fn frames(&self) -> Vec<T>
        where
            T: Clone,
        {
            self.frames.borrow().clone()
        }

        /// The most recent frame
        #[must_use]
        pub fn last(&self) -> Option<T>
        where
            T: Clone,
        {
            self.frames.borrow().last().cloned()
        }
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;

    /// Strings made only of whitespace, the empty string included
    pub fn blank() -> impl Strategy<Value = String> {
        proptest::collection::vec(prop_oneof![Just(' '), Just('\t'), Just('\n'), Just('\r')], 0..8)
            .prop_map(|chars| chars.into_iter().collect())
    }

    /// Short printable text with at least one non-whitespace character,
    /// surrounded by arbitrary whitespace
    pub fn padded_text() -> impl Strategy<Value = String> {
        (blank(), "[A-Za-z0-9][A-Za-z0-9 ]{0,15}", blank())
            .prop_map(|(head, body, tail)| format!("{head}{body}{tail}"))
    }

    /// Any mix of blank and non-blank text
    pub fn any_text() -> impl Strategy<Value = String> {
        prop_oneof![blank(), padded_text(), "\\PC{0,12}"]
    }
}

// Re-export commonly used items
pub use helpers::{StateRecorder, init_tracing};
pub use mocks::{FixedClock, ManualClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};
