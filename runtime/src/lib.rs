//! # Taskflow Runtime
//!
//! The Store runtime that coordinates reducer execution and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: owns state, runs the reducer, executes effects
//! - **Feedback loop**: `Effect::Send` actions are reduced before `send` returns
//! - **Subscribers**: notified with the new state once per `send`
//!
//! The Store is synchronous and takes `&mut self` to dispatch. Exclusive
//! access is enforced by the borrow checker, so there is no lock and no
//! async runtime: every action is fully applied, feedback included, before
//! the caller can dispatch the next one.
//!
//! ## Example
//!
//! ```ignore
//! use taskflow_runtime::Store;
//!
//! let mut store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething)?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field);
//! ```

use taskflow_core::{effect::Effect, reducer::Reducer};

/// Metric names recorded by the Store
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// A chain of `Effect::Send` feedback went deeper than allowed
        ///
        /// Remaining effects of the chain are dropped. State changes made
        /// before the limit was hit stay applied.
        #[error("Effect feedback exceeded the maximum depth of {max_depth}")]
        FeedbackDepthExceeded {
            /// The configured limit that was hit
            max_depth: usize,
        },
    }
}

pub use error::StoreError;
pub use store::{Store, SubscriptionId};

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use taskflow_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_max_feedback_depth(4);
/// assert_eq!(config.max_feedback_depth, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// How many nested `Effect::Send` hops one `send` may trigger
    pub max_feedback_depth: usize,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(max_feedback_depth: usize) -> Self {
        Self { max_feedback_depth }
    }

    /// Set the maximum feedback depth
    #[must_use]
    pub const fn with_max_feedback_depth(mut self, depth: usize) -> Self {
        self.max_feedback_depth = depth;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_feedback_depth: 16,
        }
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::metrics::{
        ACTIONS_TOTAL, EFFECTS_EXECUTED, FEEDBACK_REJECTED, NOTIFICATIONS_TOTAL,
        REDUCER_DURATION,
    };
    use super::{Effect, Reducer, StoreConfig, StoreError};

    /// Handle returned by [`Store::subscribe`], used to unsubscribe
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct SubscriptionId(u64);

    type Listener<S> = Box<dyn FnMut(&S)>;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (owned, mutated only by the reducer)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    /// 5. Subscribers (re-render hooks for a presentation layer)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: S,
        reducer: R,
        environment: E,
        config: StoreConfig,
        subscribers: Vec<(SubscriptionId, Listener<S>)>,
        next_subscription: u64,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new store with an explicit configuration
        #[must_use]
        pub const fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            Self {
                state: initial_state,
                reducer,
                environment,
                config,
                subscribers: Vec::new(),
                next_subscription: 0,
            }
        }

        /// Send an action to the store
        ///
        /// Runs the reducer, then executes the returned effects in order.
        /// `Effect::Send` actions go back through the reducer immediately,
        /// depth first, before any later effect runs. Subscribers are
        /// notified once, after everything has been applied.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::FeedbackDepthExceeded`] if feedback nests
        /// deeper than [`StoreConfig::max_feedback_depth`]. Subscribers are
        /// still notified in that case, since earlier steps may have changed
        /// state.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub fn send(&mut self, action: A) -> Result<(), StoreError> {
            tracing::debug!("Processing action");

            let result = self.process(action, 0);
            self.notify();

            tracing::debug!("Action processing completed");
            result
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let task_count = store.state(|s| s.len());
        /// ```
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            f(&self.state)
        }

        /// Borrow the current state
        #[must_use]
        pub const fn current(&self) -> &S {
            &self.state
        }

        /// Borrow the injected environment
        #[must_use]
        pub const fn environment(&self) -> &E {
            &self.environment
        }

        /// The configuration this store was built with
        #[must_use]
        pub const fn config(&self) -> &StoreConfig {
            &self.config
        }

        /// Register a listener called with the new state after every `send`
        pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
        where
            F: FnMut(&S) + 'static,
        {
            let id = SubscriptionId(self.next_subscription);
            self.next_subscription += 1;
            self.subscribers.push((id, Box::new(listener)));
            tracing::trace!(subscription = id.0, "Subscriber registered");
            id
        }

        /// Remove a listener. Returns `false` if it was already gone.
        pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
            let before = self.subscribers.len();
            self.subscribers.retain(|(existing, _)| *existing != id);
            before != self.subscribers.len()
        }

        /// Tear the store down, keeping its state and environment
        ///
        /// Subscribers are dropped.
        #[must_use]
        pub fn into_parts(self) -> (S, E) {
            (self.state, self.environment)
        }

        fn process(&mut self, action: A, depth: usize) -> Result<(), StoreError> {
            if depth > self.config.max_feedback_depth {
                tracing::warn!(
                    max_depth = self.config.max_feedback_depth,
                    "Dropping feedback action: maximum depth exceeded"
                );
                metrics::counter!(FEEDBACK_REJECTED).increment(1);
                return Err(StoreError::FeedbackDepthExceeded {
                    max_depth: self.config.max_feedback_depth,
                });
            }

            metrics::counter!(ACTIONS_TOTAL).increment(1);

            let effects = {
                let span = tracing::debug_span!("reducer_execution", depth);
                let _enter = span.enter();

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut self.state, action, &self.environment);
                metrics::histogram!(REDUCER_DURATION).record(start.elapsed().as_secs_f64());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());
                effects
            };

            for effect in effects {
                self.execute_effect(effect, depth)?;
            }
            Ok(())
        }

        fn execute_effect(&mut self, effect: Effect<A>, depth: usize) -> Result<(), StoreError> {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                    metrics::counter!(EFFECTS_EXECUTED, "type" => "none").increment(1);
                    Ok(())
                },
                Effect::Send(action) => {
                    tracing::trace!("Executing Effect::Send");
                    metrics::counter!(EFFECTS_EXECUTED, "type" => "send").increment(1);
                    self.process(action, depth + 1)
                },
                Effect::Sequential(effects) => {
                    tracing::trace!("Executing Effect::Sequential with {} effects", effects.len());
                    metrics::counter!(EFFECTS_EXECUTED, "type" => "sequential").increment(1);
                    for effect in effects {
                        self.execute_effect(effect, depth)?;
                    }
                    Ok(())
                },
            }
        }

        fn notify(&mut self) {
            if self.subscribers.is_empty() {
                return;
            }
            tracing::trace!("Notifying {} subscribers", self.subscribers.len());
            for (_, listener) in &mut self.subscribers {
                listener(&self.state);
            }
            metrics::counter!(NOTIFICATIONS_TOTAL).increment(self.subscribers.len() as u64);
        }
    }

    impl<S, A, E, R> std::fmt::Debug for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        S: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Store")
                .field("state", &self.state)
                .field("config", &self.config)
                .field("subscribers", &self.subscribers.len())
                .finish_non_exhaustive()
        }
    }
}
