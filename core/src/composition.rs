//! Reducer composition utilities
//!
//! - **`combine_reducers`**: run several reducers on the same state and action
//! - **`scope_reducer`**: embed a child reducer in a parent feature, focusing
//!   it on one field of the parent state and one case of the parent action
//!
//! # Examples
//!
//! ```
//! use taskflow_core::composition::{combine_reducers, scope_reducer};
//! use taskflow_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Default)]
//! struct Counter {
//!     value: i32,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = Counter;
//!     type Action = i32;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut Counter, delta: i32, _env: &()) -> SmallVec<[Effect<i32>; 4]> {
//!         state.value += delta;
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! #[derive(Default)]
//! struct App {
//!     counter: Counter,
//!     title: String,
//! }
//!
//! #[derive(Clone)]
//! enum AppAction {
//!     Counter(i32),
//!     Rename(String),
//! }
//!
//! struct RenameReducer;
//!
//! impl Reducer for RenameReducer {
//!     type State = App;
//!     type Action = AppAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut App, action: AppAction, _env: &()) -> SmallVec<[Effect<AppAction>; 4]> {
//!         if let AppAction::Rename(title) = action {
//!             state.title = title;
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! let app = combine_reducers(vec![
//!     Box::new(scope_reducer(
//!         CounterReducer,
//!         |app: &mut App| &mut app.counter,
//!         |action: AppAction| match action {
//!             AppAction::Counter(delta) => Some(delta),
//!             AppAction::Rename(_) => None,
//!         },
//!         AppAction::Counter,
//!     )),
//!     Box::new(RenameReducer),
//! ]);
//!
//! let mut state = App::default();
//! let _ = app.reduce(&mut state, AppAction::Counter(3), &());
//! let _ = app.reduce(&mut state, AppAction::Rename("tally".into()), &());
//! assert_eq!(state.counter.value, 3);
//! assert_eq!(state.title, "tally");
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;

/// Boxed reducer over a fixed state, action and environment triple.
pub type BoxedReducer<S, A, E> = Box<dyn Reducer<State = S, Action = A, Environment = E>>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Reducers run in the order given, each seeing the state left by the
/// previous one. Effects are concatenated in the same order.
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<BoxedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    A: Clone,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E> {
    reducers: Vec<BoxedReducer<S, A, E>>,
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    A: Clone,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = SmallVec::new();

        for reducer in &self.reducers {
            all_effects.extend(reducer.reduce(state, action.clone(), env));
        }

        all_effects
    }
}

/// Scopes a child reducer to a field of a parent state and a case of a parent action.
///
/// - `state`: borrows the child state out of the parent
/// - `extract`: returns the child action when the parent action targets the
///   child, `None` otherwise (the child is then skipped)
/// - `embed`: lifts child actions found in returned effects back into the
///   parent action type
///
/// The child state is borrowed in place, never cloned.
pub const fn scope_reducer<S, SubS, A, SubA, E, R>(
    reducer: R,
    state: fn(&mut S) -> &mut SubS,
    extract: fn(A) -> Option<SubA>,
    embed: fn(SubA) -> A,
) -> ScopedReducer<S, A, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
{
    ScopedReducer {
        reducer,
        state,
        extract,
        embed,
    }
}

/// A reducer focused on part of a larger feature.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, A, R>
where
    R: Reducer,
{
    reducer: R,
    state: fn(&mut S) -> &mut R::State,
    extract: fn(A) -> Option<R::Action>,
    embed: fn(R::Action) -> A,
}

impl<S, A, R> Reducer for ScopedReducer<S, A, R>
where
    R: Reducer,
{
    type State = S;
    type Action = A;
    type Environment = R::Environment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let Some(child_action) = (self.extract)(action) else {
            return SmallVec::new();
        };

        let child_state = (self.state)(state);

        self.reducer
            .reduce(child_state, child_action, env)
            .into_iter()
            .map(|effect| effect.map(&self.embed))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smallvec;

    #[derive(Clone, Default)]
    struct TestState {
        counter: i32,
        name: String,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        Increment,
        SetName(String),
    }

    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            if action == TestAction::Increment {
                state.counter += 1;
            }
            smallvec![Effect::None]
        }
    }

    struct NameReducer;

    impl Reducer for NameReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            if let TestAction::SetName(name) = action {
                state.name = name;
            }
            smallvec![Effect::None]
        }
    }

    #[test]
    fn combined_reducers_each_see_every_action() {
        let combined = combine_reducers(vec![Box::new(CounterReducer), Box::new(NameReducer)]);
        let mut state = TestState::default();

        let effects = combined.reduce(&mut state, TestAction::Increment, &());
        assert_eq!(effects.len(), 2);

        let _ = combined.reduce(&mut state, TestAction::SetName("Alice".to_string()), &());
        assert_eq!(state.counter, 1);
        assert_eq!(state.name, "Alice");
    }

    #[derive(Default)]
    struct SubState {
        value: i32,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum SubAction {
        Add(i32),
        Echo(i32),
    }

    struct SubReducer;

    impl Reducer for SubReducer {
        type State = SubState;
        type Action = SubAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                SubAction::Add(n) => {
                    state.value += n;
                    smallvec![Effect::None]
                },
                SubAction::Echo(n) => smallvec![Effect::Send(SubAction::Add(n))],
            }
        }
    }

    #[derive(Default)]
    struct ParentState {
        sub: SubState,
        other: String,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum ParentAction {
        Sub(SubAction),
        Other,
    }

    fn scoped() -> ScopedReducer<ParentState, ParentAction, SubReducer> {
        scope_reducer(
            SubReducer,
            |parent: &mut ParentState| &mut parent.sub,
            |action| match action {
                ParentAction::Sub(sub) => Some(sub),
                ParentAction::Other => None,
            },
            ParentAction::Sub,
        )
    }

    #[test]
    fn scoped_reducer_mutates_only_child_state() {
        let mut state = ParentState {
            sub: SubState { value: 5 },
            other: "test".to_string(),
        };

        let _ = scoped().reduce(&mut state, ParentAction::Sub(SubAction::Add(3)), &());

        assert_eq!(state.sub.value, 8);
        assert_eq!(state.other, "test");
    }

    #[test]
    fn scoped_reducer_skips_foreign_actions() {
        let mut state = ParentState::default();

        let effects = scoped().reduce(&mut state, ParentAction::Other, &());

        assert!(effects.is_empty());
        assert_eq!(state.sub.value, 0);
    }

    #[test]
    fn scoped_reducer_lifts_child_effects() {
        let mut state = ParentState::default();

        let effects = scoped().reduce(&mut state, ParentAction::Sub(SubAction::Echo(4)), &());

        assert_eq!(
            effects.as_slice(),
            &[Effect::Send(ParentAction::Sub(SubAction::Add(4)))]
        );
    }
}
