//! Metric names and descriptions emitted by the Store.
//!
//! The Store records through the `metrics` facade only. Nothing is exported
//! unless the host application installs a recorder; call [`describe_metrics`]
//! once after installing one to attach help text.

use metrics::{describe_counter, describe_histogram};

/// Actions dispatched through `Store::send`, feedback actions included
pub const ACTIONS_TOTAL: &str = "store.actions.total";

/// Effects executed, labelled by `type`
pub const EFFECTS_EXECUTED: &str = "store.effects.executed";

/// Feedback chains cut off by `StoreConfig::max_feedback_depth`
pub const FEEDBACK_REJECTED: &str = "store.feedback.rejected";

/// Time spent inside `Reducer::reduce`
pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";

/// Subscriber notifications delivered
pub const NOTIFICATIONS_TOTAL: &str = "store.subscribers.notified";

/// Register descriptions for every Store metric.
pub fn describe_metrics() {
    describe_counter!(ACTIONS_TOTAL, "Total number of actions processed by the store");
    describe_counter!(EFFECTS_EXECUTED, "Total number of effects executed, by type");
    describe_counter!(
        FEEDBACK_REJECTED,
        "Feedback chains aborted for exceeding the configured depth"
    );
    describe_histogram!(REDUCER_DURATION, "Time taken to execute the reducer");
    describe_counter!(NOTIFICATIONS_TOTAL, "Total number of subscriber notifications");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describing_without_a_recorder_is_harmless() {
        describe_metrics();
        describe_metrics();
    }

    #[test]
    fn names_share_the_store_prefix() {
        for name in [
            ACTIONS_TOTAL,
            EFFECTS_EXECUTED,
            FEEDBACK_REJECTED,
            REDUCER_DURATION,
            NOTIFICATIONS_TOTAL,
        ] {
            assert!(name.starts_with("store."), "{name}");
        }
    }
}
