//! Property tests for list mutations and search filtering.

use proptest::prelude::*;
use std::sync::Arc;
use taskflow_testing::{properties, test_clock};
use tasks::{Task, TaskEnvironment, TaskStore, TaskView};

fn env() -> TaskEnvironment {
    TaskEnvironment::new(Arc::new(test_clock()))
}

fn titles(tasks: &[Task]) -> Vec<String> {
    tasks.iter().map(|task| task.title().to_string()).collect()
}

fn seeded(titles: &[String]) -> TaskStore {
    TaskStore::seeded(titles, env())
}

fn non_empty_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(properties::padded_text(), 1..8)
}

proptest! {
    #[test]
    fn prop_add_grows_iff_title_is_not_blank(
        existing in prop::collection::vec(properties::padded_text(), 0..5),
        raw in properties::any_text(),
    ) {
        let mut store = seeded(&existing);
        let before = store.snapshot();

        store.add(raw.clone());

        let after = store.snapshot();
        if raw.trim().is_empty() {
            prop_assert_eq!(after, before);
        } else {
            prop_assert_eq!(after.len(), before.len() + 1);
            let added = &after[before.len()];
            prop_assert_eq!(added.title(), raw.trim());
            prop_assert!(!added.completed());
            prop_assert_eq!(&after[..before.len()], &before[..]);
        }
    }

    #[test]
    fn prop_delete_at_removes_exactly_one(
        (list, index) in non_empty_list().prop_flat_map(|list| {
            let len = list.len();
            (Just(list), 0..len)
        }),
    ) {
        let mut store = seeded(&list);
        let mut expected = store.snapshot();
        expected.remove(index);

        store.delete_at(index);

        prop_assert_eq!(store.snapshot(), expected);
    }

    #[test]
    fn prop_delete_at_out_of_range_is_noop(list in non_empty_list(), extra in 0usize..4) {
        let mut store = seeded(&list);
        let before = store.snapshot();

        store.delete_at(before.len() + extra);

        prop_assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn prop_toggle_twice_restores(
        (list, index) in non_empty_list().prop_flat_map(|list| {
            let len = list.len();
            (Just(list), 0..len)
        }),
    ) {
        let mut store = seeded(&list);
        let before = store.snapshot();

        store.toggle_at(index);
        let once = store.snapshot();
        prop_assert_eq!(once[index].completed(), !before[index].completed());

        store.toggle_at(index);

        let after = store.snapshot();
        prop_assert_eq!(titles(&after), titles(&before));
        for (was, now) in before.iter().zip(&after) {
            prop_assert_eq!(was.completed(), now.completed());
        }
    }

    #[test]
    fn prop_visible_tasks_is_the_matching_subsequence(
        list in prop::collection::vec(properties::padded_text(), 0..8),
        query in prop_oneof![Just(String::new()), "[a-zA-Z]{1,2}", properties::any_text()],
    ) {
        let mut view = TaskView::new(seeded(&list));
        view.set_search_query(query.clone());

        let needle = query.to_lowercase();
        let expected: Vec<Task> = view
            .snapshot()
            .into_iter()
            .filter(|task| task.title().to_lowercase().contains(&needle))
            .collect();

        prop_assert_eq!(view.visible_tasks(), expected);
        if query.is_empty() {
            prop_assert_eq!(view.visible_count(), view.snapshot().len());
        }
    }

    #[test]
    fn prop_request_delete_removes_the_displayed_task(
        list in non_empty_list(),
        query in "[a-zA-Z]",
        display_index in 0usize..8,
    ) {
        let mut view = TaskView::new(seeded(&list));
        view.set_search_query(query);
        let visible = view.visible_tasks();
        let mut expected = view.snapshot();
        if let Some(target) = visible.get(display_index) {
            expected.retain(|task| task.id() != target.id());
        }

        view.request_delete(display_index);

        prop_assert_eq!(view.snapshot(), expected);
    }
}
