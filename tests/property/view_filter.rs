//! Property-based tests for the filtered views and toggle-all.
//!
//! Uses proptest to verify:
//! 1. Active and Completed views partition the list, each in list order.
//! 2. The All view is the whole list.
//! 3. `active_count` and `completed_ids` agree with the views.
//! 4. Toggle-all over any list leaves every task at the same flag, and
//!    only touches tasks that were not already there.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use proptest::prelude::*;
use todoterm::filter::{self, Filter};
use todoterm::gateway::memory::{GatewayOp, MemoryGateway};
use todoterm::sync::{DEFAULT_NOTICE_DELAY, SyncController};
use todoterm_proto::task::{Task, TaskId, UserId};

/// Strategy for a task list with unique ascending ids and random flags.
fn arb_tasks() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec(("[a-z ]{1,16}", any::<bool>()), 0..24).prop_map(|rows| {
        rows.into_iter()
            .zip(1u64..)
            .map(|((title, completed), id)| Task {
                id: TaskId::new(id),
                user_id: UserId::new(1),
                title,
                completed,
            })
            .collect()
    })
}

fn ids(view: &[&Task]) -> Vec<TaskId> {
    view.iter().map(|t| t.id).collect()
}

proptest! {
    #[test]
    fn active_and_completed_partition_the_list(tasks in arb_tasks()) {
        let active = ids(&filter::visible(&tasks, Filter::Active));
        let completed = ids(&filter::visible(&tasks, Filter::Completed));

        prop_assert_eq!(active.len() + completed.len(), tasks.len());
        prop_assert!(active.iter().all(|id| !completed.contains(id)));
        prop_assert!(active.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(completed.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn all_view_is_whole_list(tasks in arb_tasks()) {
        let all = ids(&filter::visible(&tasks, Filter::All));
        let expected: Vec<TaskId> = tasks.iter().map(|t| t.id).collect();
        prop_assert_eq!(all, expected);
    }

    #[test]
    fn counters_agree_with_views(tasks in arb_tasks()) {
        prop_assert_eq!(
            filter::active_count(&tasks),
            filter::visible(&tasks, Filter::Active).len()
        );
        prop_assert_eq!(
            filter::completed_ids(&tasks),
            ids(&filter::visible(&tasks, Filter::Completed))
        );
        prop_assert_eq!(
            filter::all_completed(&tasks),
            filter::active_count(&tasks) == 0
        );
    }

    #[test]
    fn toggle_all_converges(tasks in arb_tasks()) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let target = !filter::all_completed(&tasks);
        let differing = tasks.iter().filter(|t| t.completed != target).count();

        let ctl = runtime.block_on(async {
            let gateway = Arc::new(MemoryGateway::with_tasks(tasks.clone()));
            let mut ctl = SyncController::new(gateway, UserId::new(1), DEFAULT_NOTICE_DELAY);
            ctl.load();
            ctl.run_until_idle().await;
            ctl.toggle_all();
            ctl.run_until_idle().await;
            ctl
        });

        prop_assert_eq!(ctl.gateway().call_count(GatewayOp::Update), differing);
        prop_assert!(ctl.store().tasks().iter().all(|t| t.completed == target || tasks.is_empty()));
        prop_assert_eq!(ctl.store().tasks().len(), tasks.len());
        prop_assert!(ctl.store().in_flight().is_empty());
    }
}
