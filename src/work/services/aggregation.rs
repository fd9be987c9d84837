//! Row assembly for bucket views.
//!
//! Launched and completed rows are filtered to the current work's flow
//! definition, ordered newest first and then enriched with their instance
//! payloads. Enrichment is all-or-nothing.

use crate::target::domain::DefineId;
use crate::work::{
    domain::{Draft, WorkDefinition, WorkTask},
    ports::{TaskStore, TaskStoreResult},
};
use futures::future::try_join_all;
use std::cmp::Reverse;

/// Keeps the drafts belonging to `work`, named after it.
#[must_use]
pub fn drafts_for_work(drafts: Vec<Draft>, work: &WorkDefinition) -> Vec<Draft> {
    drafts
        .into_iter()
        .filter(|draft| draft.work_id() == work.id())
        .map(|draft| draft.with_name(work.name()))
        .collect()
}

/// Sorts `tasks` by update time, newest first.
///
/// The sort is stable: tasks with equal timestamps keep their store order.
pub fn sort_by_recency(tasks: &mut [WorkTask]) {
    tasks.sort_by_key(|task| Reverse(task.updated_at()));
}

/// Keeps the tasks running under `define_id`, newest first.
#[must_use]
pub fn select_tasks(tasks: Vec<WorkTask>, define_id: DefineId) -> Vec<WorkTask> {
    let mut selected: Vec<WorkTask> = tasks
        .into_iter()
        .filter(|task| task.define_id() == define_id)
        .collect();
    sort_by_recency(&mut selected);
    selected
}

/// Loads every task's instance payload concurrently.
///
/// Order is preserved.
///
/// # Errors
///
/// Returns the first payload failure; no partially enriched list is
/// produced.
pub async fn load_instance_payloads<S>(
    store: &S,
    tasks: Vec<WorkTask>,
) -> TaskStoreResult<Vec<WorkTask>>
where
    S: TaskStore + ?Sized,
{
    let payloads = try_join_all(tasks.iter().map(|task| store.load_instance(task))).await?;
    Ok(tasks
        .into_iter()
        .zip(payloads)
        .map(|(task, payload)| task.with_instance(payload))
        .collect())
}
