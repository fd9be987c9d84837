//! Work buckets of a person space, loaded end to end.

use super::helpers::{Stores, profile, stores};
use orgwork::work::{
    domain::{Draft, InstanceData, RowAction, TaskBucket, TaskData, WorkTask},
    ports::DraftStore,
    services::{BucketRow, ChangeOutcome, RowSelection},
};
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn person_drafts_are_scoped_per_work(stores: Stores) -> Result<(), eyre::Report> {
    let person = stores.hierarchy.register_person(profile("Alice")?).await?;
    let leave = stores.work_on(&person, "Leave").await?;
    let expense = stores.work_on(&person, "Expense").await?;
    for work in [&leave, &leave, &expense] {
        stores
            .drafts
            .insert(&Draft::new(work, json!({}), "", "草稿箱"))
            .await?;
    }
    let controller = stores.controller(&leave);

    let load = controller.select_bucket(TaskBucket::Draft).await?;
    let view = load
        .view()
        .ok_or_else(|| eyre::eyre!("draft load was superseded"))?;
    eyre::ensure!(view.len() == 2, "expected 2 drafts, found {}", view.len());

    let first = view
        .rows()
        .first()
        .map(BucketRow::id)
        .ok_or_else(|| eyre::eyre!("draft bucket is empty"))?;
    let outcome = controller
        .on_change(&RowSelection::single(first), RowAction::Remove)
        .await?;
    let ChangeOutcome::DraftRemoved(reloaded) = outcome else {
        return Err(eyre::eyre!("expected a removal, got {outcome:?}"));
    };
    let remaining = reloaded.view().map_or(0, |view| view.len());
    eyre::ensure!(remaining == 1, "expected 1 draft after removal, found {remaining}");

    let expense_view = stores
        .controller(&expense)
        .select_bucket(TaskBucket::Draft)
        .await?;
    eyre::ensure!(
        expense_view.view().map_or(0, |view| view.len()) == 1,
        "other work's drafts must be untouched"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completed_bucket_is_recency_ordered(stores: Stores) -> Result<(), eyre::Report> {
    let person = stores.hierarchy.register_person(profile("Alice")?).await?;
    let leave = stores.work_on(&person, "Leave").await?;
    for (title, at) in [
        ("T-1", "2024-05-02 09:00:00"),
        ("T-2", "2024-05-01 09:00:00"),
        ("T", "2024-05-03T09:00:00Z"),
    ] {
        let task = WorkTask::new(
            leave.define_id(),
            leave.id(),
            TaskData::new(title, Some(at.to_owned())),
        );
        stores
            .tasks
            .seed(TaskBucket::Completed, task, Some(InstanceData::default()))?;
    }

    let load = stores
        .controller(&leave)
        .select_bucket(TaskBucket::Completed)
        .await?;

    let titles: Vec<String> = load
        .view()
        .ok_or_else(|| eyre::eyre!("completed load was superseded"))?
        .rows()
        .iter()
        .filter_map(BucketRow::as_task)
        .map(|task| task.taskdata().title.clone())
        .collect();
    eyre::ensure!(titles == ["T", "T-1", "T-2"], "unexpected order {titles:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn one_missing_payload_leaves_no_rows(stores: Stores) -> Result<(), eyre::Report> {
    let person = stores.hierarchy.register_person(profile("Alice")?).await?;
    let leave = stores.work_on(&person, "Leave").await?;
    for (index, payload) in [Some(InstanceData::default()), None, Some(InstanceData::default())]
        .into_iter()
        .enumerate()
    {
        let task = WorkTask::new(
            leave.define_id(),
            leave.id(),
            TaskData::new(format!("task {index}"), Some("2024-05-01 09:00:00".to_owned())),
        );
        stores.tasks.seed(TaskBucket::Launched, task, payload)?;
    }
    let controller = stores.controller(&leave);

    let result = controller.select_bucket(TaskBucket::Launched).await;

    eyre::ensure!(result.is_err(), "a missing payload must fail the bucket");
    let view = controller.view(TaskBucket::Launched).await;
    eyre::ensure!(view.is_empty(), "no rows may be rendered, found {}", view.len());
    Ok(())
}
