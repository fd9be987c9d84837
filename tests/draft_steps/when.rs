//! When steps for draft lifecycle BDD scenarios.

use super::world::{DraftWorld, run_async};
use eyre::WrapErr;
use orgwork::work::{
    domain::{RowAction, TaskBucket},
    services::{BucketRow, ChangeOutcome, RowSelection},
};
use rstest_bdd_macros::when;

#[when("the draft bucket is opened")]
fn open_draft_bucket(world: &mut DraftWorld) -> Result<(), eyre::Report> {
    let load = run_async(world.controller()?.select_bucket(TaskBucket::Draft))
        .wrap_err("load draft bucket")?;
    world.last_load = Some(load);
    Ok(())
}

#[when("the first draft is removed")]
fn remove_first_draft(world: &mut DraftWorld) -> Result<(), eyre::Report> {
    match change_first_draft(world, RowAction::Remove)? {
        ChangeOutcome::DraftRemoved(load) => {
            world.last_load = Some(load);
            Ok(())
        }
        other => Err(eyre::eyre!("expected a removal, got {other:?}")),
    }
}

#[when("the first draft is submitted")]
fn submit_first_draft(world: &mut DraftWorld) -> Result<(), eyre::Report> {
    match change_first_draft(world, RowAction::Submit)? {
        ChangeOutcome::Submitted(instance) => {
            world.last_instance = Some(instance);
            Ok(())
        }
        other => Err(eyre::eyre!("expected a submission, got {other:?}")),
    }
}

fn change_first_draft(
    world: &DraftWorld,
    action: RowAction,
) -> Result<ChangeOutcome, eyre::Report> {
    let controller = world.controller()?;
    let view = run_async(controller.view(TaskBucket::Draft));
    let first = view
        .rows()
        .first()
        .map(BucketRow::id)
        .ok_or_else(|| eyre::eyre!("draft bucket is empty"))?;
    run_async(controller.on_change(&RowSelection::single(first), action))
        .wrap_err("apply row action")
}
