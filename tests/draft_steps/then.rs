//! Then steps for draft lifecycle BDD scenarios.

use super::world::{DraftWorld, run_async};
use eyre::WrapErr;
use orgwork::work::domain::TaskBucket;
use rstest_bdd_macros::then;

#[then("the draft bucket lists {count:usize} rows")]
fn draft_bucket_lists(world: &DraftWorld, count: usize) -> Result<(), eyre::Report> {
    let load = run_async(world.controller()?.select_bucket(TaskBucket::Draft))
        .wrap_err("reload draft bucket")?;
    let rows = load
        .view()
        .ok_or_else(|| eyre::eyre!("draft load was superseded"))?
        .len();
    if rows != count {
        return Err(eyre::eyre!("expected {count} draft rows, found {rows}"));
    }
    Ok(())
}

#[then("the launched bucket lists {count:usize} rows")]
fn launched_bucket_lists(world: &DraftWorld, count: usize) -> Result<(), eyre::Report> {
    let load = run_async(world.controller()?.select_bucket(TaskBucket::Launched))
        .wrap_err("load launched bucket")?;
    let rows = load
        .view()
        .ok_or_else(|| eyre::eyre!("launched load was superseded"))?
        .len();
    if rows != count {
        return Err(eyre::eyre!("expected {count} launched rows, found {rows}"));
    }
    if world.last_instance.is_none() {
        return Err(eyre::eyre!("no submission was recorded"));
    }
    Ok(())
}
