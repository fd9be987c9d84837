//! Given steps for draft lifecycle BDD scenarios.

use super::world::{DraftWorld, run_async};
use eyre::WrapErr;
use orgwork::target::domain::{FlowDefine, PublishDefineParams, TargetId, TargetProfile};
use orgwork::work::{
    domain::{Draft, WorkDefinition},
    ports::DraftStore,
    services::WorkTaskController,
};
use rstest_bdd_macros::given;
use serde_json::json;
use std::sync::Arc;

#[given(r#"a person space with a work named "{name}""#)]
fn person_space_with_work(world: &mut DraftWorld, name: String) -> Result<(), eyre::Report> {
    let profile = TargetProfile::new("Alice", "alice").wrap_err("build person profile")?;
    let person = run_async(world.hierarchy.register_person(profile))
        .wrap_err("register person space")?;
    let params = PublishDefineParams::new(name.as_str(), "flow").wrap_err("build define")?;
    let define = run_async(world.hierarchy.publish_define(person.id(), params))
        .wrap_err("publish flow definition")?;
    world
        .tasks
        .register_define(define.clone())
        .wrap_err("register definition with task store")?;
    let work = WorkDefinition::new(name, &define).wrap_err("build work definition")?;

    world.controller = Some(WorkTaskController::new(
        work.clone(),
        Arc::clone(&world.drafts),
        Arc::clone(&world.tasks),
        Arc::clone(&world.forms),
    ));
    world.work = Some(work);
    Ok(())
}

#[given("the current work has {count:usize} saved drafts")]
fn current_work_drafts(world: &mut DraftWorld, count: usize) -> Result<(), eyre::Report> {
    let work = world
        .work
        .clone()
        .ok_or_else(|| eyre::eyre!("missing work in scenario world"))?;
    save_drafts(world, &work, count)
}

#[given("another work has {count:usize} saved drafts")]
fn other_work_drafts(world: &mut DraftWorld, count: usize) -> Result<(), eyre::Report> {
    let define = FlowDefine::new(
        TargetId::new(),
        PublishDefineParams::new("Expense", "expense").wrap_err("build define")?,
    );
    let work = WorkDefinition::new("Expense", &define).wrap_err("build work definition")?;
    save_drafts(world, &work, count)
}

fn save_drafts(
    world: &DraftWorld,
    work: &WorkDefinition,
    count: usize,
) -> Result<(), eyre::Report> {
    for index in 0..count {
        let draft = Draft::new(
            work,
            json!({ "index": index }),
            format!("draft {index}"),
            "草稿箱",
        );
        run_async(world.drafts.insert(&draft)).wrap_err("insert draft")?;
    }
    Ok(())
}
