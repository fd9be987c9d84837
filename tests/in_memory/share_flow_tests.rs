//! Company hierarchy feeding a share session.

use super::helpers::{Stores, profile, stores};
use orgwork::sharing::{
    adapters::memory::InMemoryShareStore,
    domain::{DestinationType, MembershipState, ShareNode},
    ports::ShareStore,
    services::ShareSession,
};
use orgwork::target::domain::{CommandOutcome, IdentityParams, TargetType};
use rstest::rstest;
use std::sync::Arc;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn department_stations_round_trip_through_a_share(
    stores: Stores,
) -> Result<(), eyre::Report> {
    let founder = stores.hierarchy.register_person(profile("Alice")?).await?;
    let company = stores
        .hierarchy
        .create_company(founder.id(), profile("Acme")?)
        .await?;
    let ops = stores
        .hierarchy
        .create_sub_team(company.id(), TargetType::Department, profile("Ops")?)
        .await?;
    let desk = stores
        .hierarchy
        .create_identity(ops.id(), IdentityParams::new("Desk", "desk")?)
        .await?;
    let share_store = Arc::new(InMemoryShareStore::new());
    let session = ShareSession::open(
        Arc::clone(&stores.hierarchy),
        Arc::clone(&share_store),
        company.id(),
        DestinationType::Station,
    )
    .await?;

    session.select_team(ops.id()).await?;
    let desk_node = ShareNode::new(desk.id().into_inner(), desk.name());
    session.check(desk_node.clone()).await?;
    session.commit().await?;

    let baseline = share_store
        .load_baseline(ops.id(), DestinationType::Station)
        .await?;
    eyre::ensure!(baseline == [desk_node.clone()], "unexpected baseline {baseline:?}");

    // Reopening the team shows the committed station as held.
    let state = session.select_team(ops.id()).await?;
    eyre::ensure!(
        state.active_set().state_of(desk_node.id) == Some(MembershipState::Has),
        "committed station should load as held"
    );

    let outcome = stores
        .hierarchy
        .delete_sub_team(company.id(), ops.id())
        .await?;
    eyre::ensure!(outcome == CommandOutcome::Applied, "delete should apply");
    eyre::ensure!(
        session.select_team(ops.id()).await.is_err(),
        "a deleted team cannot be selected"
    );
    Ok(())
}
