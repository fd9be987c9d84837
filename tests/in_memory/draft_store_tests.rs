//! Draft collection behaviour of the in-memory draft store.

use orgwork::target::domain::{FlowDefine, PublishDefineParams, TargetId};
use orgwork::work::{
    adapters::memory::InMemoryDraftStore,
    domain::{Draft, WorkDefinition},
    ports::{DraftStore, DraftStoreError},
};
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn work() -> WorkDefinition {
    let define = FlowDefine::new(
        TargetId::new(),
        PublishDefineParams::new("Leave", "leave").expect("valid define"),
    );
    WorkDefinition::new("Leave", &define).expect("valid work")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn inserted_draft_is_listed_until_removed(work: WorkDefinition) {
    let store = InMemoryDraftStore::new();
    let draft = Draft::new(&work, json!({"days": 2}), "two days", "草稿箱");

    store.insert(&draft).await.expect("insert should succeed");
    let listed = store.all(true).await.expect("listing should succeed");
    assert_eq!(listed, [draft.clone()]);

    assert!(store.remove(&draft).await.expect("remove should succeed"));
    assert!(store.all(true).await.expect("listing should succeed").is_empty());
    assert!(!store.remove(&draft).await.expect("remove should succeed"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn replace_is_idempotent(work: WorkDefinition) {
    let store = InMemoryDraftStore::new();
    let draft = Draft::new(&work, json!({"days": 1}), "one", "草稿箱");
    store.insert(&draft).await.expect("insert should succeed");
    let revised = draft.revised(json!({"days": 3}), "three");

    store.replace(&revised).await.expect("replace should succeed");
    let once = store.all(true).await.expect("listing should succeed");
    store.replace(&revised).await.expect("replace should succeed");
    let twice = store.all(true).await.expect("listing should succeed");

    assert_eq!(once, twice);
    assert_eq!(once, [revised]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_insert_and_missing_replace_are_rejected(work: WorkDefinition) {
    let store = InMemoryDraftStore::new();
    let draft = Draft::new(&work, json!({}), "", "草稿箱");
    store.insert(&draft).await.expect("insert should succeed");

    let duplicate = store.insert(&draft).await;
    let stranger = Draft::new(&work, json!({}), "", "草稿箱");
    let missing = store.replace(&stranger).await;

    assert!(matches!(duplicate, Err(DraftStoreError::DuplicateDraft(id)) if id == draft.id()));
    assert!(matches!(missing, Err(DraftStoreError::NotFound(id)) if id == stranger.id()));
}
