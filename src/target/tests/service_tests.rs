//! Service orchestration tests for the hierarchy service.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::OrgworkConfig;
use crate::target::{
    adapters::memory::InMemoryDirectory,
    domain::{
        AuthorityNode, CommandOutcome, DefineId, FlowDefine, HierarchyDomainError, Identity,
        IdentityId, IdentityParams, MarketId, PublishDefineParams, Target, TargetId,
        TargetProfile, TargetType,
    },
    ports::{DirectoryStore, DirectoryStoreError, DirectoryStoreResult, Page, PageRequest},
    services::{HierarchyError, HierarchyService},
};
use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestService = HierarchyService<InMemoryDirectory, DefaultClock>;

struct Harness {
    directory: Arc<InMemoryDirectory>,
    service: TestService,
}

#[fixture]
fn harness() -> Harness {
    let directory = Arc::new(InMemoryDirectory::new());
    let service = HierarchyService::new(Arc::clone(&directory), Arc::new(DefaultClock));
    Harness { directory, service }
}

fn profile(name: &str) -> TargetProfile {
    TargetProfile::new(name, name.to_lowercase()).expect("valid profile")
}

async fn company_with_founder(service: &TestService) -> (Target, Target) {
    let founder = service
        .register_person(profile("Alice"))
        .await
        .expect("person registration should succeed");
    let company = service
        .create_company(founder.id(), profile("Acme"))
        .await
        .expect("company creation should succeed");
    (founder, company)
}

// ── Sub teams ───────────────────────────────────────────────────────

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn load_sub_team_returns_only_allowed_variants(harness: Harness) {
    let (_, company) = company_with_founder(&harness.service).await;
    for (kind, name) in [
        (TargetType::Department, "Ops"),
        (TargetType::WorkingGroup, "Squad"),
        (TargetType::Group, "Alliance"),
    ] {
        harness
            .service
            .create_sub_team(company.id(), kind, profile(name))
            .await
            .expect("allowed nesting should succeed");
    }
    // A record the directory holds beneath the company but outside its types.
    let stray = Target::new_space(TargetType::Person, profile("Stray"), &DefaultClock)
        .expect("person is a space");
    harness
        .directory
        .insert_target(&stray, Some(company.id()))
        .await
        .expect("raw insert should succeed");

    let children = harness
        .service
        .load_sub_team(company.id(), true)
        .await
        .expect("loading sub teams should succeed");

    assert_eq!(children.len(), 3);
    assert!(
        children
            .iter()
            .all(|child| company.sub_team_types().contains(&child.type_name()))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_sub_team_rejects_disallowed_nesting(harness: Harness) {
    let (_, company) = company_with_founder(&harness.service).await;

    let result = harness
        .service
        .create_sub_team(company.id(), TargetType::Cohort, profile("Friends"))
        .await;

    assert!(matches!(
        result,
        Err(HierarchyError::Domain(HierarchyDomainError::InvalidNesting {
            parent: TargetType::Company,
            child: TargetType::Cohort,
        }))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn load_sub_team_serves_cache_until_reload(harness: Harness) {
    let (_, company) = company_with_founder(&harness.service).await;
    harness
        .service
        .load_sub_team(company.id(), false)
        .await
        .expect("initial load should succeed");

    let external = company
        .spawn_child(TargetType::Department, profile("External"), &DefaultClock)
        .expect("company accepts departments");
    harness
        .directory
        .insert_target(&external, Some(company.id()))
        .await
        .expect("raw insert should succeed");

    let cached = harness
        .service
        .load_sub_team(company.id(), false)
        .await
        .expect("cached load should succeed");
    let fresh = harness
        .service
        .load_sub_team(company.id(), true)
        .await
        .expect("reload should succeed");

    assert!(cached.is_empty());
    assert_eq!(fresh.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_sub_team_cascades_descendants_and_identities(harness: Harness) {
    let (_, company) = company_with_founder(&harness.service).await;
    let ops = harness
        .service
        .create_sub_team(company.id(), TargetType::Department, profile("Ops"))
        .await
        .expect("department creation should succeed");
    let infra = harness
        .service
        .create_sub_team(ops.id(), TargetType::WorkingGroup, profile("Infra"))
        .await
        .expect("working group creation should succeed");
    let lead = harness
        .service
        .create_identity(infra.id(), IdentityParams::new("Lead", "lead").expect("valid"))
        .await
        .expect("identity creation should succeed");

    let outcome = harness
        .service
        .delete_sub_team(company.id(), ops.id())
        .await
        .expect("delete should succeed");

    assert_eq!(outcome, CommandOutcome::Applied);
    for id in [ops.id(), infra.id()] {
        assert!(matches!(
            harness.service.resolve(id).await,
            Err(HierarchyError::TargetNotFound(_))
        ));
    }
    let orphan = harness
        .directory
        .find_identity(lead.id())
        .await
        .expect("lookup should succeed");
    assert!(orphan.is_none());
    let remaining = harness
        .service
        .load_sub_team(company.id(), false)
        .await
        .expect("load should succeed");
    assert!(remaining.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_sub_team_distinguishes_absent_and_foreign_children(harness: Harness) {
    let (_, company) = company_with_founder(&harness.service).await;
    let (_, other_company) = company_with_founder(&harness.service).await;
    let foreign = harness
        .service
        .create_sub_team(other_company.id(), TargetType::Department, profile("Sales"))
        .await
        .expect("department creation should succeed");

    let absent = harness
        .service
        .delete_sub_team(company.id(), TargetId::new())
        .await
        .expect("delete should not fail");
    let denied = harness
        .service
        .delete_sub_team(company.id(), foreign.id())
        .await
        .expect("delete should not fail");

    assert_eq!(absent, CommandOutcome::NotFound);
    assert_eq!(denied, CommandOutcome::Denied);
    assert!(!absent.is_applied());
    assert!(harness.service.resolve(foreign.id()).await.is_ok());
}

/// Directory whose identity cascade fails from the given call onwards.
struct FlakyDirectory {
    inner: InMemoryDirectory,
    cascades: AtomicUsize,
    fail_from: usize,
}

#[async_trait]
impl DirectoryStore for FlakyDirectory {
    async fn insert_target(
        &self,
        target: &Target,
        parent: Option<TargetId>,
    ) -> DirectoryStoreResult<()> {
        self.inner.insert_target(target, parent).await
    }

    async fn update_target(&self, target: &Target) -> DirectoryStoreResult<()> {
        self.inner.update_target(target).await
    }

    async fn remove_target(&self, id: TargetId) -> DirectoryStoreResult<Option<Target>> {
        self.inner.remove_target(id).await
    }

    async fn find_target(&self, id: TargetId) -> DirectoryStoreResult<Option<Target>> {
        self.inner.find_target(id).await
    }

    async fn list_children(&self, parent: TargetId) -> DirectoryStoreResult<Vec<Target>> {
        self.inner.list_children(parent).await
    }

    async fn list_identities(&self, belong_id: TargetId) -> DirectoryStoreResult<Vec<Identity>> {
        self.inner.list_identities(belong_id).await
    }

    async fn find_identity(&self, id: IdentityId) -> DirectoryStoreResult<Option<Identity>> {
        self.inner.find_identity(id).await
    }

    async fn insert_identity(&self, identity: &Identity) -> DirectoryStoreResult<()> {
        self.inner.insert_identity(identity).await
    }

    async fn remove_identity(&self, id: IdentityId) -> DirectoryStoreResult<Option<Identity>> {
        self.inner.remove_identity(id).await
    }

    async fn remove_identities_of(&self, belong_id: TargetId) -> DirectoryStoreResult<usize> {
        let call = self.cascades.fetch_add(1, Ordering::SeqCst) + 1;
        if call >= self.fail_from {
            return Err(DirectoryStoreError::persistence(io::Error::other(
                "identity store offline",
            )));
        }
        self.inner.remove_identities_of(belong_id).await
    }

    async fn add_members(
        &self,
        team: TargetId,
        ids: &[TargetId],
        member_type: TargetType,
    ) -> DirectoryStoreResult<bool> {
        self.inner.add_members(team, ids, member_type).await
    }

    async fn remove_members(
        &self,
        team: TargetId,
        ids: &[TargetId],
        member_type: TargetType,
    ) -> DirectoryStoreResult<bool> {
        self.inner.remove_members(team, ids, member_type).await
    }

    async fn list_members(
        &self,
        team: TargetId,
        page: &PageRequest,
    ) -> DirectoryStoreResult<Page<Target>> {
        self.inner.list_members(team, page).await
    }

    async fn load_authority_tree(
        &self,
        space: TargetId,
    ) -> DirectoryStoreResult<Option<AuthorityNode>> {
        self.inner.load_authority_tree(space).await
    }

    async fn list_defines(&self, space: TargetId) -> DirectoryStoreResult<Vec<FlowDefine>> {
        self.inner.list_defines(space).await
    }

    async fn upsert_define(&self, define: &FlowDefine) -> DirectoryStoreResult<()> {
        self.inner.upsert_define(define).await
    }

    async fn remove_define(&self, id: DefineId) -> DirectoryStoreResult<Option<FlowDefine>> {
        self.inner.remove_define(id).await
    }

    async fn joined_markets(&self, target: TargetId) -> DirectoryStoreResult<Vec<MarketId>> {
        self.inner.joined_markets(target).await
    }

    async fn join_market(&self, target: TargetId, market: MarketId) -> DirectoryStoreResult<bool> {
        self.inner.join_market(target, market).await
    }

    async fn quit_market(&self, target: TargetId, market: MarketId) -> DirectoryStoreResult<bool> {
        self.inner.quit_market(target, market).await
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn interrupted_cascade_does_not_leave_deleted_children_cached() {
    let directory = Arc::new(FlakyDirectory {
        inner: InMemoryDirectory::new(),
        cascades: AtomicUsize::new(0),
        fail_from: 2,
    });
    let service = HierarchyService::new(Arc::clone(&directory), Arc::new(DefaultClock));
    let founder = service
        .register_person(profile("Alice"))
        .await
        .expect("person registration should succeed");
    let company = service
        .create_company(founder.id(), profile("Acme"))
        .await
        .expect("company creation should succeed");
    let ops = service
        .create_sub_team(company.id(), TargetType::Department, profile("Ops"))
        .await
        .expect("department creation should succeed");
    let infra = service
        .create_sub_team(ops.id(), TargetType::WorkingGroup, profile("Infra"))
        .await
        .expect("working group creation should succeed");
    let cached = service
        .load_sub_team(company.id(), false)
        .await
        .expect("load should succeed");
    assert_eq!(cached.len(), 1);

    let result = service.delete_sub_team(company.id(), ops.id()).await;

    assert!(matches!(
        result,
        Err(HierarchyError::Store(DirectoryStoreError::Persistence(_)))
    ));
    let remaining = service
        .load_sub_team(company.id(), false)
        .await
        .expect("load should succeed");
    assert!(remaining.is_empty());
    assert!(service.resolve(infra.id()).await.is_ok());
}

// ── Identities ──────────────────────────────────────────────────────

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn identities_are_scoped_to_their_owner(harness: Harness) {
    let (_, company) = company_with_founder(&harness.service).await;
    let (_, other_company) = company_with_founder(&harness.service).await;
    let manager = harness
        .service
        .create_identity(company.id(), IdentityParams::new("Manager", "mgr").expect("valid"))
        .await
        .expect("identity creation should succeed");

    let foreign = harness
        .service
        .delete_identity(other_company.id(), manager.id())
        .await
        .expect("delete should not fail");
    let missing = harness
        .service
        .delete_identity(company.id(), IdentityId::new())
        .await
        .expect("delete should not fail");

    assert_eq!(foreign, CommandOutcome::Denied);
    assert_eq!(missing, CommandOutcome::NotFound);
    assert!(
        harness
            .service
            .judge_has_identity(company.id(), manager.id())
            .await
            .expect("lookup should succeed")
    );

    let applied = harness
        .service
        .delete_identity(company.id(), manager.id())
        .await
        .expect("delete should succeed");
    assert!(applied.is_applied());
    let identities = harness
        .service
        .get_identities(company.id())
        .await
        .expect("listing should succeed");
    assert!(identities.is_empty());
}

// ── Membership ──────────────────────────────────────────────────────

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pull_members_is_all_or_nothing(harness: Harness) {
    let (founder, company) = company_with_founder(&harness.service).await;
    let bob = harness
        .service
        .register_person(profile("Bob"))
        .await
        .expect("registration should succeed");

    let mixed = harness
        .service
        .pull_members(company.id(), &[bob.id(), company.id()], TargetType::Person)
        .await
        .expect("command should be sent");
    let page = harness
        .service
        .load_members(company.id(), PageRequest::new(0, 50))
        .await
        .expect("listing should succeed");
    assert!(!mixed);
    assert_eq!(page.total, 1);

    let pulled = harness
        .service
        .pull_member(company.id(), &bob)
        .await
        .expect("command should be sent");
    assert!(pulled);
    let bob_now = harness.service.resolve(bob.id()).await.expect("bob exists");
    assert_eq!(
        bob_now.extension(),
        &crate::target::domain::TargetExtension::Person {
            joined_companies: vec![company.id()]
        }
    );

    let removed = harness
        .service
        .remove_members(company.id(), &[founder.id(), bob.id()], TargetType::Person)
        .await
        .expect("command should be sent");
    assert!(removed);
    let empty = harness
        .service
        .pull_members(company.id(), &[], TargetType::Person)
        .await
        .expect("command should be sent");
    assert!(!empty);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn load_members_caps_limit_and_filters() {
    let directory = Arc::new(InMemoryDirectory::new());
    let service = HierarchyService::with_config(
        Arc::clone(&directory),
        Arc::new(DefaultClock),
        OrgworkConfig::default().with_member_page_limit(2),
    );
    let (_, company) = company_with_founder(&service).await;
    for name in ["Bob", "Bea", "Carl"] {
        let person = service
            .register_person(profile(name))
            .await
            .expect("registration should succeed");
        service
            .pull_member(company.id(), &person)
            .await
            .expect("pull should be sent");
    }

    let capped = service
        .load_members(company.id(), PageRequest::new(0, 100))
        .await
        .expect("listing should succeed");
    let filtered = service
        .load_members(company.id(), PageRequest::new(0, 100).with_filter("b"))
        .await
        .expect("listing should succeed");

    assert_eq!(capped.total, 4);
    assert_eq!(capped.items.len(), 2);
    assert_eq!(capped.limit, 2);
    assert_eq!(filtered.total, 2);
}

// ── Authority tree ──────────────────────────────────────────────────

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn select_authority_tree_annotates_relative_to_belong_id(harness: Harness) {
    let (_, company) = company_with_founder(&harness.service).await;
    let ops = harness
        .service
        .create_sub_team(company.id(), TargetType::Department, profile("Ops"))
        .await
        .expect("department creation should succeed");
    let owned = AuthorityNode::new("Clerk", "clerk", Some(company.id()));
    let foreign = AuthorityNode::new("Auditor", "auditor", Some(ops.id()));
    let tree = AuthorityNode::new("Admin", "admin", Some(company.id()))
        .with_child(owned.clone())
        .with_child(foreign.clone());
    harness
        .directory
        .set_authority_tree(company.id(), tree)
        .expect("seeding should succeed");

    let for_ops = harness
        .service
        .select_authority_tree(ops.id(), false)
        .await
        .expect("select should succeed")
        .expect("tree exists");
    let relative = harness
        .service
        .authority_tree_for(company.id(), ops.id())
        .await
        .expect("select should succeed")
        .expect("tree exists");

    // The department's belong_id is the company.
    assert!(!for_ops.find(owned.id()).expect("present").disabled());
    assert!(for_ops.find(foreign.id()).expect("present").disabled());
    assert!(relative.find(owned.id()).expect("present").disabled());
    assert!(!relative.find(foreign.id()).expect("present").disabled());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn authority_tree_is_unsupported_for_leaf_teams(harness: Harness) {
    let (_, company) = company_with_founder(&harness.service).await;
    let squad = harness
        .service
        .create_sub_team(company.id(), TargetType::WorkingGroup, profile("Squad"))
        .await
        .expect("working group creation should succeed");

    let result = harness.service.select_authority_tree(squad.id(), true).await;

    assert!(matches!(
        result,
        Err(HierarchyError::Domain(HierarchyDomainError::Unsupported { .. }))
    ));
}

// ── Space bindings ──────────────────────────────────────────────────

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn flow_definitions_publish_list_and_delete(harness: Harness) {
    let (_, company) = company_with_founder(&harness.service).await;
    let define = harness
        .service
        .publish_define(
            company.id(),
            PublishDefineParams::new("Leave request", "leave").expect("valid"),
        )
        .await
        .expect("publish should succeed");

    let listed = harness
        .service
        .get_defines(company.id(), false)
        .await
        .expect("listing should succeed");
    assert_eq!(listed, vec![define.clone()]);

    let deleted = harness
        .service
        .delete_define(company.id(), define.id())
        .await
        .expect("delete should succeed");
    let again = harness
        .service
        .delete_define(company.id(), define.id())
        .await
        .expect("delete should not fail");
    assert_eq!(deleted, CommandOutcome::Applied);
    assert_eq!(again, CommandOutcome::NotFound);
    assert!(
        harness
            .service
            .get_defines(company.id(), true)
            .await
            .expect("listing should succeed")
            .is_empty()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn market_membership_round_trip(harness: Harness) {
    let (founder, _) = company_with_founder(&harness.service).await;
    let market = MarketId::new();

    let joined = harness
        .service
        .apply_join_market(founder.id(), market)
        .await
        .expect("join should succeed");
    let rejoined = harness
        .service
        .apply_join_market(founder.id(), market)
        .await
        .expect("join should not fail");
    let markets = harness
        .service
        .joined_markets(founder.id())
        .await
        .expect("listing should succeed");
    let quit = harness
        .service
        .quit_market(founder.id(), market)
        .await
        .expect("quit should succeed");

    assert!(joined);
    assert!(!rejoined);
    assert_eq!(markets, vec![market]);
    assert!(quit);
}
