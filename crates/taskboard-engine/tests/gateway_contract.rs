//! Call-count contracts between the session and its collaborators.

use async_trait::async_trait;
use chrono::Utc;
use mockall::mock;
use mockall::predicate::eq;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use taskboard_core::{BoardConfig, TaskboardResult};
use taskboard_domain::{
    BoardGateway, Card, CardId, CardPriority, CardStatus, CardUpdate, Comment, CommentId,
    IdentityProvider, LayoutMetrics, NameResolver, NewCard, NewComment, ProjectId, UserId,
};
use taskboard_engine::BoardSession;
use uuid::Uuid;

mock! {
    pub Gateway {}

    #[async_trait]
    impl BoardGateway for Gateway {
        async fn fetch_cards(&self, project_id: ProjectId) -> TaskboardResult<Vec<Card>>;
        async fn create_card(&self, card: NewCard) -> TaskboardResult<Card>;
        async fn update_card(&self, id: CardId, fields: CardUpdate) -> TaskboardResult<()>;
        async fn delete_card(&self, id: CardId) -> TaskboardResult<()>;
        async fn fetch_comments(&self, card_id: CardId) -> TaskboardResult<Vec<Comment>>;
        async fn create_comment(&self, comment: NewComment) -> TaskboardResult<Comment>;
        async fn delete_comment(&self, id: CommentId) -> TaskboardResult<()>;
    }
}

mock! {
    pub Resolver {}

    #[async_trait]
    impl NameResolver for Resolver {
        async fn resolve_names(&self, ids: &[UserId]) -> TaskboardResult<HashMap<UserId, String>>;
    }
}

struct FixedUser(Option<UserId>);

impl IdentityProvider for FixedUser {
    fn current_user(&self) -> Option<UserId> {
        self.0
    }
}

fn card(project: ProjectId, name: &str, status: CardStatus) -> Card {
    Card {
        id: Uuid::new_v4(),
        project_id: project,
        name: name.to_string(),
        description: String::new(),
        priority: CardPriority::Medium,
        tags: BTreeSet::new(),
        status,
        created_by: Uuid::new_v4(),
        created_at: Utc::now(),
    }
}

fn comment(card_id: CardId, author: UserId) -> Comment {
    Comment {
        id: Uuid::new_v4(),
        card_id,
        author,
        text: "looks good".into(),
        created_at: Utc::now(),
    }
}

fn session(project: ProjectId, gateway: MockGateway, resolver: MockResolver) -> BoardSession {
    BoardSession::new(
        project,
        Arc::new(gateway),
        Arc::new(FixedUser(Some(Uuid::new_v4()))),
        Arc::new(resolver),
        &BoardConfig::default(),
    )
}

#[tokio::test]
async fn test_cross_column_drop_sends_one_status_update() {
    let project = Uuid::new_v4();
    let a = card(project, "a", CardStatus::Todo);
    let b = card(project, "b", CardStatus::InProgress);
    let a_id = a.id;
    let cards = vec![a, b];

    let mut gateway = MockGateway::new();
    gateway
        .expect_fetch_cards()
        .with(eq(project))
        .times(1)
        .returning(move |_| Ok(cards.clone()));
    gateway
        .expect_update_card()
        .with(eq(a_id), eq(CardUpdate::status(CardStatus::Done)))
        .times(1)
        .returning(|_, _| Ok(()));

    let mut session = session(project, gateway, MockResolver::new());
    session.refresh().await.unwrap();

    let layout = session.layout(LayoutMetrics::default());
    let start = layout.card_region(a_id).unwrap().rect.center();
    let done = layout.column_region(CardStatus::Done).unwrap().rect.center();
    session.press(a_id, start);
    session.pointer_move(done, &layout);
    session.release(done, &layout).await.unwrap();
    session.settle().await.unwrap();

    let statuses: Vec<CardStatus> = session.store().cards().iter().map(|c| c.status).collect();
    assert_eq!(statuses, vec![CardStatus::Done, CardStatus::InProgress]);
}

#[tokio::test]
async fn test_origin_drop_sends_nothing() {
    let project = Uuid::new_v4();
    let a = card(project, "a", CardStatus::InProgress);
    let a_id = a.id;

    let mut gateway = MockGateway::new();
    gateway
        .expect_fetch_cards()
        .times(1)
        .returning(move |_| Ok(vec![a.clone()]));
    gateway.expect_update_card().times(0);

    let mut session = session(project, gateway, MockResolver::new());
    session.refresh().await.unwrap();

    let layout = session.layout(LayoutMetrics::default());
    let start = layout.card_region(a_id).unwrap().rect.center();
    let own_column = layout
        .column_region(CardStatus::InProgress)
        .unwrap()
        .rect
        .center();
    session.press(a_id, start);
    session.pointer_move(own_column, &layout);
    session.release(own_column, &layout).await.unwrap();
    session.settle().await.unwrap();

    assert_eq!(session.pending_syncs(), 0);
}

#[tokio::test]
async fn test_author_names_requested_once_per_session() {
    let project = Uuid::new_v4();
    let a = card(project, "a", CardStatus::Todo);
    let a_id = a.id;
    let known = Uuid::new_v4();
    let unknown = Uuid::new_v4();
    let thread = vec![comment(a_id, known), comment(a_id, unknown), comment(a_id, known)];

    let mut gateway = MockGateway::new();
    gateway
        .expect_fetch_cards()
        .returning(move |_| Ok(vec![a.clone()]));
    gateway
        .expect_fetch_comments()
        .with(eq(a_id))
        .times(2)
        .returning(move |_| Ok(thread.clone()));

    let mut resolver = MockResolver::new();
    resolver
        .expect_resolve_names()
        .withf(move |ids| ids.len() == 2 && ids.contains(&known) && ids.contains(&unknown))
        .times(1)
        .returning(move |_| Ok(HashMap::from([(known, "Grace".to_string())])));

    let mut session = session(project, gateway, resolver);
    session.refresh().await.unwrap();
    session.open_card(a_id).await.unwrap();
    session.close_card();
    session.open_card(a_id).await.unwrap();

    assert_eq!(session.author_name(known), "Grace");
    assert_eq!(session.author_name(unknown), unknown.to_string()[..8]);
}

#[tokio::test]
async fn test_closed_card_fetches_no_comments() {
    let project = Uuid::new_v4();
    let a = card(project, "a", CardStatus::Todo);

    let mut gateway = MockGateway::new();
    gateway
        .expect_fetch_cards()
        .returning(move |_| Ok(vec![a.clone()]));
    gateway.expect_fetch_comments().times(0);

    let mut session = session(project, gateway, MockResolver::new());
    session.refresh().await.unwrap();
    session.refresh_comments().await.unwrap();
    assert!(session.comments().is_empty());
}
