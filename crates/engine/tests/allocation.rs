use sea_orm::{ConnectionTrait, Database, Statement};

use engine::{Engine, EngineError, ProjectUpdate};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password, is_superuser) VALUES (?, ?, ?)",
        vec!["alice".into(), "password".into(), false.into()],
    ))
    .await
    .unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

#[tokio::test]
async fn donation_fills_oldest_project_first() {
    let engine = engine_with_db().await;

    let first = engine
        .create_project("Shelter roof", "Fix the roof", 300)
        .await
        .unwrap();
    let second = engine
        .create_project("Winter food", "Food stock for winter", 800)
        .await
        .unwrap();

    let donation = engine
        .create_donation("alice", 1000, Some("for the cats"))
        .await
        .unwrap();

    assert_eq!(donation.funding.allocated_amount, 1000);
    assert!(donation.funding.fully_funded);
    assert!(donation.funding.closed_at.is_some());

    let first = engine.project(first.id).await.unwrap();
    assert_eq!(first.funding.allocated_amount, 300);
    assert!(first.funding.fully_funded);

    let second = engine.project(second.id).await.unwrap();
    assert_eq!(second.funding.allocated_amount, 700);
    assert!(!second.funding.fully_funded);
    assert!(second.funding.closed_at.is_none());
}

#[tokio::test]
async fn new_project_pulls_from_open_donations() {
    let engine = engine_with_db().await;

    engine.create_donation("alice", 300, None).await.unwrap();
    engine.create_donation("alice", 800, None).await.unwrap();

    let project = engine
        .create_project("Vet bills", "Emergency care fund", 1000)
        .await
        .unwrap();

    assert_eq!(project.funding.allocated_amount, 1000);
    assert!(project.funding.fully_funded);

    let donations = engine.list_donations().await.unwrap();
    assert_eq!(donations.len(), 2);
    assert_eq!(donations[0].funding.allocated_amount, 300);
    assert!(donations[0].funding.fully_funded);
    assert_eq!(donations[1].funding.allocated_amount, 700);
    assert!(!donations[1].funding.fully_funded);
}

#[tokio::test]
async fn donation_without_open_projects_stays_open() {
    let engine = engine_with_db().await;

    let donation = engine.create_donation("alice", 500, None).await.unwrap();

    assert_eq!(donation.funding.allocated_amount, 0);
    assert!(!donation.funding.fully_funded);
    assert!(donation.funding.closed_at.is_none());
}

#[tokio::test]
async fn duplicate_project_name_is_rejected() {
    let engine = engine_with_db().await;

    engine
        .create_project("Shelter roof", "Fix the roof", 300)
        .await
        .unwrap();
    let err = engine
        .create_project("Shelter roof", "Again", 500)
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::ExistingKey("Shelter roof".to_string()));
}

#[tokio::test]
async fn nonpositive_amounts_are_rejected() {
    let engine = engine_with_db().await;

    let err = engine.create_donation("alice", 0, None).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .create_project("Shelter roof", "Fix the roof", -5)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn blank_text_fields_are_rejected() {
    let engine = engine_with_db().await;

    let err = engine
        .create_project("  ", "Fix the roof", 300)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidField("project name must not be empty".to_string())
    );

    let err = engine
        .create_project("Shelter roof", "", 300)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidField("description must not be empty".to_string())
    );

    let err = engine
        .create_project(&"x".repeat(101), "Fix the roof", 300)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidField(_)));
}

#[tokio::test]
async fn target_cannot_drop_below_allocated() {
    let engine = engine_with_db().await;

    let project = engine
        .create_project("Vet bills", "Emergency care fund", 1000)
        .await
        .unwrap();
    engine.create_donation("alice", 400, None).await.unwrap();

    let err = engine
        .update_project(
            project.id,
            ProjectUpdate {
                target_amount: Some(300),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn lowering_target_to_allocated_closes_the_project() {
    let engine = engine_with_db().await;

    let project = engine
        .create_project("Vet bills", "Emergency care fund", 1000)
        .await
        .unwrap();
    engine.create_donation("alice", 400, None).await.unwrap();

    let project = engine
        .update_project(
            project.id,
            ProjectUpdate {
                target_amount: Some(400),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(project.funding.fully_funded);
    assert!(project.funding.closed_at.is_some());
    assert_eq!(project.funding.allocated_amount, 400);
}

#[tokio::test]
async fn leftover_donation_funds_the_next_project() {
    let engine = engine_with_db().await;

    let project = engine
        .create_project("Vet bills", "Emergency care fund", 300)
        .await
        .unwrap();
    // Fills the project (300) and leaves 700 outstanding.
    engine.create_donation("alice", 1000, None).await.unwrap();

    let open = engine
        .create_project("Winter food", "Food stock", 200)
        .await
        .unwrap();
    assert_eq!(open.funding.allocated_amount, 200);

    let project = engine.project(project.id).await.unwrap();
    assert!(project.funding.fully_funded);

    let donations = engine.list_donations().await.unwrap();
    assert_eq!(donations[0].funding.allocated_amount, 500);
    assert!(!donations[0].funding.fully_funded);
}

#[tokio::test]
async fn closed_project_rejects_updates() {
    let engine = engine_with_db().await;

    let project = engine
        .create_project("Vet bills", "Emergency care fund", 300)
        .await
        .unwrap();
    engine.create_donation("alice", 300, None).await.unwrap();

    let err = engine
        .update_project(
            project.id,
            ProjectUpdate {
                description: Some("new description".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::ClosedEntity("Vet bills".to_string()));
}

#[tokio::test]
async fn delete_is_limited_to_untouched_open_projects() {
    let engine = engine_with_db().await;

    let funded = engine
        .create_project("Vet bills", "Emergency care fund", 1000)
        .await
        .unwrap();
    engine.create_donation("alice", 400, None).await.unwrap();

    let err = engine.delete_project(funded.id).await.unwrap_err();
    assert_eq!(err, EngineError::HasAllocations("Vet bills".to_string()));

    let fresh = engine
        .create_project("Winter food", "Food stock", 200)
        .await
        .unwrap();
    engine.delete_project(fresh.id).await.unwrap();

    let err = engine.project(fresh.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn donations_are_listed_per_user() {
    let engine = engine_with_db().await;

    engine.create_donation("alice", 100, None).await.unwrap();
    engine
        .create_donation("alice", 200, Some("second"))
        .await
        .unwrap();

    let own = engine.donations_for_user("alice").await.unwrap();
    assert_eq!(own.len(), 2);
    assert_eq!(own[0].funding.target_amount, 100);
    assert_eq!(own[1].funding.target_amount, 200);

    let none = engine.donations_for_user("bob").await.unwrap();
    assert!(none.is_empty());
}

// Two engines over the same database can both read the same open set before
// either commits; nothing in the schema (no version column, no row locks)
// prevents the combined allocations from overshooting a shared target. The
// sequential path below is the guaranteed behavior; overlap safety is
// delegated to the store's transaction isolation.
#[tokio::test]
async fn sequential_allocations_never_overshoot() {
    let engine = engine_with_db().await;

    let project = engine
        .create_project("Vet bills", "Emergency care fund", 500)
        .await
        .unwrap();

    engine.create_donation("alice", 400, None).await.unwrap();
    engine.create_donation("alice", 400, None).await.unwrap();

    let project = engine.project(project.id).await.unwrap();
    assert_eq!(project.funding.allocated_amount, 500);
    assert!(project.funding.fully_funded);

    let donations = engine.list_donations().await.unwrap();
    assert_eq!(donations[0].funding.allocated_amount, 400);
    assert_eq!(donations[1].funding.allocated_amount, 100);
}
