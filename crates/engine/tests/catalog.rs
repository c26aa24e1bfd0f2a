use sea_orm::Database;

use engine::{
    CompanyNew, Engine, EngineError, ListQuery, Money, ProductNew, ProductPatch, UserNew,
    UserPatch,
};
use migration::MigratorTrait;

async fn engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

#[tokio::test]
async fn product_crud() {
    let engine = engine().await;

    let product = engine
        .create_product(
            ProductNew::new("  Widget ", 10, Money::new(5_00))
                .description("A widget")
                .photo("photos/widget.png"),
        )
        .await
        .unwrap();
    assert_eq!(product.name, "Widget");
    assert_eq!(product.photo.as_deref(), Some("photos/widget.png"));

    let updated = engine
        .update_product(
            product.id,
            ProductPatch {
                quantity: Some(4),
                photo: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.quantity, 4);
    assert_eq!(updated.photo, None);
    assert_eq!(updated.description, "A widget");

    engine.delete_product(product.id).await.unwrap();
    assert_eq!(
        engine.product(product.id).await.unwrap_err(),
        EngineError::KeyNotFound("product not exists".to_string())
    );
}

#[tokio::test]
async fn product_validation() {
    let engine = engine().await;

    let err = engine
        .create_product(ProductNew::new("", 1, Money::new(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let err = engine
        .create_product(ProductNew::new("Widget", -1, Money::new(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidQuantity(_)));

    let err = engine
        .create_product(ProductNew::new("Widget", 1, Money::new(-1)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn list_products_search_and_order() {
    let engine = engine().await;
    for name in ["Bolt", "Anchor", "Big bolt"] {
        engine
            .create_product(ProductNew::new(name, 1, Money::new(1_00)))
            .await
            .unwrap();
    }

    let bolts = engine
        .list_products(&ListQuery::default().search("bolt"))
        .await
        .unwrap();
    assert_eq!(bolts.len(), 2);

    let names: Vec<String> = engine
        .list_products(&ListQuery::default().ordering("-name"))
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, ["Bolt", "Big bolt", "Anchor"]);
}

#[tokio::test]
async fn ledger_company_is_created_once() {
    let engine = engine().await;

    let company = engine.create_ledger_company("Acme").await.unwrap();
    assert!(company.is_ledger());
    assert_eq!(company.total_revenue, Money::ZERO);

    let err = engine.create_ledger_company("Other").await.unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("ledger company".to_string()));
}

#[tokio::test]
async fn company_financials_expose_revenue() {
    let engine = engine().await;
    let mut cmd = CompanyNew::new("Acme");
    cmd.total_revenue = Money::new(12_34);
    let company = engine.create_company(cmd).await.unwrap();

    let financial = engine.company_financial(company.id).await.unwrap();
    assert_eq!(financial.total_revenue, Money::new(12_34));
    assert_eq!(engine.company_financials().await.unwrap().len(), 1);

    engine.delete_company(company.id).await.unwrap();
    assert!(matches!(
        engine.delete_company(company.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn users_authenticate_with_hashed_password() {
    let engine = engine().await;

    let user = engine
        .create_user(UserNew::new("alice", "alice@example.com", "password"))
        .await
        .unwrap();
    assert!(!user.is_staff);

    let found = engine.authenticate("alice", "password").await.unwrap();
    assert_eq!(found, Some(user.clone()));
    assert_eq!(engine.authenticate("alice", "nope").await.unwrap(), None);
    assert_eq!(engine.authenticate("bob", "password").await.unwrap(), None);

    engine
        .update_user(
            user.id,
            UserPatch {
                password: Some("changed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(engine.authenticate("alice", "password").await.unwrap(), None);
    assert!(engine.authenticate("alice", "changed").await.unwrap().is_some());
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let engine = engine().await;
    engine
        .create_user(UserNew::new("alice", "", "password"))
        .await
        .unwrap();
    let bob = engine
        .create_user(UserNew::new("bob", "", "password").staff())
        .await
        .unwrap();
    assert!(bob.is_staff);

    let err = engine
        .create_user(UserNew::new("alice", "", "other"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("alice".to_string()));

    let err = engine
        .update_user(
            bob.id,
            UserPatch {
                username: Some("alice".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("alice".to_string()));
}
