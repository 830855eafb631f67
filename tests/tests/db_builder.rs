use linkrow::{schema, Cascade, Db, Entity, Relation, Resolution, Table, Type};
use tests::{builder, movie, DbTest};

#[tokio::test]
async fn connect_by_url() {
    tests::init_tracing();

    let mut db = builder().connect("sqlite::memory:").await.unwrap();
    db.push_schema().await.unwrap();

    let mut alien = movie("Alien", 1979);
    db.save(&mut alien).await.unwrap();
    assert!(alien.get_i64("id").is_some());
}

#[tokio::test]
async fn unsupported_url_scheme_is_rejected() {
    let err = builder()
        .connect("oracle://localhost/movies")
        .await
        .unwrap_err();
    assert!(err.is_invalid_connection_url(), "{err}");
}

fn with_dangling_relation() -> schema::Model {
    schema::Model::new(
        "Review",
        Table::new("ss_review")
            .id("id")
            .column("body", Type::String)
            .column("modify_date", Type::DateTime),
    )
    .relation(Relation::many_to_many("critics", "Critic").cascade(Cascade::ALL))
}

#[tokio::test]
async fn unresolvable_relation_fails_the_build_by_default() {
    let mut builder = Db::builder();
    builder.model(with_dangling_relation());

    let err = builder.build_schema().unwrap_err();
    assert!(err.is_invalid_schema(), "{err}");
}

#[tokio::test]
async fn fail_open_drops_the_relation() {
    let mut builder = Db::builder();
    builder
        .model(with_dangling_relation())
        .resolution(Resolution::FailOpen);

    let mut test = DbTest::with_builder(&mut builder).await;
    assert!(test.db.schema().relations("Review").is_empty());

    let mut review = Entity::new("Review")
        .with("body", "Holds up")
        .with_many("critics", vec![Entity::new("Critic")]);
    test.db.save(&mut review).await.unwrap();

    assert_eq!(test.log().writes(), 1);
}

#[tokio::test]
async fn custom_timestamp_columns() {
    let mut builder = Db::builder();
    builder
        .model(schema::Model::new(
            "Article",
            Table::new("ss_article")
                .id("id")
                .column("title", Type::String)
                .column("created_at", Type::Timestamp)
                .column("updated_at", Type::Timestamp),
        ))
        .timestamp_columns("created_at", "updated_at");

    let mut test = DbTest::with_builder(&mut builder).await;

    let mut article = Entity::new("Article").with("title", "Draft");
    test.db.save(&mut article).await.unwrap();
    assert!(!article.get("created_at").unwrap().is_null());

    article.set("title", "Final");
    article.remove("updated_at");
    test.db.update(&mut article).await.unwrap();
    assert!(article.contains("updated_at"));
}
