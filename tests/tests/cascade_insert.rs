use linkrow::{schema, Cascade, Entity, Relation, Table, Type, Value};
use tests::{actor, builder, movie, poster, DbTest};

#[tokio::test]
async fn save_inserts_related_and_links_them() {
    let mut test = DbTest::new().await;

    let mut alien = movie("Alien", 1979)
        .with_many("posters", vec![poster("a.jpg"), poster("b.jpg")])
        .with_many("actors", vec![actor("Sigourney Weaver")]);

    test.db.save(&mut alien).await.unwrap();

    let id = alien.get_i64("id").expect("generated key written back");
    for poster in alien.related("posters").unwrap().iter() {
        assert!(poster.get_i64("id").is_some());
        assert!(!poster.get("create_date").unwrap().is_null());
    }

    assert!(!alien.get("create_date").unwrap().is_null());
    assert!(!alien.get("modify_date").unwrap().is_null());

    assert_eq!(test.all("Poster").await.len(), 2);
    assert_eq!(test.linked_ids(&alien, "posters").await.len(), 2);
    assert_eq!(test.linked_ids(&alien, "actors").await.len(), 1);

    let stored = test.db.find_by_id("Movie", id).await.unwrap().unwrap();
    assert_eq!(stored.get_str("name"), Some("Alien"));
    assert_eq!(stored.get("year"), Some(&Value::I32(1979)));
}

#[tokio::test]
async fn save_links_already_persisted_entities_without_reinserting() {
    let mut test = DbTest::new().await;

    let mut shared = poster("shared.jpg");
    test.db.save(&mut shared).await.unwrap();

    let mut alien = movie("Alien", 1979).with_many("posters", vec![shared.clone()]);
    let mut aliens = movie("Aliens", 1986).with_many("posters", vec![shared.clone()]);
    test.db.save(&mut alien).await.unwrap();
    test.db.save(&mut aliens).await.unwrap();

    assert_eq!(test.all("Poster").await.len(), 1);

    let shared_id = shared.get_i64("id").unwrap();
    assert_eq!(test.linked_ids(&alien, "posters").await, [shared_id]);
    assert_eq!(test.linked_ids(&aliens, "posters").await, [shared_id]);
}

#[tokio::test]
async fn save_without_related_inserts_one_row() {
    let mut test = DbTest::new().await;
    let mut log = test.log();
    log.clear();

    let mut note = Entity::new("Note").with("body", "no timestamps here");
    test.db.save(&mut note).await.unwrap();

    assert_eq!(log.writes(), 1);
    assert_eq!(log.inserts(), 1);
    assert!(note.get_i64("id").is_some());
    assert!(!note.contains("create_date"));
}

#[tokio::test]
async fn related_entity_of_the_wrong_model_is_rejected() {
    let mut test = DbTest::new().await;

    let mut alien = movie("Alien", 1979).with_many("posters", vec![actor("not a poster")]);
    let err = test.db.save(&mut alien).await.unwrap_err();

    assert!(err.is_usage(), "{err}");
    assert!(test.all("Movie").await.is_empty());
}

fn book() -> schema::Model {
    schema::Model::new(
        "Book",
        Table::new("ss_book").id("id").column("title", Type::String),
    )
    .relation(Relation::one_to_one("cover", "Poster").cascade(Cascade::ALL))
}

#[tokio::test]
async fn single_valued_relation_holds_one_entity() {
    let mut builder = builder();
    builder.model(book());
    let mut test = DbTest::with_builder(&mut builder).await;

    let mut dune = Entity::new("Book")
        .with("title", "Dune")
        .with_many("cover", vec![poster("a.jpg"), poster("b.jpg")]);
    let err = test.db.save(&mut dune).await.unwrap_err();

    assert!(err.is_usage(), "{err}");
    assert!(test.all("Book").await.is_empty());
    assert!(test.all("Poster").await.is_empty());

    dune.set_one("cover", poster("a.jpg"));
    test.db.save(&mut dune).await.unwrap();
    assert_eq!(test.linked_ids(&dune, "cover").await.len(), 1);

    let mut extra = [poster("b.jpg"), poster("c.jpg")];
    let err = test.db.link_all(&dune, "cover", &mut extra).await.unwrap_err();
    assert!(err.is_usage(), "{err}");
}

#[tokio::test]
async fn unknown_column_is_rejected() {
    let mut test = DbTest::new().await;

    let mut alien = movie("Alien", 1979).with("rating", 5);
    let err = test.db.save(&mut alien).await.unwrap_err();

    assert!(err.is_usage(), "{err}");
    assert!(test.all("Movie").await.is_empty());
}
