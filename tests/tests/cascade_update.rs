use linkrow::{schema, Cascade, Entity, Relation, Table, Type, UpdatePolicy};
use tests::{actor, builder, movie, poster, DbTest};

async fn saved_movie(test: &mut DbTest) -> Entity {
    let mut alien = movie("Alien", 1979)
        .with_many("posters", vec![poster("a.jpg"), poster("b.jpg")])
        .with_many("actors", vec![actor("Sigourney Weaver")]);
    test.db.save(&mut alien).await.unwrap();
    alien
}

#[tokio::test]
async fn update_replaces_associations_and_keeps_old_rows() {
    let mut test = DbTest::new().await;
    let mut alien = saved_movie(&mut test).await;

    alien.set("name", "Alien (Director's Cut)");
    alien.set_many("posters", vec![poster("c.jpg")]);
    test.db.update(&mut alien).await.unwrap();

    let linked = test.linked_ids(&alien, "posters").await;
    let new_id = alien.related("posters").unwrap().iter().next().unwrap().get_i64("id");
    assert_eq!(linked.len(), 1);
    assert_eq!(Some(linked[0]), new_id);

    // Unlinked posters stay in their table
    assert_eq!(test.all("Poster").await.len(), 3);

    // Relations left unset keep their associations
    assert_eq!(test.linked_ids(&alien, "actors").await.len(), 1);

    let id = alien.get_i64("id").unwrap();
    let stored = test.db.find_by_id("Movie", id).await.unwrap().unwrap();
    assert_eq!(stored.get_str("name"), Some("Alien (Director's Cut)"));
}

#[tokio::test]
async fn delete_related_policy_removes_previous_rows() {
    let mut test = DbTest::new().await;
    let mut alien = saved_movie(&mut test).await;

    alien.set_many("posters", vec![poster("c.jpg")]);
    test.db
        .update_with(&mut alien, UpdatePolicy::DeleteRelated)
        .await
        .unwrap();

    let posters = test.all("Poster").await;
    assert_eq!(posters.len(), 1);
    assert_eq!(posters[0].get_str("url"), Some("c.jpg"));
    assert_eq!(test.linked_ids(&alien, "posters").await.len(), 1);

    // `actors` still held the saved actor; its row is written back under the
    // same id and linked again
    let actor_id = alien.related("actors").unwrap().iter().next().unwrap().get_i64("id");
    let actors = test.all("MovieMan").await;
    assert_eq!(actors.len(), 1);
    assert_eq!(actors[0].get_i64("id"), actor_id);
    assert_eq!(actors[0].get_str("name"), Some("Sigourney Weaver"));
    assert_eq!(test.linked_ids(&alien, "actors").await, actor_id.into_iter().collect::<Vec<_>>());
}

#[tokio::test]
async fn delete_related_policy_rewrites_held_entities_after_save() {
    let mut test = DbTest::new().await;
    let mut alien = saved_movie(&mut test).await;
    let linked = test.linked_ids(&alien, "posters").await;

    alien.set("year", 1980);
    test.db
        .update_with(&mut alien, UpdatePolicy::DeleteRelated)
        .await
        .unwrap();

    assert_eq!(test.all("Poster").await.len(), 2);
    assert_eq!(test.linked_ids(&alien, "posters").await, linked);
    assert_eq!(test.all("MovieMan").await.len(), 1);
}

fn series() -> schema::Model {
    schema::Model::new(
        "Series",
        Table::new("ss_series")
            .id("id")
            .column("name", Type::String)
            .column("modify_date", Type::DateTime),
    )
    .relation(
        Relation::one_to_many("stills", "Poster")
            .cascade(Cascade::ALL)
            .on_update(UpdatePolicy::DeleteRelated),
    )
}

#[tokio::test]
async fn relation_policy_applies_unless_overridden() {
    let mut builder = builder();
    builder.model(series());
    let mut test = DbTest::with_builder(&mut builder).await;

    let mut lost = Entity::new("Series")
        .with("name", "Lost")
        .with_many("stills", vec![poster("a.jpg"), poster("b.jpg")]);
    test.db.save(&mut lost).await.unwrap();

    lost.set_many("stills", vec![poster("c.jpg")]);
    test.db.update(&mut lost).await.unwrap();

    let stored = test.all("Poster").await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].get_str("url"), Some("c.jpg"));

    // Overriding per call keeps the previous rows
    lost.set_many("stills", vec![poster("d.jpg")]);
    test.db
        .update_with(&mut lost, UpdatePolicy::UnlinkOnly)
        .await
        .unwrap();

    assert_eq!(test.all("Poster").await.len(), 2);
    assert_eq!(test.linked_ids(&lost, "stills").await.len(), 1);
}

#[tokio::test]
async fn unlink_count_mismatch_fails() {
    let mut test = DbTest::new().await;
    let mut alien = saved_movie(&mut test).await;

    test.report_delete_count(5);
    alien.set_many("posters", vec![poster("c.jpg")]);
    let err = test.db.update(&mut alien).await.unwrap_err();
    test.clear_faults();

    assert!(err.is_persistence(), "{err}");
    assert!(err.to_string().contains("expected to remove 2 rows"), "{err}");
}

#[tokio::test]
async fn unlink_count_is_not_checked_when_verification_is_off() {
    let mut builder = builder();
    builder.verify_unlink_count(false);
    let mut test = DbTest::with_builder(&mut builder).await;
    let mut alien = saved_movie(&mut test).await;

    test.report_delete_count(5);
    alien.set_many("posters", vec![poster("c.jpg")]);
    test.db.update(&mut alien).await.unwrap();
    test.clear_faults();

    assert_eq!(test.linked_ids(&alien, "posters").await.len(), 1);
}

#[tokio::test]
async fn update_relinks_loaded_entities_without_rewriting_them() {
    let mut test = DbTest::new().await;
    let mut alien = saved_movie(&mut test).await;

    let current = test.db.find_related(&alien, "posters").await.unwrap();
    assert_eq!(current.len(), 2);

    let mut log = test.log();
    log.clear();

    alien.set("year", 1980);
    alien.set_many("posters", current);
    test.db.update(&mut alien).await.unwrap();

    // Only the movie row is rewritten; posters were loaded unmodified
    assert_eq!(log.updates(), 1);
    assert_eq!(test.linked_ids(&alien, "posters").await.len(), 2);
}

#[tokio::test]
async fn update_stamps_modify_date() {
    let mut test = DbTest::new().await;
    let mut alien = saved_movie(&mut test).await;
    let created = alien.get("create_date").cloned();

    alien.remove("modify_date");
    alien.set("year", 1980);
    test.db.update_without_cascade(&mut alien).await.unwrap();

    assert!(alien.contains("modify_date"));
    assert_eq!(alien.get("create_date").cloned(), created);
}

#[tokio::test]
async fn update_without_cascade_leaves_relations() {
    let mut test = DbTest::new().await;
    let mut alien = saved_movie(&mut test).await;

    alien.set("year", 1980);
    alien.set_many("posters", vec![]);
    test.db.update_without_cascade(&mut alien).await.unwrap();

    assert_eq!(test.linked_ids(&alien, "posters").await.len(), 2);
}

#[tokio::test]
async fn empty_collection_clears_associations() {
    let mut test = DbTest::new().await;
    let mut alien = saved_movie(&mut test).await;

    alien.set_many("posters", vec![]);
    test.db.update(&mut alien).await.unwrap();

    assert!(test.linked_ids(&alien, "posters").await.is_empty());
    assert_eq!(test.all("Poster").await.len(), 2);
}

#[tokio::test]
async fn update_requires_a_modify_date_column() {
    let mut test = DbTest::new().await;

    let mut note = Entity::new("Note").with("body", "draft");
    test.db.save(&mut note).await.unwrap();

    note.set("body", "final");
    let err = test.db.update(&mut note).await.unwrap_err();
    assert!(err.is_invalid_schema(), "{err}");
}

#[tokio::test]
async fn update_of_a_missing_row_fails() {
    let mut test = DbTest::new().await;

    let mut ghost = movie("Ghost", 1990).with("id", 4242_i64);
    let err = test.db.update(&mut ghost).await.unwrap_err();

    assert!(err.is_persistence(), "{err}");
}

#[tokio::test]
async fn update_without_id_fails() {
    let mut test = DbTest::new().await;

    let mut unsaved = movie("Unsaved", 2000);
    let err = test.db.update(&mut unsaved).await.unwrap_err();

    assert!(err.is_persistence(), "{err}");
}
