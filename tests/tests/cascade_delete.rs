use tests::{actor, movie, poster, DbTest};

#[tokio::test]
async fn delete_removes_related_rows_of_cascading_relations() {
    let mut test = DbTest::new().await;

    let mut alien = movie("Alien", 1979)
        .with_many("posters", vec![poster("a.jpg"), poster("b.jpg")])
        .with_many("actors", vec![actor("Sigourney Weaver"), actor("Ian Holm")]);
    test.db.save(&mut alien).await.unwrap();

    test.db.delete(&alien).await.unwrap();

    assert!(test.all("Movie").await.is_empty());
    assert!(test.all("Poster").await.is_empty());

    // `actors` does not cascade deletes; only the junction rows went away
    assert_eq!(test.all("MovieMan").await.len(), 2);
    assert!(test.linked_ids(&alien, "actors").await.is_empty());
}

#[tokio::test]
async fn delete_leaves_other_movies_alone() {
    let mut test = DbTest::new().await;

    let mut alien = movie("Alien", 1979).with_many("posters", vec![poster("a.jpg")]);
    let mut brazil = movie("Brazil", 1985).with_many("posters", vec![poster("b.jpg")]);
    test.db.save(&mut alien).await.unwrap();
    test.db.save(&mut brazil).await.unwrap();

    test.db.delete(&alien).await.unwrap();

    let movies = test.all("Movie").await;
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].get_str("name"), Some("Brazil"));
    assert_eq!(test.linked_ids(&brazil, "posters").await.len(), 1);
}

#[tokio::test]
async fn delete_by_id_cascades() {
    let mut test = DbTest::new().await;

    let mut alien = movie("Alien", 1979).with_many("posters", vec![poster("a.jpg")]);
    test.db.save(&mut alien).await.unwrap();

    let id = alien.get_i64("id").unwrap();
    test.db.delete_by_id("Movie", id).await.unwrap();

    assert!(test.db.find_by_id("Movie", id).await.unwrap().is_none());
    assert!(test.all("Poster").await.is_empty());

    let err = test.db.get_by_id("Movie", id).await.unwrap_err();
    assert!(err.is_record_not_found(), "{err}");
}

#[tokio::test]
async fn deleting_a_missing_row_fails() {
    let mut test = DbTest::new().await;

    let err = test.db.delete_by_id("Movie", 99_i64).await.unwrap_err();
    assert!(err.is_persistence(), "{err}");
}

#[tokio::test]
async fn delete_without_id_fails() {
    let mut test = DbTest::new().await;

    let err = test.db.delete(&movie("Unsaved", 2000)).await.unwrap_err();
    assert!(err.is_persistence(), "{err}");
}
