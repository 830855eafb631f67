use tests::{movie, poster, DbTest};

#[tokio::test]
async fn sync_unlinks_removed_and_links_added() {
    let mut test = DbTest::new().await;

    let mut alien = movie("Alien", 1979)
        .with_many("posters", vec![poster("a.jpg"), poster("b.jpg")]);
    test.db.save(&mut alien).await.unwrap();

    let current = test.db.find_related(&alien, "posters").await.unwrap();
    let kept = current
        .iter()
        .find(|poster| poster.get_str("url") == Some("b.jpg"))
        .cloned()
        .unwrap();
    let kept_id = kept.get_i64("id").unwrap();

    let mut log = test.log();
    log.clear();

    let mut desired = vec![kept, poster("c.jpg")];
    test.db
        .sync_relation(&alien, "posters", &mut desired)
        .await
        .unwrap();

    let added_id = desired[1].get_i64("id").unwrap();
    let mut expected = vec![kept_id, added_id];
    expected.sort_unstable();
    assert_eq!(test.linked_ids(&alien, "posters").await, expected);

    // Unlinked posters are left in place
    assert_eq!(test.all("Poster").await.len(), 3);

    // One insert for the new poster, one link for it, one unlink for `a.jpg`
    assert_eq!(log.inserts(), 2);
    assert_eq!(log.deletes(), 1);
}

#[tokio::test]
async fn sync_to_the_current_set_writes_nothing() {
    let mut test = DbTest::new().await;

    let mut alien = movie("Alien", 1979).with_many("posters", vec![poster("a.jpg")]);
    test.db.save(&mut alien).await.unwrap();

    let mut desired = test.db.find_related(&alien, "posters").await.unwrap();

    let mut log = test.log();
    log.clear();
    test.db
        .sync_relation(&alien, "posters", &mut desired)
        .await
        .unwrap();

    assert_eq!(log.writes(), 0);
}

#[tokio::test]
async fn sync_to_nothing_unlinks_everything() {
    let mut test = DbTest::new().await;

    let mut alien = movie("Alien", 1979)
        .with_many("posters", vec![poster("a.jpg"), poster("b.jpg")]);
    test.db.save(&mut alien).await.unwrap();

    test.db.sync_relation(&alien, "posters", &mut []).await.unwrap();

    assert!(test.linked_ids(&alien, "posters").await.is_empty());
    assert_eq!(test.all("Poster").await.len(), 2);
}
