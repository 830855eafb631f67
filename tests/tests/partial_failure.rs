use linkrow::{driver::operation::Transaction, Error};
use tests::{movie, poster, DbTest};

fn two_poster_movie() -> linkrow::Entity {
    movie("Alien", 1979).with_many("posters", vec![poster("a.jpg"), poster("b.jpg")])
}

// Saving the movie writes: movie, poster a, link a, poster b, link b.

#[tokio::test]
async fn failure_without_transaction_keeps_earlier_writes() {
    let mut test = DbTest::new().await;
    test.fail_after_writes(3);

    let mut alien = two_poster_movie();
    let err = test.db.save(&mut alien).await.unwrap_err();
    assert!(err.is_persistence(), "{err}");

    test.clear_faults();
    assert_eq!(test.log().writes(), 3);
    assert_eq!(test.all("Movie").await.len(), 1);
    assert_eq!(test.all("Poster").await.len(), 1);
    assert_eq!(test.linked_ids(&alien, "posters").await.len(), 1);
}

#[tokio::test]
async fn failure_inside_transaction_rolls_everything_back() {
    let mut test = DbTest::new().await;
    test.fail_after_writes(3);

    test.db.begin().await.unwrap();
    let mut alien = two_poster_movie();
    assert!(test.db.save(&mut alien).await.is_err());
    test.db.rollback().await.unwrap();

    test.clear_faults();
    assert!(test.log().has_transaction(Transaction::Rollback));
    assert!(test.all("Movie").await.is_empty());
    assert!(test.all("Poster").await.is_empty());
}

#[tokio::test]
async fn transaction_helper_commits_on_success() {
    let mut test = DbTest::new().await;

    let id = test
        .db
        .transaction(|db| {
            Box::pin(async move {
                let mut alien = two_poster_movie();
                db.save(&mut alien).await?;
                alien
                    .get_i64("id")
                    .ok_or_else(|| Error::usage("no id after save"))
            })
        })
        .await
        .unwrap();

    let log = test.log();
    assert!(log.has_transaction(Transaction::Start));
    assert!(log.has_transaction(Transaction::Commit));
    assert!(!test.db.in_transaction());
    assert!(test.db.find_by_id("Movie", id).await.unwrap().is_some());
}

#[tokio::test]
async fn transaction_helper_rolls_back_on_error() {
    let mut test = DbTest::new().await;

    let result: linkrow::Result<()> = test
        .db
        .transaction(|db| {
            Box::pin(async move {
                db.save(&mut two_poster_movie()).await?;
                Err(Error::usage("changed my mind"))
            })
        })
        .await;

    assert!(result.unwrap_err().is_usage());
    assert!(!test.db.in_transaction());
    assert!(test.all("Movie").await.is_empty());
    assert!(test.all("Poster").await.is_empty());
}

#[tokio::test]
async fn misordered_transaction_calls_are_usage_errors() {
    let mut test = DbTest::new().await;

    assert!(test.db.commit().await.unwrap_err().is_usage());
    assert!(test.db.rollback().await.unwrap_err().is_usage());

    test.db.begin().await.unwrap();
    assert!(test.db.begin().await.unwrap_err().is_usage());
    test.db.commit().await.unwrap();
}

#[tokio::test]
async fn failed_commit_keeps_the_transaction_open() {
    let mut test = DbTest::new().await;

    test.db.begin().await.unwrap();
    test.db.save(&mut two_poster_movie()).await.unwrap();

    test.fail_next(Transaction::Commit);
    assert!(test.db.commit().await.is_err());
    assert!(test.db.in_transaction());

    test.db.rollback().await.unwrap();
    assert!(!test.db.in_transaction());
    assert!(test.all("Movie").await.is_empty());
}

#[tokio::test]
async fn transaction_helper_rolls_back_a_failed_commit() {
    let mut test = DbTest::new().await;
    test.fail_next(Transaction::Commit);

    let result: linkrow::Result<()> = test
        .db
        .transaction(|db| {
            Box::pin(async move {
                db.save(&mut two_poster_movie()).await?;
                Ok(())
            })
        })
        .await;

    assert!(result.is_err());
    assert!(test.log().has_transaction(Transaction::Rollback));
    assert!(!test.db.in_transaction());
    assert!(test.all("Movie").await.is_empty());

    // The connection is usable for a fresh transaction
    test.db.begin().await.unwrap();
    test.db.commit().await.unwrap();
}
