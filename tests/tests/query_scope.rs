use linkrow::{Entity, Value};
use pretty_assertions::assert_eq;
use tests::{movie, DbTest};

async fn seed(test: &mut DbTest) {
    for (name, year) in [
        ("Alien", 1979),
        ("Apocalypse Now", 1979),
        ("Brazil", 1985),
        ("Aliens", 1986),
    ] {
        test.db.save(&mut movie(name, year)).await.unwrap();
    }
}

fn names(movies: &[Entity]) -> Vec<&str> {
    movies.iter().filter_map(|movie| movie.get_str("name")).collect()
}

#[tokio::test]
async fn select_filters_orders_and_limits() {
    let mut test = DbTest::new().await;
    seed(&mut test).await;

    let mut query = test.db.query();
    query
        .select(&Entity::new("Movie").with("year", 1979))
        .unwrap()
        .order_by("name")
        .unwrap()
        .desc()
        .unwrap();

    let movies = query.fetch(&mut test.db, 0, 10).await.unwrap();
    assert_eq!(names(&movies), ["Apocalypse Now", "Alien"]);
    assert!(!query.is_active());

    query
        .select(&Entity::new("Movie"))
        .unwrap()
        .order_by("year")
        .unwrap()
        .asc()
        .unwrap();
    let movies = query.fetch(&mut test.db, 2, 2).await.unwrap();
    assert_eq!(names(&movies), ["Brazil", "Aliens"]);
}

#[tokio::test]
async fn first_returns_at_most_one() {
    let mut test = DbTest::new().await;
    seed(&mut test).await;

    let mut query = test.db.query();
    query.select(&Entity::new("Movie").with("name", "Brazil")).unwrap();
    let brazil = query.first(&mut test.db).await.unwrap().unwrap();
    assert_eq!(brazil.get("year"), Some(&Value::I32(1985)));
    assert!(!brazil.is_modified("year"));

    query.select(&Entity::new("Movie").with("name", "Metropolis")).unwrap();
    assert!(query.first(&mut test.db).await.unwrap().is_none());
}

#[tokio::test]
async fn group_by_and_having() {
    let mut test = DbTest::new().await;
    seed(&mut test).await;

    let mut query = test.db.query();
    query
        .select_columns(&Entity::new("Movie"), &["year"])
        .unwrap()
        .group_by("year")
        .unwrap()
        .having("count(*) > 1")
        .unwrap();

    let years = query.fetch_count(&mut test.db, 10).await.unwrap();
    assert_eq!(years.len(), 1);
    assert_eq!(years[0].get("year"), Some(&Value::I32(1979)));
    assert!(!years[0].contains("name"));
}

#[tokio::test]
async fn null_attribute_matches_missing_values() {
    let mut test = DbTest::new().await;
    seed(&mut test).await;
    test.db
        .save(&mut Entity::new("Movie").with("name", "Untitled"))
        .await
        .unwrap();

    let mut query = test.db.query();
    query
        .select(&Entity::new("Movie").with("year", Value::Null))
        .unwrap();

    let movies = query.fetch_count(&mut test.db, 10).await.unwrap();
    assert_eq!(names(&movies), ["Untitled"]);
}

#[tokio::test]
async fn terminal_without_select_is_a_usage_error() {
    let mut test = DbTest::new().await;

    let mut query = test.db.query();
    let err = query.fetch(&mut test.db, 0, 10).await.unwrap_err();
    assert!(err.is_usage(), "{err}");

    let err = query.first(&mut test.db).await.unwrap_err();
    assert!(err.is_usage(), "{err}");
}

#[tokio::test]
async fn scopes_are_independent() {
    let mut test = DbTest::new().await;
    seed(&mut test).await;

    let mut movies = test.db.query();
    let mut posters = test.db.query();

    movies.select(&Entity::new("Movie").with("year", 1985)).unwrap();
    posters.select(&Entity::new("Poster")).unwrap();

    assert_eq!(names(&movies.fetch_count(&mut test.db, 10).await.unwrap()), ["Brazil"]);
    assert!(posters.fetch_count(&mut test.db, 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_fetch_still_clears_the_scope() {
    let mut test = DbTest::new().await;

    let mut query = test.db.query();
    query
        .select(&Entity::new("Movie"))
        .unwrap()
        .order_by("no_such_column")
        .unwrap();

    assert!(query.fetch(&mut test.db, 0, 10).await.is_err());
    assert!(!query.is_active());
}
