use linkrow::{bind, Envelope, Params, Value};
use serde_json::json;
use tests::DbTest;

#[tokio::test]
async fn bound_entity_is_saved_and_reported() {
    let mut test = DbTest::new().await;

    let params: Params = [
        ("movie.name", "Alien"),
        ("movie.year", "1979"),
        ("movie.id", ""),
        ("page", "1"),
    ]
    .into_iter()
    .collect();

    let mut alien = bind::bind(test.db.schema(), "Movie", Some("movie"), &params).unwrap();
    assert!(!alien.contains("id"));

    test.db.save(&mut alien).await.unwrap();

    let envelope = Envelope::ok_with(serde_json::to_value(&alien).unwrap());
    let body = serde_json::to_value(&envelope).unwrap();

    assert_eq!(body["code"], json!(0));
    assert_eq!(body["msg"], json!("ok"));
    assert_eq!(body["data"]["name"], json!("Alien"));
    assert_eq!(body["data"]["year"], json!(1979));
    assert!(body["data"]["id"].is_i64());
}

#[tokio::test]
async fn bound_batch_is_inserted() {
    let mut test = DbTest::new().await;

    let mut params = Params::new();
    params
        .insert_all("url", ["a.jpg", "b.jpg"])
        .insert_all("id", ["", " "]);

    let mut posters = bind::bind_all(test.db.schema(), "Poster", None, &params).unwrap();
    test.db.insert_all(&mut posters).await.unwrap();

    let stored = test.all("Poster").await;
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].get("url"), Some(&Value::from("a.jpg")));
}

#[tokio::test]
async fn bind_failure_becomes_a_client_error() {
    let test = DbTest::new().await;

    let params: Params = [("year", "nineteen")].into_iter().collect();
    let err = bind::bind(test.db.schema(), "Movie", None, &params).unwrap_err();

    let envelope: Envelope = Envelope::from(&err);
    assert_eq!(envelope.code, 400);
    assert!(envelope.msg.contains("`year`"), "{}", envelope.msg);
    assert_eq!(envelope.data, None);
}
