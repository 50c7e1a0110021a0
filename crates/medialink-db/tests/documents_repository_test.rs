//! Integration tests for the media document repository.
//!
//! These tests need a reachable Postgres. Run with:
//!
//! ```sh
//! DATABASE_URL=postgres://... cargo test -p medialink-db -- --ignored
//! ```

use medialink_db::test_fixtures::TestDatabase;
use medialink_db::{
    DocumentRepository, Error, MediaType, NewDocument, Removal, UpdateDocumentRequest,
};
use uuid::Uuid;

fn audio_doc(title: &str) -> NewDocument {
    NewDocument {
        title: title.to_string(),
        description: Some(format!("{title} description")),
        media_url: format!("media/{title}.mp3"),
        media_type: MediaType::Audio,
    }
}

async fn connect() -> TestDatabase {
    dotenvy::dotenv().ok();
    TestDatabase::new().await
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn insert_get_round_trip() {
    let test_db = connect().await;

    let inserted = test_db.documents.insert(audio_doc("interview")).await.unwrap();
    let fetched = test_db.documents.get(inserted.id).await.unwrap();

    assert_eq!(fetched.id, inserted.id);
    assert_eq!(fetched.title, "interview");
    assert_eq!(fetched.description.as_deref(), Some("interview description"));
    assert_eq!(fetched.media_url, "media/interview.mp3");
    assert_eq!(fetched.media_type, MediaType::Audio);
    assert_eq!(fetched.qr_url, None);
    assert!(!fetched.is_linked());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn insert_assigns_distinct_ids() {
    let test_db = connect().await;

    let a = test_db.documents.insert(audio_doc("first")).await.unwrap();
    let b = test_db.documents.insert(audio_doc("second")).await.unwrap();

    assert_ne!(a.id, b.id);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn attach_code_links_the_record() {
    let test_db = connect().await;

    let doc = test_db.documents.insert(audio_doc("clip")).await.unwrap();
    test_db
        .documents
        .attach_code(doc.id, &format!("assets/qrs/{}.png", doc.id))
        .await
        .unwrap();

    let fetched = test_db.documents.get(doc.id).await.unwrap();
    assert_eq!(
        fetched.qr_url.as_deref(),
        Some(format!("assets/qrs/{}.png", doc.id).as_str())
    );
    assert!(fetched.is_linked());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn attach_code_to_unknown_id_is_not_found() {
    let test_db = connect().await;

    let err = test_db
        .documents
        .attach_code(Uuid::new_v4(), "assets/qrs/ghost.png")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DocumentNotFound(_)));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn update_changes_only_supplied_fields() {
    let test_db = connect().await;

    let doc = test_db.documents.insert(audio_doc("original")).await.unwrap();

    let updated = test_db
        .documents
        .update(UpdateDocumentRequest {
            id: doc.id,
            title: Some("renamed".to_string()),
            description: None,
        })
        .await
        .unwrap();

    assert_eq!(updated.title, "renamed");
    assert_eq!(updated.description.as_deref(), Some("original description"));
    assert_eq!(updated.media_url, doc.media_url);

    let updated = test_db
        .documents
        .update(UpdateDocumentRequest {
            id: doc.id,
            title: None,
            description: Some("new description".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(updated.title, "renamed");
    assert_eq!(updated.description.as_deref(), Some("new description"));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn update_with_no_fields_returns_current_record() {
    let test_db = connect().await;

    let doc = test_db.documents.insert(audio_doc("steady")).await.unwrap();
    let unchanged = test_db
        .documents
        .update(UpdateDocumentRequest {
            id: doc.id,
            title: None,
            description: None,
        })
        .await
        .unwrap();

    assert_eq!(unchanged.title, doc.title);
    assert_eq!(unchanged.description, doc.description);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn update_unknown_id_is_not_found() {
    let test_db = connect().await;

    let missing = Uuid::new_v4();
    let err = test_db
        .documents
        .update(UpdateDocumentRequest {
            id: missing,
            title: Some("ghost".to_string()),
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DocumentNotFound(id) if id == missing));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn get_unknown_id_is_not_found() {
    let test_db = connect().await;

    let missing = Uuid::new_v4();
    let err = test_db.documents.get(missing).await.unwrap_err();
    assert!(matches!(err, Error::DocumentNotFound(id) if id == missing));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn list_orders_newest_first_with_stable_ties() {
    let test_db = connect().await;

    for title in ["one", "two", "three"] {
        test_db.documents.insert(audio_doc(title)).await.unwrap();
    }

    let listed = test_db.documents.list().await.unwrap();
    assert_eq!(listed.len(), 3);

    let mut expected = listed.clone();
    expected.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
    assert_eq!(
        listed.iter().map(|d| d.id).collect::<Vec<_>>(),
        expected.iter().map(|d| d.id).collect::<Vec<_>>()
    );

    // A second call reflects the same committed state in the same order.
    let again = test_db.documents.list().await.unwrap();
    assert_eq!(
        listed.iter().map(|d| d.id).collect::<Vec<_>>(),
        again.iter().map(|d| d.id).collect::<Vec<_>>()
    );

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn delete_removes_once_then_reports_missing() {
    let test_db = connect().await;

    let doc = test_db.documents.insert(audio_doc("target")).await.unwrap();

    assert_eq!(
        test_db.documents.delete(doc.id).await.unwrap(),
        Removal::Removed
    );
    assert_eq!(
        test_db.documents.delete(doc.id).await.unwrap(),
        Removal::Missing
    );

    let err = test_db.documents.get(doc.id).await.unwrap_err();
    assert!(matches!(err, Error::DocumentNotFound(_)));

    test_db.cleanup().await;
}
