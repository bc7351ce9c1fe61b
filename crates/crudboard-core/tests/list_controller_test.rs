#![allow(clippy::unwrap_used)]
// Integration tests for `ListController` against a wiremock backend.

mod common;

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crudboard_core::{CoreError, ListController, NewPost, Post, RecordId, Row, User};

use common::{list_of, mount_collections, mount_get, post_json, posts, users};

// ── Helpers ─────────────────────────────────────────────────────────

fn ids<E: crudboard_core::Entity>(rows: &[Row<E>]) -> Vec<u64> {
    rows.iter()
        .filter_map(Row::server_id)
        .map(RecordId::get)
        .collect()
}

async fn loaded_posts(server: &MockServer, page_size: usize) -> ListController<Post> {
    mount_collections(server).await;
    let list = list_of::<Post>(server, page_size);
    list.load().await.unwrap();
    list
}

fn post(id: u64, user_id: u64, title: &str) -> Post {
    serde_json::from_value(post_json(id, user_id, title)).unwrap()
}

// ── Loading ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_load_posts_resolves_authors() {
    let server = MockServer::start().await;
    let list = loaded_posts(&server, 12).await;

    assert_eq!(ids(&list.filtered_view()), vec![1, 2, 3]);
    assert_eq!(list.author_name(RecordId::new(2)), "Ervin Howell");
    assert_eq!(list.author_name(RecordId::new(99)), "Unknown User");
    assert!(list.last_error().is_none());
}

#[tokio::test]
async fn test_load_failure_leaves_collection_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let list = list_of::<User>(&server, 6);

    let err = list.load().await.unwrap_err();

    assert!(matches!(err, CoreError::HttpStatus { status: 503, .. }));
    assert!(list.filtered_view().is_empty());
    assert!(list.last_error().unwrap().contains("503"));
    assert!(!list.with_state(|s| s.is_loading()));
}

// ── Filtering and paging ────────────────────────────────────────────

#[tokio::test]
async fn test_search_matches_company_name() {
    let server = MockServer::start().await;
    mount_get(&server, "/users", users()).await;
    let list = list_of::<User>(&server, 6);
    list.load().await.unwrap();

    list.set_search_term("acme");

    assert_eq!(ids(&list.filtered_view()), vec![7]);
}

#[tokio::test]
async fn test_pages_of_two() {
    let server = MockServer::start().await;
    let list = loaded_posts(&server, 2).await;

    assert_eq!(ids(&list.paginated_view()), vec![1, 2]);
    assert_eq!(list.next_page(), 2);
    assert_eq!(ids(&list.paginated_view()), vec![3]);
    assert_eq!(list.set_page(3), 2);

    let info = list.page_info();
    assert_eq!((info.first_item, info.last_item, info.total_items), (3, 3, 3));
}

#[tokio::test]
async fn test_owner_filter_resets_page() {
    let server = MockServer::start().await;
    let list = loaded_posts(&server, 1).await;
    list.set_page(3);

    list.set_filter(Some(RecordId::new(1)));

    assert_eq!(list.page_info().page, 1);
    assert_eq!(ids(&list.filtered_view()), vec![1, 2]);
}

// ── Create ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_prepends_server_entity_once() {
    let server = MockServer::start().await;
    let list = loaded_posts(&server, 2).await;
    list.set_page(2);

    Mock::given(method("POST"))
        .and(path("/posts"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(post_json(101, 2, "brand new post")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let draft = NewPost {
        user_id: RecordId::new(2),
        title: "brand new post".into(),
        body: "some meaningful content".into(),
    };
    let created = list.create(draft).await.unwrap();

    assert_eq!(created.id, RecordId::new(101));
    let all = list.filtered_view();
    assert_eq!(ids(&all), vec![101, 1, 2, 3]);
    assert!(all.iter().all(|row| !row.is_pending()));
    assert_eq!(list.page_info().page, 1);
    assert_eq!(ids(&list.paginated_view()), vec![101, 1]);
}

#[tokio::test]
async fn test_create_with_existing_id_keeps_one_copy() {
    let server = MockServer::start().await;
    let list = loaded_posts(&server, 12).await;

    Mock::given(method("POST"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(201).set_body_json(post_json(2, 1, "replacement")))
        .mount(&server)
        .await;

    let draft = NewPost {
        user_id: RecordId::new(1),
        title: "replacement".into(),
        body: "replacement body text".into(),
    };
    list.create(draft).await.unwrap();

    assert_eq!(ids(&list.filtered_view()), vec![2, 1, 3]);
}

#[tokio::test]
async fn test_create_failure_leaves_collection_unchanged() {
    let server = MockServer::start().await;
    let list = loaded_posts(&server, 12).await;
    let before = list.filtered_view();

    Mock::given(method("POST"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let draft = NewPost {
        user_id: RecordId::new(1),
        title: "doomed post".into(),
        body: "this will never be stored".into(),
    };
    let err = list.create(draft).await.unwrap_err();

    assert!(matches!(err, CoreError::HttpStatus { status: 500, .. }));
    assert_eq!(list.filtered_view(), before);
    assert!(list.last_error().is_some());
}

// ── Update ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_replaces_by_id() {
    let server = MockServer::start().await;
    let list = loaded_posts(&server, 12).await;
    let edited = post(2, 1, "qui est esse, revised");

    Mock::given(method("PUT"))
        .and(path("/posts/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&edited))
        .expect(1)
        .mount(&server)
        .await;

    list.update(RecordId::new(2), edited.clone()).await.unwrap();

    assert_eq!(list.get(RecordId::new(2)), Some(edited));
    assert_eq!(ids(&list.filtered_view()), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_update_failure_leaves_collection_unchanged() {
    let server = MockServer::start().await;
    let list = loaded_posts(&server, 12).await;
    let before = list.filtered_view();

    Mock::given(method("PUT"))
        .and(path("/posts/5"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = list
        .update(RecordId::new(5), post(5, 1, "never applied"))
        .await;

    assert!(matches!(result, Err(CoreError::HttpStatus { status: 500, .. })));
    assert_eq!(list.filtered_view(), before);
}

#[tokio::test]
async fn test_invalid_update_is_rejected_locally() {
    let server = MockServer::start().await;
    let list = loaded_posts(&server, 12).await;

    let result = list.update(RecordId::new(1), post(1, 1, "")).await;

    assert!(matches!(result, Err(CoreError::Validation(_))));
}

#[tokio::test]
async fn test_user_update_leaves_stored_phone_alone() {
    let server = MockServer::start().await;
    mount_collections(&server).await;
    let list = list_of::<User>(&server, 6);
    list.load().await.unwrap();

    let mut edited = list.get(RecordId::new(2)).unwrap();
    edited.name = "Ervin H.".into();
    Mock::given(method("PUT"))
        .and(path("/users/2"))
        .and(body_partial_json(json!({ "name": "Ervin H." })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&edited))
        .expect(1)
        .mount(&server)
        .await;

    list.update(RecordId::new(2), edited.clone()).await.unwrap();

    assert_eq!(list.get(RecordId::new(2)), Some(edited));
}

#[tokio::test]
async fn test_stale_update_is_discarded() {
    let server = MockServer::start().await;
    let list = loaded_posts(&server, 12).await;
    let first = post(1, 1, "first edit title");
    let second = post(1, 1, "second edit title");

    Mock::given(method("PUT"))
        .and(path("/posts/1"))
        .and(body_partial_json(json!({ "title": "first edit title" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(&first)
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/posts/1"))
        .and(body_partial_json(json!({ "title": "second edit title" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&second))
        .mount(&server)
        .await;

    let (a, b) = tokio::join!(
        list.update(RecordId::new(1), first.clone()),
        list.update(RecordId::new(1), second.clone()),
    );
    a.unwrap();
    b.unwrap();

    assert_eq!(list.get(RecordId::new(1)), Some(second));
}

#[tokio::test]
async fn test_stale_update_does_not_resurrect_removed_row() {
    let server = MockServer::start().await;
    let list = loaded_posts(&server, 12).await;
    let edited = post(3, 2, "late arriving edit");

    Mock::given(method("PUT"))
        .and(path("/posts/3"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(&edited)
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/posts/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let (updated, removed) = tokio::join!(
        list.update(RecordId::new(3), edited),
        list.remove(RecordId::new(3)),
    );
    updated.unwrap();
    removed.unwrap();

    assert_eq!(ids(&list.filtered_view()), vec![1, 2]);
    assert!(list.get(RecordId::new(3)).is_none());
}

// ── Remove ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_remove_reclamps_page() {
    let server = MockServer::start().await;
    let list = loaded_posts(&server, 2).await;
    assert_eq!(list.set_page(2), 2);

    Mock::given(method("DELETE"))
        .and(path("/posts/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    list.remove(RecordId::new(3)).await.unwrap();

    assert_eq!(ids(&list.filtered_view()), vec![1, 2]);
    assert_eq!(list.page_info().page, 1);
    assert_eq!(ids(&list.paginated_view()), vec![1, 2]);
}

#[tokio::test]
async fn test_remove_failure_keeps_row() {
    let server = MockServer::start().await;
    let list = loaded_posts(&server, 12).await;

    Mock::given(method("DELETE"))
        .and(path("/posts/1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = list.remove(RecordId::new(1)).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(ids(&list.filtered_view()), vec![1, 2, 3]);
}

// ── Lifecycle ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_close_cancels_inflight_load() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(users())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;
    let list = list_of::<User>(&server, 6);

    let (result, ()) = tokio::join!(list.load(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        list.close();
    });

    assert!(result.unwrap_err().is_cancelled());
    assert!(list.filtered_view().is_empty());
    assert!(list.is_closed());
}

#[tokio::test]
async fn test_subscribers_see_changes() {
    let server = MockServer::start().await;
    mount_get(&server, "/posts", posts()).await;
    mount_get(&server, "/users", users()).await;
    let list = list_of::<Post>(&server, 12);
    let mut rx = list.subscribe();
    rx.mark_unchanged();

    list.load().await.unwrap();

    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().rows().len(), 3);
}
