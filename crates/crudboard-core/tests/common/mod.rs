#![allow(dead_code, clippy::unwrap_used)]
// Shared fixtures for controller integration tests.

use std::num::NonZeroUsize;

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crudboard_api::TransportConfig;
use crudboard_core::{Entity, ListController, ResourceClient};

pub fn client(server: &MockServer) -> ResourceClient {
    ResourceClient::new(&server.uri(), &TransportConfig::default()).unwrap()
}

pub fn list_of<E: Entity>(server: &MockServer, page_size: usize) -> ListController<E> {
    ListController::new(client(server), NonZeroUsize::new(page_size).unwrap())
}

/// A user shaped like the demo service's, free-form phone included.
pub fn user_json(id: u64, name: &str, company: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "username": format!("user_{id}"),
        "email": format!("user{id}@example.com"),
        "address": {
            "street": "Kulas Light",
            "suite": "Apt. 556",
            "city": "Gwenborough",
            "zipcode": "92998-3874",
            "geo": { "lat": "-37.3159", "lng": "81.1496" }
        },
        "phone": "1-770-736-8031 x56442",
        "website": "hildegard.org",
        "company": {
            "name": company,
            "catchPhrase": "Multi-layered client-server neural-net",
            "bs": "harness real-time e-markets"
        }
    })
}

pub fn post_json(id: u64, user_id: u64, title: &str) -> Value {
    json!({
        "id": id,
        "userId": user_id,
        "title": title,
        "body": format!("body text of post number {id}")
    })
}

pub fn users() -> Value {
    json!([
        user_json(1, "Leanne Graham", "Romaguera-Crona"),
        user_json(2, "Ervin Howell", "Deckow-Crist"),
        user_json(7, "Kurtis Weissnat", "Acme Corp"),
    ])
}

pub fn posts() -> Value {
    json!([
        post_json(1, 1, "sunt aut facere"),
        post_json(2, 1, "qui est esse"),
        post_json(3, 2, "ea molestias quasi"),
    ])
}

pub async fn mount_get(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mount_collections(server: &MockServer) {
    mount_get(server, "/users", users()).await;
    mount_get(server, "/posts", posts()).await;
}
