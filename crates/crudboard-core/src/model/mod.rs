// ── Domain model ──
//
// Canonical entity types plus the traits the controllers are generic over.
// `Row<E>` is what a list actually holds: either a server-confirmed entity
// or a locally created draft still waiting for its id.

pub mod ids;
pub mod post;
pub mod user;

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crudboard_api::Resource;

use crate::validation::Validate;

pub use ids::{LocalKey, RecordId, RecordKey};
pub use post::{NewPost, Post};
pub use user::{Address, Company, Geo, NewUser, User};

// ── Traits ──────────────────────────────────────────────────────────

/// Text and ownership data consulted by list filtering.
pub trait Searchable {
    /// Fields matched by the free-text search.
    fn search_fields(&self) -> Vec<&str>;

    /// Foreign key used by the equality filter, if this type has one.
    fn owner(&self) -> Option<RecordId> {
        None
    }
}

/// A record stored in a remote collection.
pub trait Entity:
    Searchable
    + Validate
    + Clone
    + fmt::Debug
    + PartialEq
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// The id-less shape sent on create.
    type Draft: Searchable
        + Validate
        + Clone
        + fmt::Debug
        + PartialEq
        + Serialize
        + Send
        + Sync
        + 'static;

    const RESOURCE: Resource;

    /// Rows per page when nothing else is configured.
    const DEFAULT_PAGE_SIZE: usize;

    /// Whether list views need the user directory to label rows.
    const NEEDS_AUTHORS: bool = false;

    fn id(&self) -> RecordId;

    fn to_draft(&self) -> Self::Draft;
}

// ── User ────────────────────────────────────────────────────────────

impl Searchable for User {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.username.as_str(),
            self.email.as_str(),
            self.company.name.as_str(),
        ]
    }
}

impl Searchable for NewUser {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.username.as_str(),
            self.email.as_str(),
            self.company.name.as_str(),
        ]
    }
}

impl Entity for User {
    type Draft = NewUser;

    const RESOURCE: Resource = Resource::Users;
    const DEFAULT_PAGE_SIZE: usize = 6;

    fn id(&self) -> RecordId {
        self.id
    }

    fn to_draft(&self) -> NewUser {
        self.draft()
    }
}

// ── Post ────────────────────────────────────────────────────────────

impl Searchable for Post {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.body.as_str()]
    }

    fn owner(&self) -> Option<RecordId> {
        Some(self.user_id)
    }
}

impl Searchable for NewPost {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.body.as_str()]
    }

    fn owner(&self) -> Option<RecordId> {
        Some(self.user_id)
    }
}

impl Entity for Post {
    type Draft = NewPost;

    const RESOURCE: Resource = Resource::Posts;
    const DEFAULT_PAGE_SIZE: usize = 12;
    const NEEDS_AUTHORS: bool = true;

    fn id(&self) -> RecordId {
        self.id
    }

    fn to_draft(&self) -> NewPost {
        self.draft()
    }
}

// ── Row ─────────────────────────────────────────────────────────────

/// One entry of an in-memory collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Row<E: Entity> {
    /// Echoed back by the server; carries the authoritative id.
    Confirmed(E),
    /// Created locally; the create request is still in flight.
    Pending { key: LocalKey, draft: E::Draft },
}

impl<E: Entity> Row<E> {
    pub fn key(&self) -> RecordKey {
        match self {
            Self::Confirmed(entity) => RecordKey::Server(entity.id()),
            Self::Pending { key, .. } => RecordKey::Local(*key),
        }
    }

    pub fn server_id(&self) -> Option<RecordId> {
        match self {
            Self::Confirmed(entity) => Some(entity.id()),
            Self::Pending { .. } => None,
        }
    }

    pub fn entity(&self) -> Option<&E> {
        match self {
            Self::Confirmed(entity) => Some(entity),
            Self::Pending { .. } => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

impl<E: Entity> Searchable for Row<E> {
    fn search_fields(&self) -> Vec<&str> {
        match self {
            Self::Confirmed(entity) => entity.search_fields(),
            Self::Pending { draft, .. } => draft.search_fields(),
        }
    }

    fn owner(&self) -> Option<RecordId> {
        match self {
            Self::Confirmed(entity) => entity.owner(),
            Self::Pending { draft, .. } => draft.owner(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_user_json() -> serde_json::Value {
        json!({
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz",
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
                "name": "Romaguera-Crona",
                "catchPhrase": "Multi-layered client-server neural-net",
                "bs": "harness real-time e-markets"
            }
        })
    }

    #[test]
    fn user_decodes_backend_shape() {
        let user: User = serde_json::from_value(sample_user_json()).unwrap();
        assert_eq!(user.id, RecordId::new(1));
        assert_eq!(user.address.geo.lat, "-37.3159");
        assert_eq!(user.company.catch_phrase, "Multi-layered client-server neural-net");
        assert_eq!(serde_json::to_value(&user).unwrap(), sample_user_json());
    }

    #[test]
    fn new_post_serializes_without_id() {
        let draft = NewPost {
            user_id: RecordId::new(3),
            title: "hello".into(),
            body: "world".into(),
        };
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            json!({ "userId": 3, "title": "hello", "body": "world" })
        );
    }

    #[test]
    fn draft_round_trips_through_entity() {
        let user: User = serde_json::from_value(sample_user_json()).unwrap();
        let rebuilt = User::from_draft(user.id, user.to_draft());
        assert_eq!(rebuilt, user);
    }

    #[test]
    fn pending_row_searches_its_draft() {
        let key = LocalKey::new();
        let row: Row<Post> = Row::Pending {
            key,
            draft: NewPost {
                user_id: RecordId::new(2),
                title: "Draft title".into(),
                body: String::new(),
            },
        };
        assert_eq!(row.key(), RecordKey::Local(key));
        assert_eq!(row.server_id(), None);
        assert_eq!(row.owner(), Some(RecordId::new(2)));
        assert_eq!(row.search_fields()[0], "Draft title");
    }
}
