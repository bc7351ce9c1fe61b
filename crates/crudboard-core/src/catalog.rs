// ── Catalog snapshot ──
//
// Both collections fetched together. Detail lookups and the overview are
// computed client-side from one of these, since the backend is only ever
// asked for whole collections.

use tracing::debug;

use crudboard_api::{Resource, ResourceClient};

use crate::error::CoreError;
use crate::model::{Post, RecordId, User};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub users: Vec<User>,
    pub posts: Vec<Post>,
}

impl Catalog {
    /// Fetch users and posts concurrently. Fails if either request fails.
    pub async fn fetch(client: &ResourceClient) -> Result<Self, CoreError> {
        let (users, posts) = tokio::try_join!(
            client.list::<User>(Resource::Users),
            client.list::<Post>(Resource::Posts),
        )?;
        debug!(users = users.len(), posts = posts.len(), "catalog fetched");
        Ok(Self { users, posts })
    }

    pub fn user(&self, id: RecordId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn post(&self, id: RecordId) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// Posts written by `author`, in collection order.
    pub fn posts_by(&self, author: RecordId) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(move |p| p.user_id == author)
    }
}
