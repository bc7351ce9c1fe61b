// ── Overview ──
//
// Landing-page summary: collection sizes, the newest posts, a few featured
// users, and how many posts each user has written.

use std::collections::BTreeMap;

use serde::Serialize;

use crudboard_api::ResourceClient;

use crate::catalog::Catalog;
use crate::error::CoreError;
use crate::model::{Post, RecordId, User};

pub const RECENT_POSTS: usize = 6;
pub const FEATURED_USERS: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub user_count: usize,
    pub post_count: usize,
    pub recent_posts: Vec<Post>,
    pub featured_users: Vec<User>,
    /// Posts per author, keyed by user id.
    pub post_counts: BTreeMap<RecordId, usize>,
}

impl Overview {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut post_counts = BTreeMap::new();
        for post in &catalog.posts {
            *post_counts.entry(post.user_id).or_insert(0) += 1;
        }
        Self {
            user_count: catalog.users.len(),
            post_count: catalog.posts.len(),
            recent_posts: catalog.posts.iter().take(RECENT_POSTS).cloned().collect(),
            featured_users: catalog.users.iter().take(FEATURED_USERS).cloned().collect(),
            post_counts,
        }
    }

    pub async fn load(client: &ResourceClient) -> Result<Self, CoreError> {
        let catalog = Catalog::fetch(client).await?;
        Ok(Self::from_catalog(&catalog))
    }

    /// Number of posts written by `user`.
    pub fn posts_by(&self, user: RecordId) -> usize {
        self.post_counts.get(&user).copied().unwrap_or(0)
    }

    pub fn author_of<'a>(&'a self, post: &Post) -> Option<&'a User> {
        self.featured_users.iter().find(|u| u.id == post.user_id)
    }
}
