use serde::{Deserialize, Serialize};

use super::RecordId;

/// A post as served by `/posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: RecordId,
    /// Author (`User.id`).
    pub user_id: RecordId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

/// A post that has not been assigned an id yet (the POST body).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewPost {
    pub user_id: RecordId,
    pub title: String,
    pub body: String,
}

impl Post {
    pub fn from_draft(id: RecordId, draft: NewPost) -> Self {
        Self {
            id,
            user_id: draft.user_id,
            title: draft.title,
            body: draft.body,
        }
    }

    pub fn draft(&self) -> NewPost {
        NewPost {
            user_id: self.user_id,
            title: self.title.clone(),
            body: self.body.clone(),
        }
    }
}
