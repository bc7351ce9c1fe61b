// ── Resource collections ──
//
// The backend exposes exactly two collections. Their names double as the
// URL path segment (`{base}/{resource}`).

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// A remote collection served by the backend.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Resource {
    Users,
    Posts,
}

impl Resource {
    /// The URL path segment for this collection.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Posts => "posts",
        }
    }

    /// Singular noun, used in user-facing messages.
    pub fn singular(self) -> &'static str {
        match self {
            Self::Users => "user",
            Self::Posts => "post",
        }
    }
}
