//! State layer between `crudboard-api` and presentation front-ends.
//!
//! This crate owns the domain model and the controllers a users/posts admin
//! view is built from:
//!
//! - **[`ListController<E>`]**: One remote collection held in memory with
//!   search, owner filter, and pagination derived on read. Creates show a
//!   pending row immediately and reconcile it with the server's id; updates
//!   and removes are ordered per record through an [`OpLedger`], so a stale
//!   completion never overwrites a newer one.
//!
//! - **[`DetailController<E>`]**: A single entity plus its related records,
//!   with an edit buffer addressed by typed field paths ([`UserField`],
//!   [`PostField`]).
//!
//! - **[`Overview`]**: Landing-page counts and highlights computed from a
//!   [`Catalog`] snapshot.
//!
//! Both controllers publish their state over `tokio::sync::watch` and can be
//! closed, which cancels outstanding requests and ignores late responses.

pub mod catalog;
pub mod config;
pub mod detail;
pub mod error;
pub mod fields;
pub mod list;
pub mod model;
pub mod overview;
pub mod sequence;
pub mod validation;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use catalog::Catalog;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use detail::{DetailController, DetailState, Detailed, Related};
pub use error::CoreError;
pub use fields::{Editable, FieldError, PostField, UserField};
pub use list::{ListController, ListState};
pub use overview::Overview;
pub use sequence::{OpLedger, Settlement, Ticket};
pub use validation::{Validate, ValidationErrors, Violation, validate_changes};
pub use view::{ListQuery, PageInfo};

pub use model::{
    Address, Company, Entity, Geo, LocalKey, NewPost, NewUser, Post, RecordId, RecordKey, Row,
    Searchable, User,
};

pub use crudboard_api::{Resource, ResourceClient};
