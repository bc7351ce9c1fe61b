// ── Detail State Controller ──
//
// One entity plus what is shown around it (a user's posts, or a post's
// author and siblings), and a two-state edit mode:
//
//   Viewing --begin_edit--> Editing --cancel_edit / save_edit ok--> Viewing
//
// A failed save stays in Editing with the buffer intact. The buffer is a
// working copy; the loaded entity only changes when the server confirms.

use std::future::Future;

use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crudboard_api::ResourceClient;

use crate::catalog::Catalog;
use crate::error::CoreError;
use crate::fields::Editable;
use crate::model::{Entity, Post, RecordId, User};
use crate::sequence::{OpLedger, Settlement};
use crate::validation::{Validate, validate_changes};

/// How many sibling posts a post's detail view shows.
pub const MORE_FROM_AUTHOR: usize = 3;

// ── Related entities ────────────────────────────────────────────────

/// Entities shown alongside the one being viewed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Related {
    /// Everything a user has written.
    UserPosts { posts: Vec<Post> },
    /// A post's author and a few more of their posts.
    PostContext {
        author: Option<User>,
        more_from_author: Vec<Post>,
    },
}

/// Entities with a detail view.
pub trait Detailed: Entity + Editable {
    /// Find the entity with `id` in a fetched catalog.
    fn locate(catalog: &Catalog, id: RecordId) -> Option<Self>;

    fn related(&self, catalog: &Catalog) -> Related;
}

impl Detailed for User {
    fn locate(catalog: &Catalog, id: RecordId) -> Option<Self> {
        catalog.user(id).cloned()
    }

    fn related(&self, catalog: &Catalog) -> Related {
        Related::UserPosts {
            posts: catalog.posts_by(self.id).cloned().collect(),
        }
    }
}

impl Detailed for Post {
    fn locate(catalog: &Catalog, id: RecordId) -> Option<Self> {
        catalog.post(id).cloned()
    }

    fn related(&self, catalog: &Catalog) -> Related {
        Related::PostContext {
            author: catalog.user(self.user_id).cloned(),
            more_from_author: catalog
                .posts_by(self.user_id)
                .filter(|p| p.id != self.id)
                .take(MORE_FROM_AUTHOR)
                .cloned()
                .collect(),
        }
    }
}

// ── State ───────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct DetailState<E> {
    entity: Option<E>,
    related: Option<Related>,
    is_editing: bool,
    edit_buffer: Option<E>,
    loading: bool,
    saving: bool,
    removed: bool,
    last_error: Option<String>,
    ops: OpLedger<()>,
}

impl<E> Default for DetailState<E> {
    fn default() -> Self {
        Self {
            entity: None,
            related: None,
            is_editing: false,
            edit_buffer: None,
            loading: false,
            saving: false,
            removed: false,
            last_error: None,
            ops: OpLedger::default(),
        }
    }
}

impl<E> DetailState<E> {
    pub fn entity(&self) -> Option<&E> {
        self.entity.as_ref()
    }

    pub fn related(&self) -> Option<&Related> {
        self.related.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.is_editing
    }

    pub fn edit_buffer(&self) -> Option<&E> {
        self.edit_buffer.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Set once a remove succeeds; the view should navigate away.
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

// ── Controller ──────────────────────────────────────────────────────

pub struct DetailController<E: Detailed> {
    client: ResourceClient,
    state: watch::Sender<DetailState<E>>,
    cancel: CancellationToken,
}

impl<E: Detailed> DetailController<E> {
    pub fn new(client: ResourceClient) -> Self {
        let (state, _) = watch::channel(DetailState::default());
        Self {
            client,
            state,
            cancel: CancellationToken::new(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailState<E>> {
        self.state.subscribe()
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&DetailState<E>) -> R) -> R {
        f(&*self.state.borrow())
    }

    pub fn entity(&self) -> Option<E> {
        self.with_state(|s| s.entity.clone())
    }

    pub fn related(&self) -> Option<Related> {
        self.with_state(|s| s.related.clone())
    }

    pub fn is_editing(&self) -> bool {
        self.with_state(|s| s.is_editing)
    }

    pub fn edit_buffer(&self) -> Option<E> {
        self.with_state(|s| s.edit_buffer.clone())
    }

    pub fn is_removed(&self) -> bool {
        self.with_state(|s| s.removed)
    }

    pub fn last_error(&self) -> Option<String> {
        self.with_state(|s| s.last_error.clone())
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Fetch both collections and locate `id`. A miss is reported as
    /// `CoreError::NotFound`, never as a transport failure.
    pub async fn load(&self, id: RecordId) -> Result<E, CoreError> {
        self.ensure_open()?;
        let ticket = self.modify(|s| {
            s.loading = true;
            s.ops.issue(())
        });
        debug!(resource = %E::RESOURCE, %id, "loading detail");

        let result = self.guarded(Catalog::fetch(&self.client)).await;

        self.modify(|s| {
            let catalog = match result {
                Ok(catalog) => catalog,
                Err(err) => {
                    if s.ops.is_current(&ticket) {
                        s.loading = false;
                    }
                    if !err.is_cancelled() {
                        warn!(resource = %E::RESOURCE, %id, error = %err, "detail load failed");
                        s.last_error = Some(err.to_string());
                    }
                    return Err(err);
                }
            };
            let settlement = s.ops.settle(&ticket);
            if settlement == Settlement::Expired {
                return Err(CoreError::Cancelled);
            }

            let Some(entity) = E::locate(&catalog, id) else {
                if settlement.is_apply() {
                    s.loading = false;
                    s.entity = None;
                    s.related = None;
                    s.is_editing = false;
                    s.edit_buffer = None;
                    s.last_error = Some(format!("{} {id} not found", E::RESOURCE.singular()));
                }
                return Err(CoreError::NotFound {
                    resource: E::RESOURCE,
                    id,
                });
            };

            if settlement.is_apply() {
                s.loading = false;
                s.related = Some(entity.related(&catalog));
                s.entity = Some(entity.clone());
                s.is_editing = false;
                s.edit_buffer = None;
                s.removed = false;
                s.last_error = None;
            } else {
                debug!(resource = %E::RESOURCE, %id, "discarding superseded detail load");
            }
            Ok(entity)
        })
    }

    // ── Edit mode ────────────────────────────────────────────────────

    /// Copy the loaded entity into the edit buffer and enter edit mode.
    pub fn begin_edit(&self) -> Result<(), CoreError> {
        self.modify(|s| {
            let entity = s.entity.clone().ok_or(CoreError::NothingLoaded)?;
            s.edit_buffer = Some(entity);
            s.is_editing = true;
            Ok(())
        })
    }

    /// Set one field of the edit buffer. The loaded entity is untouched.
    pub fn update_field(&self, field: E::Field, value: &str) -> Result<(), CoreError> {
        self.modify(|s| {
            let buffer = match (s.is_editing, s.edit_buffer.as_mut()) {
                (true, Some(buffer)) => buffer,
                _ => return Err(CoreError::NotEditing),
            };
            buffer.set_field(field, value)?;
            Ok(())
        })
    }

    /// `update_field` addressed by dotted path, e.g. `address.city`.
    pub fn update_field_path(&self, path: &str, value: &str) -> Result<(), CoreError> {
        let field = E::parse_field(path)?;
        self.update_field(field, value)
    }

    /// Drop the edit buffer and return to viewing.
    pub fn cancel_edit(&self) {
        self.modify(|s| {
            s.edit_buffer = None;
            s.is_editing = false;
        });
    }

    /// Validate the changed fields of the buffer and send it. Success
    /// replaces the entity with the server's answer and leaves edit mode;
    /// failure stays in edit mode.
    pub async fn save_edit(&self) -> Result<E, CoreError> {
        self.ensure_open()?;
        let (buffer, original) = self.with_state(|s| {
            if s.is_editing {
                (s.edit_buffer.clone(), s.entity.clone())
            } else {
                (None, None)
            }
        });
        let buffer = buffer.ok_or(CoreError::NotEditing)?;
        match &original {
            Some(original) => validate_changes(&buffer, original)?,
            None => buffer.validate()?,
        }
        let id = buffer.id();

        let ticket = self.modify(|s| {
            s.saving = true;
            s.ops.issue(())
        });
        debug!(resource = %E::RESOURCE, %id, "saving edit");

        let result = self
            .guarded(self.client.update::<E, E>(E::RESOURCE, id.get(), &buffer))
            .await;

        self.modify(|s| {
            s.saving = false;
            let updated = match result {
                Ok(updated) => updated,
                Err(err) => {
                    if !err.is_cancelled() {
                        warn!(resource = %E::RESOURCE, %id, error = %err, "save failed");
                        s.last_error = Some(err.to_string());
                    }
                    return Err(err);
                }
            };
            match s.ops.settle(&ticket) {
                Settlement::Apply => {
                    s.entity = Some(updated.clone());
                    s.edit_buffer = None;
                    s.is_editing = false;
                    s.last_error = None;
                    info!(resource = %E::RESOURCE, %id, "saved");
                    Ok(updated)
                }
                Settlement::Stale => {
                    debug!(resource = %E::RESOURCE, %id, "discarding stale save");
                    Ok(updated)
                }
                Settlement::Expired => Err(CoreError::Cancelled),
            }
        })
    }

    /// Delete the loaded entity. On success the state is cleared and
    /// marked removed; on failure the entity stays.
    pub async fn remove(&self) -> Result<RecordId, CoreError> {
        self.ensure_open()?;
        let id = self
            .with_state(|s| s.entity.as_ref().map(Entity::id))
            .ok_or(CoreError::NothingLoaded)?;
        let ticket = self.modify(|s| s.ops.issue(()));
        debug!(resource = %E::RESOURCE, %id, "removing");

        let result = self.guarded(self.client.remove(E::RESOURCE, id.get())).await;

        self.modify(|s| {
            if let Err(err) = result {
                if !err.is_cancelled() {
                    warn!(resource = %E::RESOURCE, %id, error = %err, "remove failed");
                    s.last_error = Some(err.to_string());
                }
                return Err(err);
            }
            if s.ops.settle(&ticket) == Settlement::Expired {
                return Err(CoreError::Cancelled);
            }
            s.entity = None;
            s.related = None;
            s.edit_buffer = None;
            s.is_editing = false;
            s.removed = true;
            s.last_error = None;
            info!(resource = %E::RESOURCE, %id, "removed");
            Ok(id)
        })
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Abort in-flight requests; late completions are ignored.
    pub fn close(&self) {
        self.cancel.cancel();
        self.modify(|s| {
            s.ops.advance_generation();
            s.loading = false;
            s.saving = false;
        });
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn ensure_open(&self) -> Result<(), CoreError> {
        if self.cancel.is_cancelled() {
            Err(CoreError::Cancelled)
        } else {
            Ok(())
        }
    }

    async fn guarded<T, Er>(
        &self,
        request: impl Future<Output = Result<T, Er>>,
    ) -> Result<T, CoreError>
    where
        Er: Into<CoreError>,
    {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(CoreError::Cancelled),
            result = request => result.map_err(Into::into),
        }
    }

    fn modify<R>(&self, f: impl FnOnce(&mut DetailState<E>) -> R) -> R {
        let mut out = None;
        self.state.send_modify(|state| out = Some(f(state)));
        match out {
            Some(value) => value,
            None => unreachable!("send_modify invokes its closure exactly once"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fields::UserField;
    use crate::model::NewUser;
    use crudboard_api::TransportConfig;

    fn controller() -> DetailController<User> {
        let client =
            ResourceClient::new("http://127.0.0.1:9/", &TransportConfig::default()).unwrap();
        DetailController::new(client)
    }

    fn loaded(controller: &DetailController<User>) {
        let mut draft = NewUser::default();
        draft.address.city = "Gwenborough".into();
        let user = User::from_draft(RecordId::new(1), draft);
        controller.modify(|s| s.entity = Some(user));
    }

    #[test]
    fn edit_requires_a_loaded_entity() {
        let detail = controller();
        assert!(matches!(detail.begin_edit(), Err(CoreError::NothingLoaded)));
        assert!(matches!(
            detail.update_field(UserField::City, "Boston"),
            Err(CoreError::NotEditing)
        ));
    }

    #[test]
    fn cancel_edit_leaves_entity_untouched() {
        let detail = controller();
        loaded(&detail);

        detail.begin_edit().unwrap();
        detail.update_field_path("address.city", "Boston").unwrap();
        assert_eq!(detail.edit_buffer().unwrap().address.city, "Boston");
        assert_eq!(detail.entity().unwrap().address.city, "Gwenborough");

        detail.cancel_edit();
        assert!(!detail.is_editing());
        assert!(detail.edit_buffer().is_none());
        assert_eq!(detail.entity().unwrap().address.city, "Gwenborough");
    }

    #[test]
    fn unknown_path_is_rejected() {
        let detail = controller();
        loaded(&detail);
        detail.begin_edit().unwrap();
        let err = detail.update_field_path("address.planet", "Mars").unwrap_err();
        assert!(matches!(err, CoreError::InvalidField(_)));
    }

    #[tokio::test]
    async fn save_outside_edit_mode() {
        let detail = controller();
        loaded(&detail);
        assert!(matches!(detail.save_edit().await, Err(CoreError::NotEditing)));
    }

    #[test]
    fn post_context_excludes_itself() {
        let post = |id: u64, user: u64| Post {
            id: RecordId::new(id),
            user_id: RecordId::new(user),
            title: String::new(),
            body: String::new(),
        };
        let catalog = Catalog {
            users: Vec::new(),
            posts: (1..=6).map(|id| post(id, 1)).collect(),
        };
        let Related::PostContext {
            author,
            more_from_author,
        } = post(2, 1).related(&catalog)
        else {
            panic!("expected post context");
        };
        assert!(author.is_none());
        let ids: Vec<u64> = more_from_author.iter().map(|p| p.id.get()).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }
}
