// ── List State Controller ──
//
// Owns one in-memory collection and the query/page state over it. Every
// mutation goes through the `watch` sender, so subscribers see each change.
// Remote calls are raced against the controller's cancellation token, and
// completions for the same record are ordered through an `OpLedger`.

mod state;

use std::future::Future;
use std::num::NonZeroUsize;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crudboard_api::{Resource, ResourceClient};

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::fields::Editable;
use crate::model::{Entity, LocalKey, RecordId, RecordKey, Row, User};
use crate::sequence::Settlement;
use crate::validation::{Validate, validate_changes};
use crate::view::PageInfo;

pub use state::{ListState, UNKNOWN_AUTHOR};

/// Controller for one remote collection.
///
/// Methods take `&self`; share it behind an `Arc` to drive operations
/// concurrently.
pub struct ListController<E: Entity> {
    client: ResourceClient,
    state: watch::Sender<ListState<E>>,
    cancel: CancellationToken,
}

impl<E: Entity> ListController<E> {
    pub fn new(client: ResourceClient, page_size: NonZeroUsize) -> Self {
        let (state, _) = watch::channel(ListState::new(page_size));
        Self {
            client,
            state,
            cancel: CancellationToken::new(),
        }
    }

    /// Build a client from `config` and use its page size for `E`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, CoreError> {
        Ok(Self::new(config.connect()?, config.page_size_for(E::RESOURCE)))
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<ListState<E>> {
        self.state.subscribe()
    }

    /// Read the current state.
    pub fn with_state<R>(&self, f: impl FnOnce(&ListState<E>) -> R) -> R {
        f(&*self.state.borrow())
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Fetch the whole collection (plus the user directory when rows need
    /// author names). On failure the collection is left empty.
    pub async fn load(&self) -> Result<(), CoreError> {
        self.ensure_open()?;
        let ticket = self.modify(|s| {
            s.pending_loads += 1;
            s.loads.issue(())
        });
        debug!(resource = %E::RESOURCE, "loading collection");

        let result = self.guarded(self.fetch()).await;

        self.modify(|s| {
            s.pending_loads = s.pending_loads.saturating_sub(1);
            match (s.loads.settle(&ticket), result) {
                (Settlement::Expired, _) | (_, Err(CoreError::Cancelled)) => {
                    Err(CoreError::Cancelled)
                }
                (Settlement::Stale, _) => {
                    debug!(resource = %E::RESOURCE, "discarding superseded load");
                    Ok(())
                }
                (Settlement::Apply, Ok((items, directory))) => {
                    info!(resource = %E::RESOURCE, count = items.len(), "collection loaded");
                    s.rows.retain(Row::is_pending);
                    s.rows.extend(items.into_iter().map(Row::Confirmed));
                    if let Some(users) = directory {
                        s.directory = users;
                    }
                    let keys: Vec<RecordKey> = s.rows.iter().map(Row::key).collect();
                    s.expanded.retain(|k| keys.contains(k));
                    s.last_error = None;
                    s.reclamp();
                    Ok(())
                }
                (Settlement::Apply, Err(err)) => {
                    warn!(resource = %E::RESOURCE, error = %err, "load failed");
                    s.rows.retain(Row::is_pending);
                    s.last_error = Some(err.to_string());
                    s.reclamp();
                    Err(err)
                }
            }
        })
    }

    async fn fetch(&self) -> Result<(Vec<E>, Option<Vec<User>>), crudboard_api::Error> {
        if E::NEEDS_AUTHORS {
            let (items, users) = tokio::try_join!(
                self.client.list::<E>(E::RESOURCE),
                self.client.list::<User>(Resource::Users),
            )?;
            Ok((items, Some(users)))
        } else {
            Ok((self.client.list::<E>(E::RESOURCE).await?, None))
        }
    }

    // ── Query & paging ───────────────────────────────────────────────

    /// Set the free-text search. Returns the view to page 1.
    pub fn set_search_term(&self, term: impl Into<String>) {
        let term = term.into();
        self.modify(|s| {
            s.query.search = term;
            s.page = 1;
        });
    }

    /// Set (or clear) the owner filter. Returns the view to page 1.
    pub fn set_filter(&self, owner: Option<RecordId>) {
        self.modify(|s| {
            s.query.owner = owner;
            s.page = 1;
        });
    }

    pub fn reset_filters(&self) {
        self.modify(|s| {
            s.query = crate::view::ListQuery::default();
            s.page = 1;
        });
    }

    /// Jump to `page`, clamped to the valid range. Returns the page landed on.
    pub fn set_page(&self, page: usize) -> usize {
        self.modify(|s| {
            s.page = page;
            s.reclamp();
            s.page
        })
    }

    pub fn next_page(&self) -> usize {
        let current = self.with_state(ListState::page);
        self.set_page(current.saturating_add(1))
    }

    pub fn prev_page(&self) -> usize {
        let current = self.with_state(ListState::page);
        self.set_page(current.saturating_sub(1))
    }

    /// Rows matching the current query, in collection order.
    pub fn filtered_view(&self) -> Vec<Row<E>> {
        self.with_state(|s| s.filtered().into_iter().cloned().collect())
    }

    /// The current page of the filtered view.
    pub fn paginated_view(&self) -> Vec<Row<E>> {
        self.with_state(|s| s.page_rows().into_iter().cloned().collect())
    }

    pub fn page_info(&self) -> PageInfo {
        self.with_state(ListState::page_info)
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Create a record. A pending row is shown at the top right away and
    /// swapped for the server's entity once it answers.
    pub async fn create(&self, draft: E::Draft) -> Result<E, CoreError> {
        self.ensure_open()?;
        draft.validate()?;

        let key = LocalKey::new();
        self.modify(|s| {
            s.rows.insert(
                0,
                Row::Pending {
                    key,
                    draft: draft.clone(),
                },
            );
            s.page = 1;
            s.in_flight += 1;
        });
        debug!(resource = %E::RESOURCE, %key, "create issued");

        let result = self
            .guarded(self.client.create::<E::Draft, E>(E::RESOURCE, &draft))
            .await;

        self.modify(|s| {
            s.in_flight = s.in_flight.saturating_sub(1);
            let slot = s.position_of(RecordKey::Local(key));
            if let Some(index) = slot {
                s.rows.remove(index);
            }
            let outcome = match result {
                Ok(entity) => {
                    let id = entity.id();
                    s.rows.retain(|r| r.server_id() != Some(id));
                    let at = slot.unwrap_or(0).min(s.rows.len());
                    s.rows.insert(at, Row::Confirmed(entity.clone()));
                    s.last_error = None;
                    info!(resource = %E::RESOURCE, %id, "created");
                    Ok(entity)
                }
                Err(err) => {
                    if !err.is_cancelled() {
                        warn!(resource = %E::RESOURCE, error = %err, "create failed");
                        s.last_error = Some(err.to_string());
                    }
                    Err(err)
                }
            };
            s.reclamp();
            outcome
        })
    }

    /// Replace the record `id` with `payload`. Only fields that differ from
    /// the loaded row are held to the form rules. The collection only
    /// changes if this is the newest completed operation on `id`.
    pub async fn update(&self, id: RecordId, payload: E) -> Result<E, CoreError>
    where
        E: Editable,
    {
        self.ensure_open()?;
        match self.get(id) {
            Some(current) => validate_changes(&payload, &current)?,
            None => payload.validate()?,
        }

        let ticket = self.modify(|s| {
            s.in_flight += 1;
            s.ops.issue(RecordKey::Server(id))
        });
        debug!(resource = %E::RESOURCE, %id, seq = ticket.seq(), "update issued");

        let result = self
            .guarded(self.client.update::<E, E>(E::RESOURCE, id.get(), &payload))
            .await;

        self.modify(|s| {
            s.in_flight = s.in_flight.saturating_sub(1);
            let entity = match result {
                Ok(entity) => entity,
                Err(err) => {
                    if !err.is_cancelled() {
                        warn!(resource = %E::RESOURCE, %id, error = %err, "update failed");
                        s.last_error = Some(err.to_string());
                    }
                    return Err(err);
                }
            };
            match s.ops.settle(&ticket) {
                Settlement::Apply => {
                    if let Some(index) = s.position_of(RecordKey::Server(id)) {
                        s.rows[index] = Row::Confirmed(entity.clone());
                    }
                    s.last_error = None;
                    info!(resource = %E::RESOURCE, %id, "updated");
                    Ok(entity)
                }
                Settlement::Stale => {
                    debug!(
                        resource = %E::RESOURCE, %id, seq = ticket.seq(),
                        "discarding stale update"
                    );
                    Ok(entity)
                }
                Settlement::Expired => Err(CoreError::Cancelled),
            }
        })
    }

    /// Delete the record `id`. On success it leaves the collection and the
    /// current page is re-clamped.
    pub async fn remove(&self, id: RecordId) -> Result<(), CoreError> {
        self.ensure_open()?;

        let ticket = self.modify(|s| {
            s.in_flight += 1;
            s.ops.issue(RecordKey::Server(id))
        });
        debug!(resource = %E::RESOURCE, %id, seq = ticket.seq(), "remove issued");

        let result = self.guarded(self.client.remove(E::RESOURCE, id.get())).await;

        self.modify(|s| {
            s.in_flight = s.in_flight.saturating_sub(1);
            if let Err(err) = result {
                if !err.is_cancelled() {
                    warn!(resource = %E::RESOURCE, %id, error = %err, "remove failed");
                    s.last_error = Some(err.to_string());
                }
                return Err(err);
            }
            match s.ops.settle(&ticket) {
                Settlement::Apply => {
                    let key = RecordKey::Server(id);
                    s.rows.retain(|r| r.key() != key);
                    s.expanded.remove(&key);
                    s.ops.forget(&key);
                    s.last_error = None;
                    s.reclamp();
                    info!(resource = %E::RESOURCE, %id, "removed");
                    Ok(())
                }
                Settlement::Stale => {
                    debug!(
                        resource = %E::RESOURCE, %id, seq = ticket.seq(),
                        "discarding stale remove"
                    );
                    Ok(())
                }
                Settlement::Expired => Err(CoreError::Cancelled),
            }
        })
    }

    // ── Presentation state ───────────────────────────────────────────

    /// Flip the expanded flag of one row. Returns the new value.
    pub fn toggle_expanded(&self, key: RecordKey) -> bool {
        self.modify(|s| {
            if s.expanded.remove(&key) {
                false
            } else {
                s.expanded.insert(key);
                true
            }
        })
    }

    pub fn is_expanded(&self, key: RecordKey) -> bool {
        self.with_state(|s| s.is_expanded(&key))
    }

    pub fn get(&self, id: RecordId) -> Option<E> {
        self.with_state(|s| s.get(id).cloned())
    }

    pub fn author(&self, id: RecordId) -> Option<User> {
        self.with_state(|s| s.author(id).cloned())
    }

    pub fn author_name(&self, id: RecordId) -> String {
        self.with_state(|s| s.author_name(id).to_owned())
    }

    pub fn last_error(&self) -> Option<String> {
        self.with_state(|s| s.last_error.clone())
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Abort in-flight requests and ignore any late completion. Every
    /// later operation fails with `CoreError::Cancelled`.
    pub fn close(&self) {
        self.cancel.cancel();
        self.modify(|s| {
            s.ops.advance_generation();
            s.loads.advance_generation();
            s.rows.retain(|r| !r.is_pending());
            s.pending_loads = 0;
            s.in_flight = 0;
        });
        debug!(resource = %E::RESOURCE, "list closed");
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

    /// Race a request against `close()`.
    async fn guarded<T>(
        &self,
        request: impl Future<Output = Result<T, crudboard_api::Error>>,
    ) -> Result<T, CoreError> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(CoreError::Cancelled),
            result = request => result.map_err(CoreError::from),
        }
    }

    /// Mutate state and notify subscribers.
    fn modify<R>(&self, f: impl FnOnce(&mut ListState<E>) -> R) -> R {
        let mut out = None;
        self.state.send_modify(|state| out = Some(f(state)));
        match out {
            Some(value) => value,
            None => unreachable!("send_modify invokes its closure exactly once"),
        }
    }
}
