// ── List state ──
//
// Everything a list view renders, held in one value behind the controller's
// `watch` channel. Subscribers borrow it; only the controller mutates it.

use std::collections::HashSet;
use std::num::NonZeroUsize;

use crate::model::{Entity, RecordId, RecordKey, Row, User};
use crate::sequence::OpLedger;
use crate::view::{self, ListQuery, PageInfo};

/// Shown for a row whose author is not in the directory.
pub const UNKNOWN_AUTHOR: &str = "Unknown User";

#[derive(Debug)]
pub struct ListState<E: Entity> {
    pub(crate) rows: Vec<Row<E>>,
    pub(crate) query: ListQuery,
    pub(crate) page: usize,
    pub(crate) page_size: NonZeroUsize,
    pub(crate) expanded: HashSet<RecordKey>,
    pub(crate) directory: Vec<User>,
    pub(crate) pending_loads: usize,
    pub(crate) in_flight: usize,
    pub(crate) last_error: Option<String>,
    pub(crate) ops: OpLedger<RecordKey>,
    pub(crate) loads: OpLedger<()>,
}

impl<E: Entity> ListState<E> {
    pub(crate) fn new(page_size: NonZeroUsize) -> Self {
        Self {
            rows: Vec::new(),
            query: ListQuery::default(),
            page: 1,
            page_size,
            expanded: HashSet::new(),
            directory: Vec::new(),
            pending_loads: 0,
            in_flight: 0,
            last_error: None,
            ops: OpLedger::new(),
            loads: OpLedger::new(),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The whole collection, pending rows included, newest first.
    pub fn rows(&self) -> &[Row<E>] {
        &self.rows
    }

    pub fn search_term(&self) -> &str {
        &self.query.search
    }

    pub fn owner_filter(&self) -> Option<RecordId> {
        self.query.owner
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    /// Current page, always within `[1, total_pages]`.
    pub fn page(&self) -> usize {
        view::clamp_page(self.page, self.filtered_len(), self.page_size.get())
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    pub fn is_loading(&self) -> bool {
        self.pending_loads > 0
    }

    /// Number of create/update/remove requests still outstanding.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Message of the most recent failure, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Users known to this list (loaded alongside posts).
    pub fn directory(&self) -> &[User] {
        &self.directory
    }

    // ── Derived views ────────────────────────────────────────────────

    /// Rows matching the current query, in collection order.
    pub fn filtered(&self) -> Vec<&Row<E>> {
        view::filter_rows(&self.rows, &self.query)
    }

    fn filtered_len(&self) -> usize {
        self.rows.iter().filter(|r| self.query.matches(*r)).count()
    }

    /// The current page of the filtered rows, after clamping.
    pub fn page_rows(&self) -> Vec<&Row<E>> {
        let filtered = self.filtered();
        let page = view::clamp_page(self.page, filtered.len(), self.page_size.get());
        view::paginate(&filtered, page, self.page_size.get()).to_vec()
    }

    pub fn page_info(&self) -> PageInfo {
        PageInfo::new(self.page, self.filtered_len(), self.page_size.get())
    }

    pub fn get(&self, id: RecordId) -> Option<&E> {
        self.rows
            .iter()
            .filter_map(Row::entity)
            .find(|entity| entity.id() == id)
    }

    pub fn is_expanded(&self, key: &RecordKey) -> bool {
        self.expanded.contains(key)
    }

    pub fn author(&self, id: RecordId) -> Option<&User> {
        self.directory.iter().find(|u| u.id == id)
    }

    /// Display name of a user, or a placeholder if unknown.
    pub fn author_name(&self, id: RecordId) -> &str {
        self.author(id).map_or(UNKNOWN_AUTHOR, |u| u.name.as_str())
    }

    // ── Mutation helpers ─────────────────────────────────────────────

    pub(crate) fn reclamp(&mut self) {
        self.page = self.page();
    }

    pub(crate) fn position_of(&self, key: RecordKey) -> Option<usize> {
        self.rows.iter().position(|r| r.key() == key)
    }
}
