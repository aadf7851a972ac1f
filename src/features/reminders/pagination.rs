//! Paginated `/list` view state
//!
//! Each `/list` response gets a `ListView` stored under a fresh uuid. Buttons
//! carry that uuid in their custom id, so a click looks the state up, mutates
//! it and re-renders. Views expire after `VIEW_TIMEOUT`.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.1.0

use dashmap::DashMap;
use std::ops::Range;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Reminders shown per page
pub const PAGE_SIZE: usize = 5;
/// How long a list view keeps its buttons
pub const VIEW_TIMEOUT: Duration = Duration::from_secs(60);
/// Custom id prefix for list view buttons
pub const LIST_BUTTON_PREFIX: &str = "rmlist:";

#[derive(Debug, Clone)]
pub struct ListView {
    pub id: Uuid,
    pub owner_id: String,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    created_at: Instant,
}

impl ListView {
    pub fn new(owner_id: &str, total: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.to_string(),
            page: 0,
            page_size: PAGE_SIZE,
            total,
            created_at: Instant::now(),
        }
    }

    /// At least one page, even when empty
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.page_size).max(1)
    }

    /// Index range of the rows on the current page
    pub fn page_range(&self) -> Range<usize> {
        let start = (self.page * self.page_size).min(self.total);
        let end = (start + self.page_size).min(self.total);
        start..end
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages()
    }

    pub fn prev(&mut self) {
        if self.has_prev() {
            self.page -= 1;
        }
    }

    pub fn next(&mut self) {
        if self.has_next() {
            self.page += 1;
        }
    }

    /// Update the row count, pulling the page back if it no longer exists
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.page = self.page.min(self.total_pages() - 1);
    }

    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.created_at.elapsed() >= timeout
    }

    pub fn button_id(&self, action: &ListAction) -> String {
        match action {
            ListAction::Prev => format!("{LIST_BUTTON_PREFIX}{}:prev", self.id),
            ListAction::Next => format!("{LIST_BUTTON_PREFIX}{}:next", self.id),
            ListAction::Delete(reminder_id) => {
                format!("{LIST_BUTTON_PREFIX}{}:del:{reminder_id}", self.id)
            }
        }
    }
}

/// What a list view button asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    Prev,
    Next,
    Delete(i64),
}

/// Parse `rmlist:<uuid>:<action>` back into the view id and action
pub fn parse_button_id(custom_id: &str) -> Option<(Uuid, ListAction)> {
    let rest = custom_id.strip_prefix(LIST_BUTTON_PREFIX)?;
    let mut parts = rest.split(':');
    let view_id = Uuid::parse_str(parts.next()?).ok()?;

    let action = match (parts.next()?, parts.next()) {
        ("prev", None) => ListAction::Prev,
        ("next", None) => ListAction::Next,
        ("del", Some(id)) => ListAction::Delete(id.parse().ok()?),
        _ => return None,
    };

    if parts.next().is_some() {
        return None;
    }
    Some((view_id, action))
}

/// Live list views, shared between the `/list` handler and button handlers
#[derive(Clone)]
pub struct ListViewStore {
    views: Arc<DashMap<Uuid, ListView>>,
    timeout: Duration,
}

impl ListViewStore {
    pub fn new(timeout: Duration) -> Self {
        Self {
            views: Arc::new(DashMap::new()),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Create and remember a view for `owner_id`
    pub fn open(&self, owner_id: &str, total: usize) -> ListView {
        self.prune();
        let view = ListView::new(owner_id, total);
        self.views.insert(view.id, view.clone());
        view
    }

    /// Current state of a live view; expired views are dropped and yield None
    pub fn get(&self, id: &Uuid) -> Option<ListView> {
        let view = self.views.get(id).map(|v| v.clone())?;
        if view.is_expired(self.timeout) {
            self.views.remove(id);
            return None;
        }
        Some(view)
    }

    /// Store the mutated state of a view that is still live
    pub fn update(&self, view: &ListView) {
        if let Some(mut entry) = self.views.get_mut(&view.id) {
            *entry = view.clone();
        }
    }

    pub fn close(&self, id: &Uuid) {
        self.views.remove(id);
    }

    /// Drop all expired views
    pub fn prune(&self) {
        let timeout = self.timeout;
        self.views.retain(|_, view| !view.is_expired(timeout));
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl Default for ListViewStore {
    fn default() -> Self {
        Self::new(VIEW_TIMEOUT)
    }
}
