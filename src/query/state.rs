use tracing::{debug, warn};

use crate::api::types::{Incident, IncidentCounts, IncidentPage, Severity, Status};
use crate::error::{ApiError, QueryError};
use crate::query::cursor::{Cursor, CursorStack};
use crate::query::params::{CountsQuery, Filters, ListQuery, PageSizes, Sort, SortField};

/// Tag carried by every fetch. Results whose tag is not the latest issued
/// are discarded.
pub type Generation = u64;

/// A change to the list parameters. Applying one always returns to page 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    Status(Option<Status>),
    Severity(Option<Severity>),
    Service(Option<String>),
    /// Settled (already debounced) search text.
    Search(String),
    PageSize(u32),
}

/// One trigger's worth of work for the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: Generation,
    pub list: ListQuery,
    pub counts: CountsQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Fresh,
    Stale,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountsSummary {
    pub total_count: u64,
    pub open_count: u64,
    pub active_sev1_count: u64,
}

/// A page move waiting on its response. The target position is committed
/// only when the page for `generation` arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingMove {
    generation: Generation,
    cursors: CursorStack,
}

/// Everything the dashboard shows, and the transitions that change it.
///
/// `cursors` and `next_cursor` always describe the rows on screen. A page
/// move stays pending until its rows arrive and is dropped if the fetch
/// fails.
#[derive(Debug, Clone)]
pub struct ListState {
    filters: Filters,
    sort: Sort,
    page_size: u32,
    page_sizes: PageSizes,
    cursors: CursorStack,
    pending_move: Option<PendingMove>,
    rows: Vec<Incident>,
    next_cursor: Option<Cursor>,
    total_pages: u64,
    counts: CountsSummary,
    error: Option<String>,
    generation: Generation,
    rows_pending: bool,
    counts_pending: bool,
    total_from_listing: bool,
}

impl ListState {
    pub fn new(page_sizes: PageSizes) -> Self {
        Self {
            filters: Filters::default(),
            sort: Sort::default(),
            page_size: page_sizes.default_size(),
            page_sizes,
            cursors: CursorStack::new(),
            pending_move: None,
            rows: Vec::new(),
            next_cursor: None,
            total_pages: 1,
            counts: CountsSummary::default(),
            error: None,
            generation: 0,
            rows_pending: false,
            counts_pending: false,
            total_from_listing: false,
        }
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn sort(&self) -> Sort {
        self.sort
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn page_sizes(&self) -> &PageSizes {
        &self.page_sizes
    }

    pub fn cursors(&self) -> &CursorStack {
        &self.cursors
    }

    pub fn rows(&self) -> &[Incident] {
        &self.rows
    }

    pub fn counts(&self) -> CountsSummary {
        self.counts
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn page_number(&self) -> usize {
        self.cursors.page_number()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.rows_pending
    }

    pub fn counts_loading(&self) -> bool {
        self.counts_pending
    }

    pub fn can_go_next(&self) -> bool {
        self.next_cursor.is_some() && self.pending_move.is_none()
    }

    pub fn can_go_prev(&self) -> bool {
        self.cursors.can_retreat()
    }

    pub fn list_query(&self) -> ListQuery {
        ListQuery {
            filters: self.filters.clone(),
            sort: self.sort,
            limit: self.page_size,
            cursor: self.cursors.current().cloned(),
        }
    }

    pub fn counts_query(&self) -> CountsQuery {
        CountsQuery {
            filters: self.filters.clone(),
        }
    }

    /// Back to page 1. Also forgets the recorded next cursor, which belonged
    /// to the old parameters.
    pub fn reset(&mut self) {
        self.cursors.reset();
        self.next_cursor = None;
        self.pending_move = None;
    }

    /// Issues a new generation for the current parameters. Any page move
    /// still in flight is abandoned.
    pub fn begin_fetch(&mut self) -> FetchRequest {
        self.pending_move = None;
        self.generation += 1;
        self.rows_pending = true;
        self.counts_pending = true;
        self.total_from_listing = false;
        self.error = None;
        FetchRequest {
            generation: self.generation,
            list: self.list_query(),
            counts: self.counts_query(),
        }
    }

    /// Same parameters, new generation.
    pub fn refresh(&mut self) -> FetchRequest {
        self.begin_fetch()
    }

    pub fn apply_filter_change(&mut self, change: FilterChange) -> Result<FetchRequest, QueryError> {
        match change {
            FilterChange::Status(status) => self.filters.status = status,
            FilterChange::Severity(severity) => self.filters.severity = severity,
            FilterChange::Service(service) => {
                self.filters.service = service.filter(|s| !s.trim().is_empty());
            }
            FilterChange::Search(text) => self.filters.search = Filters::search_term(&text),
            FilterChange::PageSize(size) => self.page_size = self.page_sizes.validate(size)?,
        }
        self.reset();
        Ok(self.begin_fetch())
    }

    pub fn click_sort(&mut self, column: SortField) -> FetchRequest {
        self.sort = self.sort.clicked(column);
        self.reset();
        self.begin_fetch()
    }

    /// Requests the page after the current one. `None` when the last
    /// response reported no further page, or a move is already in flight.
    pub fn next_page(&mut self) -> Option<FetchRequest> {
        if self.pending_move.is_some() {
            return None;
        }
        let next = self.next_cursor.clone()?;
        let mut target = self.cursors.clone();
        target.advance(next);
        Some(self.begin_move(target))
    }

    /// Requests the page before the current one, counting from a move that
    /// is still in flight.
    pub fn prev_page(&mut self) -> Option<FetchRequest> {
        let mut target = match &self.pending_move {
            Some(pending) => pending.cursors.clone(),
            None => self.cursors.clone(),
        };
        if !target.retreat() {
            return None;
        }
        Some(self.begin_move(target))
    }

    fn begin_move(&mut self, target: CursorStack) -> FetchRequest {
        let mut request = self.begin_fetch();
        request.list.cursor = target.current().cloned();
        self.pending_move = Some(PendingMove {
            generation: request.generation,
            cursors: target,
        });
        request
    }

    fn is_current(&self, generation: Generation) -> bool {
        generation == self.generation
    }

    pub fn apply_page(
        &mut self,
        generation: Generation,
        result: Result<IncidentPage, ApiError>,
    ) -> Applied {
        if !self.is_current(generation) {
            debug!(generation, latest = self.generation, "discarding stale incident page");
            return Applied::Stale;
        }
        self.rows_pending = false;
        let pending_move = self.pending_move.take();

        match result {
            Ok(page) => {
                if let Some(pending) = pending_move.filter(|p| p.generation == generation) {
                    self.cursors = pending.cursors;
                }
                self.rows = page.data;
                self.next_cursor = page.meta.next_cursor.map(Cursor::new);
                if let Some(total) = page.meta.total_count {
                    self.counts.total_count = total;
                    self.total_from_listing = true;
                }
                if let Some(pages) = page.meta.total_pages {
                    self.total_pages = pages.max(1);
                }
            }
            Err(err) => {
                // The position stays on the rows already shown.
                warn!(generation, error = %err, "incident page fetch failed");
                self.error = Some(format!("Failed to load incidents: {err}"));
            }
        }
        Applied::Fresh
    }

    pub fn apply_counts(
        &mut self,
        generation: Generation,
        result: Result<IncidentCounts, ApiError>,
    ) -> Applied {
        if !self.is_current(generation) {
            debug!(generation, latest = self.generation, "discarding stale counts");
            return Applied::Stale;
        }
        self.counts_pending = false;

        match result {
            Ok(counts) => {
                self.counts.open_count = counts.open_count;
                self.counts.active_sev1_count = counts.active_sev1_count;
                if !self.total_from_listing {
                    self.counts.total_count = counts.total_count;
                }
            }
            Err(err) => {
                // Rows are more important than counts; don't mask a row error.
                warn!(generation, error = %err, "counts fetch failed");
                if self.error.is_none() {
                    self.error = Some(format!("Failed to load counts: {err}"));
                }
            }
        }
        Applied::Fresh
    }
}
