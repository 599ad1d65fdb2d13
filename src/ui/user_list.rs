//! User list orchestration.
//!
//! [`UserList`] owns the filter state (search text, organization filter and
//! page cursor) and the rows on screen. Each named operation mutates the
//! filter, then hands back a [`PageFetch`] for the caller to dispatch. Every
//! fetch carries a sequence number; only the completion of the most recently
//! issued fetch is applied, so the latest filter always wins.

use crate::api::ApiError;
use crate::models::{UserPage, UserPageQuery, UserRow};

/// Message shown when the list query fails without a server message
pub const LIST_FALLBACK: &str = "Failed to load user list";

/// Default number of rows per page
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Inputs that drive the list query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub search_text: Option<String>,
    pub selected_org_id: Option<String>,
    /// One-based
    pub current_page: usize,
    pub page_size: usize,
}

impl FilterState {
    pub fn new(page_size: usize) -> Self {
        Self {
            search_text: None,
            selected_org_id: None,
            current_page: 1,
            page_size: page_size.max(1),
        }
    }
}

/// A list request tagged with the sequence number it was issued under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFetch {
    pub seq: u64,
    pub query: UserPageQuery,
}

/// What applying a completed fetch did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Rows and total replaced
    Applied,
    /// Rows kept; carries the message for the operator
    Failed(String),
    /// A newer fetch was issued after this one; nothing changed
    Stale,
}

/// Owner of the user table state
#[derive(Debug)]
pub struct UserList {
    filter: FilterState,
    rows: Vec<UserRow>,
    total: u64,
    loading: bool,
    issued: u64,
    /// Page the current rows came from
    shown_page: usize,
    selected: usize,
    keep_org_filter_on_search: bool,
}

impl UserList {
    pub fn new(page_size: usize) -> Self {
        Self {
            filter: FilterState::new(page_size),
            rows: Vec::new(),
            total: 0,
            loading: false,
            issued: 0,
            shown_page: 1,
            selected: 0,
            keep_org_filter_on_search: false,
        }
    }

    /// Make `search` and page changes keep the selected organization instead
    /// of sending an empty `parentPath`
    pub fn with_org_filter_on_search(mut self, keep: bool) -> Self {
        self.keep_org_filter_on_search = keep;
        self
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn rows(&self) -> &[UserRow] {
        &self.rows
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_row(&self) -> Option<&UserRow> {
        self.rows.get(self.selected)
    }

    /// Number of pages for the last known total, never less than one
    pub fn page_count(&self) -> usize {
        let total = usize::try_from(self.total).unwrap_or(usize::MAX);
        total.div_ceil(self.filter.page_size).max(1)
    }

    /// One-based row number across pages for the row at `index` on this page
    pub fn row_number(&self, index: usize) -> usize {
        (self.filter.current_page - 1) * self.filter.page_size + index + 1
    }

    /// First fetch after mount: no search, no organization filter
    pub fn initial(&mut self) -> PageFetch {
        self.filter.current_page = 1;
        self.issue(
            self.filter.search_text.clone(),
            self.filter.selected_org_id.clone(),
        )
    }

    /// Submit a search term; goes back to the first page
    pub fn search(&mut self, term: impl Into<String>) -> PageFetch {
        let term = term.into();
        self.filter.search_text = Some(term.clone());
        self.filter.current_page = 1;
        let parent_path = self.unscoped_parent_path();
        self.issue(Some(term), parent_path)
    }

    /// Filter by organization, `None` meaning every organization
    pub fn select_org(&mut self, org_id: Option<String>) -> PageFetch {
        self.filter.selected_org_id = org_id.clone();
        self.filter.current_page = 1;
        self.issue(self.filter.search_text.clone(), org_id)
    }

    /// Jump to a one-based page, clamped to the known page range
    pub fn change_page(&mut self, page: usize) -> PageFetch {
        self.filter.current_page = page.clamp(1, self.page_count());
        let parent_path = self.unscoped_parent_path();
        self.issue(self.filter.search_text.clone(), parent_path)
    }

    pub fn next_page(&mut self) -> Option<PageFetch> {
        let page = self.filter.current_page;
        (page < self.page_count()).then(|| self.change_page(page + 1))
    }

    pub fn prev_page(&mut self) -> Option<PageFetch> {
        let page = self.filter.current_page;
        (page > 1).then(|| self.change_page(page - 1))
    }

    /// Clear the search and go back to the first page. The organization
    /// filter stays.
    pub fn reset(&mut self) -> PageFetch {
        self.filter.search_text = None;
        self.filter.current_page = 1;
        self.issue(None, self.filter.selected_org_id.clone())
    }

    /// Reload the current page with every filter applied
    pub fn refresh_current(&mut self) -> PageFetch {
        self.issue(
            self.filter.search_text.clone(),
            self.filter.selected_org_id.clone(),
        )
    }

    /// Apply the completion of fetch `seq`
    pub fn apply(&mut self, seq: u64, result: Result<UserPage, ApiError>) -> FetchOutcome {
        if seq != self.issued {
            tracing::debug!(seq, latest = self.issued, "discarding stale user page");
            return FetchOutcome::Stale;
        }
        self.loading = false;

        match result {
            Ok(page) => {
                tracing::debug!(
                    rows = page.content.len(),
                    total = page.total_elements,
                    "user page loaded"
                );
                self.rows = page.content;
                self.total = page.total_elements;
                self.shown_page = self.filter.current_page;
                self.selected = self.selected.min(self.rows.len().saturating_sub(1));
                FetchOutcome::Applied
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load user page");
                // Row numbers and the next page step follow the rows on screen
                self.filter.current_page = self.shown_page;
                FetchOutcome::Failed(e.user_message(LIST_FALLBACK))
            }
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    // Search and paging historically drop the organization filter.
    fn unscoped_parent_path(&self) -> Option<String> {
        if self.keep_org_filter_on_search {
            self.filter.selected_org_id.clone()
        } else {
            Some(String::new())
        }
    }

    fn issue(&mut self, search: Option<String>, parent_path: Option<String>) -> PageFetch {
        self.issued += 1;
        self.loading = true;
        PageFetch {
            seq: self.issued,
            query: UserPageQuery {
                search,
                page: self.filter.current_page - 1,
                parent_path,
                size: self.filter.page_size,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: u32) -> UserRow {
        UserRow {
            id: id.to_string(),
            name: Some(format!("user {}", id)),
            account: Some(format!("u{}", id)),
            group_name: None,
            role_name: None,
            user_type: None,
            start_date: None,
            end_date: None,
        }
    }

    fn page(ids: std::ops::Range<u32>, total: u64) -> UserPage {
        UserPage {
            content: ids.map(row).collect(),
            total_elements: total,
        }
    }

    fn rejected(msg: Option<&str>) -> ApiError {
        ApiError::Rejected {
            code: 1,
            msg: msg.map(str::to_string),
        }
    }

    /// A list that has already shown page one of a 95-row result
    fn loaded_list() -> UserList {
        let mut list = UserList::new(DEFAULT_PAGE_SIZE);
        let fetch = list.initial();
        assert_eq!(list.apply(fetch.seq, Ok(page(0..20, 95))), FetchOutcome::Applied);
        list
    }

    #[test]
    fn test_initial_request() {
        let mut list = UserList::new(DEFAULT_PAGE_SIZE);
        let fetch = list.initial();

        assert_eq!(
            fetch.query,
            UserPageQuery {
                search: None,
                page: 0,
                parent_path: None,
                size: 20,
            }
        );
        assert!(list.is_loading());
    }

    #[test]
    fn test_search_resets_page_and_clears_parent_path() {
        let mut list = loaded_list();
        list.select_org(Some("7".to_string()));
        list.change_page(3);

        let fetch = list.search("Zhang");

        assert_eq!(
            fetch.query,
            UserPageQuery {
                search: Some("Zhang".to_string()),
                page: 0,
                parent_path: Some(String::new()),
                size: 20,
            }
        );
        assert_eq!(list.filter().current_page, 1);
        assert_eq!(list.filter().selected_org_id.as_deref(), Some("7"));
    }

    #[test]
    fn test_repeated_searches_always_request_first_page() {
        let mut list = loaded_list();
        for term in ["a", "ab", "", "Zhang"] {
            list.next_page();
            assert_eq!(list.search(term).query.page, 0);
        }
    }

    #[test]
    fn test_change_page_preserves_search() {
        let mut list = loaded_list();
        list.search("Zhang");

        let fetch = list.change_page(3);

        assert_eq!(fetch.query.search.as_deref(), Some("Zhang"));
        assert_eq!(fetch.query.page, 2);
        assert_eq!(fetch.query.parent_path.as_deref(), Some(""));
        assert_eq!(list.filter().search_text.as_deref(), Some("Zhang"));
    }

    #[test]
    fn test_select_org_sets_parent_path() {
        let mut list = loaded_list();
        list.change_page(4);

        let fetch = list.select_org(Some("7".to_string()));
        assert_eq!(fetch.query.parent_path.as_deref(), Some("7"));
        assert_eq!(fetch.query.page, 0);

        let fetch = list.select_org(None);
        assert_eq!(fetch.query.parent_path, None);
        assert_eq!(fetch.query.page, 0);
    }

    #[test]
    fn test_reset_keeps_org_filter() {
        let mut list = loaded_list();
        list.select_org(Some("7".to_string()));
        list.search("Zhang");
        list.change_page(3);

        let fetch = list.reset();

        assert_eq!(fetch.query.page, 0);
        assert_eq!(fetch.query.parent_path.as_deref(), Some("7"));
        assert_eq!(fetch.query.search, None);
        assert_eq!(list.filter().search_text, None);
    }

    #[test]
    fn test_refresh_keeps_current_page_and_filters() {
        let mut list = loaded_list();
        list.select_org(Some("7".to_string()));
        list.search("Li");
        list.change_page(2);

        let fetch = list.refresh_current();

        assert_eq!(
            fetch.query,
            UserPageQuery {
                search: Some("Li".to_string()),
                page: 1,
                parent_path: Some("7".to_string()),
                size: 20,
            }
        );
    }

    #[test]
    fn test_org_filter_on_search_when_enabled() {
        let mut list = UserList::new(20).with_org_filter_on_search(true);
        list.select_org(Some("7".to_string()));

        assert_eq!(list.search("Zhang").query.parent_path.as_deref(), Some("7"));
        assert_eq!(list.change_page(1).query.parent_path.as_deref(), Some("7"));
    }

    #[test]
    fn test_success_replaces_rows_and_total() {
        let mut list = loaded_list();
        let fetch = list.search("Zhang");

        assert_eq!(list.apply(fetch.seq, Ok(page(100..103, 3))), FetchOutcome::Applied);
        assert_eq!(list.rows().len(), 3);
        assert_eq!(list.total(), 3);
        assert_eq!(list.rows()[0].id, "100");
        assert!(!list.is_loading());
    }

    #[test]
    fn test_failure_keeps_rows_and_total() {
        let mut list = loaded_list();
        let before = list.rows().to_vec();

        let fetch = list.change_page(2);
        assert_eq!(
            list.apply(fetch.seq, Err(rejected(Some("no permission")))),
            FetchOutcome::Failed("no permission".to_string())
        );
        assert_eq!(list.rows(), before.as_slice());
        assert_eq!(list.total(), 95);

        let fetch = list.change_page(3);
        assert_eq!(
            list.apply(fetch.seq, Err(rejected(None))),
            FetchOutcome::Failed(LIST_FALLBACK.to_string())
        );
        assert_eq!(list.rows(), before.as_slice());
    }

    #[test]
    fn test_failed_page_change_keeps_page_of_shown_rows() {
        let mut list = loaded_list();

        let fetch = list.next_page().unwrap();
        assert_eq!(list.filter().current_page, 2);
        list.apply(fetch.seq, Err(rejected(None)));

        assert_eq!(list.filter().current_page, 1);
        assert_eq!(list.row_number(0), 1);
        assert_eq!(list.next_page().map(|f| f.query.page), Some(1));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut list = loaded_list();
        let older = list.search("Zh");
        let newer = list.search("Zhang");

        assert_eq!(list.apply(newer.seq, Ok(page(0..1, 1))), FetchOutcome::Applied);
        assert_eq!(list.apply(older.seq, Ok(page(0..20, 95))), FetchOutcome::Stale);
        assert_eq!(list.rows().len(), 1);
        assert_eq!(list.total(), 1);
    }

    #[test]
    fn test_loading_until_latest_resolves() {
        let mut list = loaded_list();
        let older = list.select_org(Some("7".to_string()));
        let newer = list.select_org(Some("8".to_string()));

        assert_eq!(list.apply(older.seq, Ok(page(0..5, 5))), FetchOutcome::Stale);
        assert!(list.is_loading());
        list.apply(newer.seq, Ok(page(0..2, 2)));
        assert!(!list.is_loading());
    }

    #[test]
    fn test_paging_bounds() {
        let mut list = loaded_list();
        assert_eq!(list.page_count(), 5);
        assert!(list.prev_page().is_none());

        let fetch = list.change_page(99);
        assert_eq!(fetch.query.page, 4);
        assert!(list.next_page().is_none());
        assert_eq!(list.prev_page().map(|f| f.query.page), Some(3));
    }

    #[test]
    fn test_row_numbers_continue_across_pages() {
        let mut list = loaded_list();
        assert_eq!(list.row_number(0), 1);
        list.change_page(3);
        assert_eq!(list.row_number(4), 45);
    }

    #[test]
    fn test_selection_clamped_to_new_rows() {
        let mut list = loaded_list();
        for _ in 0..30 {
            list.select_next();
        }
        assert_eq!(list.selected_index(), 19);

        let fetch = list.search("x");
        list.apply(fetch.seq, Ok(page(0..3, 3)));
        assert_eq!(list.selected_index(), 2);
        assert_eq!(list.selected_row().map(|r| r.id.as_str()), Some("2"));
    }
}
