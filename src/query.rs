//! Query translation
//!
//! Turns validated tool arguments plus the caller's visibility filter into
//! store queries, and trims over-fetched pages.

use crate::memo::{Caller, RowStatus};
use crate::policy::list_filter;
use crate::service::{ListMemosArgs, ToolError, ToolResult};
use crate::store::{cel_string_literal, FindMemo};

/// Page size used when none (or a non-positive one) is given
pub const DEFAULT_PAGE_SIZE: usize = 20;
/// Largest page a caller may request
pub const MAX_PAGE_SIZE: usize = 100;
/// Fixed result window of search_memos
pub const SEARCH_LIMIT: usize = 50;

/// Pagination window of a list call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page_size: usize,
    pub page: usize,
}

impl PageWindow {
    /// Clamp raw numeric arguments
    pub fn from_args(page_size: Option<f64>, page: Option<f64>) -> Self {
        let page_size = match page_size.map(|n| n.trunc()) {
            Some(n) if n > MAX_PAGE_SIZE as f64 => MAX_PAGE_SIZE,
            Some(n) if n >= 1.0 => n as usize,
            _ => DEFAULT_PAGE_SIZE,
        };
        let page = match page.map(|n| n.trunc()) {
            Some(n) if n > 0.0 => n as usize,
            _ => 0,
        };
        Self { page_size, page }
    }

    /// One extra row reveals whether another page exists
    pub fn limit(&self) -> usize {
        self.page_size + 1
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.page_size)
    }

    /// Truncate an over-fetched page, reporting whether rows were dropped
    pub fn paginate<T>(&self, mut rows: Vec<T>) -> (Vec<T>, bool) {
        let has_more = rows.len() > self.page_size;
        if has_more {
            rows.truncate(self.page_size);
        }
        (rows, has_more)
    }
}

/// Validate a state argument
pub fn parse_row_status(s: &str) -> ToolResult<RowStatus> {
    RowStatus::parse(s).ok_or_else(|| {
        ToolError::Validation(format!("state must be NORMAL or ARCHIVED; got {:?}", s))
    })
}

/// Row-status constraint of a list call
///
/// Absent means `NORMAL`; an explicitly empty value lifts the constraint.
fn list_row_status(state: Option<&str>) -> ToolResult<Option<RowStatus>> {
    match state.unwrap_or(RowStatus::Normal.as_str()) {
        "" => Ok(None),
        s => parse_row_status(s).map(Some),
    }
}

/// Store query and page window for list_memos
pub fn list_query(args: &ListMemosArgs, caller: &Caller) -> ToolResult<(FindMemo, PageWindow)> {
    let window = PageWindow::from_args(args.page_size, args.page);
    let row_status = list_row_status(args.state.as_deref())?;

    let mut find = FindMemo {
        exclude_comments: true,
        row_status,
        limit: Some(window.limit()),
        offset: Some(window.offset()),
        order_by_pinned: args.order_by_pinned.unwrap_or(false),
        ..Default::default()
    };
    list_filter(caller).apply(&mut find);
    if let Some(filter) = args.filter.as_deref().filter(|f| !f.is_empty()) {
        find.filters.push(filter.to_string());
    }
    Ok((find, window))
}

/// Store query for search_memos
pub fn search_query(query: &str, caller: &Caller) -> ToolResult<FindMemo> {
    if query.is_empty() {
        return Err(ToolError::Validation("query is required".to_string()));
    }
    let mut find = FindMemo {
        exclude_comments: true,
        row_status: Some(RowStatus::Normal),
        limit: Some(SEARCH_LIMIT),
        offset: Some(0),
        filters: vec![format!("content.contains({})", cel_string_literal(query))],
        ..Default::default()
    };
    list_filter(caller).apply(&mut find);
    Ok(find)
}

/// Store query for list_tags
pub fn tag_query(caller: &Caller) -> FindMemo {
    let mut find = FindMemo {
        exclude_comments: true,
        exclude_content: true,
        row_status: Some(RowStatus::Normal),
        ..Default::default()
    };
    list_filter(caller).apply(&mut find);
    find
}
