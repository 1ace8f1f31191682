//! Catalog query descriptor and the in-memory execution of the retrieval contract.
//!
//! A listing always runs the same steps in the same order: filter by category,
//! count the filtered set, sort it, then cut the requested page out of it. The
//! count and the page are derived from one filtered set so they cannot disagree.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};

// Catalogued is implemented by records the query engine can filter and sort
pub trait Catalogued: Identifiable {
    fn title(&self) -> &str;
    fn category(&self) -> &str;
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum SortMode {
    Unsorted,
    TitleAscending,
    TitleDescending,
}

impl SortMode {
    // Titles compare byte-wise, ties always fall back to ascending identifier.
    pub fn compare<T: Catalogued>(&self, a: &T, b: &T) -> Ordering {
        match self {
            SortMode::Unsorted => a.id().cmp(&b.id()),
            SortMode::TitleAscending => a.title().cmp(b.title())
                .then_with(|| a.id().cmp(&b.id())),
            SortMode::TitleDescending => b.title().cmp(a.title())
                .then_with(|| a.id().cmp(&b.id())),
        }
    }

    pub fn sort<T: Catalogued>(&self, records: &mut [T]) {
        records.sort_by(|a, b| self.compare(a, b));
    }
}

impl Display for SortMode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            SortMode::Unsorted => write!(f, "Unsorted"),
            SortMode::TitleAscending => write!(f, "TitleAscending"),
            SortMode::TitleDescending => write!(f, "TitleDescending"),
        }
    }
}

/// Set of categories a listing is restricted to. An empty filter lets every
/// record through; matching is exact and case-sensitive.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct CategoryFilter {
    categories: BTreeSet<String>,
}

impl CategoryFilter {
    pub fn new<I, S>(categories: I) -> Self
        where I: IntoIterator<Item=S>, S: Into<String> {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn matches(&self, category: &str) -> bool {
        self.categories.is_empty() || self.categories.contains(category)
    }

    pub fn categories(&self) -> impl Iterator<Item=&str> {
        self.categories.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }
}

/// Validated offset/limit window. Both values are at least 1. An offset past
/// `i64::MAX` saturates there, it is beyond any collection and yields an empty page.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct PageRequest {
    page_size: i64,
    page_num: i64,
    offset: i64,
}

impl PageRequest {
    pub fn new(page_size: i64, page_num: i64) -> LibraryResult<Self> {
        if page_size < 1 {
            return Err(LibraryError::validation(
                format!("pageSize must be at least 1 but was {}", page_size).as_str(),
                Some("InvalidPageSize".to_string())));
        }
        if page_num < 1 {
            return Err(LibraryError::validation(
                format!("pageNum must be at least 1 but was {}", page_num).as_str(),
                Some("InvalidPageNum".to_string())));
        }
        let offset = (page_num - 1).checked_mul(page_size).unwrap_or(i64::MAX);
        Ok(Self { page_size, page_num, offset })
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn page_num(&self) -> i64 {
        self.page_num
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CatalogQuery {
    pub categories: CategoryFilter,
    pub sort: SortMode,
    pub page: PageRequest,
}

impl CatalogQuery {
    pub fn new(categories: CategoryFilter, sort: SortMode, page: PageRequest) -> Self {
        Self { categories, sort, page }
    }

    /// Runs the retrieval contract over an in-memory snapshot of the collection.
    pub fn select<T: Catalogued>(&self, records: Vec<T>) -> PaginatedResult<T> {
        let mut matched: Vec<T> = records.into_iter()
            .filter(|r| self.categories.matches(r.category()))
            .collect();
        let total = matched.len() as i64;
        self.sort.sort(&mut matched);
        // offset and size are positive i64 values, saturate on 32-bit targets
        let offset = usize::try_from(self.page.offset()).unwrap_or(usize::MAX);
        let size = usize::try_from(self.page.page_size()).unwrap_or(usize::MAX);
        let page = matched.into_iter().skip(offset).take(size).collect();
        PaginatedResult::new(self.page.page_num(), self.page.page_size(), total, page)
    }
}
