//! Record storage and search execution for Mnemo.
//!
//! The crate defines the [`SearchStore`] trait together with the paging
//! and ordering types every backend shares, and ships [`MemoryStore`], a
//! complete in-process implementation used by tests and embedded
//! deployments. Stores execute [`FilterSet`]s produced by `mnemo-search`;
//! they never parse query text themselves.

pub mod error;
pub mod memory;

pub use error::StoreError;
pub use memory::MemoryStore;

use mnemo_model::{Card, Note};
use mnemo_search::FilterSet;

/// Result-window request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    /// Maximum rows returned; `None` returns everything past `offset`.
    pub limit: Option<usize>,
    /// Rows skipped from the front of the ordered result.
    pub offset: usize,
}

impl Page {
    /// The whole result set.
    pub fn all() -> Page {
        Page::default()
    }

    pub fn new(limit: usize, offset: usize) -> Page {
        Page {
            limit: Some(limit),
            offset,
        }
    }

    pub(crate) fn clip<T>(&self, mut items: Vec<T>) -> Vec<T> {
        let start = self.offset.min(items.len());
        let mut page = items.split_off(start);
        if let Some(limit) = self.limit {
            page.truncate(limit);
        }
        page
    }
}

/// Result ordering for store searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Oldest record first.
    #[default]
    CreatedAsc,
    /// Newest record first.
    CreatedDesc,
    /// Earliest due card first. Notes carry no due moment and fall back
    /// to creation order.
    DueAsc,
}

/// Search execution over one user's records.
///
/// Implementations receive a compiled [`FilterSet`] and answer with fully
/// materialized records in the requested order and window. The set's
/// target must match the method called.
pub trait SearchStore {
    fn search_notes(
        &self,
        filters: &FilterSet,
        order: SortOrder,
        page: Page,
    ) -> Result<Vec<Note>, StoreError>;

    fn search_cards(
        &self,
        filters: &FilterSet,
        order: SortOrder,
        page: Page,
    ) -> Result<Vec<Card>, StoreError>;

    fn count_notes(&self, filters: &FilterSet) -> Result<usize, StoreError> {
        Ok(self.search_notes(filters, SortOrder::default(), Page::all())?.len())
    }

    fn count_cards(&self, filters: &FilterSet) -> Result<usize, StoreError> {
        Ok(self.search_cards(filters, SortOrder::default(), Page::all())?.len())
    }
}
