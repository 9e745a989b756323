//! Sources of flag records.
//!
//! A store hands out the rows of a table as a lazy sequence of pages. The provider pulls pages one
//! at a time and stops at the first error, so stores are free to do the actual fetching inside
//! `Iterator::next()`.
use std::collections::HashMap;

use crate::{Error, FlagRecord, Result};

/// One batch of rows returned by a store.
pub type Page = Vec<FlagRecord>;

/// Lazy sequence of pages for a single table.
pub type Pages<'a> = Box<dyn Iterator<Item = Result<Page>> + 'a>;

/// A row store that can list every record of a table, page by page.
pub trait RecordStore {
    /// Start listing `table`. No work needs to happen until the first page is requested.
    fn pages(&self, table: &str) -> Pages<'_>;
}

impl<T: RecordStore + ?Sized> RecordStore for &T {
    fn pages(&self, table: &str) -> Pages<'_> {
        (**self).pages(table)
    }
}

impl<T: RecordStore + ?Sized> RecordStore for Box<T> {
    fn pages(&self, table: &str) -> Pages<'_> {
        (**self).pages(table)
    }
}

/// An in-memory store with pre-built pages.
///
/// Useful for tests and for running without network access.
///
/// ```
/// # use airtable_flags::{FlagRecord, MemoryStore};
/// let store = MemoryStore::new()
///     .with_page("Flags", vec![FlagRecord::new("a", true, "x")])
///     .with_page("Flags", vec![FlagRecord::new("b", false, "y")]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: HashMap<String, Vec<Result<Page>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Append a page of records to `table`.
    pub fn with_page(mut self, table: impl Into<String>, records: Page) -> Self {
        self.tables.entry(table.into()).or_default().push(Ok(records));
        self
    }

    /// Append a failing page to `table`. Pages after it are never reached.
    pub fn with_error(mut self, table: impl Into<String>, error: Error) -> Self {
        self.tables.entry(table.into()).or_default().push(Err(error));
        self
    }
}

impl RecordStore for MemoryStore {
    fn pages(&self, table: &str) -> Pages<'_> {
        match self.tables.get(table) {
            Some(pages) => {
                let mut failed = false;
                Box::new(pages.iter().cloned().take_while(move |page| {
                    let keep = !failed;
                    failed |= page.is_err();
                    keep
                }))
            }
            None => Box::new(std::iter::once(Err::<Page, _>(Error::TableNotFound(
                table.to_owned(),
            )))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryStore, RecordStore};
    use crate::{Error, FlagRecord};

    #[test]
    fn yields_pages_in_order() {
        let store = MemoryStore::new()
            .with_page("Flags", vec![FlagRecord::new("a", true, "x")])
            .with_page("Flags", vec![FlagRecord::new("b", true, "y")]);

        let names: Vec<Vec<String>> = store
            .pages("Flags")
            .map(|page| page.unwrap().into_iter().map(|r| r.name).collect())
            .collect();

        assert_eq!(names, vec![vec!["a".to_owned()], vec!["b".to_owned()]]);
    }

    #[test]
    fn stops_after_first_error() {
        let store = MemoryStore::new()
            .with_page("Flags", vec![FlagRecord::new("a", true, "x")])
            .with_error("Flags", Error::StoreFetch("boom".to_owned()))
            .with_page("Flags", vec![FlagRecord::new("b", true, "y")]);

        let pages: Vec<_> = store.pages("Flags").collect();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].is_ok());
        assert!(matches!(pages[1], Err(Error::StoreFetch(_))));
    }

    #[test]
    fn unknown_table_is_an_error() {
        let store = MemoryStore::new();
        let mut pages = store.pages("Missing");
        assert!(matches!(pages.next(), Some(Err(Error::TableNotFound(t))) if t == "Missing"));
        assert!(pages.next().is_none());
    }
}
