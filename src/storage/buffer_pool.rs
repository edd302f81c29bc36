//! Bounded page cache in front of every table file.
//!
//! All page access goes through [`BufferPool::get_page`]. Pages are cached by
//! their `"{table}-{page}"` key and replaced with the clock algorithm once the
//! pool is full. Dirty pages are written back when they are evicted or when a
//! flush is requested; nothing is written on a timer.

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::{
    storage::{catalog::Catalog, config::DatabaseConfig},
    types::{
        error::{DatabaseError, Result},
        page::{PageId, PageRef},
        transaction::TxId,
        tuple::Tuple,
    },
};

/// Access mode requested for a page. Advisory only: there is no lock table,
/// the mode is recorded in trace output and otherwise ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    ReadOnly,
    ReadWrite,
}

#[derive(Debug)]
struct Frame {
    page: PageRef,
    ref_bit: bool,
}

impl Frame {
    /// Someone outside the pool still holds this page.
    fn is_pinned(&self) -> bool {
        Arc::strong_count(&self.page) > 1
    }
}

#[derive(Debug, Default)]
struct PageTable {
    frames: HashMap<String, Frame>,
    // Clock order of resident keys
    clock: Vec<String>,
    hand: usize,
}

impl PageTable {
    fn admit(&mut self, key: String, page: PageRef) {
        match self.frames.get_mut(&key) {
            Some(frame) => {
                frame.page = page;
                frame.ref_bit = true;
            }
            None => {
                self.clock.push(key.clone());
                self.frames.insert(
                    key,
                    Frame {
                        page,
                        ref_bit: true,
                    },
                );
            }
        }
    }

    /// Sweeps the clock at most twice looking for an unpinned page whose
    /// reference bit is clear.
    fn find_victim(&mut self) -> Option<usize> {
        let len = self.clock.len();
        if len == 0 {
            return None;
        }
        for _ in 0..2 * len {
            let pos = self.hand % len;
            self.hand = (pos + 1) % len;
            let Some(frame) = self.frames.get_mut(&self.clock[pos]) else {
                continue;
            };
            if frame.is_pinned() {
                continue;
            }
            if frame.ref_bit {
                frame.ref_bit = false;
                continue;
            }
            return Some(pos);
        }
        None
    }

    fn remove_at(&mut self, pos: usize) -> Option<Frame> {
        let key = self.clock.remove(pos);
        if self.hand > pos {
            self.hand -= 1;
        }
        if self.clock.is_empty() {
            self.hand = 0;
        } else {
            self.hand %= self.clock.len();
        }
        self.frames.remove(&key)
    }

    fn remove(&mut self, key: &str) -> Option<Frame> {
        let pos = self.clock.iter().position(|k| k == key)?;
        self.remove_at(pos)
    }
}

#[derive(Debug)]
pub struct BufferPool {
    page_size: usize,
    max_pages: usize,
    table: Mutex<PageTable>,
}

impl BufferPool {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            page_size: config.page_size,
            max_pages: config.max_pages,
            table: Mutex::new(PageTable::default()),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub fn num_resident(&self) -> usize {
        self.table.lock().frames.len()
    }

    pub fn is_resident(&self, page_id: &PageId) -> bool {
        self.table.lock().frames.contains_key(&page_id.key())
    }

    /// Returns the cached page, loading it from its table file on a miss.
    /// A full pool evicts one page first.
    pub fn get_page(
        &self,
        catalog: &Catalog,
        tx_id: TxId,
        page_id: &PageId,
        perm: Permission,
    ) -> Result<PageRef> {
        trace!(tx_id = %tx_id, page_id = %page_id, ?perm, "get page");
        let key = page_id.key();
        let mut table = self.table.lock();
        if let Some(frame) = table.frames.get_mut(&key) {
            frame.ref_bit = true;
            return Ok(Arc::clone(&frame.page));
        }

        // Load first so a failed lookup or read leaves the pool untouched
        let file = catalog
            .table_by_id(&page_id.table_id)
            .ok_or_else(|| DatabaseError::TableNotFound {
                name: page_id.table_id.clone(),
            })?;
        let page = file.read_page(page_id)?.into_ref();

        if table.frames.len() >= self.max_pages {
            self.evict_page(&mut table, catalog)?;
        }
        table.admit(key, Arc::clone(&page));
        Ok(page)
    }

    /// Makes `page` the cached copy of its page id, evicting first if the pool
    /// is full and the page is not already resident.
    pub(crate) fn cache_page(&self, catalog: &Catalog, page: PageRef) -> Result<()> {
        let key = page.read().page_id().key();
        let mut table = self.table.lock();
        if !table.frames.contains_key(&key) && table.frames.len() >= self.max_pages {
            self.evict_page(&mut table, catalog)?;
        }
        table.admit(key, page);
        Ok(())
    }

    /// Inserts `tuple` into table `table_id`, then marks every page the insert
    /// touched as dirtied by `tx_id` and makes that in-memory page the cached one.
    pub fn insert_tuple(
        &self,
        catalog: &Catalog,
        tx_id: TxId,
        table_id: &str,
        tuple: &mut Tuple,
    ) -> Result<()> {
        let file = catalog
            .table_by_id(table_id)
            .ok_or_else(|| DatabaseError::TableNotFound {
                name: table_id.to_string(),
            })?;
        let dirty_pages = file.insert_tuple(self, catalog, tx_id, tuple)?;

        for dirty in dirty_pages {
            let page_id = {
                let mut page = dirty.write();
                page.mark_dirty(Some(tx_id));
                page.page_id().clone()
            };
            if !self.is_resident(&page_id) {
                self.get_page(catalog, tx_id, &page_id, Permission::ReadWrite)?;
            }
            self.table.lock().admit(page_id.key(), dirty);
        }
        Ok(())
    }

    /// Writes the page back if it is resident and dirty.
    pub fn flush_page(&self, catalog: &Catalog, page_id: &PageId) -> Result<()> {
        let page = self
            .table
            .lock()
            .frames
            .get(&page_id.key())
            .map(|frame| Arc::clone(&frame.page));
        match page {
            Some(page) => Self::write_back(catalog, &page),
            None => Ok(()),
        }
    }

    pub fn flush_all_pages(&self, catalog: &Catalog) -> Result<()> {
        let pages: Vec<PageRef> = self
            .table
            .lock()
            .frames
            .values()
            .map(|frame| Arc::clone(&frame.page))
            .collect();
        for page in &pages {
            Self::write_back(catalog, page)?;
        }
        Ok(())
    }

    /// Drops the page from the cache without writing it.
    pub fn discard_page(&self, page_id: &PageId) {
        self.table.lock().remove(&page_id.key());
    }

    fn evict_page(&self, table: &mut PageTable, catalog: &Catalog) -> Result<()> {
        let pos = table
            .find_victim()
            .ok_or(DatabaseError::BufferPoolExhausted)?;
        let victim = Arc::clone(&table.frames[&table.clock[pos]].page);
        Self::write_back(catalog, &victim)?;
        if let Some(frame) = table.remove_at(pos) {
            debug!(page_id = %frame.page.read().page_id(), "evicted page");
        }
        Ok(())
    }

    fn write_back(catalog: &Catalog, page: &PageRef) -> Result<()> {
        let mut page = page.write();
        let Some(tx_id) = page.is_dirty() else {
            return Ok(());
        };
        let table_id = page.page_id().table_id.clone();
        let file = catalog
            .table_by_id(&table_id)
            .ok_or(DatabaseError::TableNotFound { name: table_id })?;
        file.write_page(&page)?;
        debug!(page_id = %page.page_id(), tx_id = %tx_id, "flushed dirty page");
        page.mark_dirty(None);
        Ok(())
    }
}
