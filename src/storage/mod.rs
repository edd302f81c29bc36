pub mod buffer_pool;
pub mod catalog;
pub mod config;
pub mod database;
pub mod heap_file;

use std::sync::Arc;

use crate::{
    storage::{buffer_pool::BufferPool, catalog::Catalog, heap_file::HeapFile},
    types::{
        TableId,
        error::Result,
        page::{Page, PageId, PageRef},
        transaction::TxId,
        tuple::{Tuple, TupleDesc},
    },
};

/// A table's backing store. Each table is one file; heap files are the only
/// kind so far.
#[derive(Debug)]
pub enum DbFile {
    Heap(HeapFile),
}

impl DbFile {
    pub fn id(&self) -> &TableId {
        match self {
            DbFile::Heap(file) => file.id(),
        }
    }

    pub fn tuple_desc(&self) -> &Arc<TupleDesc> {
        match self {
            DbFile::Heap(file) => file.tuple_desc(),
        }
    }

    pub fn read_page(&self, page_id: &PageId) -> Result<Page> {
        match self {
            DbFile::Heap(file) => file.read_page(page_id).map(Page::Heap),
        }
    }

    pub fn write_page(&self, page: &Page) -> Result<()> {
        match self {
            DbFile::Heap(file) => file.write_page(page),
        }
    }

    /// Returns the pages the insert modified.
    pub fn insert_tuple(
        &self,
        pool: &BufferPool,
        catalog: &Catalog,
        tx_id: TxId,
        tuple: &mut Tuple,
    ) -> Result<Vec<PageRef>> {
        match self {
            DbFile::Heap(file) => file.insert_tuple(pool, catalog, tx_id, tuple),
        }
    }

    pub fn delete_tuple(&self, tx_id: TxId, tuple: &Tuple) -> Result<Vec<PageRef>> {
        match self {
            DbFile::Heap(file) => file.delete_tuple(tx_id, tuple),
        }
    }

    /// `None` when the size of the backing file cannot be determined.
    pub fn num_pages(&self) -> Option<usize> {
        match self {
            DbFile::Heap(file) => file.num_pages(),
        }
    }

    pub fn as_heap(&self) -> Option<&HeapFile> {
        match self {
            DbFile::Heap(file) => Some(file),
        }
    }
}
