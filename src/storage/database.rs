use std::{io::Read, path::Path, sync::Arc};

use crate::{
    storage::{
        DbFile,
        buffer_pool::{BufferPool, Permission},
        catalog::Catalog,
        config::DatabaseConfig,
        heap_file::HeapFile,
    },
    types::{
        TableId,
        error::Result,
        page::{PageId, PageRef},
        transaction::TxId,
        tuple::{Tuple, TupleDesc},
    },
};

/// One storage engine instance: a catalog plus the buffer pool in front of it.
/// Instances share nothing but the transaction id counter.
#[derive(Debug)]
pub struct Database {
    config: DatabaseConfig,
    catalog: Catalog,
    buffer_pool: BufferPool,
}

impl Database {
    pub fn new(config: DatabaseConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            buffer_pool: BufferPool::new(&config),
            catalog: Catalog::new(),
            config,
        })
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn buffer_pool(&self) -> &BufferPool {
        &self.buffer_pool
    }

    pub fn page_size(&self) -> usize {
        self.config.page_size
    }

    /// Creates an empty heap file at `path` sized to this database's pages
    /// and registers it under `name`.
    pub fn create_table<P: AsRef<Path>>(
        &self,
        path: P,
        desc: TupleDesc,
        name: &str,
    ) -> Result<TableId> {
        let file = HeapFile::create(path, Arc::new(desc), self.page_size())?;
        Ok(self.add_table(file, name))
    }

    pub fn add_table(&self, file: HeapFile, name: &str) -> TableId {
        self.catalog.add_table(DbFile::Heap(file), name)
    }

    pub fn load_schema<R: Read>(&self, reader: R) -> Result<Vec<TableId>> {
        self.catalog.load_schema(reader, self.page_size())
    }

    pub fn get_page(&self, tx_id: TxId, page_id: &PageId, perm: Permission) -> Result<PageRef> {
        self.buffer_pool
            .get_page(&self.catalog, tx_id, page_id, perm)
    }

    pub fn insert_tuple(&self, tx_id: TxId, table_id: &str, tuple: &mut Tuple) -> Result<()> {
        self.buffer_pool
            .insert_tuple(&self.catalog, tx_id, table_id, tuple)
    }

    pub fn flush_page(&self, page_id: &PageId) -> Result<()> {
        self.buffer_pool.flush_page(&self.catalog, page_id)
    }

    pub fn flush_all_pages(&self) -> Result<()> {
        self.buffer_pool.flush_all_pages(&self.catalog)
    }
}
