use std::{collections::VecDeque, sync::Arc};

use tracing::trace;

use crate::{
    executor::scan::OpIterator,
    storage::{DbFile, buffer_pool::Permission, database::Database},
    types::{
        PageNum, TableId,
        error::{DatabaseError, Result},
        page::PageId,
        transaction::TxId,
        tuple::{Tuple, TupleDesc},
    },
};

/// Walks a heap file page by page through the buffer pool, yielding occupied
/// slots in slot order.
pub struct HeapFileIterator<'a> {
    db: &'a Database,
    tx_id: TxId,
    file: Arc<DbFile>,
    // None while unopened or closed
    next_page: Option<PageNum>,
    buffered: VecDeque<Tuple>,
    error: Option<DatabaseError>,
}

impl<'a> HeapFileIterator<'a> {
    pub fn new(db: &'a Database, tx_id: TxId, file: Arc<DbFile>) -> Self {
        Self {
            db,
            tx_id,
            file,
            next_page: None,
            buffered: VecDeque::new(),
            error: None,
        }
    }

    /// Loads the next page's tuples. Returns false at the end of the file or
    /// on error.
    fn load_next_page(&mut self, page_num: PageNum) -> bool {
        let Some(num_pages) = self.file.num_pages() else {
            self.error = Some(DatabaseError::UnknownPageCount {
                table_id: self.file.id().clone(),
            });
            return false;
        };
        if page_num >= num_pages {
            return false;
        }

        let page_id = PageId::new(self.file.id().clone(), page_num);
        let page = match self.db.get_page(self.tx_id, &page_id, Permission::ReadOnly) {
            Ok(page) => page,
            Err(e) => {
                self.error = Some(e);
                return false;
            }
        };
        {
            let page = page.read();
            if let Some(heap_page) = page.as_heap() {
                self.buffered.extend(heap_page.tuples().cloned());
            }
        }
        trace!(page_id = %page_id, buffered = self.buffered.len(), "scanned page");
        self.next_page = Some(page_num + 1);
        true
    }
}

impl OpIterator for HeapFileIterator<'_> {
    fn open(&mut self) -> Result<()> {
        self.next_page = Some(0);
        self.buffered.clear();
        self.error = None;
        Ok(())
    }

    fn close(&mut self) {
        self.next_page = None;
        self.buffered.clear();
    }

    fn has_next(&mut self) -> bool {
        loop {
            let Some(page_num) = self.next_page else {
                self.error = Some(DatabaseError::NotOpen);
                return false;
            };
            if !self.buffered.is_empty() {
                return true;
            }
            if !self.load_next_page(page_num) {
                return false;
            }
        }
    }

    fn next(&mut self) -> Option<Tuple> {
        if self.next_page.is_none() {
            self.error = Some(DatabaseError::NotOpen);
            return None;
        }
        if self.buffered.is_empty() && !self.has_next() {
            if self.error.is_none() {
                self.error = Some(DatabaseError::NoSuchElement);
            }
            return None;
        }
        self.buffered.pop_front()
    }

    fn tuple_desc(&self) -> Arc<TupleDesc> {
        Arc::clone(self.file.tuple_desc())
    }

    fn error(&self) -> Option<&DatabaseError> {
        self.error.as_ref()
    }

    fn take_error(&mut self) -> Option<DatabaseError> {
        self.error.take()
    }
}

/// Sequential scan over one table, tagged with the transaction and the alias
/// the table is referred to by.
pub struct SeqScan<'a> {
    tx_id: TxId,
    table_id: TableId,
    alias: String,
    inner: HeapFileIterator<'a>,
}

impl<'a> SeqScan<'a> {
    pub fn new(db: &'a Database, tx_id: TxId, table_id: &str, alias: &str) -> Result<Self> {
        let file = db
            .catalog()
            .table_by_id(table_id)
            .ok_or_else(|| DatabaseError::CannotResolveIterator {
                table_id: table_id.to_string(),
            })?;
        let inner = match file.as_ref() {
            DbFile::Heap(_) => HeapFileIterator::new(db, tx_id, Arc::clone(&file)),
        };
        Ok(Self {
            tx_id,
            table_id: table_id.to_string(),
            alias: alias.to_string(),
            inner,
        })
    }

    pub fn tx_id(&self) -> TxId {
        self.tx_id
    }

    pub fn table_id(&self) -> &str {
        &self.table_id
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }
}

impl OpIterator for SeqScan<'_> {
    fn open(&mut self) -> Result<()> {
        self.inner.open()
    }

    fn close(&mut self) {
        self.inner.close()
    }

    fn has_next(&mut self) -> bool {
        self.inner.has_next()
    }

    fn next(&mut self) -> Option<Tuple> {
        self.inner.next()
    }

    fn rewind(&mut self) -> Result<()> {
        self.inner.rewind()
    }

    fn tuple_desc(&self) -> Arc<TupleDesc> {
        self.inner.tuple_desc()
    }

    fn error(&self) -> Option<&DatabaseError> {
        self.inner.error()
    }

    fn take_error(&mut self) -> Option<DatabaseError> {
        self.inner.take_error()
    }
}
