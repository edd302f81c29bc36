use std::{
    fs::{File, OpenOptions},
    io::{Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::{
    storage::{
        buffer_pool::{BufferPool, Permission},
        catalog::Catalog,
    },
    types::{
        PageNum, TableId,
        error::{DatabaseError, Result},
        page::{HeapPage, Page, PageId, PageRef},
        transaction::TxId,
        tuple::{Tuple, TupleDesc},
    },
    utils::hash::table_id_for_path,
};

/// Unordered table storage: a flat run of fixed-size pages, page `i` at
/// byte offset `i * page_size`.
#[derive(Debug)]
pub struct HeapFile {
    id: TableId,
    path: PathBuf,
    file: Mutex<File>,
    // Serializes inserts so two writers never append the same page
    append: Mutex<()>,
    desc: Arc<TupleDesc>,
    page_size: usize,
}

impl HeapFile {
    pub fn new<P: AsRef<Path>>(
        file: File,
        path: P,
        desc: Arc<TupleDesc>,
        page_size: usize,
    ) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            id: table_id_for_path(&path),
            path,
            file: Mutex::new(file),
            append: Mutex::new(()),
            desc,
            page_size,
        }
    }

    /// Opens an existing file for reading and writing.
    pub fn open<P: AsRef<Path>>(path: P, desc: Arc<TupleDesc>, page_size: usize) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path.as_ref())?;
        Ok(Self::new(file, path, desc, page_size))
    }

    /// Creates (or truncates) the file at `path`.
    pub fn create<P: AsRef<Path>>(path: P, desc: Arc<TupleDesc>, page_size: usize) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(true)
            .open(path.as_ref())?;
        Ok(Self::new(file, path, desc, page_size))
    }

    pub fn id(&self) -> &TableId {
        &self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tuple_desc(&self) -> &Arc<TupleDesc> {
        &self.desc
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn page_offset(&self, page_num: PageNum) -> u64 {
        (page_num * self.page_size) as u64
    }

    pub fn read_page(&self, page_id: &PageId) -> Result<HeapPage> {
        let offset = self.page_offset(page_id.page_num);
        let mut buffer = vec![0u8; self.page_size];
        {
            let mut file = self.file.lock();
            file.seek(SeekFrom::Start(offset))?;
            file.read_exact(&mut buffer)?;
        }
        debug!(page_id = %page_id, offset, "read page from heap file");
        HeapPage::new(page_id.clone(), Arc::clone(&self.desc), &buffer, self.page_size)
    }

    /// Writes the page to its slot in the file and syncs it to the device.
    pub fn write_page(&self, page: &Page) -> Result<()> {
        let page_bytes = page.to_bytes()?;
        if page_bytes.len() != self.page_size {
            return Err(DatabaseError::InvalidPageSize {
                expected: self.page_size,
                actual: page_bytes.len(),
            });
        }
        let offset = self.page_offset(page.page_id().page_num);
        {
            let mut file = self.file.lock();
            file.seek(SeekFrom::Start(offset))?;
            file.write_all(&page_bytes)?;
            file.sync_all()?;
        }
        debug!(page_id = %page.page_id(), offset, "write page to heap file");
        Ok(())
    }

    /// Number of whole pages in the file, `None` if the file cannot be stat'ed.
    pub fn num_pages(&self) -> Option<usize> {
        match self.file.lock().metadata() {
            Ok(metadata) => Some(metadata.len() as usize / self.page_size),
            Err(e) => {
                warn!(table_id = %self.id, error = %e, "failed to stat heap file");
                None
            }
        }
    }

    /// Puts `tuple` in the first page with a free slot, fetching existing
    /// pages through `pool`. When every page is full a new page is appended,
    /// written out immediately and cached in `pool`. Returns the modified page.
    ///
    /// Inserts into one file run one at a time.
    pub fn insert_tuple(
        &self,
        pool: &BufferPool,
        catalog: &Catalog,
        tx_id: TxId,
        tuple: &mut Tuple,
    ) -> Result<Vec<PageRef>> {
        let _append = self.append.lock();
        let num_pages = self
            .num_pages()
            .ok_or_else(|| DatabaseError::UnknownPageCount {
                table_id: self.id.clone(),
            })?;

        for page_num in 0..num_pages {
            let page_id = PageId::new(self.id.clone(), page_num);
            let page = pool.get_page(catalog, tx_id, &page_id, Permission::ReadWrite)?;
            let inserted = {
                let mut guard = page.write();
                match guard.as_heap_mut() {
                    Some(heap_page) if heap_page.empty_tuple_num() > 0 => {
                        heap_page.insert_tuple(tuple)?;
                        true
                    }
                    _ => false,
                }
            };
            if inserted {
                return Ok(vec![page]);
            }
        }

        let page_id = PageId::new(self.id.clone(), num_pages);
        let mut heap_page = HeapPage::new(
            page_id,
            Arc::clone(&self.desc),
            &HeapPage::create_empty_page_data(self.page_size),
            self.page_size,
        )?;
        if heap_page.empty_tuple_num() == 0 {
            return Err(DatabaseError::InsertFailed {
                table_id: self.id.clone(),
            });
        }
        heap_page.insert_tuple(tuple)?;

        let page = Page::Heap(heap_page);
        self.write_page(&page)?;
        debug!(page_id = %page.page_id(), "appended new page to heap file");

        // Cache before releasing the append lock so the next inserter sees
        // this object rather than a fresh read of the page.
        let page = page.into_ref();
        pool.cache_page(catalog, Arc::clone(&page))?;
        Ok(vec![page])
    }

    pub fn delete_tuple(&self, _tx_id: TxId, _tuple: &Tuple) -> Result<Vec<PageRef>> {
        unimplemented!("deleting tuples from a heap file")
    }
}
