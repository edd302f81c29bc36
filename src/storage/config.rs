use serde::{Deserialize, Serialize};

use crate::types::{
    DEFAULT_MAX_PAGES, FALLBACK_PAGE_SIZE, INT_FIELD_SIZE,
    error::{DatabaseError, Result},
};

/// Native page size of the host, or [`FALLBACK_PAGE_SIZE`] when it cannot be queried.
pub fn host_page_size() -> usize {
    #[cfg(unix)]
    {
        // SAFETY: sysconf has no preconditions and only reads process state.
        let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        if size > 0 {
            return size as usize;
        }
    }
    FALLBACK_PAGE_SIZE
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Size in bytes of every page on disk and in the buffer pool.
    pub page_size: usize,
    /// Maximum number of pages resident in the buffer pool.
    pub max_pages: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            page_size: host_page_size(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl DatabaseConfig {
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn validate(&self) -> Result<()> {
        // One header byte plus one integer slot
        if self.page_size < INT_FIELD_SIZE + 1 {
            return Err(DatabaseError::InvalidConfig {
                reason: format!("page size {} cannot hold a single tuple", self.page_size),
            });
        }
        if self.max_pages == 0 {
            return Err(DatabaseError::InvalidConfig {
                reason: "buffer pool needs room for at least one page".to_string(),
            });
        }
        Ok(())
    }
}
