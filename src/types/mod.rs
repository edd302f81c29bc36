pub mod error;
pub mod page;
pub mod transaction;
pub mod tuple;
pub mod value;

// Common type aliases
pub type TableId = String;
pub type PageNum = usize;
pub type SlotIndex = usize;

// Used when the host page size cannot be queried
pub const FALLBACK_PAGE_SIZE: usize = 4096;
pub const DEFAULT_MAX_PAGES: usize = 50;

pub const INT_FIELD_SIZE: usize = 8;
pub const STRING_FIELD_SIZE: usize = 16;
