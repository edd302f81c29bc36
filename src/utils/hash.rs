use std::path::Path;

use sha1::{Digest, Sha1};

use crate::types::TableId;

/// Table identity: lowercase hex SHA-1 of the data file path as given.
pub fn table_id_for_path<P: AsRef<Path>>(path: P) -> TableId {
    let mut hasher = Sha1::new();
    hasher.update(path.as_ref().to_string_lossy().as_bytes());
    format!("{:x}", hasher.finalize())
}
