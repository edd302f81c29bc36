use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use tracing::trace;

static NEXT_TX_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque transaction identifier. Ids are unique within the process and
/// increase in allocation order; none is ever reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TxId(u64);

// Each call draws a fresh id from the global counter
#[allow(clippy::new_without_default)]
impl TxId {
    pub fn new() -> Self {
        let id = TxId(NEXT_TX_ID.fetch_add(1, Ordering::Relaxed));
        trace!(tx_id = id.0, "start tx");
        id
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tx{}", self.0)
    }
}

#[derive(Debug)]
pub struct Transaction {
    id: TxId,
}

impl Transaction {
    pub fn begin() -> Self {
        Self { id: TxId::new() }
    }

    pub fn id(&self) -> TxId {
        self.id
    }

    // No locks or log records to release yet.
    pub fn finish(self) {
        trace!(tx_id = self.id.0, "finish tx");
    }
}
