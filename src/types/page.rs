use std::{fmt, io::Cursor, sync::Arc};

use parking_lot::RwLock;
use tracing::trace;

use crate::{
    types::{
        PageNum, SlotIndex, TableId,
        error::{DatabaseError, Result},
        transaction::TxId,
        tuple::{RecordId, Tuple, TupleDesc},
    },
    utils::bitset::BitSet,
};

/// Identifies a page by its table and zero-based position in the table's file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageId {
    pub table_id: TableId,
    pub page_num: PageNum,
}

impl PageId {
    pub fn new(table_id: impl Into<TableId>, page_num: PageNum) -> Self {
        Self {
            table_id: table_id.into(),
            page_num,
        }
    }

    /// Cache key, `"{table_id}-{page_num}"`.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.table_id, self.page_num)
    }
}

/// A page as held by the buffer pool. Heap pages are the only kind so far.
#[derive(Debug)]
pub enum Page {
    Heap(HeapPage),
}

/// Shared handle to a cached page.
pub type PageRef = Arc<RwLock<Page>>;

impl Page {
    pub fn into_ref(self) -> PageRef {
        Arc::new(RwLock::new(self))
    }

    pub fn page_id(&self) -> &PageId {
        match self {
            Page::Heap(page) => page.page_id(),
        }
    }

    pub fn tuple_desc(&self) -> &Arc<TupleDesc> {
        match self {
            Page::Heap(page) => page.tuple_desc(),
        }
    }

    /// `None` marks the page clean.
    pub fn mark_dirty(&mut self, tx_id: Option<TxId>) {
        match self {
            Page::Heap(page) => page.mark_dirty(tx_id),
        }
    }

    /// The transaction that dirtied this page, if any.
    pub fn is_dirty(&self) -> Option<TxId> {
        match self {
            Page::Heap(page) => page.is_dirty(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Page::Heap(page) => page.to_bytes(),
        }
    }

    pub fn as_heap(&self) -> Option<&HeapPage> {
        match self {
            Page::Heap(page) => Some(page),
        }
    }

    pub fn as_heap_mut(&mut self) -> Option<&mut HeapPage> {
        match self {
            Page::Heap(page) => Some(page),
        }
    }
}

/*
 * Heap Page Layout on Disk
 * ┌──────────────────────────────────────────────────────────────┐
 * │ HEADER BITMAP  ceil(N/8) bytes, bit i (LSB first) = slot i   │
 * ├──────────────────────────────────────────────────────────────┤
 * │ SLOT 0 | SLOT 1 | ... | SLOT N-1   (tuple size bytes each)   │
 * ├──────────────────────────────────────────────────────────────┤
 * │ zero padding up to the page size                             │
 * └──────────────────────────────────────────────────────────────┘
 * N = floor(page_size * 8 / (tuple_size * 8 + 1))
 */

#[derive(Debug, Clone)]
pub struct HeapPage {
    page_id: PageId,
    desc: Arc<TupleDesc>,
    page_size: usize,
    header: BitSet,
    slots: Vec<Option<Tuple>>,
    dirtied_by: Option<TxId>,
}

impl HeapPage {
    /// Number of tuple slots that fit a page, one presence bit per slot included.
    pub fn num_slots_for(page_size: usize, tuple_size: usize) -> usize {
        (page_size * 8) / (tuple_size * 8 + 1)
    }

    pub fn header_size_for(num_slots: usize) -> usize {
        BitSet::bytes_for(num_slots)
    }

    pub fn create_empty_page_data(page_size: usize) -> Vec<u8> {
        vec![0; page_size]
    }

    /// Decodes a page image. A clear slot consumes a full tuple-sized run of
    /// bytes, or nothing once the input is exhausted, so short zero-extended
    /// images are accepted.
    pub fn new(
        page_id: PageId,
        desc: Arc<TupleDesc>,
        data: &[u8],
        page_size: usize,
    ) -> Result<Self> {
        let num_slots = Self::num_slots_for(page_size, desc.size());
        let header_size = Self::header_size_for(num_slots);
        if data.len() < header_size {
            return Err(DatabaseError::CorruptedPage {
                page_id: page_id.to_string(),
                reason: format!(
                    "read header want {} bytes, get {}",
                    header_size,
                    data.len()
                ),
            });
        }

        let header = BitSet::from_bytes(data[..header_size].to_vec());
        let tuple_size = desc.size();
        let mut cursor = Cursor::new(&data[header_size..]);
        let mut slots = Vec::with_capacity(num_slots);

        for slot in 0..num_slots {
            let remaining = cursor.get_ref().len() - cursor.position() as usize;
            if !header.get(slot) {
                if remaining == 0 {
                    trace!(page_id = %page_id, slot, "page image ends before last slot");
                } else if remaining < tuple_size {
                    return Err(DatabaseError::CorruptedPage {
                        page_id: page_id.to_string(),
                        reason: format!(
                            "read size want {} bytes, get {} at slot {}",
                            tuple_size, remaining, slot
                        ),
                    });
                } else {
                    cursor.set_position(cursor.position() + tuple_size as u64);
                }
                slots.push(None);
                continue;
            }

            let mut fields = Vec::with_capacity(desc.num_fields());
            for item in &desc.items {
                let field = item.data_type.parse(&mut cursor).map_err(|e| {
                    DatabaseError::CorruptedPage {
                        page_id: page_id.to_string(),
                        reason: format!("read tuple {}th err: {}", slot, e),
                    }
                })?;
                fields.push(field);
            }
            slots.push(Some(Tuple {
                desc: Arc::clone(&desc),
                fields,
                record_id: Some(RecordId::new(page_id.clone(), slot)),
            }));
        }

        Ok(Self {
            page_id,
            desc,
            page_size,
            header,
            slots,
            dirtied_by: None,
        })
    }

    pub fn page_id(&self) -> &PageId {
        &self.page_id
    }

    pub fn tuple_desc(&self) -> &Arc<TupleDesc> {
        &self.desc
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn header(&self) -> &BitSet {
        &self.header
    }

    /// Slot capacity of this page.
    pub fn num_tuples(&self) -> usize {
        self.slots.len()
    }

    pub fn header_size(&self) -> usize {
        self.header.as_bytes().len()
    }

    pub fn is_slot_used(&self, slot: SlotIndex) -> bool {
        self.header.get(slot)
    }

    pub fn empty_tuple_num(&self) -> usize {
        (0..self.num_tuples())
            .filter(|&slot| !self.header.get(slot))
            .count()
    }

    pub fn tuple(&self, slot: SlotIndex) -> Option<&Tuple> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Occupied slots in slot order.
    pub fn tuples(&self) -> impl Iterator<Item = &Tuple> {
        self.slots.iter().flatten()
    }

    pub fn mark_dirty(&mut self, tx_id: Option<TxId>) {
        self.dirtied_by = tx_id;
    }

    pub fn is_dirty(&self) -> Option<TxId> {
        self.dirtied_by
    }

    /// Stores `tuple` in the first free slot and stamps its record id.
    pub fn insert_tuple(&mut self, tuple: &mut Tuple) -> Result<SlotIndex> {
        if !self.desc.is_compatible(&tuple.desc) {
            return Err(DatabaseError::TupleDescMismatch {
                expected: self.desc.to_string(),
                actual: tuple.desc.to_string(),
            });
        }
        let slot = (0..self.num_tuples())
            .find(|&slot| !self.header.get(slot))
            .ok_or_else(|| DatabaseError::PageFull {
                page_id: self.page_id.to_string(),
            })?;

        tuple.record_id = Some(RecordId::new(self.page_id.clone(), slot));
        self.slots[slot] = Some(tuple.clone());
        self.header.set(slot);
        Ok(slot)
    }

    /// Serializes to exactly one page of bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Self::create_empty_page_data(self.page_size);
        let header = self.header.as_bytes();
        buffer[..header.len()].copy_from_slice(header);

        let tuple_size = self.desc.size();
        let mut offset = header.len();
        for (slot, tuple) in self.slots.iter().enumerate() {
            if self.header.get(slot) {
                let tuple = tuple.as_ref().ok_or_else(|| DatabaseError::CorruptedPage {
                    page_id: self.page_id.to_string(),
                    reason: format!("slot {} is marked used but holds no tuple", slot),
                })?;
                let bytes = tuple.to_bytes()?;
                buffer[offset..offset + tuple_size].copy_from_slice(&bytes);
            }
            offset += tuple_size;
        }

        Ok(buffer)
    }
}
