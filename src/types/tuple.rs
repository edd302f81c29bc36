use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::types::{
    SlotIndex,
    error::{DatabaseError, Result},
    page::PageId,
    value::{DataType, Field},
};

/// One column of a [`TupleDesc`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TdItem {
    pub name: String,
    pub data_type: DataType,
}

impl TdItem {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

impl fmt::Display for TdItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.data_type)
    }
}

/// Ordered column schema of a table. Column order is the on-disk field order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TupleDesc {
    pub items: Vec<TdItem>,
}

impl TupleDesc {
    /// Pairs `types` with `names`; columns without a name get `field{i}`.
    pub fn new(types: &[DataType], names: &[&str]) -> Self {
        let items = types
            .iter()
            .enumerate()
            .map(|(i, data_type)| match names.get(i) {
                Some(name) => TdItem::new(*name, *data_type),
                None => TdItem::new(format!("field{}", i), *data_type),
            })
            .collect();
        Self { items }
    }

    pub fn with_default_names(types: &[DataType]) -> Self {
        Self::new(types, &[])
    }

    pub fn from_items(items: Vec<TdItem>) -> Self {
        Self { items }
    }

    pub fn num_fields(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn field_name(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(|item| item.name.as_str())
    }

    pub fn field_type(&self, index: usize) -> Option<DataType> {
        self.items.get(index).map(|item| item.data_type)
    }

    /// Byte size of one encoded tuple.
    pub fn size(&self) -> usize {
        self.items.iter().map(|item| item.data_type.byte_len()).sum()
    }

    /// Structural equality used to admit tuples into a page: same column count
    /// and the same type at every position. Names are ignored and an empty
    /// descriptor is compatible with nothing.
    pub fn is_compatible(&self, other: &TupleDesc) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.items.len() == other.items.len()
            && self
                .items
                .iter()
                .zip(&other.items)
                .all(|(a, b)| a.data_type == b.data_type)
    }
}

impl fmt::Display for TupleDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", item)?;
        }
        Ok(())
    }
}

/// Location of a stored tuple: the page it lives on and its slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId {
    pub page_id: PageId,
    pub slot: SlotIndex,
}

impl RecordId {
    pub fn new(page_id: PageId, slot: SlotIndex) -> Self {
        Self { page_id, slot }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tuple {
    pub desc: Arc<TupleDesc>,
    pub fields: Vec<Field>,
    pub record_id: Option<RecordId>,
}

impl Tuple {
    pub fn new(desc: Arc<TupleDesc>, fields: Vec<Field>) -> Self {
        Self {
            desc,
            fields,
            record_id: None,
        }
    }

    pub fn get_field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// Concatenates the field encodings in column order.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        if self.fields.len() != self.desc.num_fields() {
            return Err(DatabaseError::FieldCountMismatch {
                expected: self.desc.num_fields(),
                actual: self.fields.len(),
            });
        }
        let mut buffer = Vec::with_capacity(self.desc.size());
        for (field, item) in self.fields.iter().zip(&self.desc.items) {
            if field.data_type() != item.data_type {
                return Err(DatabaseError::TypeMismatch {
                    expected: item.data_type.to_string(),
                    actual: field.data_type().to_string(),
                });
            }
            buffer.extend_from_slice(&field.to_bytes());
        }
        Ok(buffer)
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str("\t")?;
            }
            write!(f, "{}", field)?;
        }
        Ok(())
    }
}
