use std::{collections::HashMap, io::Read, sync::Arc};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    storage::{DbFile, heap_file::HeapFile},
    types::{
        TableId,
        error::Result,
        tuple::{TdItem, TupleDesc},
        value::DataType,
    },
};

/// One column entry of a schema document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(rename = "type", alias = "Type")]
    pub type_tag: String,
}

/// One table entry of a schema document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    #[serde(alias = "Filename")]
    pub filename: String,
    #[serde(rename = "td", alias = "TD", default)]
    pub columns: Vec<ColumnSchema>,
    #[serde(alias = "TableName", default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
}

impl TableSchema {
    pub fn tuple_desc(&self) -> Result<TupleDesc> {
        let items = self
            .columns
            .iter()
            .map(|column| Ok(TdItem::new(&column.name, DataType::from_tag(&column.type_tag)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(TupleDesc::from_items(items))
    }
}

/// Registry of every table's backing file, keyed by table id and by name.
/// Entries are never removed.
#[derive(Debug, Default)]
pub struct Catalog {
    tables: RwLock<HashMap<TableId, Arc<DbFile>>>,
    names: RwLock<HashMap<String, TableId>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `file` under its id and under `name`. Re-adding the same
    /// file replaces the previous entry.
    pub fn add_table(&self, file: DbFile, name: &str) -> TableId {
        let id = file.id().clone();
        self.tables.write().insert(id.clone(), Arc::new(file));
        self.names.write().insert(name.to_string(), id.clone());
        debug!(table_id = %id, name, "added table to catalog");
        id
    }

    pub fn table_by_id(&self, table_id: &str) -> Option<Arc<DbFile>> {
        self.tables.read().get(table_id).cloned()
    }

    pub fn table_by_name(&self, name: &str) -> Option<Arc<DbFile>> {
        let id = self.names.read().get(name).cloned()?;
        self.table_by_id(&id)
    }

    pub fn tuple_desc(&self, table_id: &str) -> Option<Arc<TupleDesc>> {
        self.table_by_id(table_id)
            .map(|file| Arc::clone(file.tuple_desc()))
    }

    pub fn table_ids(&self) -> Vec<TableId> {
        self.tables.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }

    /// Reads a JSON list of [`TableSchema`] entries, opens each data file and
    /// registers it. Returns the table ids in input order. Loading stops at the
    /// first failing entry; tables registered before it stay registered.
    pub fn load_schema<R: Read>(&self, reader: R, page_size: usize) -> Result<Vec<TableId>> {
        let schemas: Vec<TableSchema> = serde_json::from_reader(reader).inspect_err(|e| {
            warn!(error = %e, "failed to decode schema");
        })?;

        let mut table_ids = Vec::with_capacity(schemas.len());
        for schema in schemas {
            let desc = schema.tuple_desc().inspect_err(|e| {
                warn!(filename = %schema.filename, error = %e, "err in load schema from reader");
            })?;
            let heap_file = HeapFile::open(&schema.filename, Arc::new(desc), page_size)?;
            let id = heap_file.id().clone();
            let name = schema.table_name.as_deref().unwrap_or(id.as_str()).to_string();
            table_ids.push(self.add_table(DbFile::Heap(heap_file), &name));
        }
        Ok(table_ids)
    }
}
