use std::{
    fs::{self, File},
    path::PathBuf,
    sync::Arc,
};

use tempfile::TempDir;

use crate::{
    executor::scan::OpIterator,
    storage::{
        catalog::{ColumnSchema, TableSchema},
        config::DatabaseConfig,
        database::Database,
    },
    types::{
        TableId,
        error::{DatabaseError, Result},
        tuple::{Tuple, TupleDesc},
        value::{DataType, Field},
    },
};

/// A database whose table files live in a temporary directory removed on drop.
pub struct TempDatabase {
    pub dir: TempDir,
    pub db: Database,
    table_count: usize,
}

impl TempDatabase {
    pub fn new() -> Result<Self> {
        Self::with_config(DatabaseConfig::default())
    }

    pub fn with_config(config: DatabaseConfig) -> Result<Self> {
        Ok(Self {
            dir: tempfile::Builder::new().prefix("heapdb_test").tempdir()?,
            db: Database::new(config)?,
            table_count: 0,
        })
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.path().join(file_name)
    }

    /// Creates an empty data file with `num_fields` integer columns named
    /// `f0..` and registers it through a schema document, the same way tables
    /// are loaded at startup.
    pub fn create_table(&mut self, num_fields: usize) -> Result<TableId> {
        let path = self.path_for(&format!("table_{}.data", self.table_count));
        self.table_count += 1;
        File::create(&path)?;

        let schema = vec![TableSchema {
            filename: path.display().to_string(),
            columns: (0..num_fields)
                .map(|i| ColumnSchema {
                    name: format!("f{}", i),
                    type_tag: "int".to_string(),
                })
                .collect(),
            table_name: None,
        }];
        let schema = serde_json::to_string(&schema)?;
        fs::write(path.with_extension("schema.json"), &schema)?;

        let mut ids = self.db.load_schema(schema.as_bytes())?;
        ids.pop().ok_or_else(|| DatabaseError::TableNotFound {
            name: path.display().to_string(),
        })
    }
}

/// Integer descriptor with `width` columns named `{prefix}0..`.
pub fn int_tuple_desc(width: usize, prefix: &str) -> TupleDesc {
    let types = vec![DataType::Int; width];
    let names: Vec<String> = (0..width).map(|i| format!("{}{}", prefix, i)).collect();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    TupleDesc::new(&types, &names)
}

/// Tuple of `width` copies of `value`.
pub fn int_tuple(desc: &Arc<TupleDesc>, value: i64) -> Tuple {
    Tuple::new(Arc::clone(desc), vec![Field::Int(value); desc.num_fields()])
}

/// Yields rows `low..high`, each row holding its value in every column.
pub struct MockScan {
    low: i64,
    high: i64,
    desc: Arc<TupleDesc>,
    // None while unopened or closed
    current: Option<i64>,
    error: Option<DatabaseError>,
}

impl MockScan {
    pub fn new(low: i64, high: i64, width: usize) -> Self {
        Self {
            low,
            high,
            desc: Arc::new(int_tuple_desc(width, "scan")),
            current: None,
            error: None,
        }
    }
}

impl OpIterator for MockScan {
    fn open(&mut self) -> Result<()> {
        self.current = Some(self.low);
        self.error = None;
        Ok(())
    }

    fn close(&mut self) {
        self.current = None;
    }

    fn has_next(&mut self) -> bool {
        match self.current {
            Some(current) => current < self.high,
            None => {
                self.error = Some(DatabaseError::NotOpen);
                false
            }
        }
    }

    fn next(&mut self) -> Option<Tuple> {
        let Some(current) = self.current else {
            self.error = Some(DatabaseError::NotOpen);
            return None;
        };
        if current >= self.high {
            self.error = Some(DatabaseError::NoSuchElement);
            return None;
        }
        self.current = Some(current + 1);
        Some(int_tuple(&self.desc, current))
    }

    fn tuple_desc(&self) -> Arc<TupleDesc> {
        Arc::clone(&self.desc)
    }

    fn error(&self) -> Option<&DatabaseError> {
        self.error.as_ref()
    }

    fn take_error(&mut self) -> Option<DatabaseError> {
        self.error.take()
    }
}
