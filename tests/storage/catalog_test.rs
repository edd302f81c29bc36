use std::fs::File;

use serde_json::json;

use heapdb::{
    storage::{
        DbFile,
        catalog::{Catalog, TableSchema},
        heap_file::HeapFile,
    },
    types::{error::DatabaseError, value::DataType},
    utils::{hash::table_id_for_path, mock::TempDatabase},
};

const PAGE_SIZE: usize = 4096;

fn touch(temp_db: &TempDatabase, name: &str) -> String {
    let path = temp_db.path_for(name);
    File::create(&path).unwrap();
    path.display().to_string()
}

#[test]
fn test_load_schema_registers_tables() -> Result<(), DatabaseError> {
    let temp_db = TempDatabase::new()?;
    let first = touch(&temp_db, "first.dat");
    let second = touch(&temp_db, "second.dat");
    let schema = json!([
        { "filename": first, "td": [{ "name": "c0", "type": "int" }] },
        {
            "filename": second,
            "td": [{ "name": "a", "type": "int" }, { "name": "b", "type": "int" }],
            "table_name": "pairs"
        }
    ]);

    let catalog = Catalog::new();
    let ids = catalog.load_schema(schema.to_string().as_bytes(), PAGE_SIZE)?;
    assert_eq!(ids, vec![table_id_for_path(&first), table_id_for_path(&second)]);
    assert_eq!(catalog.len(), 2);

    let desc = catalog.tuple_desc(&ids[0]).unwrap();
    assert_eq!(desc.num_fields(), 1);
    assert_eq!(desc.field_name(0), Some("c0"));
    assert_eq!(desc.field_type(0), Some(DataType::Int));

    let pairs = catalog.table_by_name("pairs").unwrap();
    assert_eq!(pairs.id(), &ids[1]);
    assert_eq!(pairs.tuple_desc().to_string(), "a(int64(8)),b(int64(8))");

    // without a table name the id doubles as the name
    assert!(catalog.table_by_name(&ids[0]).is_some());
    Ok(())
}

#[test]
fn test_load_schema_accepts_capitalized_keys() -> Result<(), DatabaseError> {
    let temp_db = TempDatabase::new()?;
    let path = touch(&temp_db, "caps.dat");
    let schema = json!([
        {
            "Filename": path,
            "TD": [{ "Name": "x", "Type": "int" }],
            "TableName": "caps"
        }
    ]);

    let catalog = Catalog::new();
    let ids = catalog.load_schema(schema.to_string().as_bytes(), PAGE_SIZE)?;
    assert_eq!(ids.len(), 1);
    assert_eq!(catalog.table_by_name("caps").unwrap().id(), &ids[0]);
    Ok(())
}

#[test]
fn test_unknown_type_stops_loading() -> Result<(), DatabaseError> {
    let temp_db = TempDatabase::new()?;
    let good = touch(&temp_db, "good.dat");
    let bad = touch(&temp_db, "bad.dat");
    let schema = json!([
        { "filename": good, "td": [{ "name": "c0", "type": "int" }] },
        { "filename": bad, "td": [{ "name": "c0", "type": "string" }] }
    ]);

    let catalog = Catalog::new();
    let result = catalog.load_schema(schema.to_string().as_bytes(), PAGE_SIZE);
    assert!(matches!(
        result,
        Err(DatabaseError::UnknownType { type_name }) if type_name == "string"
    ));
    assert_eq!(catalog.len(), 1);
    assert!(catalog.table_by_id(&table_id_for_path(&good)).is_some());
    Ok(())
}

#[test]
fn test_load_schema_missing_file() -> Result<(), DatabaseError> {
    let temp_db = TempDatabase::new()?;
    let missing = temp_db.path_for("missing.dat").display().to_string();
    let schema = json!([{ "filename": missing, "td": [] }]);

    let catalog = Catalog::new();
    let result = catalog.load_schema(schema.to_string().as_bytes(), PAGE_SIZE);
    assert!(matches!(result, Err(DatabaseError::Io(_))));
    assert!(catalog.is_empty());
    Ok(())
}

#[test]
fn test_load_schema_malformed_json() {
    let catalog = Catalog::new();
    let result = catalog.load_schema(&b"{ not json"[..], PAGE_SIZE);
    assert!(matches!(result, Err(DatabaseError::SchemaDecode(_))));
}

#[test]
fn test_schema_serializes_lowercase_keys() {
    let schema: TableSchema =
        serde_json::from_str(r#"{"Filename":"f.dat","TD":[{"Name":"a","Type":"int"}]}"#).unwrap();
    let value = serde_json::to_value(&schema).unwrap();
    assert_eq!(
        value,
        json!({ "filename": "f.dat", "td": [{ "name": "a", "type": "int" }] })
    );
}

#[test]
fn test_add_table_by_name() -> Result<(), DatabaseError> {
    let temp_db = TempDatabase::new()?;
    let path = touch(&temp_db, "named.dat");
    let desc = TableSchema {
        filename: path.clone(),
        columns: vec![],
        table_name: None,
    }
    .tuple_desc()?;
    let file = HeapFile::open(&path, desc.into(), PAGE_SIZE)?;

    let catalog = Catalog::new();
    let id = catalog.add_table(DbFile::Heap(file), "named");
    assert_eq!(id, table_id_for_path(&path));
    assert_eq!(catalog.table_ids(), vec![id.clone()]);
    assert!(catalog.table_by_name("named").is_some());
    assert!(catalog.table_by_name("other").is_none());
    assert!(catalog.table_by_id("nope").is_none());
    Ok(())
}

