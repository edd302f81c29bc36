use std::{env, path::PathBuf, process::ExitCode};

use heapdb::{
    executor::{scan::OpIterator, sequential_scan::SeqScan},
    storage::{config::DatabaseConfig, database::Database},
    types::{
        error::{DatabaseError, Result},
        transaction::TxId,
        tuple::{Tuple, TupleDesc},
        value::{DataType, Field},
    },
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("heapdb=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Creates a three column table, inserts a few rows and scans them back.
fn run(path: PathBuf) -> Result<()> {
    let db = Database::new(DatabaseConfig::default())?;
    let desc = TupleDesc::with_default_names(&[DataType::Int, DataType::Int, DataType::Int]);
    let table_id = db.create_table(&path, desc, "seqscan_table")?;
    let desc = db
        .catalog()
        .tuple_desc(&table_id)
        .ok_or_else(|| DatabaseError::TableNotFound {
            name: table_id.clone(),
        })?;
    info!(table_id = %table_id, desc = %desc, "created table");

    let tx_id = TxId::new();
    for i in 0..3 {
        let mut tuple = Tuple::new(
            desc.clone(),
            vec![Field::Int(9 - i), Field::Int(8 - i), Field::Int(7 - i)],
        );
        db.insert_tuple(tx_id, &table_id, &mut tuple)?;
    }

    let mut scan = SeqScan::new(&db, tx_id, &table_id, "seqscan")?;
    scan.open()?;
    while scan.has_next() {
        if let Some(tuple) = scan.next() {
            println!("{}", tuple);
        }
    }
    if let Some(e) = scan.error() {
        error!(error = %e, "scan failed");
    }
    scan.close();
    db.flush_all_pages()
}

fn main() -> ExitCode {
    init_logging();
    let path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("seqscan.data"));
    match run(path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "seqscan demo failed");
            ExitCode::FAILURE
        }
    }
}
