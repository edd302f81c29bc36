use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Schema decoding error: {0}")]
    SchemaDecode(#[from] serde_json::Error),

    #[error("Serialization/deserialization error: {details}")]
    SerializationError { details: String },

    #[error("Page is full (page_id: {page_id})")]
    PageFull { page_id: String },

    #[error("Tuple desc mismatch: page has [{expected}], tuple has [{actual}]")]
    TupleDescMismatch { expected: String, actual: String },

    #[error("Field count mismatch: expected {expected}, got {actual}")]
    FieldCountMismatch { expected: usize, actual: usize },

    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("Failed to insert this tuple into table {table_id}")]
    InsertFailed { table_id: String },

    #[error("Table '{name}' not found")]
    TableNotFound { name: String },

    #[error("Unknown type {type_name}")]
    UnknownType { type_name: String },

    #[error("Corrupted page: page_id={page_id}, reason={reason}")]
    CorruptedPage { page_id: String, reason: String },

    #[error("Invalid page size: expected {expected} bytes, got {actual} bytes")]
    InvalidPageSize { expected: usize, actual: usize },

    #[error("Page count of table {table_id} is unknown")]
    UnknownPageCount { table_id: String },

    #[error("Operator not yet open")]
    NotOpen,

    #[error("No such element")]
    NoSuchElement,

    #[error("Cannot resolve iterator for table {table_id}")]
    CannotResolveIterator { table_id: String },

    #[error("Buffer pool exhausted")]
    BufferPoolExhausted,

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

pub type Result<T> = std::result::Result<T, DatabaseError>;
