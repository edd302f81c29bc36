use std::{cmp::Ordering, fmt, io::Read};

use serde::{Deserialize, Serialize};

use crate::types::{
    INT_FIELD_SIZE, STRING_FIELD_SIZE,
    error::{DatabaseError, Result},
};

/// Scalar column type. Every type has a fixed encoded length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Int,
    /// Declared so schemas can name it, decoding is not implemented.
    String,
}

impl DataType {
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Int => "int64",
            DataType::String => "string",
        }
    }

    /// Encoded byte length of one field of this type.
    pub fn byte_len(&self) -> usize {
        match self {
            DataType::Int => INT_FIELD_SIZE,
            DataType::String => STRING_FIELD_SIZE,
        }
    }

    /// Reads exactly `self.byte_len()` bytes from `reader` and decodes them.
    ///
    /// Panics for [`DataType::String`].
    pub fn parse<R: Read>(&self, reader: &mut R) -> Result<Field> {
        let mut buf = vec![0u8; self.byte_len()];
        reader.read_exact(&mut buf)?;
        match self {
            DataType::Int => Field::from_bytes(*self, &buf),
            DataType::String => unimplemented!("string fields cannot be decoded"),
        }
    }

    /// Maps a schema type tag to a type. Only `"int"` is recognized.
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag {
            "int" => Ok(DataType::Int),
            other => Err(DatabaseError::UnknownType {
                type_name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.byte_len())
    }
}

/// Comparison operators understood by [`Field::compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ComparisonOp {
    Equal = 0,
    GreaterThan = 1,
    LessThan = 2,
    GreaterThanOrEqual = 3,
    LessThanOrEqual = 4,
    Like = 5,
    NotEqual = 6,
}

impl TryFrom<u8> for ComparisonOp {
    type Error = u8;

    fn try_from(code: u8) -> std::result::Result<Self, u8> {
        match code {
            0 => Ok(ComparisonOp::Equal),
            1 => Ok(ComparisonOp::GreaterThan),
            2 => Ok(ComparisonOp::LessThan),
            3 => Ok(ComparisonOp::GreaterThanOrEqual),
            4 => Ok(ComparisonOp::LessThanOrEqual),
            5 => Ok(ComparisonOp::Like),
            6 => Ok(ComparisonOp::NotEqual),
            other => Err(other),
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            ComparisonOp::Equal => "=",
            ComparisonOp::GreaterThan => ">",
            ComparisonOp::LessThan => "<",
            ComparisonOp::GreaterThanOrEqual => ">=",
            ComparisonOp::LessThanOrEqual => "<=",
            ComparisonOp::Like => "LIKE",
            ComparisonOp::NotEqual => "!=",
        };
        f.write_str(symbol)
    }
}

/// A single typed value inside a tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Int(i64),
}

impl Field {
    pub fn data_type(&self) -> DataType {
        match self {
            Field::Int(_) => DataType::Int,
        }
    }

    /// Little-endian encoding, always `data_type().byte_len()` bytes long.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Field::Int(v) => v.to_le_bytes().to_vec(),
        }
    }

    pub fn from_bytes(data_type: DataType, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != data_type.byte_len() {
            return Err(DatabaseError::SerializationError {
                details: format!(
                    "{} needs {} bytes, got {}",
                    data_type,
                    data_type.byte_len(),
                    bytes.len()
                ),
            });
        }
        match data_type {
            DataType::Int => {
                let mut raw = [0u8; INT_FIELD_SIZE];
                raw.copy_from_slice(bytes);
                Ok(Field::Int(i64::from_le_bytes(raw)))
            }
            DataType::String => unimplemented!("string fields cannot be decoded"),
        }
    }

    /// Evaluates `self op other`. Values of different kinds never compare true.
    /// `LIKE` on integers is plain equality.
    pub fn compare(&self, op: ComparisonOp, other: &Field) -> bool {
        let ordering = match (self, other) {
            (Field::Int(a), Field::Int(b)) => a.cmp(b),
        };
        match op {
            ComparisonOp::Equal | ComparisonOp::Like => ordering == Ordering::Equal,
            ComparisonOp::NotEqual => ordering != Ordering::Equal,
            ComparisonOp::LessThan => ordering == Ordering::Less,
            ComparisonOp::LessThanOrEqual => ordering != Ordering::Greater,
            ComparisonOp::GreaterThan => ordering == Ordering::Greater,
            ComparisonOp::GreaterThanOrEqual => ordering != Ordering::Less,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Int(v) => write!(f, "int({})", v),
        }
    }
}
