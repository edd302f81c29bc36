use std::sync::Arc;

use heapdb::{
    executor::{
        scan::{OpIterator, TupleStream},
        tuple_iterator::TupleIterator,
    },
    types::{
        error::DatabaseError,
        value::{DataType, Field},
    },
    utils::mock::{int_tuple, int_tuple_desc},
};

#[test]
fn test_skips_missing_entries() -> Result<(), DatabaseError> {
    let desc = Arc::new(int_tuple_desc(2, "c"));
    let mut iter = TupleIterator::new(
        Arc::clone(&desc),
        vec![
            None,
            Some(int_tuple(&desc, 1)),
            None,
            None,
            Some(int_tuple(&desc, 2)),
            None,
        ],
    );
    iter.open()?;

    let mut values = Vec::new();
    while iter.has_next() {
        values.push(iter.next().unwrap().fields[0]);
    }
    assert_eq!(values, vec![Field::Int(1), Field::Int(2)]);
    assert!(iter.error().is_none());
    Ok(())
}

#[test]
fn test_has_next_is_idempotent() -> Result<(), DatabaseError> {
    let desc = Arc::new(int_tuple_desc(1, "c"));
    let mut iter = TupleIterator::from_tuples(Arc::clone(&desc), vec![int_tuple(&desc, 7)]);
    iter.open()?;
    assert!(iter.has_next());
    assert!(iter.has_next());
    assert_eq!(iter.next().map(|t| t.fields[0]), Some(Field::Int(7)));
    assert!(!iter.has_next());
    Ok(())
}

#[test]
fn test_next_without_pending_tuple() -> Result<(), DatabaseError> {
    let desc = Arc::new(int_tuple_desc(1, "c"));
    let mut iter = TupleIterator::from_tuples(Arc::clone(&desc), vec![]);
    iter.open()?;
    assert!(!iter.has_next());
    assert!(iter.next().is_none());
    assert!(matches!(iter.error(), Some(DatabaseError::NoSuchElement)));
    Ok(())
}

#[test]
fn test_unopened_iterator() {
    let desc = Arc::new(int_tuple_desc(1, "c"));
    let mut iter = TupleIterator::from_tuples(Arc::clone(&desc), vec![int_tuple(&desc, 1)]);
    assert!(!iter.has_next());
    assert!(matches!(iter.error(), Some(DatabaseError::NotOpen)));
}

#[test]
fn test_rewind_and_stream() -> Result<(), DatabaseError> {
    let desc = Arc::new(int_tuple_desc(1, "c"));
    let tuples = (0..4).map(|i| int_tuple(&desc, i)).collect();
    let mut iter = TupleIterator::from_tuples(Arc::clone(&desc), tuples);
    iter.open()?;
    while iter.has_next() {
        iter.next();
    }
    iter.rewind()?;

    assert_eq!(iter.tuple_desc().field_type(0), Some(DataType::Int));
    let rows = TupleStream::new(iter).collect::<Result<Vec<_>, _>>()?;
    assert_eq!(rows.len(), 4);
    Ok(())
}

#[test]
fn test_stream_yields_operator_error_unchanged() {
    let desc = Arc::new(int_tuple_desc(1, "c"));
    let iter = TupleIterator::from_tuples(Arc::clone(&desc), vec![int_tuple(&desc, 1)]);

    // never opened
    let mut stream = TupleStream::new(iter);
    assert!(matches!(stream.next(), Some(Err(DatabaseError::NotOpen))));
    assert!(stream.next().is_none());
}

#[test]
fn test_take_error_clears_it() -> Result<(), DatabaseError> {
    let desc = Arc::new(int_tuple_desc(1, "c"));
    let mut iter = TupleIterator::from_tuples(Arc::clone(&desc), vec![]);
    iter.open()?;
    assert!(iter.next().is_none());
    assert!(matches!(iter.take_error(), Some(DatabaseError::NoSuchElement)));
    assert!(iter.error().is_none());
    assert!(iter.take_error().is_none());
    Ok(())
}
