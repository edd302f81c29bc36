use heapdb::{
    executor::{
        filter::Filter,
        predicate::Predicate,
        scan::{OpIterator, TupleStream},
        sequential_scan::SeqScan,
    },
    types::{
        error::DatabaseError,
        transaction::TxId,
        value::{ComparisonOp, Field},
    },
    utils::mock::{MockScan, TempDatabase, int_tuple},
};

fn drain<I: OpIterator>(iter: &mut I) -> Vec<String> {
    let mut rows = Vec::new();
    while iter.has_next() {
        if let Some(tuple) = iter.next() {
            rows.push(tuple.to_string());
        }
    }
    rows
}

#[test]
fn test_filter_less_than() -> Result<(), DatabaseError> {
    let mut filter = Filter::new(Predicate::lt(0, Field::Int(1)), MockScan::new(-5, 5, 2));
    filter.open()?;

    let expected: Vec<String> = (-5..=0).map(|k| format!("int({k})\tint({k})")).collect();
    assert_eq!(drain(&mut filter), expected);
    assert!(filter.error().is_none());
    Ok(())
}

#[test]
fn test_filter_each_operator() -> Result<(), DatabaseError> {
    let cases = [
        (ComparisonOp::Equal, 1),
        (ComparisonOp::Like, 1),
        (ComparisonOp::NotEqual, 9),
        (ComparisonOp::GreaterThan, 4),
        (ComparisonOp::GreaterThanOrEqual, 5),
        (ComparisonOp::LessThan, 5),
        (ComparisonOp::LessThanOrEqual, 6),
    ];
    for (op, expected) in cases {
        let mut filter = Filter::new(
            Predicate::new(1, op, Field::Int(0)),
            MockScan::new(-5, 5, 2),
        );
        filter.open()?;
        assert_eq!(drain(&mut filter).len(), expected, "operator {}", op);
    }
    Ok(())
}

#[test]
fn test_filter_out_of_range_field_matches_nothing() -> Result<(), DatabaseError> {
    let mut filter = Filter::new(Predicate::eq(5, Field::Int(0)), MockScan::new(-5, 5, 2));
    filter.open()?;
    assert!(!filter.has_next());
    assert!(filter.error().is_none());
    Ok(())
}

#[test]
fn test_filter_before_open() {
    let mut filter = Filter::new(Predicate::eq(0, Field::Int(0)), MockScan::new(0, 3, 1));
    assert!(!filter.has_next());
    assert!(matches!(filter.error(), Some(DatabaseError::NotOpen)));
    assert!(filter.next().is_none());
}

#[test]
fn test_filter_next_after_exhaustion() -> Result<(), DatabaseError> {
    let mut filter = Filter::new(Predicate::gt(0, Field::Int(1)), MockScan::new(0, 3, 1));
    filter.open()?;
    assert_eq!(filter.next().map(|t| t.fields[0]), Some(Field::Int(2)));
    assert!(filter.next().is_none());
    assert!(matches!(filter.error(), Some(DatabaseError::NoSuchElement)));
    Ok(())
}

#[test]
fn test_filter_rewind_and_close() -> Result<(), DatabaseError> {
    let mut filter = Filter::new(Predicate::ge(0, Field::Int(3)), MockScan::new(0, 5, 1));
    filter.open()?;
    assert_eq!(drain(&mut filter).len(), 2);
    filter.rewind()?;
    assert_eq!(drain(&mut filter).len(), 2);

    filter.close();
    assert!(!filter.has_next());
    assert!(matches!(filter.error(), Some(DatabaseError::NotOpen)));
    Ok(())
}

#[test]
fn test_filter_over_sequential_scan() -> Result<(), DatabaseError> {
    let mut temp_db = TempDatabase::new()?;
    let table_id = temp_db.create_table(3)?;
    let desc = temp_db.db.catalog().tuple_desc(&table_id).unwrap();
    let tx_id = TxId::new();
    for i in 0..20 {
        let mut tuple = int_tuple(&desc, i);
        temp_db.db.insert_tuple(tx_id, &table_id, &mut tuple)?;
    }

    let scan = SeqScan::new(&temp_db.db, tx_id, &table_id, "t")?;
    let mut filter = Filter::new(Predicate::le(2, Field::Int(4)), scan);
    filter.open()?;
    assert_eq!(filter.tuple_desc(), desc);

    let values: Vec<Field> = TupleStream::new(filter)
        .map(|t| t.map(|t| t.fields[0]))
        .collect::<Result<_, _>>()?;
    assert_eq!(values, (0..=4).map(Field::Int).collect::<Vec<_>>());
    Ok(())
}

#[test]
fn test_predicate_rendering() {
    assert_eq!(
        Predicate::lt(0, Field::Int(1)).to_string(),
        "f=0\top=<\toperand=int(1)"
    );
    assert_eq!(
        Predicate::new(2, ComparisonOp::Like, Field::Int(-4)).to_string(),
        "f=2\top=LIKE\toperand=int(-4)"
    );
}

#[test]
fn test_stream_over_unopened_filter_reports_not_open() {
    let filter = Filter::new(Predicate::eq(0, Field::Int(0)), MockScan::new(0, 3, 1));
    let results: Vec<_> = TupleStream::new(filter).collect();
    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], Err(DatabaseError::NotOpen)));
}
