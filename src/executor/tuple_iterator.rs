use std::sync::Arc;

use crate::{
    executor::scan::OpIterator,
    types::{
        error::{DatabaseError, Result},
        tuple::{Tuple, TupleDesc},
    },
};

/// Iterates a fixed in-memory list. `None` entries stand for deleted rows and
/// are skipped.
pub struct TupleIterator {
    desc: Arc<TupleDesc>,
    tuples: Vec<Option<Tuple>>,
    // None while unopened or closed
    index: Option<usize>,
    pending: Option<Tuple>,
    error: Option<DatabaseError>,
}

impl TupleIterator {
    pub fn new(desc: Arc<TupleDesc>, tuples: Vec<Option<Tuple>>) -> Self {
        Self {
            desc,
            tuples,
            index: None,
            pending: None,
            error: None,
        }
    }

    pub fn from_tuples(desc: Arc<TupleDesc>, tuples: Vec<Tuple>) -> Self {
        Self::new(desc, tuples.into_iter().map(Some).collect())
    }
}

impl OpIterator for TupleIterator {
    fn open(&mut self) -> Result<()> {
        self.index = Some(0);
        self.pending = None;
        self.error = None;
        Ok(())
    }

    fn close(&mut self) {
        self.index = None;
        self.pending = None;
    }

    fn has_next(&mut self) -> bool {
        let Some(mut index) = self.index else {
            self.error = Some(DatabaseError::NotOpen);
            return false;
        };
        while index < self.tuples.len() {
            if let Some(tuple) = &self.tuples[index] {
                self.pending = Some(tuple.clone());
                self.index = Some(index);
                return true;
            }
            index += 1;
        }
        self.index = Some(index);
        self.pending = None;
        false
    }

    fn next(&mut self) -> Option<Tuple> {
        let Some(index) = self.index else {
            self.error = Some(DatabaseError::NotOpen);
            return None;
        };
        match self.pending.take() {
            Some(tuple) => {
                self.index = Some(index + 1);
                Some(tuple)
            }
            None => {
                self.error = Some(DatabaseError::NoSuchElement);
                None
            }
        }
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
