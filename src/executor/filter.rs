use std::sync::Arc;

use crate::{
    executor::{predicate::Predicate, scan::OpIterator},
    types::{
        error::{DatabaseError, Result},
        tuple::{Tuple, TupleDesc},
    },
};

/// Passes through the child's tuples that satisfy a [`Predicate`].
pub struct Filter<C: OpIterator> {
    predicate: Predicate,
    child: C,
    open: bool,
    // First matching tuple found by has_next and not yet returned
    lookahead: Option<Tuple>,
    error: Option<DatabaseError>,
}

impl<C: OpIterator> Filter<C> {
    pub fn new(predicate: Predicate, child: C) -> Self {
        Self {
            predicate,
            child,
            open: false,
            lookahead: None,
            error: None,
        }
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn child(&self) -> &C {
        &self.child
    }

    fn fetch_next(&mut self) -> Option<Tuple> {
        while self.child.has_next() {
            let tuple = self.child.next()?;
            if self.predicate.filter(&tuple) {
                return Some(tuple);
            }
        }
        None
    }
}

impl<C: OpIterator> OpIterator for Filter<C> {
    fn open(&mut self) -> Result<()> {
        self.child.open()?;
        self.open = true;
        self.lookahead = None;
        self.error = None;
        Ok(())
    }

    fn close(&mut self) {
        self.child.close();
        self.open = false;
        self.lookahead = None;
    }

    fn has_next(&mut self) -> bool {
        if !self.open {
            self.error = Some(DatabaseError::NotOpen);
            return false;
        }
        if self.lookahead.is_none() {
            self.lookahead = self.fetch_next();
        }
        self.lookahead.is_some()
    }

    fn next(&mut self) -> Option<Tuple> {
        if !self.open {
            self.error = Some(DatabaseError::NotOpen);
            return None;
        }
        if self.lookahead.is_none() {
            self.lookahead = self.fetch_next();
            if self.lookahead.is_none() && self.child.error().is_none() {
                self.error = Some(DatabaseError::NoSuchElement);
            }
        }
        self.lookahead.take()
    }

    fn tuple_desc(&self) -> Arc<TupleDesc> {
        self.child.tuple_desc()
    }

    fn error(&self) -> Option<&DatabaseError> {
        self.error.as_ref().or_else(|| self.child.error())
    }

    fn take_error(&mut self) -> Option<DatabaseError> {
        self.error.take().or_else(|| self.child.take_error())
    }
}
