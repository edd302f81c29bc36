use std::sync::Arc;

use crate::types::{
    error::{DatabaseError, Result},
    tuple::{Tuple, TupleDesc},
};

/// Pull-based row producer shared by every operator.
///
/// Lifecycle is unopened -> open -> closed, with [`OpIterator::rewind`]
/// returning to the start of an open iterator. Calling `has_next` or `next`
/// outside the open state records [`DatabaseError::NotOpen`] instead of
/// panicking, so callers check [`OpIterator::error`] after each call.
pub trait OpIterator {
    /// Must be called before any other method.
    fn open(&mut self) -> Result<()>;

    fn close(&mut self);

    fn has_next(&mut self) -> bool;

    /// Meant to follow a `has_next` that returned true.
    fn next(&mut self) -> Option<Tuple>;

    fn rewind(&mut self) -> Result<()> {
        self.close();
        self.open()
    }

    fn tuple_desc(&self) -> Arc<TupleDesc>;

    /// The last fault seen while iterating.
    fn error(&self) -> Option<&DatabaseError>;

    /// Hands over the last fault, clearing it.
    fn take_error(&mut self) -> Option<DatabaseError>;
}

/// Adapts an opened [`OpIterator`] to [`Iterator`]. The operator's own error
/// is yielded as is, after which the stream ends.
pub struct TupleStream<I: OpIterator> {
    inner: I,
    failed: bool,
}

impl<I: OpIterator> TupleStream<I> {
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            failed: false,
        }
    }

    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<I: OpIterator> Iterator for TupleStream<I> {
    type Item = Result<Tuple>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let tuple = if self.inner.has_next() {
            self.inner.next()
        } else {
            None
        };
        if let Some(e) = self.inner.take_error() {
            self.failed = true;
            return Some(Err(e));
        }
        tuple.map(Ok)
    }
}
