pub mod filter;
pub mod predicate;
pub mod scan;
pub mod sequential_scan;
pub mod tuple_iterator;
