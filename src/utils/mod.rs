pub mod bitset;
pub mod hash;
pub mod mock;
