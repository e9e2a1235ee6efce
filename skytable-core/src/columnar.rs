//! This module collects data structures and operations on individual columns.

/// Module for defining the type-tagged payload shared by columns and arrays
pub(crate) mod data;

mod buffer;

/// Module for defining [Array]
pub mod array;
pub use array::Array;
/// Module for defining [Column]
pub mod column;
pub use column::{Column, NullSentinel, Ownership};

mod arithmetic;
mod cast;
mod statistics;
