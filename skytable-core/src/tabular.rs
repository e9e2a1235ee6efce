//! This module collects data structures and operations for tables.

/// Module for defining [Table]
pub mod table;
pub use table::Table;

/// Module for refining the row selection of a [Table]
pub mod selection;
pub use selection::Operator;

/// Module for sorting the rows of a [Table]
pub mod sort;
pub use sort::{Property, PropertyValue, SortCriteria, SortKey};

mod display;
