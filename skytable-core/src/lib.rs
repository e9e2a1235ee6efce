//! This crate implements the in-memory columnar table engine of the
//! skytable data reduction library.
//!
//! A [Table][tabular::Table] holds named columns of equal length.
//! Every column stores scalars, strings or fixed-depth arrays of one
//! [value type][datatypes::ColumnType], keeps track of which of its
//! elements are invalid, and takes part in row selection and sorting
//! of the table as a whole.

#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts
)]
#![warn(
    missing_docs,
    unused_import_braces,
    unused_qualifications,
    unused_extern_crates,
    clippy::cast_possible_wrap
)]

pub mod columnar;
pub mod datatypes;
pub mod error;
pub mod tabular;
pub(crate) mod util;

pub use columnar::{Array, Column, NullSentinel, Ownership};
pub use datatypes::{CastTarget, ColumnType, Element, ElementType, Number, NumericType, Value};
pub use error::Error;
pub use tabular::{Operator, Property, PropertyValue, SortCriteria, SortKey, Table};
