//! This module collects functionality specific to the supported value types.

/// Module for defining [NumericType], [ElementType] and [ColumnType]
pub mod column_type;
pub use column_type::{CastTarget, ColumnType, ElementType, NumericType};
/// Module for defining [Number] and [Value]
pub mod number;
pub use number::{ArithmeticOperator, Number, Value};
/// Module for defining [Element]
pub mod element;
pub use element::Element;
