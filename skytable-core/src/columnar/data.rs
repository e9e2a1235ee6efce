//! This module defines [ColumnData], the type-tagged payload of a column or array.

use std::ops::Range;

use num::complex::{Complex32, Complex64};

use crate::datatypes::{ColumnType, Element, ElementType, Number, NumericType};

use super::Array;

/// Payload of a column or array, one vector per supported element type.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Case `Vec<bool>`
    Bool(Vec<bool>),
    /// Case `Vec<i8>`
    Char(Vec<i8>),
    /// Case `Vec<u8>`
    UChar(Vec<u8>),
    /// Case `Vec<i16>`
    Short(Vec<i16>),
    /// Case `Vec<i32>`
    Int(Vec<i32>),
    /// Case `Vec<i64>` for [NumericType::Long]
    Long(Vec<i64>),
    /// Case `Vec<i64>` for [NumericType::LongLong]
    LongLong(Vec<i64>),
    /// Case `Vec<f32>`
    Float(Vec<f32>),
    /// Case `Vec<f64>`
    Double(Vec<f64>),
    /// Case `Vec<Complex32>`
    FloatComplex(Vec<Complex32>),
    /// Case `Vec<Complex64>`
    DoubleComplex(Vec<Complex64>),
    /// Strings, [None] marks a released slot
    Text(Vec<Option<String>>),
    /// Arrays, [None] marks a null slot
    Array(Vec<Option<Array>>),
}

impl Default for ColumnData {
    fn default() -> Self {
        Self::Double(Vec::new())
    }
}

/// Dispatch over every variant of [ColumnData],
/// binding the contained vector to `$values`.
macro_rules! forward_to_vec {
    ($data:expr, $values:ident => $body:expr) => {
        match $data {
            $crate::columnar::data::ColumnData::Bool($values) => $body,
            $crate::columnar::data::ColumnData::Char($values) => $body,
            $crate::columnar::data::ColumnData::UChar($values) => $body,
            $crate::columnar::data::ColumnData::Short($values) => $body,
            $crate::columnar::data::ColumnData::Int($values) => $body,
            $crate::columnar::data::ColumnData::Long($values) => $body,
            $crate::columnar::data::ColumnData::LongLong($values) => $body,
            $crate::columnar::data::ColumnData::Float($values) => $body,
            $crate::columnar::data::ColumnData::Double($values) => $body,
            $crate::columnar::data::ColumnData::FloatComplex($values) => $body,
            $crate::columnar::data::ColumnData::DoubleComplex($values) => $body,
            $crate::columnar::data::ColumnData::Text($values) => $body,
            $crate::columnar::data::ColumnData::Array($values) => $body,
        }
    };
}

/// Dispatch over the numeric variants of [ColumnData],
/// binding the contained vector to `$values`.
/// The remaining match arms are given after the body.
macro_rules! forward_to_numeric {
    ($data:expr, $values:ident => $body:expr, $($other:tt)+) => {
        match $data {
            $crate::columnar::data::ColumnData::Bool($values) => $body,
            $crate::columnar::data::ColumnData::Char($values) => $body,
            $crate::columnar::data::ColumnData::UChar($values) => $body,
            $crate::columnar::data::ColumnData::Short($values) => $body,
            $crate::columnar::data::ColumnData::Int($values) => $body,
            $crate::columnar::data::ColumnData::Long($values) => $body,
            $crate::columnar::data::ColumnData::LongLong($values) => $body,
            $crate::columnar::data::ColumnData::Float($values) => $body,
            $crate::columnar::data::ColumnData::Double($values) => $body,
            $crate::columnar::data::ColumnData::FloatComplex($values) => $body,
            $crate::columnar::data::ColumnData::DoubleComplex($values) => $body,
            $($other)+
        }
    };
}
pub(crate) use forward_to_numeric;

/// Like [forward_to_vec], but wraps the resulting vector
/// into the same variant of [ColumnData].
macro_rules! map_vec {
    (@arms $data:expr, $values:ident => $body:expr; $($variant:ident),+) => {
        match $data {
            $( ColumnData::$variant($values) => ColumnData::$variant($body), )+
        }
    };
    ($data:expr, $values:ident => $body:expr) => {
        map_vec!(@arms $data, $values => $body;
            Bool, Char, UChar, Short, Int, Long, LongLong,
            Float, Double, FloatComplex, DoubleComplex, Text, Array)
    };
}

/// Splice the vector of `$source` into `$target` if both are the same variant.
macro_rules! splice_same_variant {
    ($target:expr, $source:expr, $at:expr; $($variant:ident),+) => {
        match ($target, $source) {
            $(
                (ColumnData::$variant(target), ColumnData::$variant(source)) => {
                    target.splice($at..$at, source.iter().cloned()).for_each(drop);
                    true
                }
            )+
            _ => false,
        }
    };
}

fn insert_default<T: Default>(values: &mut Vec<T>, at: usize, amount: usize) {
    values
        .splice(at..at, std::iter::repeat_with(T::default).take(amount))
        .for_each(drop);
}

fn gather<T: Clone>(values: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&index| values[index].clone()).collect()
}

/// Reorder such that position `i` receives the element at `order[i]`.
/// Elements are moved, never cloned.
fn permute<T: Default>(values: &mut Vec<T>, order: &[usize]) {
    let mut previous = std::mem::take(values);
    *values = order
        .iter()
        .map(|&index| std::mem::take(&mut previous[index]))
        .collect();
}

impl ColumnData {
    /// Create the payload of a freshly created column.
    pub(crate) fn new(column_type: ColumnType, len: usize) -> Self {
        match column_type {
            ColumnType::Scalar(numeric) => Self::numeric(numeric, len),
            ColumnType::Text => Self::Text(vec![None; len]),
            ColumnType::Array(_, _) => Self::Array(std::iter::repeat_with(|| None).take(len).collect()),
        }
    }

    /// Create the payload of a freshly created array.
    pub(crate) fn element(element: ElementType, len: usize) -> Self {
        match element {
            ElementType::Numeric(numeric) => Self::numeric(numeric, len),
            ElementType::Text => Self::Text(vec![None; len]),
        }
    }

    /// Create a zero-filled numeric payload.
    pub(crate) fn numeric(numeric: NumericType, len: usize) -> Self {
        Self::from_numbers(numeric, std::iter::repeat(Number::Integer(0)).take(len))
    }

    /// Create a numeric payload by converting each of the given numbers.
    pub(crate) fn from_numbers<I: Iterator<Item = Number>>(numeric: NumericType, numbers: I) -> Self {
        match numeric {
            NumericType::Bool => Self::Bool(numbers.map(Element::from_number).collect()),
            NumericType::Char => Self::Char(numbers.map(Element::from_number).collect()),
            NumericType::UChar => Self::UChar(numbers.map(Element::from_number).collect()),
            NumericType::Short => Self::Short(numbers.map(Element::from_number).collect()),
            NumericType::Int => Self::Int(numbers.map(Element::from_number).collect()),
            NumericType::Long => Self::Long(numbers.map(Element::from_number).collect()),
            NumericType::LongLong => Self::LongLong(numbers.map(Element::from_number).collect()),
            NumericType::Float => Self::Float(numbers.map(Element::from_number).collect()),
            NumericType::Double => Self::Double(numbers.map(Element::from_number).collect()),
            NumericType::FloatComplex => {
                Self::FloatComplex(numbers.map(Element::from_number).collect())
            }
            NumericType::DoubleComplex => {
                Self::DoubleComplex(numbers.map(Element::from_number).collect())
            }
        }
    }

    /// Number of stored elements.
    pub(crate) fn len(&self) -> usize {
        forward_to_vec!(self, values => values.len())
    }

    /// Return the numeric type of the payload, [None] for strings and arrays.
    pub(crate) fn numeric_type(&self) -> Option<NumericType> {
        Some(match self {
            Self::Bool(_) => NumericType::Bool,
            Self::Char(_) => NumericType::Char,
            Self::UChar(_) => NumericType::UChar,
            Self::Short(_) => NumericType::Short,
            Self::Int(_) => NumericType::Int,
            Self::Long(_) => NumericType::Long,
            Self::LongLong(_) => NumericType::LongLong,
            Self::Float(_) => NumericType::Float,
            Self::Double(_) => NumericType::Double,
            Self::FloatComplex(_) => NumericType::FloatComplex,
            Self::DoubleComplex(_) => NumericType::DoubleComplex,
            Self::Text(_) | Self::Array(_) => return None,
        })
    }

    /// Return the element type of the payload, [None] for arrays.
    pub(crate) fn element_type(&self) -> Option<ElementType> {
        match self {
            Self::Text(_) => Some(ElementType::Text),
            Self::Array(_) => None,
            _ => self.numeric_type().map(ElementType::Numeric),
        }
    }

    /// Short description of the stored type for error messages.
    pub(crate) fn describe(&self) -> String {
        match self.element_type() {
            Some(element) => element.to_string(),
            None => "array".to_string(),
        }
    }

    /// Return the widened value at `index`, [None] for strings and arrays.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub(crate) fn number_at(&self, index: usize) -> Option<Number> {
        forward_to_numeric!(self, values => Some(values[index].to_number()),
            Self::Text(_) | Self::Array(_) => None)
    }

    /// Insert `amount` default elements at `at`.
    pub(crate) fn insert_default(&mut self, at: usize, amount: usize) {
        forward_to_vec!(self, values => insert_default(values, at, amount))
    }

    /// Remove `amount` elements starting at `at`.
    pub(crate) fn remove(&mut self, at: usize, amount: usize) {
        forward_to_vec!(self, values => {
            values.drain(at..at + amount);
        })
    }

    /// Truncate or pad with default elements.
    pub(crate) fn resize(&mut self, len: usize) {
        let current = self.len();
        if len >= current {
            self.insert_default(current, len - current);
        } else {
            self.remove(len, current - len);
        }
    }

    /// Deep copy of the given range.
    pub(crate) fn extract(&self, range: Range<usize>) -> Self {
        map_vec!(self, values => values[range].to_vec())
    }

    /// Deep copy of the elements at the given indices.
    pub(crate) fn gather(&self, indices: &[usize]) -> Self {
        map_vec!(self, values => gather(values, indices))
    }

    /// Insert a deep copy of `other` at `at`.
    ///
    /// Returns `false` without changes if `other` holds a different type.
    pub(crate) fn insert_from(&mut self, at: usize, other: &ColumnData) -> bool {
        splice_same_variant!(self, other, at;
            Bool, Char, UChar, Short, Int, Long, LongLong,
            Float, Double, FloatComplex, DoubleComplex, Text, Array)
    }

    /// Reorder such that position `i` receives the element at `order[i]`.
    pub(crate) fn permute(&mut self, order: &[usize]) {
        forward_to_vec!(self, values => permute(values, order))
    }

    /// Release the string or array stored at `index`.
    pub(crate) fn release(&mut self, index: usize) {
        match self {
            Self::Text(values) => values[index] = None,
            Self::Array(values) => values[index] = None,
            _ => {}
        }
    }
}
