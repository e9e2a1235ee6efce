//! This module defines [Array], the element type of array columns.

use delegate::delegate;
use num::complex::Complex64;

use crate::{
    datatypes::{Element, ElementType, Number},
    error::Error,
};

use super::{buffer::Buffer, data::ColumnData};

/// A fixed-length vector of numbers or strings
/// in which every element is independently valid or invalid.
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    element: ElementType,
    buffer: Buffer,
}

impl Array {
    /// Create an [Array] of `len` invalid elements.
    pub fn new(element: ElementType, len: usize) -> Self {
        Self {
            element,
            buffer: Buffer::invalid(ColumnData::element(element, len)),
        }
    }

    /// Create an [Array] of valid numeric elements.
    pub fn from_values<T: Element>(values: Vec<T>) -> Self {
        Self {
            element: ElementType::Numeric(T::NATIVE),
            buffer: Buffer::valid(T::into_data(values, T::NATIVE)),
        }
    }

    /// Create an [Array] of strings, [None] entries are invalid.
    pub fn from_strings(values: Vec<Option<String>>) -> Self {
        Self {
            element: ElementType::Text,
            buffer: Buffer::from_strings(values),
        }
    }

    pub(crate) fn from_buffer(element: ElementType, buffer: Buffer) -> Self {
        Self { element, buffer }
    }

    pub(crate) fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub(crate) fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    /// Return the type of the elements.
    pub fn element_type(&self) -> ElementType {
        self.element
    }

    /// Return the raw numeric payload, including the payload of invalid elements.
    ///
    /// Returns [None] if `T` does not match the element type.
    pub fn data<T: Element>(&self) -> Option<&[T]> {
        T::values(self.buffer.data()).map(Vec::as_slice)
    }

    /// Return the strings of this array, [None] marks invalid elements.
    pub fn strings(&self) -> Option<&[Option<String>]> {
        match self.buffer.data() {
            ColumnData::Text(values) => Some(values),
            _ => None,
        }
    }

    delegate! {
        to self.buffer {
            /// Number of elements.
            pub fn len(&self) -> usize;
            /// Number of invalid elements.
            pub fn count_invalid(&self) -> usize;
            /// Return `true` if at least one element is invalid.
            pub fn has_invalid(&self) -> bool;
            /// Return `true` if at least one element is valid.
            pub fn has_valid(&self) -> bool;
            /// Return whether the element at `index` is valid.
            pub fn is_valid(&self, index: usize) -> Result<bool, Error>;
            /// Read an element of exactly the type `T`.
            pub fn get<T: Element>(&self, index: usize) -> Result<Option<T>, Error>;
            /// Read a numeric element, widened.
            pub fn get_number(&self, index: usize) -> Result<Option<Number>, Error>;
            /// Read a non-complex numeric element as [`f64`].
            pub fn get_double(&self, index: usize) -> Result<Option<f64>, Error>;
            /// Read a numeric element as [`Complex64`].
            pub fn get_complex(&self, index: usize) -> Result<Option<Complex64>, Error>;
            /// Read a string element.
            pub fn get_string(&self, index: usize) -> Result<Option<&str>, Error>;
            /// Write an element of exactly the type `T` and mark it valid.
            pub fn set<T: Element>(&mut self, index: usize, value: T) -> Result<(), Error>;
            /// Write a numeric element, narrowing it to the element type.
            pub fn set_number(&mut self, index: usize, value: Number) -> Result<(), Error>;
            /// Write a string element and mark it valid.
            pub fn set_string(&mut self, index: usize, value: String) -> Result<(), Error>;
            /// Mark an element as invalid.
            pub fn set_invalid(&mut self, index: usize) -> Result<(), Error>;
        }
    }

    /// Return `true` if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
